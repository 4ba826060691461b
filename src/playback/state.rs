//! Playback state machine.

use std::fmt;

/// Playback state. There is no separate "stopped": reaching the end of the
/// timeline rewinds to 0 and pauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Playhead is still; edits and seeks are applied immediately
    #[default]
    Paused,
    /// Playhead advances on every tick
    Playing,
}

impl PlaybackState {
    /// Check if currently playing
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing)
    }

    /// Check if paused
    pub fn is_paused(&self) -> bool {
        matches!(self, PlaybackState::Paused)
    }

    /// The state a play/pause toggle leads to
    pub fn toggled(self) -> Self {
        match self {
            PlaybackState::Paused => PlaybackState::Playing,
            PlaybackState::Playing => PlaybackState::Paused,
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlaybackState::Paused => "paused",
            PlaybackState::Playing => "playing",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_paused() {
        let state = PlaybackState::default();
        assert!(state.is_paused());
        assert!(!state.is_playing());
    }

    #[test]
    fn test_toggled() {
        assert_eq!(PlaybackState::Paused.toggled(), PlaybackState::Playing);
        assert_eq!(PlaybackState::Playing.toggled(), PlaybackState::Paused);
    }
}

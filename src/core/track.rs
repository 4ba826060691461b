//! Track data structure: an ordered lane holding clips of one kind.
//! Clips themselves live in the timeline's clip map and point back at
//! their track by id.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::clip::{ClipContent, MediaKind};
use crate::core::id::TrackId;

/// Kind of lane. Decides which clip content a track accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    Video,
    Audio,
    Text,
    Effect,
}

impl TrackKind {
    /// Display name used when naming new tracks ("Video 1", "Audio 2", ...)
    pub fn label(self) -> &'static str {
        match self {
            TrackKind::Video => "Video",
            TrackKind::Audio => "Audio",
            TrackKind::Text => "Text",
            TrackKind::Effect => "Effect",
        }
    }

    /// Rendering hint for newly created tracks
    pub fn default_color(self) -> &'static str {
        match self {
            TrackKind::Video => "#3B82F6",
            TrackKind::Audio => "#10B981",
            TrackKind::Text => "#F59E0B",
            TrackKind::Effect => "#8B5CF6",
        }
    }

    /// Only lanes that produce sound have a meaningful mute flag
    pub fn has_audio(self) -> bool {
        matches!(self, TrackKind::Video | TrackKind::Audio)
    }

    pub fn accepts(self, content: &ClipContent) -> bool {
        match (self, content) {
            (TrackKind::Video, ClipContent::Media { media, .. }) => {
                matches!(media, MediaKind::Video | MediaKind::Image)
            }
            (TrackKind::Audio, ClipContent::Media { media, .. }) => *media == MediaKind::Audio,
            (TrackKind::Text, ClipContent::Text { .. }) => true,
            (TrackKind::Effect, ClipContent::Effect { .. }) => true,
            _ => false,
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TrackKind::Video => "video",
            TrackKind::Audio => "audio",
            TrackKind::Text => "text",
            TrackKind::Effect => "effect",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub kind: TrackKind,
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub muted: bool,
}

impl Track {
    /// Create an unlocked, unmuted track with the kind's default color.
    pub fn new(id: TrackId, kind: TrackKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            color: kind.default_color().to_string(),
            locked: false,
            muted: false,
        }
    }

    /// Set muted state.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Whether this lane should contribute sound during playback
    pub fn is_audible(&self) -> bool {
        self.kind.has_audio() && !self.muted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clip::TextStyle;
    use crate::core::id::IdGen;
    use crate::project::asset::AssetId;

    fn media(kind: MediaKind) -> ClipContent {
        ClipContent::Media {
            asset_id: AssetId::from("a"),
            media: kind,
            trim_start: 0,
            trim_end: 0,
        }
    }

    #[test]
    fn test_track_creation() {
        let mut ids = IdGen::new();
        let track = Track::new(ids.next_track(), TrackKind::Audio, "Audio 1");
        assert_eq!(track.color, "#10B981");
        assert!(!track.muted);
        assert!(!track.locked);
        assert!(track.is_audible());
    }

    #[test]
    fn test_accepts() {
        assert!(TrackKind::Video.accepts(&media(MediaKind::Video)));
        assert!(TrackKind::Video.accepts(&media(MediaKind::Image)));
        assert!(!TrackKind::Video.accepts(&media(MediaKind::Audio)));
        assert!(TrackKind::Audio.accepts(&media(MediaKind::Audio)));
        assert!(TrackKind::Text.accepts(&ClipContent::Text {
            text: "hi".into(),
            style: TextStyle::default(),
        }));
        assert!(!TrackKind::Text.accepts(&ClipContent::Effect { effect: "blur".into() }));
        assert!(TrackKind::Effect.accepts(&ClipContent::Effect { effect: "blur".into() }));
    }

    #[test]
    fn test_mute_meaningless_on_text() {
        let mut ids = IdGen::new();
        let mut track = Track::new(ids.next_track(), TrackKind::Text, "Text 1");
        assert!(!track.is_audible());
        track.set_muted(true);
        assert!(track.muted);
        assert!(!track.is_audible());
    }
}

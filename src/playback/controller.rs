//! Logical playhead transport: play/pause, ticks, seeks and skips.
//!
//! The controller never owns the timeline. Every call borrows it, so the
//! session that owns the timeline stays its only mutator even while a
//! ticker thread is producing ticks.

use std::time::Duration;

use crate::core::time::{self, Time};
use crate::core::timeline::Timeline;
use crate::playback::state::PlaybackState;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// What a tick did to the playhead
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing; the tick was ignored
    Idle,
    /// Playhead moved to the contained position
    Advanced(Time),
    /// Playhead hit the end, was rewound to 0 and playback paused
    ReachedEnd,
}

#[derive(Debug, Clone)]
pub struct PlaybackController {
    state: PlaybackState,
    tick_interval: Duration,
    skip_step: Time,
}

impl PlaybackController {
    pub fn new(tick_interval: Duration, skip_step: Time) -> Self {
        Self {
            state: PlaybackState::Paused,
            tick_interval: tick_interval.max(Duration::from_millis(1)),
            skip_step: skip_step.max(0),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn skip_step(&self) -> Time {
        self.skip_step
    }

    /// Returns true if this changed the state
    pub fn play(&mut self) -> bool {
        self.set_state(PlaybackState::Playing)
    }

    /// Returns true if this changed the state
    pub fn pause(&mut self) -> bool {
        self.set_state(PlaybackState::Paused)
    }

    pub fn toggle(&mut self) -> PlaybackState {
        self.set_state(self.state.toggled());
        self.state
    }

    fn set_state(&mut self, next: PlaybackState) -> bool {
        if self.state == next {
            return false;
        }
        log::debug!("playback {} -> {}", self.state, next);
        self.state = next;
        true
    }

    /// Advance the playhead by `elapsed` wall-clock time.
    ///
    /// At the nominal interval this is one interval's worth of timeline time;
    /// late ticks advance proportionally further. Reaching or passing the end
    /// rewinds to 0 and pauses.
    pub fn tick(&mut self, timeline: &mut Timeline, elapsed: Duration) -> TickOutcome {
        if !self.state.is_playing() {
            return TickOutcome::Idle;
        }
        let next = timeline.playhead().saturating_add(time::from_duration(elapsed));
        if next >= timeline.duration() {
            timeline.set_playhead(0);
            self.pause();
            log::debug!("playback reached end, rewound to start");
            return TickOutcome::ReachedEnd;
        }
        TickOutcome::Advanced(timeline.set_playhead(next))
    }

    /// Move the playhead in either state. Returns the clamped position.
    pub fn seek(&self, timeline: &mut Timeline, position: Time) -> Time {
        let stored = timeline.set_playhead(position);
        log::debug!("seek to {}", time::format_time(stored));
        stored
    }

    /// Click-to-seek: `time = x / pixels_per_second`
    pub fn seek_to_pixel(&self, timeline: &mut Timeline, x: f64) -> Time {
        let position = timeline.pixel_to_time(x);
        self.seek(timeline, position)
    }

    /// Jump ahead by the skip step, clamped. Play state is unchanged.
    pub fn skip_forward(&self, timeline: &mut Timeline) -> Time {
        let target = timeline.playhead().saturating_add(self.skip_step);
        self.seek(timeline, target)
    }

    pub fn skip_backward(&self, timeline: &mut Timeline) -> Time {
        let target = timeline.playhead().saturating_sub(self.skip_step);
        self.seek(timeline, target)
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL, time::from_seconds(5.0))
    }
}

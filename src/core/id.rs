//! Opaque identifiers for clips and tracks, and the generator that issues them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipId(u64);

/// Unique identifier for a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(u64);

impl ClipId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl TrackId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clip-{}", self.0)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "track-{}", self.0)
    }
}

/// Monotonic id source owned by a single timeline. Never yields 0.
///
/// Clips and tracks draw from the same sequence, so a raw value is unique
/// across both kinds within one timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdGen {
    next: u64,
}

impl IdGen {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    fn bump(&mut self) -> u64 {
        let id = self.next.max(1);
        self.next = id.saturating_add(1);
        id
    }

    pub fn next_clip(&mut self) -> ClipId {
        ClipId(self.bump())
    }

    pub fn next_track(&mut self) -> TrackId {
        TrackId(self.bump())
    }

    /// Make sure every id issued from now on is greater than `max_seen`.
    pub fn seed_from_max(&mut self, max_seen: u64) {
        self.next = self.next.max(max_seen.saturating_add(1)).max(1);
    }
}

impl Default for IdGen {
    fn default() -> Self {
        Self::new()
    }
}

//! Core types for the timeline editor.
//!
//! This module provides the fundamental data structures for the timeline,
//! tracks, clips, ids, time and the time/pixel scale.
//! All time values are in nanoseconds (i64).

pub mod clip;
pub mod error;
pub mod id;
pub mod scale;
pub mod time;
pub mod timeline;
pub mod track;

// Re-export core data structures for easier access.
pub use clip::{Clip, ClipContent, MediaKind, TextAnimation, TextStyle, SPEED_PRESETS};
pub use error::{EditError, EditResult};
pub use id::{ClipId, TrackId};
pub use scale::TimelineScale;
pub use time::{Time, ZERO};
pub use timeline::{EditDefaults, InvalidTimeline, Timeline};
pub use track::{Track, TrackKind};

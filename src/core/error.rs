//! Errors raised by timeline edit operations.

use crate::core::id::{ClipId, TrackId};
use crate::core::time::Time;
use crate::core::track::TrackKind;

/// Every edit failure is local and recoverable; a failed edit leaves the
/// timeline exactly as it was.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("split point {at}ns is outside clip {clip_id} ({start}ns..{end}ns)")]
    InvalidSplitPoint {
        clip_id: ClipId,
        at: Time,
        start: Time,
        end: Time,
    },
    #[error("clip {0} not found")]
    ClipNotFound(ClipId),
    #[error("track {0} not found")]
    TrackNotFound(TrackId),
    #[error("no {0} track to place the clip on")]
    NoTargetTrack(TrackKind),
    #[error("{what} of {value}ns is outside the timeline (0..{limit}ns)")]
    OutOfBounds {
        what: &'static str,
        value: Time,
        limit: Time,
    },
    #[error("track {0} is locked")]
    TrackLocked(TrackId),
    #[error("{content} content does not belong on a {track} track")]
    KindMismatch {
        track: TrackKind,
        content: &'static str,
    },
    #[error("speed {0} is not one of the supported presets")]
    InvalidSpeed(f64),
}

pub type EditResult<T> = Result<T, EditError>;

//! Edit operations on a [`Timeline`](crate::core::Timeline).
//!
//! Operations are `impl Timeline` blocks split by what they touch. They are
//! synchronous and all-or-nothing: either the edit applies in full and
//! returns `Ok`, or nothing changes and an [`EditError`](crate::core::EditError)
//! says why.

pub mod clip_ops;
pub mod track_ops;

pub use clip_ops::DEFAULT_TEXT;

/// Which side of a clip a resize drag holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipEdge {
    Start,
    End,
}

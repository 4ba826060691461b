//! Timeline editing model for a multi-track video editor.
//!
//! Tracks and clips live in a [`Timeline`](core::Timeline); edit operations
//! in [`edit`] mutate it atomically; [`playback`] drives the playhead from a
//! ticker thread; [`project`] saves and loads the whole thing as JSON.

pub mod config;
pub mod core;
pub mod edit;
pub mod playback;
pub mod project;
pub mod session;

pub use crate::config::EditorConfig;
pub use crate::core::{
    Clip, ClipContent, ClipId, EditError, EditResult, MediaKind, Time, Timeline, Track, TrackId, TrackKind,
};
pub use crate::edit::ClipEdge;
pub use crate::playback::{PlaybackController, PlaybackState, TickOutcome};
pub use crate::project::{Asset, AssetId, Project, ProjectError};
pub use crate::session::EditorSession;

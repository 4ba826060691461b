//! Track-level edits: creating, removing and flagging lanes.

use crate::core::clip::Clip;
use crate::core::error::{EditError, EditResult};
use crate::core::id::TrackId;
use crate::core::timeline::Timeline;
use crate::core::track::{Track, TrackKind};

impl Timeline {
    /// Append a track named `"{Kind} {n}"`, n being one more than the number
    /// of existing tracks of that kind.
    pub fn add_track(&mut self, kind: TrackKind) -> TrackId {
        let n = self.tracks.iter().filter(|t| t.kind == kind).count() + 1;
        let id = self.ids.next_track();
        let name = format!("{} {}", kind.label(), n);
        log::debug!("add track {} ({})", id, name);
        self.tracks.push(Track::new(id, kind, name));
        id
    }

    /// Remove a track together with every clip on it.
    /// Returns the track and its clips sorted by start.
    pub fn remove_track(&mut self, track_id: TrackId) -> EditResult<(Track, Vec<Clip>)> {
        self.require_editable_track(track_id)?;
        let index = self
            .tracks
            .iter()
            .position(|t| t.id == track_id)
            .ok_or(EditError::TrackNotFound(track_id))?;
        let track = self.tracks.remove(index);

        let doomed: Vec<_> = self
            .clips
            .values()
            .filter(|c| c.track_id == track_id)
            .map(|c| c.id)
            .collect();
        let mut removed: Vec<Clip> = doomed
            .into_iter()
            .filter_map(|id| self.clips.remove(&id))
            .collect();
        removed.sort_by_key(|c| (c.start, c.id));

        log::debug!("remove track {} with {} clip(s)", track_id, removed.len());
        Ok((track, removed))
    }

    /// Flip the mute flag. Returns the new value. Clips are untouched.
    pub fn toggle_mute(&mut self, track_id: TrackId) -> EditResult<bool> {
        let track = self.track_mut(track_id)?;
        track.set_muted(!track.muted);
        log::debug!("track {} muted={}", track_id, track.muted);
        Ok(track.muted)
    }

    /// Flip the lock flag. Returns the new value. Clips are untouched.
    pub fn toggle_lock(&mut self, track_id: TrackId) -> EditResult<bool> {
        let track = self.track_mut(track_id)?;
        track.set_locked(!track.locked);
        log::debug!("track {} locked={}", track_id, track.locked);
        Ok(track.locked)
    }

    pub fn rename_track(&mut self, track_id: TrackId, name: impl Into<String>) -> EditResult<()> {
        self.track_mut(track_id)?.name = name.into();
        Ok(())
    }

    pub fn set_track_color(&mut self, track_id: TrackId, color: impl Into<String>) -> EditResult<()> {
        self.track_mut(track_id)?.color = color.into();
        Ok(())
    }
}

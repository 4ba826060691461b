//! Clip-level edits. Each operation validates first and mutates second, so a
//! returned error always means the timeline was left untouched.

use crate::core::clip::{speed_preset, Clip, ClipContent, TextStyle};
use crate::core::error::{EditError, EditResult};
use crate::core::id::{ClipId, TrackId};
use crate::core::time::{self, Time};
use crate::core::timeline::Timeline;
use crate::core::track::TrackKind;
use crate::edit::ClipEdge;
use crate::project::asset::Asset;

pub const DEFAULT_TEXT: &str = "New Text";

/// `[lo, hi]` if it is not empty
fn bounded(value: Time, lo: Time, hi: Time) -> Option<Time> {
    (lo <= hi).then(|| time::clamp(value, lo, hi))
}

impl Timeline {
    /// Room left between `start` and the end of the timeline, if a minimum
    /// length clip still fits there.
    fn room_at(&self, start: Time) -> EditResult<Time> {
        let available = self.duration - start;
        if start < 0 || available < self.defaults.min_clip_duration {
            return Err(EditError::OutOfBounds {
                what: "clip start",
                value: start,
                limit: self.duration - self.defaults.min_clip_duration,
            });
        }
        Ok(available)
    }

    /// Validate and insert a new clip. `at` is clamped into the timeline and
    /// `duration` is shortened to fit before the end.
    fn place_clip(
        &mut self,
        track_id: TrackId,
        name: String,
        at: Time,
        duration: Time,
        content: ClipContent,
    ) -> EditResult<ClipId> {
        let track = self.require_editable_track(track_id)?;
        if !track.kind.accepts(&content) {
            return Err(EditError::KindMismatch {
                track: track.kind,
                content: content.label(),
            });
        }
        if duration <= 0 {
            return Err(EditError::OutOfBounds {
                what: "clip duration",
                value: duration,
                limit: self.duration,
            });
        }

        let start = time::clamp(at, 0, self.duration);
        let available = self.room_at(start)?;
        let duration = duration.min(available);

        let id = self.ids.next_clip();
        log::debug!(
            "place {} clip {} on {} at {} for {}",
            content.label(),
            id,
            track_id,
            time::format_time(start),
            time::format_time(duration)
        );
        self.clips
            .insert(id, Clip::new(id, track_id, name, start, duration, content));
        Ok(id)
    }

    /// Import an asset onto a track at `at`. The clip is as long as the asset,
    /// or the still-image default when the asset has no length.
    pub fn insert_media_clip(&mut self, track_id: TrackId, asset: &Asset, at: Time) -> EditResult<ClipId> {
        let duration = match asset.duration {
            Some(d) if d > 0 => d,
            _ => self.defaults.still_image_duration,
        };
        let content = ClipContent::Media {
            asset_id: asset.id.clone(),
            media: asset.kind,
            trim_start: 0,
            trim_end: 0,
        };
        let id = self.place_clip(track_id, asset.name.clone(), at, duration, content)?;

        // Whatever did not fit before the end of the timeline counts as trimmed
        let placed = self.clips[&id].duration;
        if let Some(clip) = self.clips.get_mut(&id) {
            clip.set_trim_end(duration - placed);
        }
        Ok(id)
    }

    pub fn insert_effect_clip(
        &mut self,
        track_id: TrackId,
        effect: impl Into<String>,
        at: Time,
        duration: Time,
    ) -> EditResult<ClipId> {
        let effect = effect.into();
        self.place_clip(
            track_id,
            effect.clone(),
            at,
            duration,
            ClipContent::Effect { effect },
        )
    }

    /// Insert a caption on the first unlocked text track, using the default
    /// text duration and style.
    pub fn add_text_clip(&mut self, at: Time) -> EditResult<ClipId> {
        let mut text_tracks = self.tracks.iter().filter(|t| t.kind == TrackKind::Text);
        let first = text_tracks
            .next()
            .ok_or(EditError::NoTargetTrack(TrackKind::Text))?;
        let track_id = if first.locked {
            text_tracks
                .find(|t| !t.locked)
                .map(|t| t.id)
                .ok_or(EditError::TrackLocked(first.id))?
        } else {
            first.id
        };

        let content = ClipContent::Text {
            text: DEFAULT_TEXT.to_string(),
            style: self.defaults.text_style.clone(),
        };
        let duration = self.defaults.text_duration;
        self.place_clip(track_id, DEFAULT_TEXT.to_string(), at, duration, content)
    }

    /// Split a clip in two at `at`, which must lie strictly inside the clip.
    ///
    /// The original keeps its id and becomes the head `[start, at)`; the tail
    /// `[at, end)` gets a new id, which is returned.
    pub fn split_clip(&mut self, clip_id: ClipId, at: Time) -> EditResult<ClipId> {
        let clip = self.require_editable_clip(clip_id)?;
        if at <= clip.start || at >= clip.end() {
            return Err(EditError::InvalidSplitPoint {
                clip_id,
                at,
                start: clip.start,
                end: clip.end(),
            });
        }

        let offset = at - clip.start;
        let mut tail = clip.clone();
        tail.name = format!("{} (split)", clip.name);
        tail.start = at;
        tail.duration = clip.end() - at;
        tail.set_trim_start(clip.trim_start() + offset);
        let tail_id = self.ids.next_clip();
        tail.id = tail_id;

        if let Some(head) = self.clips.get_mut(&clip_id) {
            let cut = head.end() - at;
            head.duration = offset;
            head.set_trim_end(head.trim_end() + cut);
        }
        self.clips.insert(tail_id, tail);

        log::debug!("split {} at {} -> {}", clip_id, time::format_time(at), tail_id);
        Ok(tail_id)
    }

    /// Remove a clip and hand it back. Unknown ids are an error and change nothing.
    pub fn delete_clip(&mut self, clip_id: ClipId) -> EditResult<Clip> {
        self.require_editable_clip(clip_id)?;
        let removed = self
            .clips
            .remove(&clip_id)
            .ok_or(EditError::ClipNotFound(clip_id))?;
        log::debug!("delete {}", clip_id);
        Ok(removed)
    }

    /// Copy a clip to just after itself on the same track. The copy is
    /// shortened if it would run past the end of the timeline.
    pub fn duplicate_clip(&mut self, clip_id: ClipId) -> EditResult<ClipId> {
        let clip = self.require_editable_clip(clip_id)?;
        let start = clip.end();
        let available = self.room_at(start)?;

        let mut copy = clip.clone();
        copy.name = format!("{} (copy)", clip.name);
        copy.start = start;
        if copy.duration > available {
            copy.set_trim_end(copy.trim_end() + (copy.duration - available));
            copy.duration = available;
        }
        let copy_id = self.ids.next_clip();
        copy.id = copy_id;
        self.clips.insert(copy_id, copy);

        log::debug!("duplicate {} -> {}", clip_id, copy_id);
        Ok(copy_id)
    }

    /// Drag one edge of a clip to `to`.
    ///
    /// The start edge moves `start` and shifts `trim_start` with it; the end
    /// edge changes `duration` and gives or takes `trim_end`. Media clips cannot
    /// be dragged past the source material they have left. The result is
    /// clamped so the clip keeps at least the minimum length and stays inside
    /// the timeline.
    ///
    /// Returns whether the clip changed. `Ok(false)` means the edge was
    /// already as far as it can go (or the clip is shorter than the minimum
    /// length and has no legal position), and nothing was touched.
    pub fn resize_clip(&mut self, clip_id: ClipId, edge: ClipEdge, to: Time) -> EditResult<bool> {
        let clip = self.require_editable_clip(clip_id)?;
        let min = self.defaults.min_clip_duration;
        let (start, end) = (clip.start, clip.end());
        let media = clip.is_media();
        let (trim_start, trim_end) = (clip.trim_start(), clip.trim_end());

        let target = match edge {
            ClipEdge::Start => {
                let lo = if media { start.saturating_sub(trim_start).max(0) } else { 0 };
                bounded(to, lo, end - min)
            }
            ClipEdge::End => {
                let hi = if media {
                    end.saturating_add(trim_end).min(self.duration)
                } else {
                    self.duration
                };
                bounded(to, start + min, hi)
            }
        };
        let Some(target) = target else {
            log::debug!("resize {} has no legal position, left as is", clip_id);
            return Ok(false);
        };
        let current = match edge {
            ClipEdge::Start => start,
            ClipEdge::End => end,
        };
        if target == current {
            return Ok(false);
        }

        if let Some(clip) = self.clips.get_mut(&clip_id) {
            match edge {
                ClipEdge::Start => {
                    let delta = target - start;
                    clip.start = target;
                    clip.duration -= delta;
                    clip.set_trim_start(trim_start + delta);
                }
                ClipEdge::End => {
                    let delta = target - end;
                    clip.duration += delta;
                    clip.set_trim_end(trim_end - delta);
                }
            }
            log::debug!(
                "resize {} to {}..{}",
                clip_id,
                time::format_time(clip.start),
                time::format_time(clip.end())
            );
        }
        Ok(true)
    }

    /// Move a clip to `new_start`, optionally onto another track of a
    /// compatible kind. The start is clamped so the whole clip stays inside
    /// the timeline.
    pub fn move_clip(&mut self, clip_id: ClipId, new_start: Time, target: Option<TrackId>) -> EditResult<()> {
        let clip = self.require_editable_clip(clip_id)?;
        let track_id = target.unwrap_or(clip.track_id);
        let track = self.require_editable_track(track_id)?;
        if !track.kind.accepts(&clip.content) {
            return Err(EditError::KindMismatch {
                track: track.kind,
                content: clip.content.label(),
            });
        }
        let start = time::clamp(new_start, 0, self.duration - clip.duration);

        if let Some(clip) = self.clips.get_mut(&clip_id) {
            clip.start = start;
            clip.track_id = track_id;
        }
        log::debug!("move {} to {} at {}", clip_id, track_id, time::format_time(start));
        Ok(())
    }

    /// Set the playback speed multiplier. The clip's timeline footprint is
    /// left alone; see [`Timeline::set_speed_retimed`] for the other behavior.
    pub fn set_speed(&mut self, clip_id: ClipId, speed: f64) -> EditResult<()> {
        self.require_editable_clip(clip_id)?;
        let speed = speed_preset(speed).ok_or(EditError::InvalidSpeed(speed))?;
        if let Some(clip) = self.clips.get_mut(&clip_id) {
            clip.speed = speed;
        }
        log::debug!("speed {} = {}x", clip_id, speed);
        Ok(())
    }

    /// Set the speed multiplier and rescale the clip's duration so it covers
    /// the same source material (`duration * old / new`). The new duration is
    /// clamped to the minimum clip length and to the end of the timeline.
    /// Returns the new duration.
    pub fn set_speed_retimed(&mut self, clip_id: ClipId, speed: f64) -> EditResult<Time> {
        let clip = self.require_editable_clip(clip_id)?;
        let speed = speed_preset(speed).ok_or(EditError::InvalidSpeed(speed))?;
        let min = self.defaults.min_clip_duration;
        let scaled = (clip.duration as f64 * clip.speed / speed).round() as Time;
        let duration = scaled.max(min).min(self.duration - clip.start);

        if let Some(clip) = self.clips.get_mut(&clip_id) {
            clip.speed = speed;
            clip.duration = duration;
        }
        log::debug!("speed {} = {}x, duration {}", clip_id, speed, time::format_time(duration));
        Ok(duration)
    }

    pub fn rename_clip(&mut self, clip_id: ClipId, name: impl Into<String>) -> EditResult<()> {
        self.require_editable_clip(clip_id)?;
        if let Some(clip) = self.clips.get_mut(&clip_id) {
            clip.name = name.into();
        }
        Ok(())
    }

    /// Replace the text of a caption clip
    pub fn set_clip_text(&mut self, clip_id: ClipId, new_text: impl Into<String>) -> EditResult<()> {
        self.require_text_clip(clip_id)?;
        if let Some(ClipContent::Text { text, .. }) = self.clips.get_mut(&clip_id).map(|c| &mut c.content) {
            *text = new_text.into();
        }
        Ok(())
    }

    /// Replace the style of a caption clip
    pub fn set_text_style(&mut self, clip_id: ClipId, new_style: TextStyle) -> EditResult<()> {
        self.require_text_clip(clip_id)?;
        if let Some(ClipContent::Text { style, .. }) = self.clips.get_mut(&clip_id).map(|c| &mut c.content) {
            *style = new_style;
        }
        Ok(())
    }

    fn require_text_clip(&self, clip_id: ClipId) -> EditResult<&Clip> {
        let clip = self.require_editable_clip(clip_id)?;
        match clip.content {
            ClipContent::Text { .. } => Ok(clip),
            _ => Err(EditError::KindMismatch {
                track: TrackKind::Text,
                content: clip.content.label(),
            }),
        }
    }
}

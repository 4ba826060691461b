//! Timeline aggregate: tracks, clips, total duration, playhead and zoom.
//!
//! Clips are kept in an id-keyed map and reference their track by id; tracks
//! keep display order in a vector. Nothing outside the crate mutates either
//! collection directly, every change goes through an edit operation.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::core::clip::{speed_preset, Clip, ClipContent, MediaKind, TextStyle, SPEED_PRESETS};
use crate::core::error::{EditError, EditResult};
use crate::core::id::{ClipId, IdGen, TrackId};
use crate::core::scale::{TimelineScale, DEFAULT_MAX_ZOOM, DEFAULT_ZOOM};
use crate::core::time::{self, Time};
use crate::core::track::Track;

/// Values edit operations fall back to when the caller does not supply them.
/// Filled from [`crate::config::EditorConfig`]; not part of the saved payload.
#[derive(Debug, Clone, PartialEq)]
pub struct EditDefaults {
    pub text_duration: Time,
    pub text_style: TextStyle,
    pub min_clip_duration: Time,
    pub still_image_duration: Time,
    pub skip_step: Time,
}

impl Default for EditDefaults {
    fn default() -> Self {
        Self {
            text_duration: time::from_seconds(5.0),
            text_style: TextStyle::default(),
            min_clip_duration: time::from_millis(100),
            still_image_duration: time::from_seconds(5.0),
            skip_step: time::from_seconds(5.0),
        }
    }
}

/// A saved timeline failed validation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid timeline: {0}")]
pub struct InvalidTimeline(pub String);

/// Main timeline structure. All time values are in nanoseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "TimelineData", try_from = "TimelineData")]
pub struct Timeline {
    pub(crate) tracks: Vec<Track>,
    pub(crate) clips: HashMap<ClipId, Clip>,
    pub(crate) duration: Time,
    pub(crate) playhead: Time,
    pub(crate) scale: TimelineScale,
    pub(crate) ids: IdGen,
    pub(crate) defaults: EditDefaults,
}

impl Timeline {
    /// Create an empty timeline of the given total duration.
    /// Durations below the minimum clip length are raised to it.
    pub fn new(duration: Time) -> Self {
        Self::with_defaults(duration, EditDefaults::default())
    }

    pub fn with_defaults(duration: Time, defaults: EditDefaults) -> Self {
        Self {
            tracks: Vec::new(),
            clips: HashMap::new(),
            duration: duration.max(defaults.min_clip_duration).max(1),
            playhead: 0,
            scale: TimelineScale::default(),
            ids: IdGen::new(),
            defaults,
        }
    }

    pub fn duration(&self) -> Time {
        self.duration
    }

    pub fn playhead(&self) -> Time {
        self.playhead
    }

    pub fn defaults(&self) -> &EditDefaults {
        &self.defaults
    }

    pub fn set_defaults(&mut self, defaults: EditDefaults) {
        self.defaults = defaults;
    }

    /// Set the playhead position, clamped to `[0, duration]`. Returns the stored value.
    pub fn set_playhead(&mut self, position: Time) -> Time {
        self.playhead = time::clamp(position, 0, self.duration);
        self.playhead
    }

    /// Change the total duration. The timeline cannot shrink below the end of
    /// its furthest clip.
    pub fn set_duration(&mut self, duration: Time) -> EditResult<()> {
        let floor = self.content_end().max(1);
        if duration < floor {
            return Err(EditError::OutOfBounds {
                what: "timeline duration",
                value: duration,
                limit: floor,
            });
        }
        self.duration = duration;
        self.set_playhead(self.playhead);
        log::debug!("timeline duration set to {}", time::format_time(duration));
        Ok(())
    }

    /// Tracks in display order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, track_id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == track_id)
    }

    pub fn clip(&self, clip_id: ClipId) -> Option<&Clip> {
        self.clips.get(&clip_id)
    }

    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    /// All clips in unspecified order
    pub fn clips(&self) -> impl Iterator<Item = &Clip> {
        self.clips.values()
    }

    /// Clips on a track, sorted by start time
    pub fn clips_on_track(&self, track_id: TrackId) -> Vec<&Clip> {
        let mut clips: Vec<&Clip> = self
            .clips
            .values()
            .filter(|c| c.track_id == track_id)
            .collect();
        clips.sort_by_key(|c| (c.start, c.id));
        clips
    }

    /// Clips under a timeline position, in track display order
    pub fn clips_at(&self, position: Time) -> Vec<&Clip> {
        self.tracks
            .iter()
            .flat_map(|t| self.clips_on_track(t.id))
            .filter(|c| c.contains(position))
            .collect()
    }

    /// Media clips that should sound at `position`, paired with the source
    /// time they play there. Muted tracks and tracks without audio are skipped.
    pub fn audible_at(&self, position: Time) -> Vec<(&Clip, Time)> {
        self.tracks
            .iter()
            .filter(|t| t.is_audible())
            .flat_map(|t| self.clips_on_track(t.id))
            .filter(|c| !matches!(c.content, ClipContent::Media { media: MediaKind::Image, .. }))
            .filter_map(|c| c.timeline_to_source(position).map(|source| (c, source)))
            .collect()
    }

    /// End of the furthest clip, or 0 for an empty timeline
    pub fn content_end(&self) -> Time {
        self.clips.values().map(Clip::end).max().unwrap_or(0)
    }

    pub fn scale(&self) -> &TimelineScale {
        &self.scale
    }

    pub fn set_zoom(&mut self, zoom_percent: f64) {
        self.scale.set_zoom(zoom_percent);
    }

    pub fn pixels_per_second(&self) -> f64 {
        self.scale.pixels_per_second()
    }

    pub fn time_to_pixel(&self, t: Time) -> f64 {
        self.scale.time_to_pixel(t)
    }

    /// Timeline time under a pixel offset, clamped to `[0, duration]`
    pub fn pixel_to_time(&self, x: f64) -> Time {
        time::clamp(self.scale.pixel_to_time(x), 0, self.duration)
    }

    /// Left offset and width in pixels of a clip's rectangle
    pub fn clip_span_px(&self, clip_id: ClipId) -> Option<(f64, f64)> {
        self.clip(clip_id)
            .map(|c| self.scale.span_to_pixels(c.start, c.duration))
    }

    pub(crate) fn require_clip(&self, clip_id: ClipId) -> EditResult<&Clip> {
        self.clips.get(&clip_id).ok_or(EditError::ClipNotFound(clip_id))
    }

    pub(crate) fn require_track(&self, track_id: TrackId) -> EditResult<&Track> {
        self.track(track_id).ok_or(EditError::TrackNotFound(track_id))
    }

    pub(crate) fn track_mut(&mut self, track_id: TrackId) -> EditResult<&mut Track> {
        self.tracks
            .iter_mut()
            .find(|t| t.id == track_id)
            .ok_or(EditError::TrackNotFound(track_id))
    }

    /// The track must exist and be unlocked
    pub(crate) fn require_editable_track(&self, track_id: TrackId) -> EditResult<&Track> {
        let track = self.require_track(track_id)?;
        if track.locked {
            return Err(EditError::TrackLocked(track_id));
        }
        Ok(track)
    }

    /// Look up a clip whose track accepts edits
    pub(crate) fn require_editable_clip(&self, clip_id: ClipId) -> EditResult<&Clip> {
        let clip = self.require_clip(clip_id)?;
        self.require_editable_track(clip.track_id)?;
        Ok(clip)
    }

    /// Check every structural invariant. Edit operations keep these true;
    /// loading a saved payload relies on this to reject bad input.
    pub fn validate(&self) -> Result<(), InvalidTimeline> {
        if self.duration <= 0 {
            return Err(InvalidTimeline(format!("duration {} must be positive", self.duration)));
        }
        if self.playhead < 0 || self.playhead > self.duration {
            return Err(InvalidTimeline(format!("playhead {} outside timeline", self.playhead)));
        }

        let mut track_ids = HashSet::new();
        for track in &self.tracks {
            if !track_ids.insert(track.id) {
                return Err(InvalidTimeline(format!("duplicate track id {}", track.id)));
            }
        }

        for (id, clip) in &self.clips {
            if *id != clip.id {
                return Err(InvalidTimeline(format!("clip {} stored under {}", clip.id, id)));
            }
            let track = self.track(clip.track_id).ok_or_else(|| {
                InvalidTimeline(format!("clip {} references missing {}", clip.id, clip.track_id))
            })?;
            if !track.kind.accepts(&clip.content) {
                return Err(InvalidTimeline(format!(
                    "{} clip {} on {} track {}",
                    clip.content.label(),
                    clip.id,
                    track.kind,
                    track.id
                )));
            }
            // Compare without forming `start + duration`, which may overflow
            if clip.start < 0
                || clip.duration <= 0
                || clip.start > self.duration
                || clip.duration > self.duration - clip.start
            {
                return Err(InvalidTimeline(format!(
                    "clip {} spans {} from {} outside 0..{}",
                    clip.id, clip.duration, clip.start, self.duration
                )));
            }
            if !SPEED_PRESETS.contains(&clip.speed) {
                return Err(InvalidTimeline(format!("clip {} has speed {}", clip.id, clip.speed)));
            }
            if clip.trim_start() < 0 || clip.trim_end() < 0 {
                return Err(InvalidTimeline(format!("clip {} has negative trim", clip.id)));
            }
            // Source extents must stay representable for trim arithmetic in edits
            if clip.trim_start().checked_add(clip.duration).is_none()
                || clip.end().checked_add(clip.trim_end()).is_none()
            {
                return Err(InvalidTimeline(format!("clip {} trim out of range", clip.id)));
            }
        }
        Ok(())
    }

    /// Largest raw id in use, for reseeding the generator after a load
    fn max_id(&self) -> u64 {
        let tracks = self.tracks.iter().map(|t| t.id.raw());
        let clips = self.clips.keys().map(|c| c.raw());
        tracks.chain(clips).max().unwrap_or(0)
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(time::from_seconds(60.0))
    }
}

/// Saved shape of a timeline: plain lists, clips grouped by track order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineData {
    pub duration: Time,
    #[serde(default)]
    pub playhead: Time,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f64,
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub clips: Vec<Clip>,
}

fn default_zoom() -> f64 {
    DEFAULT_ZOOM
}

fn default_max_zoom() -> f64 {
    DEFAULT_MAX_ZOOM
}

impl From<Timeline> for TimelineData {
    fn from(timeline: Timeline) -> Self {
        let order: HashMap<TrackId, usize> = timeline
            .tracks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id, i))
            .collect();
        let mut clips: Vec<Clip> = timeline.clips.into_values().collect();
        clips.sort_by_key(|c| (order.get(&c.track_id).copied(), c.start, c.id));

        Self {
            duration: timeline.duration,
            playhead: timeline.playhead,
            zoom: timeline.scale.zoom(),
            max_zoom: timeline.scale.max_zoom(),
            tracks: timeline.tracks,
            clips,
        }
    }
}

impl TryFrom<TimelineData> for Timeline {
    type Error = InvalidTimeline;

    fn try_from(data: TimelineData) -> Result<Self, Self::Error> {
        let mut clips = HashMap::with_capacity(data.clips.len());
        for mut clip in data.clips {
            if let Some(preset) = speed_preset(clip.speed) {
                clip.speed = preset;
            }
            let id = clip.id;
            if clips.insert(id, clip).is_some() {
                return Err(InvalidTimeline(format!("duplicate clip id {}", id)));
            }
        }

        let mut timeline = Self {
            tracks: data.tracks,
            clips,
            duration: data.duration,
            playhead: data.playhead,
            scale: TimelineScale::new(data.zoom, data.max_zoom),
            ids: IdGen::new(),
            defaults: EditDefaults::default(),
        };
        timeline.validate()?;
        let max_id = timeline.max_id();
        timeline.ids.seed_from_max(max_id);
        Ok(timeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::track::TrackKind;

    #[test]
    fn test_timeline_creation() {
        let timeline = Timeline::new(time::from_seconds(20.0));
        assert_eq!(timeline.playhead(), 0);
        assert_eq!(timeline.duration(), time::from_seconds(20.0));
        assert!(timeline.tracks().is_empty());
        assert_eq!(timeline.clip_count(), 0);
        assert_eq!(timeline.pixels_per_second(), 30.0);
    }

    #[test]
    fn test_nonpositive_duration_is_raised() {
        let timeline = Timeline::new(-5);
        assert!(timeline.duration() > 0);
        assert!(timeline.validate().is_ok());
    }

    #[test]
    fn test_playhead_clamping() {
        let mut timeline = Timeline::new(time::from_seconds(20.0));
        assert_eq!(timeline.set_playhead(time::from_seconds(30.0)), time::from_seconds(20.0));
        assert_eq!(timeline.set_playhead(time::from_seconds(-5.0)), 0);
        assert_eq!(timeline.set_playhead(time::from_seconds(7.5)), time::from_seconds(7.5));
    }

    #[test]
    fn test_set_duration_reclamps_playhead() {
        let mut timeline = Timeline::new(time::from_seconds(20.0));
        timeline.set_playhead(time::from_seconds(15.0));
        timeline.set_duration(time::from_seconds(10.0)).unwrap();
        assert_eq!(timeline.playhead(), time::from_seconds(10.0));
        assert!(timeline.set_duration(0).is_err());
    }

    #[test]
    fn test_set_duration_respects_content() {
        let mut timeline = Timeline::new(time::from_seconds(20.0));
        let track = timeline.add_track(TrackKind::Text);
        timeline.add_text_clip(time::from_seconds(10.0)).unwrap();
        assert_eq!(timeline.content_end(), time::from_seconds(15.0));

        let err = timeline.set_duration(time::from_seconds(12.0)).unwrap_err();
        assert!(matches!(err, EditError::OutOfBounds { .. }));
        assert_eq!(timeline.duration(), time::from_seconds(20.0));
        assert!(timeline.set_duration(time::from_seconds(15.0)).is_ok());
        assert_eq!(timeline.clips_on_track(track).len(), 1);
    }

    #[test]
    fn test_audible_at_skips_muted_and_silent_tracks() {
        use crate::project::asset::Asset;

        let mut timeline = Timeline::new(time::from_seconds(20.0));
        let video = timeline.add_track(TrackKind::Video);
        let audio = timeline.add_track(TrackKind::Audio);
        timeline.add_track(TrackKind::Text);
        let clip_asset = Asset::new("v", "v.mp4", MediaKind::Video, "u", Some(time::from_seconds(10.0)));
        let music = Asset::new("m", "m.wav", MediaKind::Audio, "u", Some(time::from_seconds(10.0)));
        let picture = timeline.insert_media_clip(video, &clip_asset, 0).unwrap();
        let song = timeline.insert_media_clip(audio, &music, time::from_seconds(2.0)).unwrap();
        timeline.add_text_clip(0).unwrap();

        let at = time::from_seconds(3.0);
        let heard: Vec<_> = timeline.audible_at(at).into_iter().map(|(c, src)| (c.id, src)).collect();
        assert_eq!(heard, vec![(picture, at), (song, time::from_seconds(1.0))]);

        timeline.toggle_mute(video).unwrap();
        let heard: Vec<_> = timeline.audible_at(at).into_iter().map(|(c, _)| c.id).collect();
        assert_eq!(heard, vec![song]);
        assert!(timeline.audible_at(time::from_seconds(15.0)).is_empty());
    }

    #[test]
    fn test_pixel_to_time_is_clamped() {
        let mut timeline = Timeline::new(time::from_seconds(20.0));
        timeline.set_zoom(100.0);
        assert_eq!(timeline.pixel_to_time(100.0), time::from_seconds(2.0));
        assert_eq!(timeline.pixel_to_time(5000.0), time::from_seconds(20.0));
        assert_eq!(timeline.pixel_to_time(-3.0), 0);
    }

    #[test]
    fn test_serde_round_trip_reseeds_ids() {
        let mut timeline = Timeline::new(time::from_seconds(20.0));
        timeline.add_track(TrackKind::Text);
        let clip = timeline.add_text_clip(time::from_seconds(1.0)).unwrap();

        let json = serde_json::to_string(&timeline).unwrap();
        let mut loaded: Timeline = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.clip(clip), timeline.clip(clip));
        assert_eq!(loaded.tracks(), timeline.tracks());

        let fresh = loaded.add_text_clip(time::from_seconds(8.0)).unwrap();
        assert!(fresh.raw() > clip.raw());
    }

    #[test]
    fn test_rejects_clip_past_end() {
        let json = r##"{
            "duration": 10000000000,
            "tracks": [{"id": 1, "kind": "text", "name": "Text 1", "color": "#F59E0B"}],
            "clips": [{
                "id": 2, "track_id": 1, "name": "Title", "start": 8000000000,
                "duration": 5000000000, "speed": 1.0,
                "content": {"type": "text", "text": "Hi",
                    "style": {"font": "Inter", "size": 48, "color": "#FFFFFF"}}
            }]
        }"##;
        let err = serde_json::from_str::<Timeline>(json).unwrap_err();
        assert!(err.to_string().contains("outside"));
    }

    fn text_clip_json(start: i64, duration: i64, speed: f64) -> String {
        format!(
            r##"{{
            "duration": 10000000000,
            "tracks": [{{"id": 1, "kind": "text", "name": "Text 1", "color": "#F59E0B"}}],
            "clips": [{{
                "id": 2, "track_id": 1, "name": "Title", "start": {start},
                "duration": {duration}, "speed": {speed},
                "content": {{"type": "text", "text": "Hi",
                    "style": {{"font": "Inter", "size": 48, "color": "#FFFFFF"}}}}
            }}]
        }}"##
        )
    }

    #[test]
    fn test_rejects_overflowing_clip_span() {
        let json = text_clip_json(i64::MAX - 5, 10, 1.0);
        let err = serde_json::from_str::<Timeline>(&json).unwrap_err();
        assert!(err.to_string().contains("outside"));

        let json = text_clip_json(0, i64::MAX, 1.0);
        assert!(serde_json::from_str::<Timeline>(&json).is_err());
    }

    #[test]
    fn test_rejects_overflowing_trim() {
        let json = r##"{
            "duration": 10000000000,
            "tracks": [{"id": 1, "kind": "video", "name": "Video 1", "color": "#3B82F6"}],
            "clips": [{
                "id": 2, "track_id": 1, "name": "a.mp4", "start": 1000000000,
                "duration": 1000000000, "speed": 1.0,
                "content": {"type": "media", "asset_id": "a", "media": "video",
                    "trim_start": 0, "trim_end": 9223372036854775000}
            }]
        }"##;
        let err = serde_json::from_str::<Timeline>(json).unwrap_err();
        assert!(err.to_string().contains("trim"));
    }

    #[test]
    fn test_load_speed_must_be_a_preset() {
        let json = text_clip_json(0, 1_000_000_000, 3.0);
        let err = serde_json::from_str::<Timeline>(&json).unwrap_err();
        assert!(err.to_string().contains("speed"));

        let json = text_clip_json(0, 1_000_000_000, 1.5 + 1e-12);
        let timeline: Timeline = serde_json::from_str(&json).unwrap();
        assert_eq!(timeline.clips().next().map(|c| c.speed), Some(1.5));
    }

    #[test]
    fn test_rejects_clip_on_missing_track() {
        let json = r##"{
            "duration": 10000000000,
            "tracks": [],
            "clips": [{
                "id": 2, "track_id": 1, "name": "Fx", "start": 0,
                "duration": 1000000000, "speed": 1.0,
                "content": {"type": "effect", "effect": "blur"}
            }]
        }"##;
        assert!(serde_json::from_str::<Timeline>(json).is_err());
    }
}

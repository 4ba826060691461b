//! Clip data structure representing a timed segment on a track.
//!
//! Timeline time and source time are independent: a media clip placed at 0s
//! may begin 5s into its asset (`trim_start`). Text and effect clips have no
//! source and therefore no trim.

use serde::{Deserialize, Serialize};

use crate::core::id::{ClipId, TrackId};
use crate::core::time::Time;
use crate::project::asset::AssetId;

/// Playback speed multipliers a clip may use.
pub const SPEED_PRESETS: [f64; 8] = [0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 2.0, 4.0];

/// The preset `speed` stands for, if it is within float noise of one of
/// [`SPEED_PRESETS`].
pub fn speed_preset(speed: f64) -> Option<f64> {
    SPEED_PRESETS.iter().copied().find(|p| (p - speed).abs() < 1e-9)
}

/// Kind of media an asset-backed clip plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Video,
    Audio,
    Image,
}

/// Entry animation for caption/title clips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAnimation {
    #[default]
    None,
    Fade,
    Slide,
    Typewriter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font: String,
    pub size: u32,
    /// CSS-style hex color, e.g. `#FFFFFF`
    pub color: String,
    #[serde(default)]
    pub animation: TextAnimation,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: "Inter".to_string(),
            size: 48,
            color: "#FFFFFF".to_string(),
            animation: TextAnimation::None,
        }
    }
}

/// What a clip shows or plays. Kind-specific fields live only on their variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClipContent {
    Media {
        asset_id: AssetId,
        media: MediaKind,
        /// Source time cut from the head of the asset
        trim_start: Time,
        /// Source time cut from the tail of the asset
        trim_end: Time,
    },
    Text {
        text: String,
        style: TextStyle,
    },
    Effect {
        effect: String,
    },
}

impl ClipContent {
    /// Short label used in error messages and logs
    pub fn label(&self) -> &'static str {
        match self {
            ClipContent::Media { media: MediaKind::Video, .. } => "video",
            ClipContent::Media { media: MediaKind::Audio, .. } => "audio",
            ClipContent::Media { media: MediaKind::Image, .. } => "image",
            ClipContent::Text { .. } => "text",
            ClipContent::Effect { .. } => "effect",
        }
    }
}

/// A clip is a timed segment placed on exactly one track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub id: ClipId,
    pub track_id: TrackId,
    pub name: String,
    pub start: Time,    // Position on timeline (nanoseconds)
    pub duration: Time, // Length on timeline (nanoseconds), always > 0
    pub speed: f64,
    pub content: ClipContent,
}

impl Clip {
    /// Create a new clip at normal speed
    pub fn new(
        id: ClipId,
        track_id: TrackId,
        name: impl Into<String>,
        start: Time,
        duration: Time,
        content: ClipContent,
    ) -> Self {
        Self {
            id,
            track_id,
            name: name.into(),
            start,
            duration,
            speed: 1.0,
            content,
        }
    }

    /// End of the clip on the timeline (exclusive)
    pub fn end(&self) -> Time {
        self.start + self.duration
    }

    /// Check if a timeline position falls inside `[start, end)`
    pub fn contains(&self, timeline_position: Time) -> bool {
        timeline_position >= self.start && timeline_position < self.end()
    }

    pub fn trim_start(&self) -> Time {
        match &self.content {
            ClipContent::Media { trim_start, .. } => *trim_start,
            _ => 0,
        }
    }

    pub fn trim_end(&self) -> Time {
        match &self.content {
            ClipContent::Media { trim_end, .. } => *trim_end,
            _ => 0,
        }
    }

    pub fn is_media(&self) -> bool {
        matches!(self.content, ClipContent::Media { .. })
    }

    pub fn text_style(&self) -> Option<&TextStyle> {
        match &self.content {
            ClipContent::Text { style, .. } => Some(style),
            _ => None,
        }
    }

    /// Convert a timeline position to the corresponding position in the source asset.
    ///
    /// Returns `None` for non-media clips or positions outside the clip.
    /// Source time advances `speed` times faster than timeline time.
    pub fn timeline_to_source(&self, timeline_position: Time) -> Option<Time> {
        if !self.is_media() || !self.contains(timeline_position) {
            return None;
        }
        let offset = (timeline_position - self.start) as f64 * self.speed;
        Some(self.trim_start().saturating_add(offset.round() as Time))
    }

    pub(crate) fn set_trim_start(&mut self, value: Time) {
        if let ClipContent::Media { trim_start, .. } = &mut self.content {
            *trim_start = value.max(0);
        }
    }

    pub(crate) fn set_trim_end(&mut self, value: Time) {
        if let ClipContent::Media { trim_end, .. } = &mut self.content {
            *trim_end = value.max(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::id::IdGen;
    use crate::core::time;

    fn media_clip(start: f64, duration: f64, trim_start: f64) -> Clip {
        let mut ids = IdGen::new();
        let track = ids.next_track();
        Clip::new(
            ids.next_clip(),
            track,
            "test.mp4",
            time::from_seconds(start),
            time::from_seconds(duration),
            ClipContent::Media {
                asset_id: AssetId::from("asset-1"),
                media: MediaKind::Video,
                trim_start: time::from_seconds(trim_start),
                trim_end: 0,
            },
        )
    }

    #[test]
    fn test_clip_creation() {
        let clip = media_clip(2.0, 3.0, 0.0);
        assert_eq!(clip.end(), time::from_seconds(5.0));
        assert_eq!(clip.speed, 1.0);
        assert_eq!(clip.content.label(), "video");
    }

    #[test]
    fn test_clip_contains_is_half_open() {
        let clip = media_clip(0.0, 2.0, 0.0);
        assert!(clip.contains(time::from_seconds(0.0)));
        assert!(clip.contains(time::from_seconds(1.0)));
        assert!(!clip.contains(time::from_seconds(2.0)));
    }

    #[test]
    fn test_timeline_to_source() {
        // Timeline [0s, 5s) plays source from 5s
        let mut clip = media_clip(0.0, 5.0, 5.0);
        assert_eq!(
            clip.timeline_to_source(time::from_seconds(2.0)),
            Some(time::from_seconds(7.0))
        );
        assert_eq!(clip.timeline_to_source(time::from_seconds(5.0)), None);

        clip.speed = 2.0;
        assert_eq!(
            clip.timeline_to_source(time::from_seconds(2.0)),
            Some(time::from_seconds(9.0))
        );
    }

    #[test]
    fn test_trim_only_touches_media() {
        let mut clip = media_clip(0.0, 1.0, 0.0);
        clip.set_trim_start(-5);
        assert_eq!(clip.trim_start(), 0);
        clip.set_trim_end(time::from_seconds(1.0));
        assert_eq!(clip.trim_end(), time::from_seconds(1.0));

        let mut text = clip.clone();
        text.content = ClipContent::Text {
            text: "Hello".into(),
            style: TextStyle::default(),
        };
        text.set_trim_start(time::from_seconds(3.0));
        assert_eq!(text.trim_start(), 0);
        assert_eq!(text.text_style().map(|s| s.size), Some(48));
        assert!(clip.text_style().is_none());
    }

    #[test]
    fn test_speed_presets() {
        assert_eq!(speed_preset(0.25), Some(0.25));
        assert_eq!(speed_preset(4.0), Some(4.0));
        assert_eq!(speed_preset(2.0 + 5e-10), Some(2.0));
        assert_eq!(speed_preset(3.0), None);
        assert_eq!(speed_preset(0.0), None);
        assert_eq!(speed_preset(f64::NAN), None);
    }

    #[test]
    fn test_content_serializes_tagged() {
        let clip = media_clip(0.0, 1.0, 0.0);
        let json = serde_json::to_string(&clip.content).unwrap();
        assert!(json.contains("\"type\":\"media\""));
        assert!(json.contains("\"media\":\"video\""));
    }
}

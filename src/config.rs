//! Editor configuration, persisted as JSON.
//!
//! Every field has a default, so a partial file (or no file) is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::clip::{TextAnimation, TextStyle};
use crate::core::scale::TimelineScale;
use crate::core::time;
use crate::core::timeline::EditDefaults;
use crate::playback::PlaybackController;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub playback: PlaybackConfig,
    pub timeline: TimelineConfig,
    pub text: TextConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub tick_interval_ms: u64,
    pub skip_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub default_duration_secs: f64,
    pub default_zoom: f64,
    pub max_zoom: f64,
    pub min_clip_duration_ms: u64,
    pub still_image_duration_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub default_duration_secs: f64,
    pub font: String,
    pub size: u32,
    pub color: String,
    pub animation: TextAnimation,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            skip_seconds: 5.0,
        }
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            default_duration_secs: 60.0,
            default_zoom: 50.0,
            max_zoom: 200.0,
            min_clip_duration_ms: 100,
            still_image_duration_secs: 5.0,
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        let style = TextStyle::default();
        Self {
            default_duration_secs: 5.0,
            font: style.font,
            size: style.size,
            color: style.color,
            animation: style.animation,
        }
    }
}

/// Seconds from a config value; negative or non-finite values become 0
fn secs(value: f64) -> time::Time {
    if value.is_finite() {
        time::from_seconds(value.max(0.0))
    } else {
        0
    }
}

impl EditorConfig {
    /// Load config from `path`.
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Like [`EditorConfig::load`], but logs and falls back to defaults on error
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("failed to load config from {}: {}", path.display(), e);
                log::warn!("using default configuration");
                Self::default()
            }
        }
    }

    /// Save atomically: write to a temp file, then rename over the target
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, json)?;
        std::fs::rename(temp_path, path)?;
        Ok(())
    }

    /// Per-user config file location, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "studio-timeline")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.playback.tick_interval_ms.max(1))
    }

    pub fn default_duration(&self) -> time::Time {
        secs(self.timeline.default_duration_secs)
    }

    pub fn edit_defaults(&self) -> EditDefaults {
        let min_clip_duration = time::from_millis(self.timeline.min_clip_duration_ms.max(1) as i64);
        EditDefaults {
            text_duration: secs(self.text.default_duration_secs).max(min_clip_duration),
            text_style: TextStyle {
                font: self.text.font.clone(),
                size: self.text.size,
                color: self.text.color.clone(),
                animation: self.text.animation,
            },
            min_clip_duration,
            still_image_duration: secs(self.timeline.still_image_duration_secs).max(min_clip_duration),
            skip_step: secs(self.playback.skip_seconds),
        }
    }

    pub fn scale(&self) -> TimelineScale {
        TimelineScale::new(self.timeline.default_zoom, self.timeline.max_zoom)
    }

    pub fn playback_controller(&self) -> PlaybackController {
        PlaybackController::new(self.tick_interval(), secs(self.playback.skip_seconds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("studio-timeline-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
        let defaults = config.edit_defaults();
        assert_eq!(defaults, EditDefaults::default());
        assert_eq!(config.scale().pixels_per_second(), 30.0);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: EditorConfig =
            serde_json::from_str(r#"{"playback": {"skip_seconds": 2.5}, "text": {"size": 64}}"#).unwrap();
        assert_eq!(config.playback.skip_seconds, 2.5);
        assert_eq!(config.playback.tick_interval_ms, 100);
        assert_eq!(config.text.size, 64);
        assert_eq!(config.text.color, "#FFFFFF");
        assert_eq!(config.edit_defaults().skip_step, time::from_seconds(2.5));
    }

    #[test]
    fn test_nonsense_values_are_tamed() {
        let mut config = EditorConfig::default();
        config.playback.tick_interval_ms = 0;
        config.playback.skip_seconds = -4.0;
        config.text.default_duration_secs = f64::NAN;
        assert_eq!(config.tick_interval(), Duration::from_millis(1));
        let defaults = config.edit_defaults();
        assert_eq!(defaults.skip_step, 0);
        assert_eq!(defaults.text_duration, defaults.min_clip_duration);
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = temp_file("missing-config.json");
        assert_eq!(EditorConfig::load(&path).unwrap(), EditorConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_file("config.json");
        let mut config = EditorConfig::default();
        config.timeline.default_zoom = 120.0;
        config.save(&path).unwrap();

        let loaded = EditorConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_malformed_file() {
        let path = temp_file("bad-config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(EditorConfig::load(&path), Err(ConfigError::Json(_))));
        assert_eq!(EditorConfig::load_or_default(&path), EditorConfig::default());
        std::fs::remove_file(&path).unwrap();
    }
}

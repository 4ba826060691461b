//! Mapping between timeline time and horizontal pixel offsets.
//!
//! `pixels_per_second = 10 + zoom% / 100 * 40`: 10 px/s fully zoomed out,
//! 50 px/s at 100%, 90 px/s at 200%. Placement, hit-testing and playhead
//! drawing must all go through the same scale or they drift apart.

use serde::{Deserialize, Serialize};

use crate::core::time::{self, Time};

pub const BASE_PIXELS_PER_SECOND: f64 = 10.0;
pub const PIXELS_PER_SECOND_PER_100_ZOOM: f64 = 40.0;
pub const DEFAULT_ZOOM: f64 = 50.0;
pub const DEFAULT_MAX_ZOOM: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineScale {
    zoom_percent: f64,
    max_zoom: f64,
}

impl TimelineScale {
    pub fn new(zoom_percent: f64, max_zoom: f64) -> Self {
        let mut scale = Self {
            zoom_percent: 0.0,
            max_zoom: if max_zoom.is_finite() { max_zoom.max(0.0) } else { DEFAULT_MAX_ZOOM },
        };
        scale.set_zoom(zoom_percent);
        scale
    }

    pub fn zoom(&self) -> f64 {
        self.zoom_percent
    }

    pub fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    /// Set the zoom percentage, clamped to `[0, max_zoom]`. Non-finite input resets to 0.
    pub fn set_zoom(&mut self, zoom_percent: f64) {
        self.zoom_percent = if zoom_percent.is_finite() {
            zoom_percent.clamp(0.0, self.max_zoom)
        } else {
            0.0
        };
    }

    /// Always at least [`BASE_PIXELS_PER_SECOND`], so never zero
    pub fn pixels_per_second(&self) -> f64 {
        BASE_PIXELS_PER_SECOND + (self.zoom_percent / 100.0) * PIXELS_PER_SECOND_PER_100_ZOOM
    }

    pub fn time_to_pixel(&self, t: Time) -> f64 {
        time::to_seconds(t) * self.pixels_per_second()
    }

    pub fn pixel_to_time(&self, x: f64) -> Time {
        time::from_seconds(x / self.pixels_per_second())
    }

    /// Left offset and width, in pixels, of a span on the timeline
    pub fn span_to_pixels(&self, start: Time, duration: Time) -> (f64, f64) {
        (self.time_to_pixel(start), self.time_to_pixel(duration))
    }
}

impl Default for TimelineScale {
    fn default() -> Self {
        Self::new(DEFAULT_ZOOM, DEFAULT_MAX_ZOOM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixels_per_second_endpoints() {
        let mut scale = TimelineScale::new(0.0, 200.0);
        assert_eq!(scale.pixels_per_second(), 10.0);
        scale.set_zoom(100.0);
        assert_eq!(scale.pixels_per_second(), 50.0);
        scale.set_zoom(200.0);
        assert_eq!(scale.pixels_per_second(), 90.0);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut scale = TimelineScale::new(50.0, 200.0);
        scale.set_zoom(500.0);
        assert_eq!(scale.zoom(), 200.0);
        scale.set_zoom(-10.0);
        assert_eq!(scale.zoom(), 0.0);
        scale.set_zoom(f64::NAN);
        assert_eq!(scale.zoom(), 0.0);
    }

    #[test]
    fn test_monotonic_in_zoom() {
        let mut last = 0.0;
        for zoom in [0.0, 10.0, 25.0, 50.0, 99.0, 150.0, 200.0] {
            let scale = TimelineScale::new(zoom, 200.0);
            assert!(scale.pixels_per_second() > last);
            last = scale.pixels_per_second();
        }
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        for zoom in [0.0, 37.5, 100.0, 200.0] {
            let scale = TimelineScale::new(zoom, 200.0);
            for secs in [0.0, 0.1, 3.3333, 12.5, 19.999] {
                let t = time::from_seconds(secs);
                let back = scale.pixel_to_time(scale.time_to_pixel(t));
                assert!((back - t).abs() <= 1, "zoom {zoom} t {secs}: {back} != {t}");
            }
        }
    }

    #[test]
    fn test_span_to_pixels() {
        let scale = TimelineScale::new(100.0, 200.0);
        let (left, width) = scale.span_to_pixels(time::from_seconds(2.0), time::from_seconds(4.0));
        assert!((left - 100.0).abs() < 1e-9);
        assert!((width - 200.0).abs() < 1e-9);
    }
}

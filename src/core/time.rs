//! Time representation using nanoseconds for exact timeline arithmetic.
//! Seconds only appear at the edges (config, display, pixel mapping).

use std::time::Duration;

/// Time in nanoseconds since timeline start
/// This is the core time representation throughout the crate
pub type Time = i64;

/// Time constants for conversions
pub mod constants {
    use super::Time;

    pub const NANOS_PER_SECOND: Time = 1_000_000_000;
    pub const NANOS_PER_MILLI: Time = 1_000_000;
}

/// Time zero constant
pub const ZERO: Time = 0;

/// Convert seconds (f64) to nanoseconds (i64), rounded to the nearest nanosecond
#[inline]
pub fn from_seconds(seconds: f64) -> Time {
    (seconds * constants::NANOS_PER_SECOND as f64).round() as Time
}

/// Convert nanoseconds (i64) to seconds (f64)
#[inline]
pub fn to_seconds(nanos: Time) -> f64 {
    nanos as f64 / constants::NANOS_PER_SECOND as f64
}

/// Convert milliseconds to nanoseconds
#[inline]
pub fn from_millis(millis: i64) -> Time {
    millis * constants::NANOS_PER_MILLI
}

/// Convert nanoseconds to milliseconds
#[inline]
pub fn to_millis(nanos: Time) -> i64 {
    nanos / constants::NANOS_PER_MILLI
}

/// Convert a wall-clock duration to timeline nanoseconds, saturating at `Time::MAX`
#[inline]
pub fn from_duration(duration: Duration) -> Time {
    Time::try_from(duration.as_nanos()).unwrap_or(Time::MAX)
}

/// Clamp a time into `[lo, hi]`. A degenerate range collapses to `lo`.
#[inline]
pub fn clamp(value: Time, lo: Time, hi: Time) -> Time {
    if hi < lo {
        return lo;
    }
    value.max(lo).min(hi)
}

/// Format time as HH:MM:SS.mmm
pub fn format_time(nanos: Time) -> String {
    let sign = if nanos < 0 { "-" } else { "" };
    let total_millis = to_millis(nanos.abs());
    let hours = total_millis / 3_600_000;
    let minutes = (total_millis % 3_600_000) / 60_000;
    let seconds = (total_millis % 60_000) / 1000;
    let millis = total_millis % 1000;

    format!("{}{:02}:{:02}:{:02}.{:03}", sign, hours, minutes, seconds, millis)
}

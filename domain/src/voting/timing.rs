//! Countdown helpers for time-gated voting rules
//!
//! The auto-confirm and deadlock rules fire on wall-clock time, so the UI
//! shows "auto-confirms in 1d 3h" style countdowns anchored on the
//! activity's `proposed_at`.

use chrono::{DateTime, Duration, Utc};

/// Time remaining until a voting deadline (or elapsed past it)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRemaining {
    /// Whole hours of the remaining (or overshot) span
    pub hours: i64,
    /// Minutes past the whole hour
    pub minutes: i64,
    /// True once the deadline has passed
    pub is_past: bool,
    /// Display string: `"2d 5h"`, `"5h 30m"`, `"45m"`, or `"Time elapsed"`
    pub formatted: String,
}

/// Compute the countdown to `proposed_at + target_hours`
pub fn time_remaining(
    proposed_at: DateTime<Utc>,
    target_hours: f64,
    now: DateTime<Utc>,
) -> TimeRemaining {
    let target = proposed_at + Duration::milliseconds((target_hours * 3_600_000.0) as i64);
    let remaining = target - now;

    let is_past = remaining <= Duration::zero();
    let span = remaining.abs();
    let hours = span.num_hours();
    let minutes = span.num_minutes() % 60;

    let formatted = if is_past {
        "Time elapsed".to_string()
    } else if hours >= 24 {
        format!("{}d {}h", hours / 24, hours % 24)
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    };

    TimeRemaining {
        hours,
        minutes,
        is_past,
        formatted,
    }
}

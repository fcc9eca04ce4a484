//! Human-facing labels for history entries.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Relative label for `timestamp` as seen at `now`.
///
/// Buckets truncate, so 119 seconds is still "1 min ago". Timestamps in the
/// future (clock skew) read as "Just now". Anything older than a day falls
/// back to a short date rendered in `now`'s time zone, e.g. "Jan 5, 14:30".
pub fn relative_label<Tz>(timestamp: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let elapsed = now.clone().signed_duration_since(timestamp.clone()).num_seconds();

    if elapsed < MINUTE {
        "Just now".to_string()
    } else if elapsed < HOUR {
        format!("{} min ago", elapsed / MINUTE)
    } else if elapsed < DAY {
        format!("{} hours ago", elapsed / HOUR)
    } else {
        timestamp.with_timezone(&now.timezone()).format("%b %-d, %H:%M").to_string()
    }
}

/// Rounds half-up (towards +∞), so 15.5 → 16 and -15.5 → -15.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn temperature_label(celsius: f64) -> String {
    format!("{}°C", round_half_up(celsius))
}

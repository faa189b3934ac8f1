//! Human-relative timestamps ("3 minutes ago").

use chrono::{DateTime, Utc};

/// Label for a comment whose server timestamp has not resolved yet.
pub const PENDING_LABEL: &str = "moments ago";

const MINUTE: i64 = 60;
const HOUR: i64 = MINUTE * 60;
const DAY: i64 = HOUR * 24;
const WEEK: i64 = DAY * 7;
const MONTH: i64 = DAY * 30;
const YEAR: i64 = DAY * 365;

/// Relative label for a comment's creation time, as seen at `now`.
pub fn relative_label(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match created_at {
        Some(then) => format_relative(then, now),
        None => PENDING_LABEL.to_string(),
    }
}

/// Format the distance between `then` and `now` in the largest whole unit.
///
/// Past instants read "N units ago", future ones "N units from now".
pub fn format_relative(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then).num_seconds();
    let seconds = delta.abs();

    let (value, unit) = if seconds < MINUTE {
        (seconds, "second")
    } else if seconds < HOUR {
        (seconds / MINUTE, "minute")
    } else if seconds < DAY {
        (seconds / HOUR, "hour")
    } else if seconds < WEEK {
        (seconds / DAY, "day")
    } else if seconds < MONTH {
        (seconds / WEEK, "week")
    } else if seconds < YEAR {
        (seconds / MONTH, "month")
    } else {
        (seconds / YEAR, "year")
    };

    let plural = if value == 1 { "" } else { "s" };
    let suffix = if delta < 0 { "from now" } else { "ago" };
    format!("{value} {unit}{plural} {suffix}")
}

/// RFC 3339 rendering used for the `datetime`/`title` attributes.
pub fn iso_timestamp(created_at: Option<DateTime<Utc>>) -> Option<String> {
    created_at.map(|t| t.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
}

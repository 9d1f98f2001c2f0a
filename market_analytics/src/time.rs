//! Timestamp parsing for provider data.
//!
//! Providers do not agree on a timestamp format. The formats accepted here,
//! in the order they are tried:
//! - RFC-3339 with an explicit offset ("2024-03-08T14:30:00-05:00"), converted
//!   to UTC.
//! - Naive "YYYY-MM-DD HH:MM:SS", interpreted as US/Eastern wall-clock (the
//!   intraday feed's zone). DST fall-back ambiguities resolve to the earliest
//!   instant; spring-forward gaps have no instant and the value is unparsable.
//! - Bare "YYYY-MM-DD" (daily rows), midnight US/Eastern with the same rules.
//! - Integer Unix seconds.
//!
//! Anything else is unparsable; the normalizer drops and counts such rows.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Wall-clock zone of naive provider timestamps.
const PROVIDER_TZ: Tz = chrono_tz::America::New_York;

/// Parses one provider timestamp into UTC.
///
/// Returns `None` for values that match no accepted format or name a
/// nonexistent local time (spring-forward gap).
pub fn parse_provider_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return from_provider_local(naive);
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return from_provider_local(date.and_hms_opt(0, 0, 0)?);
    }

    if let Ok(seconds) = value.parse::<i64>() {
        return Utc.timestamp_opt(seconds, 0).single();
    }

    None
}

/// Naive provider wall-clock to UTC.
///
/// Earliest instant on fall-back ambiguity; `None` in the spring-forward gap.
fn from_provider_local(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    match PROVIDER_TZ.from_local_datetime(&naive) {
        LocalResult::Single(instant) => Some(instant.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _latest) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

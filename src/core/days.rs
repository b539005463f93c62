//! Day-count encoding used by the shadow table
//!
//! The shadow file stores the last password change as whole days since the
//! Unix epoch and every aging field as a whole number of days. Conversions
//! toward the file truncate toward zero, so sub-day precision never reaches
//! disk.

use chrono::{DateTime, Duration, Utc};

/// The zero point of every day count
pub fn epoch() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

/// Point in time `days` after the epoch, `None` if out of range
pub fn date_from_days(days: i64) -> Option<DateTime<Utc>> {
    Duration::try_days(days).and_then(|offset| epoch().checked_add_signed(offset))
}

/// Whole days between the epoch and `at`, truncated toward zero
pub fn days_since_epoch(at: &DateTime<Utc>) -> i64 {
    at.signed_duration_since(epoch()).num_days()
}

/// Duration of `days` whole days, `None` if out of range
pub fn duration_from_days(days: i64) -> Option<Duration> {
    Duration::try_days(days)
}

/// Whole days in `duration`, truncated toward zero
pub fn whole_days(duration: &Duration) -> i64 {
    duration.num_days()
}

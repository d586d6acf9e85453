use chrono::{DateTime, FixedOffset, Timelike};

/// Seconds of wall-clock time elapsed since midnight, read in `now`'s own offset.
pub fn elapsed_since_midnight(now: &DateTime<FixedOffset>) -> i64 {
    i64::from(now.num_seconds_from_midnight())
}

/// `true` when `date` is at or after "now minus the time elapsed today".
///
/// The cutoff is inclusive, so a photo dated exactly at today's midnight is
/// shown. Anything dated in the future is always shown.
pub fn is_visible(
    date: &DateTime<FixedOffset>,
    now: &DateTime<FixedOffset>,
    elapsed_secs: i64,
) -> bool {
    date.timestamp() >= now.timestamp() - elapsed_secs
}

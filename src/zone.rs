//! Time zone used for filename dates and for the "elapsed today" cutoff.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Duration as ChronoDuration, FixedOffset, Local, LocalResult, NaiveDate,
    NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::Deserialize;
use serde::de::{self, Deserializer};

use crate::error::Error;

/// Either the host's local zone or a named IANA zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    #[default]
    Local,
    Named(Tz),
}

impl Zone {
    /// Current instant expressed in this zone's wall-clock offset.
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.at(Utc::now())
    }

    pub fn at(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            Zone::Local => instant.with_timezone(&Local).fixed_offset(),
            Zone::Named(tz) => instant.with_timezone(tz).fixed_offset(),
        }
    }

    /// Build a wall-clock instant in this zone. Intended for tests and clocks.
    pub fn ymd_hms(&self, date: NaiveDate, time: NaiveTime) -> Option<DateTime<FixedOffset>> {
        match self {
            Zone::Local => Local
                .from_local_datetime(&NaiveDateTime::new(date, time))
                .earliest()
                .map(|dt| dt.fixed_offset()),
            Zone::Named(tz) => tz
                .from_local_datetime(&NaiveDateTime::new(date, time))
                .earliest()
                .map(|dt| dt.fixed_offset()),
        }
    }

    /// Local midnight of `date`.
    ///
    /// Zones that skip midnight for DST resolve to the first valid minute
    /// after it; a repeated midnight resolves to the earliest instant.
    pub fn midnight(&self, date: NaiveDate) -> DateTime<FixedOffset> {
        match self {
            Zone::Local => resolve_local_midnight(&Local, date),
            Zone::Named(tz) => resolve_local_midnight(tz, date),
        }
    }
}

fn resolve_local_midnight<Z: TimeZone>(tz: &Z, date: NaiveDate) -> DateTime<FixedOffset> {
    let mut candidate = NaiveDateTime::new(date, NaiveTime::MIN);
    for _ in 0..=180 {
        match tz.from_local_datetime(&candidate) {
            LocalResult::Single(dt) => return dt.fixed_offset(),
            LocalResult::Ambiguous(earliest, _) => return earliest.fixed_offset(),
            LocalResult::None => candidate += ChronoDuration::minutes(1),
        }
    }
    // No real zone has a gap over three hours wide; fall back to the UTC reading.
    Utc.from_utc_datetime(&candidate).fixed_offset()
}

impl FromStr for Zone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == "Local" {
            return Ok(Zone::Local);
        }
        trimmed
            .parse::<Tz>()
            .map(Zone::Named)
            .map_err(|_| Error::UnknownTimezone(s.to_string()))
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Local => f.write_str("Local"),
            Zone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

impl<'de> Deserialize<'de> for Zone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

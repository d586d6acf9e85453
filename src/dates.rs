//! Filename date extraction.
//!
//! Photos are named `YYYY-MM-DD <anything>.<ext>`; the leading token is the
//! day the photo becomes eligible for display.

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::error::DateParseError;
use crate::zone::Zone;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// First whitespace-delimited field of a bare filename.
pub fn date_token(base_name: &str) -> Option<&str> {
    base_name.split_whitespace().next()
}

/// Parse `token` as a strict `YYYY-MM-DD` calendar date.
pub fn parse_date_token(token: &str) -> Result<NaiveDate, DateParseError> {
    let bytes = token.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !well_formed {
        return Err(DateParseError::Malformed(token.to_string()));
    }
    NaiveDate::parse_from_str(token, DATE_FORMAT)
        .map_err(|_| DateParseError::Malformed(token.to_string()))
}

/// Midnight, in `zone`, of the date leading `base_name`.
pub fn extract_date(base_name: &str, zone: Zone) -> Result<DateTime<FixedOffset>, DateParseError> {
    let token = date_token(base_name).ok_or(DateParseError::MissingToken)?;
    let date = parse_date_token(token)?;
    Ok(zone.midnight(date))
}

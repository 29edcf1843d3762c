//! Date text boundary helpers.
//!
//! # Responsibility
//! - Parse and render the `dd.mm.yyyy` console representation.
//! - Encode dates for storage as ISO-8601 text so SQL equality works.
//!
//! # Invariants
//! - `dd.mm.yyyy` is the only textual form accepted or produced at the
//!   console boundary.

use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Console date format, e.g. `12.05.2007`.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Storage date format (ISO-8601 day precision).
pub(crate) const STORAGE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Error for malformed console date input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParseError {
    input: String,
}

impl Display for DateParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid date `{}`; expected dd.mm.yyyy, e.g. 12.05.2007",
            self.input
        )
    }
}

impl Error for DateParseError {}

/// Parses a console `dd.mm.yyyy` date.
pub fn parse_date(input: &str) -> Result<NaiveDate, DateParseError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| DateParseError {
        input: input.trim().to_string(),
    })
}

/// Renders a date in the console `dd.mm.yyyy` form.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Encodes a date for storage.
pub(crate) fn encode_storage_date(date: NaiveDate) -> String {
    date.format(STORAGE_DATE_FORMAT).to_string()
}

/// Decodes a stored date; `None` when the persisted text is not a date.
pub(crate) fn decode_storage_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, STORAGE_DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::{decode_storage_date, encode_storage_date, format_date, parse_date};
    use chrono::NaiveDate;

    #[test]
    fn parse_accepts_console_format() {
        let date = parse_date("12.05.2007").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2007, 5, 12).unwrap());
    }

    #[test]
    fn parse_trims_surrounding_whitespace() {
        assert!(parse_date(" 01.01.2024 ").is_ok());
    }

    #[test]
    fn parse_rejects_iso_and_garbage() {
        assert!(parse_date("2007-05-12").is_err());
        assert!(parse_date("31.02.2020").is_err());
        assert!(parse_date("not a date").is_err());
    }

    #[test]
    fn format_round_trips_console_form() {
        let date = NaiveDate::from_ymd_opt(2025, 10, 5).unwrap();
        assert_eq!(format_date(date), "05.10.2025");
        assert_eq!(parse_date(&format_date(date)).unwrap(), date);
    }

    #[test]
    fn storage_encoding_round_trips() {
        let date = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
        let encoded = encode_storage_date(date);
        assert_eq!(encoded, "1999-12-31");
        assert_eq!(decode_storage_date(&encoded), Some(date));
    }

    #[test]
    fn storage_decoding_rejects_console_form() {
        assert_eq!(decode_storage_date("12.05.2007"), None);
    }
}

//! Vendor date encodings and their parsers.
//!
//! Three shapes are recognized:
//!
//! | Format        | Example                     | Produced by           |
//! |---------------|-----------------------------|-----------------------|
//! | `EpochWrapper`| `/Date(1703123456789-0800)/`| WCF JSON serializer   |
//! | `UsDate`      | `12/25/2024`                | WSF schedule and fares|
//! | `UsDateTime`  | `12/25/2024 01:30:00 PM`    | WSF schedule and fares|
//!
//! The wall-clock shapes carry no zone and are read as UTC.

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;

/// Interior of an epoch wrapper: signed milliseconds plus an optional offset.
#[allow(clippy::expect_used)]
static EPOCH_INTERIOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?[0-9]+)(?:[+-][0-9]{4})?$").expect("failed to compile epoch interior regex")
});

/// `MM/DD/YYYY`.
#[allow(clippy::expect_used)]
static US_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2})/([0-9]{1,2})/([0-9]{4})$").expect("failed to compile date regex")
});

/// `MM/DD/YYYY HH:MM:SS AM|PM`.
#[allow(clippy::expect_used)]
static US_DATETIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2})/([0-9]{1,2})/([0-9]{4}) ([0-9]{1,2}):([0-9]{2}):([0-9]{2}) (AM|PM)$")
        .expect("failed to compile datetime regex")
});

const EPOCH_PREFIX: &str = "/Date(";
const EPOCH_SUFFIX: &str = ")/";

/// Earliest year accepted by the wall-clock parsers.
const MIN_YEAR: i32 = 1900;

/// A recognized vendor date shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateFormat {
    /// `/Date(<ms>)/`, optionally `/Date(<ms>+HHMM)/`.
    EpochWrapper,
    /// `MM/DD/YYYY`.
    UsDate,
    /// `MM/DD/YYYY HH:MM:SS AM|PM`.
    UsDateTime,
}

/// Outcome of parsing a string as one [`DateFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateParse {
    /// The string had the shape and denotes a real instant.
    Parsed(DateTime<Utc>),
    /// The string had the shape (or was empty) but does not denote a real instant.
    Invalid,
    /// The string does not have the shape at all.
    Unrecognized,
}

impl DateParse {
    /// Returns the parsed instant, if any.
    #[must_use]
    pub const fn date(self) -> Option<DateTime<Utc>> {
        match self {
            Self::Parsed(dt) => Some(dt),
            Self::Invalid | Self::Unrecognized => None,
        }
    }
}

impl DateFormat {
    /// Parses `s` as this format.
    #[must_use]
    pub fn parse(self, s: &str) -> DateParse {
        match self {
            Self::EpochWrapper => parse_epoch(s),
            Self::UsDate => parse_date_only(s),
            Self::UsDateTime => parse_date_time(s),
        }
    }
}

/// Parses a `/Date(ms)/` string. Returns `None` for other shapes or bad interiors.
#[must_use]
pub fn parse_epoch_wrapper(s: &str) -> Option<DateTime<Utc>> {
    parse_epoch(s).date()
}

/// Parses an `MM/DD/YYYY` string at midnight UTC.
#[must_use]
pub fn parse_us_date(s: &str) -> Option<DateTime<Utc>> {
    parse_date_only(s).date()
}

/// Parses an `MM/DD/YYYY HH:MM:SS AM|PM` string as UTC.
#[must_use]
pub fn parse_us_datetime(s: &str) -> Option<DateTime<Utc>> {
    parse_date_time(s).date()
}

/// Renders `dt` in the `/Date(ms)/` form.
#[must_use]
pub fn to_epoch_wrapper(dt: &DateTime<Utc>) -> String {
    format!("{EPOCH_PREFIX}{}{EPOCH_SUFFIX}", dt.timestamp_millis())
}

fn parse_epoch(s: &str) -> DateParse {
    if !s.contains("Date(") {
        return DateParse::Unrecognized;
    }
    let unescaped = if s.contains("\\/") {
        Cow::Owned(s.replace("\\/", "/"))
    } else {
        Cow::Borrowed(s)
    };
    let Some(interior) = unescaped
        .strip_prefix(EPOCH_PREFIX)
        .and_then(|rest| rest.strip_suffix(EPOCH_SUFFIX))
    else {
        return DateParse::Unrecognized;
    };

    let Some(millis) = EPOCH_INTERIOR_RE
        .captures(interior)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
    else {
        return DateParse::Invalid;
    };

    DateTime::from_timestamp_millis(millis).map_or(DateParse::Invalid, DateParse::Parsed)
}

fn parse_date_only(s: &str) -> DateParse {
    if s.is_empty() {
        return DateParse::Invalid;
    }
    let Some(caps) = US_DATE_RE.captures(s) else {
        return DateParse::Unrecognized;
    };
    let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    match (field(1), field(2), field(3)) {
        (Some(month), Some(day), Some(year)) => calendar_date(month, day, year)
            .map_or(DateParse::Invalid, |d| {
                DateParse::Parsed(d.and_time(NaiveTime::MIN).and_utc())
            }),
        _ => DateParse::Invalid,
    }
}

fn parse_date_time(s: &str) -> DateParse {
    if s.is_empty() {
        return DateParse::Invalid;
    }
    let Some(caps) = US_DATETIME_RE.captures(s) else {
        return DateParse::Unrecognized;
    };
    let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
    let pm = caps.get(7).is_some_and(|m| m.as_str() == "PM");

    let (Some(month), Some(day), Some(year), Some(hour), Some(minute), Some(second)) =
        (field(1), field(2), field(3), field(4), field(5), field(6))
    else {
        return DateParse::Invalid;
    };

    let Some(date) = calendar_date(month, day, year) else {
        return DateParse::Invalid;
    };
    let Some(hour24) = to_24_hour(hour, pm) else {
        return DateParse::Invalid;
    };

    NaiveTime::from_hms_opt(hour24, minute, second).map_or(DateParse::Invalid, |time| {
        DateParse::Parsed(NaiveDateTime::new(date, time).and_utc())
    })
}

/// Builds a calendar date, rejecting out-of-range components and rollovers.
fn calendar_date(month: u32, day: u32, year: u32) -> Option<NaiveDate> {
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    let year = i32::try_from(year).ok().filter(|y| *y >= MIN_YEAR)?;
    // `from_ymd_opt` refuses Feb 30 instead of rolling into March.
    NaiveDate::from_ymd_opt(year, month, day)
}

/// 12 AM is midnight, 12 PM is noon.
const fn to_24_hour(hour: u32, pm: bool) -> Option<u32> {
    match (hour, pm) {
        (12, false) => Some(0),
        (12, true) => Some(12),
        (1..=11, false) => Some(hour),
        (1..=11, true) => Some(hour.saturating_add(12)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn test_epoch_wrapper_basic() {
        // Arrange & Act
        let dt = parse_epoch_wrapper("/Date(1703123456789)/").unwrap();

        // Assert
        assert_eq!(dt.timestamp_millis(), 1_703_123_456_789);
    }

    #[test]
    fn test_epoch_wrapper_with_offset_ignores_offset() {
        // Arrange & Act
        let plain = parse_epoch_wrapper("/Date(1703123456789)/").unwrap();
        let with_offset = parse_epoch_wrapper("/Date(1703123456789-0800)/").unwrap();

        // Assert
        assert_eq!(plain, with_offset);
    }

    #[test]
    fn test_epoch_wrapper_negative_millis() {
        // Arrange & Act
        let dt = parse_epoch_wrapper("/Date(-86400000)/").unwrap();

        // Assert
        assert_eq!(dt.year(), 1969);
        assert_eq!(dt.month(), 12);
        assert_eq!(dt.day(), 31);
    }

    #[test]
    fn test_epoch_wrapper_escaped_slashes() {
        // Arrange & Act
        let dt = parse_epoch_wrapper("\\/Date(0)\\/").unwrap();

        // Assert
        assert_eq!(dt.timestamp_millis(), 0);
    }

    #[test]
    fn test_epoch_wrapper_is_case_sensitive() {
        // Arrange & Act
        let result = DateFormat::EpochWrapper.parse("/date(0)/");

        // Assert
        assert_eq!(result, DateParse::Unrecognized);
    }

    #[test]
    fn test_epoch_wrapper_non_numeric_interior_is_invalid() {
        // Arrange & Act
        let result = DateFormat::EpochWrapper.parse("/Date(abc)/");

        // Assert
        assert_eq!(result, DateParse::Invalid);
    }

    #[test]
    fn test_epoch_wrapper_out_of_range_is_invalid() {
        // Arrange & Act
        let result = DateFormat::EpochWrapper.parse("/Date(99999999999999999)/");

        // Assert
        assert_eq!(result, DateParse::Invalid);
    }

    #[test]
    fn test_epoch_wrapper_round_trips_millis() {
        // Arrange
        let samples: [i64; 6] = [
            0,
            1,
            -1,
            1_703_123_456_789,
            -2_208_988_800_000,
            253_402_300_799_999,
        ];

        for millis in samples {
            // Act
            let rendered = format!("/Date({millis})/");
            let parsed = parse_epoch_wrapper(&rendered).unwrap();

            // Assert
            assert_eq!(parsed.timestamp_millis(), millis);
            assert_eq!(to_epoch_wrapper(&parsed), rendered);
        }
    }

    #[test]
    fn test_us_date_valid() {
        // Arrange & Act
        let dt = parse_us_date("12/25/2024").unwrap();

        // Assert
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 12, 25));
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_us_date_single_digit_components() {
        // Arrange & Act
        let dt = parse_us_date("1/5/2025").unwrap();

        // Assert
        assert_eq!((dt.year(), dt.month(), dt.day()), (2025, 1, 5));
    }

    #[test]
    fn test_us_date_rejects_calendar_rollover() {
        // Arrange
        let inputs = ["02/30/2024", "02/29/2023", "04/31/2024", "06/31/2025"];

        for input in inputs {
            // Act
            let result = DateFormat::UsDate.parse(input);

            // Assert
            assert_eq!(result, DateParse::Invalid, "{input}");
        }
    }

    #[test]
    fn test_us_date_accepts_leap_day() {
        // Arrange & Act
        let dt = parse_us_date("02/29/2024").unwrap();

        // Assert
        assert_eq!((dt.month(), dt.day()), (2, 29));
    }

    #[test]
    fn test_us_date_rejects_out_of_range_components() {
        // Arrange
        let inputs = ["13/01/2024", "00/10/2024", "01/32/2024", "01/00/2024", "01/01/1899"];

        for input in inputs {
            // Act
            let result = DateFormat::UsDate.parse(input);

            // Assert
            assert_eq!(result, DateParse::Invalid, "{input}");
        }
    }

    #[test]
    fn test_us_date_empty_is_invalid() {
        // Arrange & Act
        let result = DateFormat::UsDate.parse("");

        // Assert
        assert_eq!(result, DateParse::Invalid);
        assert!(parse_us_date("").is_none());
    }

    #[test]
    fn test_non_ascii_digits_are_unrecognized() {
        // Arrange & Act
        let date = DateFormat::UsDate.parse("١٢/٢٥/٢٠٢٤");
        let date_time = DateFormat::UsDateTime.parse("١٢/٢٥/٢٠٢٤ ٠١:٣٠:٠٠ PM");
        let epoch = DateFormat::EpochWrapper.parse("/Date(١٧٠٣١٢٣٤٥٦٧٨٩)/");

        // Assert
        assert_eq!(date, DateParse::Unrecognized);
        assert_eq!(date_time, DateParse::Unrecognized);
        // The wrapper itself is recognized, so a bad interior is a null date.
        assert_eq!(epoch, DateParse::Invalid);
    }

    #[test]
    fn test_plain_string_is_not_an_epoch_wrapper() {
        // Arrange & Act & Assert
        assert_eq!(DateFormat::EpochWrapper.parse("Chelan"), DateParse::Unrecognized);
        assert_eq!(DateFormat::EpochWrapper.parse("a\\/b"), DateParse::Unrecognized);
    }

    #[test]
    fn test_us_date_wrong_shape_is_unrecognized() {
        // Arrange & Act
        let result = DateFormat::UsDate.parse("2024-12-25");

        // Assert
        assert_eq!(result, DateParse::Unrecognized);
        assert!(parse_us_date("2024-12-25").is_none());
    }

    #[test]
    fn test_us_datetime_pm() {
        // Arrange & Act
        let dt = parse_us_datetime("12/25/2024 01:30:15 PM").unwrap();

        // Assert
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (13, 30, 15));
    }

    #[test]
    fn test_us_datetime_midnight_and_noon() {
        // Arrange & Act
        let midnight = parse_us_datetime("03/01/2024 12:05:00 AM").unwrap();
        let noon = parse_us_datetime("03/01/2024 12:05:00 PM").unwrap();
        let morning = parse_us_datetime("03/01/2024 11:59:59 AM").unwrap();

        // Assert
        assert_eq!(midnight.hour(), 0);
        assert_eq!(noon.hour(), 12);
        assert_eq!(morning.hour(), 11);
    }

    #[test]
    fn test_us_datetime_invalid_components() {
        // Arrange
        let inputs = [
            "02/30/2024 10:00:00 AM",
            "01/01/2024 13:00:00 PM",
            "01/01/2024 00:00:00 AM",
            "01/01/2024 10:60:00 AM",
            "01/01/2024 10:00:60 AM",
            "",
        ];

        for input in inputs {
            // Act
            let result = DateFormat::UsDateTime.parse(input);

            // Assert
            assert_eq!(result, DateParse::Invalid, "{input}");
        }
    }

    #[test]
    fn test_us_datetime_wrong_shape_is_unrecognized() {
        // Arrange & Act
        let date_only = DateFormat::UsDateTime.parse("12/25/2024");
        let lowercase = DateFormat::UsDateTime.parse("12/25/2024 01:00:00 pm");

        // Assert
        assert_eq!(date_only, DateParse::Unrecognized);
        assert_eq!(lowercase, DateParse::Unrecognized);
    }
}

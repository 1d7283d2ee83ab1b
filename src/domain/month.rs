use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Calendar dates are written and stored as `YYYY-MM-DD`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid date '{0}', expected YYYY-MM-DD")]
pub struct ParseDateError(pub String);

/// Years that fit the four-digit `YYYY` form.
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 0..=9999;

/// Parse a `YYYY-MM-DD` calendar date. Exactly four year digits, no sign.
pub fn parse_date(input: &str) -> Result<NaiveDate, ParseDateError> {
    let trimmed = input.trim();
    let err = || ParseDateError(trimmed.to_string());

    let bytes = trimmed.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(err());
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| err())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid month '{0}', expected YYYY-MM")]
pub struct ParseMonthError(pub String);

/// A calendar month, written `YYYY-MM`. Budgets and reports are keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(1..=12).contains(&month) || !YEAR_RANGE.contains(&year) {
            return None;
        }
        Some(Self { year, month })
    }

    /// The month a date falls in, `None` for years outside `0..=9999`.
    pub fn of(date: NaiveDate) -> Option<Self> {
        Self::new(date.year(), date.month())
    }

    pub fn current() -> Self {
        let today = today();
        Self {
            year: today.year().clamp(*YEAR_RANGE.start(), *YEAR_RANGE.end()),
            month: today.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ParseMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || ParseMonthError(trimmed.to_string());

        let (year_str, month_str) = trimmed.split_once('-').ok_or_else(err)?;
        if year_str.len() != 4 || month_str.len() != 2 {
            return Err(err());
        }
        if !year_str.chars().all(|c| c.is_ascii_digit())
            || !month_str.chars().all(|c| c.is_ascii_digit())
        {
            return Err(err());
        }

        let year = year_str.parse().map_err(|_| err())?;
        let month = month_str.parse().map_err(|_| err())?;
        Self::new(year, month).ok_or_else(err)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = ParseMonthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month() {
        let month: YearMonth = "2024-01".parse().unwrap();
        assert_eq!(month.year(), 2024);
        assert_eq!(month.month(), 1);
        assert_eq!(month.to_string(), "2024-01");
    }

    #[test]
    fn test_parse_month_rejects_bad_input() {
        for bad in ["2024-13", "2024-00", "2024-1", "24-01", "2024/01", "2024-01-05", ""] {
            assert!(bad.parse::<YearMonth>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_month_of_date() {
        let month = YearMonth::of(parse_date("2024-02-29").unwrap()).unwrap();
        assert_eq!(month.to_string(), "2024-02");
        assert_eq!(month.to_string().parse::<YearMonth>().unwrap(), month);

        let far = NaiveDate::from_ymd_opt(12345, 1, 1).unwrap();
        assert_eq!(YearMonth::of(far), None);
        let negative = NaiveDate::from_ymd_opt(-1, 1, 1).unwrap();
        assert_eq!(YearMonth::of(negative), None);
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2024-01-05").is_ok());
        assert!(parse_date(" 2024-01-05 ").is_ok());
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("05/01/2024").is_err());
        assert!(parse_date("2024-1-5").is_err());
    }

    #[test]
    fn test_parse_date_rejects_signed_years() {
        for bad in ["-0001-01-01", "+12345-01-01", "+2024-01-01", "12345-01-01"] {
            assert!(parse_date(bad).is_err(), "accepted {bad:?}");
        }
        assert_eq!(
            parse_date("0000-01-01").unwrap(),
            NaiveDate::from_ymd_opt(0, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_month_ordering() {
        let dec: YearMonth = "2023-12".parse().unwrap();
        let jan: YearMonth = "2024-01".parse().unwrap();
        assert!(dec < jan);
    }
}

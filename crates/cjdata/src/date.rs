//! Trade date parsing.

use crate::error::{DataError, Result};
use chrono::{Datelike, IsoWeek, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar date keyed the way the store keys it (`YYYYMMDD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TradeDate(NaiveDate);

impl TradeDate {
    /// Parse an eight digit date (`20240131`) naming a real day.
    ///
    /// Any other length, separators included, is rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let s = raw.trim();
        if s.len() != 8 {
            return Err(DataError::InvalidDate(format!("{raw:?} must be YYYYMMDD")));
        }
        Self::from_digits(raw, s)
    }

    /// Like [`parse`](Self::parse), but also accepts the ISO form `2024-01-31`.
    ///
    /// Only the calendar queries take this form.
    pub fn parse_lenient(raw: &str) -> Result<Self> {
        let s = raw.trim();
        let bytes = s.as_bytes();
        if s.len() == 10 && bytes[4] == b'-' && bytes[7] == b'-' {
            Self::from_digits(raw, &s.replace('-', ""))
        } else {
            Self::parse(raw)
        }
    }

    fn from_digits(raw: &str, digits: &str) -> Result<Self> {
        if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DataError::InvalidDate(format!(
                "{raw:?} must contain only digits"
            )));
        }

        NaiveDate::parse_from_str(digits, "%Y%m%d")
            .map(Self)
            .map_err(|e| DataError::InvalidDate(format!("{raw:?}: {e}")))
    }

    /// The underlying calendar date.
    pub const fn date(&self) -> NaiveDate {
        self.0
    }

    /// ISO week (Monday to Sunday) containing this date.
    pub fn iso_week(&self) -> IsoWeek {
        self.0.iso_week()
    }

    /// Render as `YYYYMMDD`.
    pub fn to_key(&self) -> String {
        self.0.format("%Y%m%d").to_string()
    }
}

impl From<NaiveDate> for TradeDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for TradeDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y%m%d"))
    }
}

impl FromStr for TradeDate {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

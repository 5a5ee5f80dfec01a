//! Calendar months used to bucket expenses.
use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// A calendar month, the unit the dashboard pages over.
///
/// Ordered by year first, then month. Serialized as `"YYYY-MM"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> ResultEngine<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidPeriod(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(EngineError::InvalidPeriod(format!("year {year} out of range")));
        }
        Ok(Self { year, month })
    }

    /// Month containing `date`.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// 1-based month number.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// First calendar day of the month.
    pub fn first_day(self) -> ResultEngine<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .ok_or_else(|| EngineError::InvalidPeriod(self.to_string()))
    }

    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = EngineError;

    /// Parses `YYYY-MM` (a single-digit month is accepted).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidPeriod(format!("expected YYYY-MM, got \"{s}\""));

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.is_empty() || !year.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if month.is_empty() || month.len() > 2 || !month.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

//! Recurrence period of a subscription charge.
use std::{fmt, str::FromStr};

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{EngineError, ResultEngine};

/// How often a subscription is billed.
///
/// This is the only representation the engine works with. Labels (English or
/// Korean) are a display concern and are accepted on input through
/// [`FromStr`] and serde.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    Monthly,
    Quarterly,
    Yearly,
}

impl BillingInterval {
    pub const ALL: [BillingInterval; 3] = [
        BillingInterval::Monthly,
        BillingInterval::Quarterly,
        BillingInterval::Yearly,
    ];

    /// Length of one period in calendar months.
    #[must_use]
    pub const fn months(self) -> u32 {
        match self {
            BillingInterval::Monthly => 1,
            BillingInterval::Quarterly => 3,
            BillingInterval::Yearly => 12,
        }
    }

    /// Share of a per-period `amount` that falls on a single month.
    #[must_use]
    pub fn monthly_share(self, amount: f64) -> f64 {
        amount / f64::from(self.months())
    }

    /// Returns `date` moved forward by `periods` whole periods.
    ///
    /// Month arithmetic clamps the day to the end of the target month, so
    /// `2024-01-31` plus one month is `2024-02-29`.
    pub fn advance(self, date: NaiveDate, periods: u32) -> ResultEngine<NaiveDate> {
        let months = periods
            .checked_mul(self.months())
            .ok_or_else(|| EngineError::DateOverflow(format!("{date} + {periods} x {self}")))?;
        date.checked_add_months(Months::new(months))
            .ok_or_else(|| EngineError::DateOverflow(format!("{date} + {months} months")))
    }

    /// English label, as stored by the dashboard.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            BillingInterval::Monthly => "monthly",
            BillingInterval::Quarterly => "quarterly",
            BillingInterval::Yearly => "yearly",
        }
    }

    /// Korean label used by older records and the Korean UI.
    #[must_use]
    pub const fn label_ko(self) -> &'static str {
        match self {
            BillingInterval::Monthly => "월간",
            BillingInterval::Quarterly => "분기별",
            BillingInterval::Yearly => "연간",
        }
    }
}

impl fmt::Display for BillingInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BillingInterval {
    type Err = EngineError;

    /// Accepts [`BillingInterval::label`] (any case) or
    /// [`BillingInterval::label_ko`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let found = BillingInterval::ALL.into_iter().find(|interval| {
            interval.label().eq_ignore_ascii_case(trimmed) || interval.label_ko() == trimmed
        });
        found.ok_or_else(|| {
            tracing::warn!("unknown billing interval: {trimmed:?}");
            EngineError::UnknownBillingInterval(trimmed.to_string())
        })
    }
}

impl<'de> Deserialize<'de> for BillingInterval {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

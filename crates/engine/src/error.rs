//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`UnknownBillingInterval`] when a label is not one of the three
//!   recognized billing intervals.
//! - [`UnsupportedConversion`] when the rate table has no entry for a pair.
//! - [`IterationLimit`] when date stepping exceeds its step budget.
//!
//!  [`UnknownBillingInterval`]: EngineError::UnknownBillingInterval
//!  [`UnsupportedConversion`]: EngineError::UnsupportedConversion
//!  [`IterationLimit`]: EngineError::IterationLimit
use chrono::NaiveDate;
use thiserror::Error;

use crate::Currency;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("unknown billing interval: \"{0}\"")]
    UnknownBillingInterval(String),
    #[error("unsupported currency: \"{0}\"")]
    UnknownCurrency(String),
    #[error("no exchange rate from {from} to {to}")]
    UnsupportedConversion { from: Currency, to: Currency },
    #[error("unknown expense status: \"{0}\"")]
    UnknownStatus(String),
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("billing schedule starting {start} exceeded {limit} steps")]
    IterationLimit { start: NaiveDate, limit: u32 },
    #[error("date out of range: {0}")]
    DateOverflow(String),
}

//! Currencies and the exchange rates used to normalize amounts.
use std::{collections::HashMap, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Reference rate used when no other rate is configured: 1 USD = 1300 KRW.
pub const USD_TO_KRW: f64 = 1300.0;

/// ISO currency code of an amount.
///
/// The dashboard tracks costs in two currencies only. Korean won is the
/// reference currency every aggregate is normalized to.
///
/// ## Minor units
///
/// `minor_units()` returns how many fraction digits are shown for the
/// currency. KRW has none, USD has 2 (cents).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Krw,
    Usd,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Krw => "KRW",
            Currency::Usd => "USD",
        }
    }

    /// Number of fraction digits used when formatting amounts.
    #[must_use]
    pub const fn minor_units(self) -> u8 {
        match self {
            Currency::Krw => 0,
            Currency::Usd => 2,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Currency::Krw => "₩",
            Currency::Usd => "$",
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "KRW" => Ok(Currency::Krw),
            "USD" => Ok(Currency::Usd),
            other => Err(EngineError::UnknownCurrency(other.to_string())),
        }
    }
}

impl FromStr for Currency {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::try_from(s)
    }
}

/// Table of conversion factors between currencies.
///
/// A single table is shared by the per-amount converter and every aggregate,
/// so changing the rate in one place changes it everywhere. Only the
/// `from -> to` direction is stored; the inverse is derived by division so a
/// round trip returns the original amount.
///
/// ```rust
/// use engine::{Currency, ExchangeRates};
///
/// let rates = ExchangeRates::default();
/// assert_eq!(rates.convert(10.0, Currency::Usd, Currency::Krw).unwrap(), 13_000.0);
/// assert_eq!(rates.convert(13_000.0, Currency::Krw, Currency::Usd).unwrap(), 10.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ExchangeRates {
    rates: HashMap<(Currency, Currency), f64>,
}

impl ExchangeRates {
    /// Empty table: only identity conversions succeed.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rates: HashMap::new(),
        }
    }

    /// Reference table with a single USD to KRW factor.
    pub fn fixed(usd_to_krw: f64) -> ResultEngine<Self> {
        let mut rates = Self::empty();
        rates.set(Currency::Usd, Currency::Krw, usd_to_krw)?;
        Ok(rates)
    }

    /// Sets how many units of `to` one unit of `from` is worth.
    pub fn set(&mut self, from: Currency, to: Currency, rate: f64) -> ResultEngine<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(EngineError::InvalidAmount(format!(
                "exchange rate {from}->{to} must be positive, got {rate}"
            )));
        }
        if from == to {
            return Err(EngineError::InvalidAmount(format!(
                "exchange rate {from}->{to} is implicit"
            )));
        }
        self.rates.remove(&(to, from));
        self.rates.insert((from, to), rate);
        Ok(())
    }

    /// Converts `amount` from one currency to another.
    ///
    /// Identity when both currencies match. A pair with no configured rate
    /// is an error, never a silent pass-through.
    pub fn convert(&self, amount: f64, from: Currency, to: Currency) -> ResultEngine<f64> {
        if from == to {
            return Ok(amount);
        }
        if let Some(rate) = self.rates.get(&(from, to)) {
            return Ok(amount * rate);
        }
        match self.rates.get(&(to, from)) {
            Some(inverse) => Ok(amount / inverse),
            None => Err(EngineError::UnsupportedConversion { from, to }),
        }
    }
}

impl Default for ExchangeRates {
    fn default() -> Self {
        let mut rates = HashMap::new();
        rates.insert((Currency::Usd, Currency::Krw), USD_TO_KRW);
        Self { rates }
    }
}

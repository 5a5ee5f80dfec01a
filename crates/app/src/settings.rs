//! Handles settings for the application. Configuration is read from
//! `settings.toml` (optional) and `OPSBOARD__*` environment variables, e.g.
//! `OPSBOARD__RATES__USD_TO_KRW=1350`.
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use engine::{Currency, ExchangeRates, USD_TO_KRW};
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Rates {
    pub usd_to_krw: f64,
}

impl Default for Rates {
    fn default() -> Self {
        Self {
            usd_to_krw: USD_TO_KRW,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Display {
    pub currency: Currency,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Data {
    /// JSON export of the dashboard tables.
    pub snapshot: String,
}

impl Default for Data {
    fn default() -> Self {
        Self {
            snapshot: "opsboard.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub rates: Rates,
    pub display: Display,
    pub data: Data,
}

impl Settings {
    /// Loads settings from `path` (required when given explicitly) and the
    /// environment.
    pub fn new(path: Option<&str>) -> Result<Self> {
        let file = match path {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_PATH).required(false),
        };
        Self::from_builder(Config::builder().add_source(file))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let settings = builder
            .add_source(Environment::with_prefix("OPSBOARD").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Rate table built from the configured USD to KRW factor.
    pub fn exchange_rates(&self) -> Result<ExchangeRates> {
        Ok(ExchangeRates::fixed(self.rates.usd_to_krw)?)
    }
}

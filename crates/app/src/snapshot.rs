//! JSON export of the dashboard tables the CLI works on.
//!
//! Records are decoded one by one: a record the engine cannot represent
//! (unknown billing interval, bad date, ...) is logged and dropped instead of
//! failing the whole file.
use std::path::Path;

use engine::{Expense, Subscription};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::{AppError, Result};

#[derive(Debug, Default, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    subscriptions: Vec<Value>,
    #[serde(default)]
    expenses: Vec<Value>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Snapshot {
    pub subscriptions: Vec<Subscription>,
    pub expenses: Vec<Expense>,
}

impl Snapshot {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|err| AppError::io(path.display().to_string(), err))?;
        let snapshot = Self::parse(&raw)?;
        tracing::info!(
            subscriptions = snapshot.subscriptions.len(),
            expenses = snapshot.expenses.len(),
            "loaded snapshot {}",
            path.display()
        );
        Ok(snapshot)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let raw: RawSnapshot = serde_json::from_str(raw)?;
        Ok(Self {
            subscriptions: decode_records(raw.subscriptions, "subscription"),
            expenses: decode_records(raw.expenses, "expense"),
        })
    }
}

fn decode_records<T: DeserializeOwned>(values: Vec<Value>, label: &str) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let id = value
                .get("id")
                .map(ToString::to_string)
                .unwrap_or_else(|| format!("#{index}"));
            match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(err) => {
                    tracing::warn!("skipping {label} {id}: {err}");
                    None
                }
            }
        })
        .collect()
}

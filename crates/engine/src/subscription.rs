//! The module contains the representation of a recurring subscription.
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{BillingInterval, Currency, EngineError, ResultEngine};

/// A recurring charge tracked by the dashboard.
///
/// Subscriptions are owned by the persistence layer; the engine only reads
/// them. `start_date` is the first billing date and every following charge
/// falls on the same day of month (clamped to the month end), one
/// `billing_interval` apart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub service_name: String,
    /// Charge per billing period; always positive and finite.
    #[serde(deserialize_with = "positive_amount")]
    pub amount: f64,
    pub currency: Currency,
    pub billing_interval: BillingInterval,
    pub start_date: NaiveDate,
    pub is_active: bool,
    #[serde(default)]
    pub category: String,
    /// Value cached by the persistence layer. Informational only, never
    /// used by projections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_billing_date: Option<NaiveDate>,
}

impl Subscription {
    /// Amount charged per month, in the subscription currency.
    #[must_use]
    pub fn monthly_amount(&self) -> f64 {
        self.billing_interval.monthly_share(self.amount)
    }
}

/// Rejects amounts a subscription cannot be charged.
fn validate_amount(amount: f64) -> ResultEngine<f64> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(EngineError::InvalidAmount(format!(
            "subscription amount must be positive, got {amount}"
        )))
    }
}

fn positive_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let amount = f64::deserialize(deserializer)?;
    validate_amount(amount).map_err(serde::de::Error::custom)
}

/// Criteria for narrowing down the subscriptions list.
///
/// Every criterion that is set must hold.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionFilters {
    pub currency: Option<Currency>,
    pub interval: Option<BillingInterval>,
    /// Case-insensitive substring of the service name or category.
    pub search: Option<String>,
}

impl SubscriptionFilters {
    #[must_use]
    pub fn matches(&self, subscription: &Subscription) -> bool {
        if let Some(currency) = self.currency
            && subscription.currency != currency
        {
            return false;
        }
        if let Some(interval) = self.interval
            && subscription.billing_interval != interval
        {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                subscription.service_name.to_lowercase().contains(&needle)
                    || subscription.category.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }

    /// Keeps the matching subscriptions, in input order.
    #[must_use]
    pub fn apply<'a>(&self, subscriptions: &'a [Subscription]) -> Vec<&'a Subscription> {
        subscriptions.iter().filter(|s| self.matches(s)).collect()
    }
}

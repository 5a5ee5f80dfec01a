use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{Currency, EngineError, YearMonth};

/// Id prefix of expenses derived from subscriptions.
pub const SYNTHETIC_ID_PREFIX: &str = "sub-";

/// Payment method recorded on subscription charges.
pub const AUTO_DEBIT: &str = "auto-debit";

/// Settlement state of an expense.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    #[default]
    Pending,
    Paid,
    Cancelled,
}

impl ExpenseStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ExpenseStatus::Pending => "pending",
            ExpenseStatus::Paid => "paid",
            ExpenseStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExpenseStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "대기중" => Ok(ExpenseStatus::Pending),
            "paid" | "지불완료" => Ok(ExpenseStatus::Paid),
            "cancelled" | "canceled" | "취소됨" => Ok(ExpenseStatus::Cancelled),
            other => Err(EngineError::UnknownStatus(other.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for ExpenseStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A single expense line, either entered by hand or derived from a
/// subscription for a given month.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub date: NaiveDate,
    pub item: String,
    #[serde(default)]
    pub category: String,
    pub amount: f64,
    pub currency: Currency,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub status: ExpenseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<String>,
}

impl Expense {
    /// `true` when the expense was projected from a subscription.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.id.starts_with(SYNTHETIC_ID_PREFIX)
    }
}

/// Criteria for narrowing down the expenses list.
///
/// Date bounds are inclusive. Every criterion that is set must hold.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseFilters {
    pub category: Option<String>,
    pub status: Option<ExpenseStatus>,
    /// Case-insensitive substring of the item or category.
    pub search: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub period: Option<YearMonth>,
}

impl ExpenseFilters {
    #[must_use]
    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(category) = self.category.as_deref()
            && expense.category != category
        {
            return false;
        }
        if let Some(status) = self.status
            && expense.status != status
        {
            return false;
        }
        if let Some(from) = self.date_from
            && expense.date < from
        {
            return false;
        }
        if let Some(to) = self.date_to
            && expense.date > to
        {
            return false;
        }
        if let Some(period) = self.period
            && !period.contains(expense.date)
        {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                expense.item.to_lowercase().contains(&needle)
                    || expense.category.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }

    /// Keeps the matching expenses, in input order.
    #[must_use]
    pub fn apply<'a>(&self, expenses: &'a [Expense]) -> Vec<&'a Expense> {
        expenses.iter().filter(|e| self.matches(e)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(id: &str, date: &str, item: &str, category: &str, status: ExpenseStatus) -> Expense {
        Expense {
            id: id.to_string(),
            date: date.parse().unwrap(),
            item: item.to_string(),
            category: category.to_string(),
            amount: 1000.0,
            currency: Currency::Krw,
            payment_method: "card".to_string(),
            status,
            transaction_type: None,
        }
    }

    #[test]
    fn status_accepts_korean_labels() {
        assert_eq!("지불완료".parse::<ExpenseStatus>().unwrap(), ExpenseStatus::Paid);
        assert_eq!("대기중".parse::<ExpenseStatus>().unwrap(), ExpenseStatus::Pending);
        assert_eq!("취소됨".parse::<ExpenseStatus>().unwrap(), ExpenseStatus::Cancelled);
        assert!("refunded".parse::<ExpenseStatus>().is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{"id":"e1","date":"2024-07-03","item":"Lunch","amount":9000,"currency":"KRW"}"#;
        let parsed: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.status, ExpenseStatus::Pending);
        assert!(parsed.category.is_empty());
        assert!(!parsed.is_synthetic());
    }

    #[test]
    fn filters_apply_every_criterion() {
        let expenses = vec![
            expense("1", "2024-07-01", "Rent", "fixed", ExpenseStatus::Paid),
            expense("2", "2024-07-15", "Coffee beans", "variable", ExpenseStatus::Pending),
            expense("3", "2024-08-02", "Coffee", "variable", ExpenseStatus::Paid),
        ];

        let july = ExpenseFilters {
            period: Some(YearMonth::new(2024, 7).unwrap()),
            ..Default::default()
        };
        assert_eq!(july.apply(&expenses).len(), 2);

        let coffee_paid = ExpenseFilters {
            search: Some("COFFEE".to_string()),
            status: Some(ExpenseStatus::Paid),
            ..Default::default()
        };
        let ids: Vec<_> = coffee_paid.apply(&expenses).iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["3"]);

        let bounded = ExpenseFilters {
            category: Some("variable".to_string()),
            date_from: Some("2024-07-15".parse().unwrap()),
            date_to: Some("2024-08-01".parse().unwrap()),
            ..Default::default()
        };
        let ids: Vec<_> = bounded.apply(&expenses).iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["2"]);
    }
}

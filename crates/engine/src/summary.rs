//! Aggregates shown on the dashboard.
use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Currency, ExchangeRates, Expense, ResultEngine, Subscription, YearMonth};

/// Monthly cost of the active subscriptions, expressed in `target`.
///
/// Each amount is first spread over the months of its billing interval, then
/// converted with `rates`.
pub fn subscription_monthly_total(
    subscriptions: &[Subscription],
    rates: &ExchangeRates,
    target: Currency,
) -> ResultEngine<f64> {
    subscriptions
        .iter()
        .filter(|s| s.is_active)
        .try_fold(0.0, |total, s| {
            Ok(total + rates.convert(s.monthly_amount(), s.currency, target)?)
        })
}

/// [`subscription_monthly_total`] in Korean won.
///
/// ```rust
/// use engine::{ExchangeRates, Subscription, subscription_total_in_krw};
///
/// let subs: Vec<Subscription> = serde_json::from_str(r#"[
///     {"id":"1","serviceName":"A","amount":12000,"currency":"KRW",
///      "billingInterval":"yearly","startDate":"2024-01-01","isActive":true},
///     {"id":"2","serviceName":"B","amount":10,"currency":"USD",
///      "billingInterval":"monthly","startDate":"2024-01-01","isActive":true}
/// ]"#).unwrap();
/// assert_eq!(subscription_total_in_krw(&subs, &ExchangeRates::default()).unwrap(), 14_000.0);
/// ```
pub fn subscription_total_in_krw(
    subscriptions: &[Subscription],
    rates: &ExchangeRates,
) -> ResultEngine<f64> {
    subscription_monthly_total(subscriptions, rates, Currency::Krw)
}

/// Total spent in one category.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: f64,
    /// Share of the overall total, 0–100. Zero when the total is zero.
    pub percentage: f64,
}

/// Totals of an expense list, all in one display currency.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExpenseSummary {
    pub currency: Currency,
    pub total: f64,
    /// One entry per category, in order of first appearance.
    pub categories: Vec<CategoryShare>,
}

impl ExpenseSummary {
    pub fn from_expenses<'a>(
        expenses: impl IntoIterator<Item = &'a Expense>,
        rates: &ExchangeRates,
        currency: Currency,
    ) -> ResultEngine<Self> {
        let mut total = 0.0;
        let mut categories: Vec<CategoryShare> = Vec::new();

        for expense in expenses {
            let amount = rates.convert(expense.amount, expense.currency, currency)?;
            total += amount;
            match categories.iter_mut().find(|c| c.category == expense.category) {
                Some(share) => share.amount += amount,
                None => categories.push(CategoryShare {
                    category: expense.category.clone(),
                    amount,
                    percentage: 0.0,
                }),
            }
        }

        if total > 0.0 {
            for share in &mut categories {
                share.percentage = share.amount / total * 100.0;
            }
        }
        tracing::debug!(
            %currency,
            total,
            categories = categories.len(),
            "expense summary computed"
        );

        Ok(Self {
            currency,
            total,
            categories,
        })
    }
}

/// Spending per calendar month, oldest month first.
///
/// Stored copies of projected subscription charges are skipped, matching
/// [`crate::month_expenses`].
pub fn monthly_trends<'a>(
    expenses: impl IntoIterator<Item = &'a Expense>,
    rates: &ExchangeRates,
    currency: Currency,
) -> ResultEngine<Vec<(YearMonth, f64)>> {
    let mut months: BTreeMap<YearMonth, f64> = BTreeMap::new();
    for expense in expenses.into_iter().filter(|e| !e.is_synthetic()) {
        let amount = rates.convert(expense.amount, expense.currency, currency)?;
        *months.entry(YearMonth::of(expense.date)).or_default() += amount;
    }
    Ok(months.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{BillingInterval, EngineError, ExpenseStatus};

    fn subscription(amount: f64, currency: Currency, interval: BillingInterval) -> Subscription {
        Subscription {
            id: "s".to_string(),
            service_name: "svc".to_string(),
            amount,
            currency,
            billing_interval: interval,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            is_active: true,
            category: String::new(),
            next_billing_date: None,
        }
    }

    fn expense(date: &str, category: &str, amount: f64, currency: Currency) -> Expense {
        Expense {
            id: format!("{date}-{category}"),
            date: date.parse().unwrap(),
            item: category.to_string(),
            category: category.to_string(),
            amount,
            currency,
            payment_method: String::new(),
            status: ExpenseStatus::Paid,
            transaction_type: None,
        }
    }

    #[test]
    fn monthly_total_normalizes_interval_and_currency() {
        let subs = [
            subscription(12_000.0, Currency::Krw, BillingInterval::Yearly),
            subscription(10.0, Currency::Usd, BillingInterval::Monthly),
            subscription(30.0, Currency::Usd, BillingInterval::Quarterly),
        ];
        let total = subscription_total_in_krw(&subs, &ExchangeRates::default()).unwrap();
        assert_eq!(total, 1_000.0 + 13_000.0 + 13_000.0);
    }

    #[test]
    fn monthly_total_skips_inactive() {
        let mut inactive = subscription(99.0, Currency::Usd, BillingInterval::Monthly);
        inactive.is_active = false;
        let subs = [inactive, subscription(5_000.0, Currency::Krw, BillingInterval::Monthly)];
        let total = subscription_total_in_krw(&subs, &ExchangeRates::default()).unwrap();
        assert_eq!(total, 5_000.0);
    }

    #[test]
    fn monthly_total_in_usd() {
        let subs = [subscription(26_000.0, Currency::Krw, BillingInterval::Monthly)];
        let total =
            subscription_monthly_total(&subs, &ExchangeRates::default(), Currency::Usd).unwrap();
        assert!((total - 20.0).abs() < 1e-9);
    }

    #[test]
    fn monthly_total_propagates_missing_rate() {
        let subs = [subscription(1.0, Currency::Usd, BillingInterval::Monthly)];
        let result = subscription_total_in_krw(&subs, &ExchangeRates::empty());
        assert!(matches!(result, Err(EngineError::UnsupportedConversion { .. })));
    }

    #[test]
    fn summary_groups_by_category_in_first_seen_order() {
        let expenses = [
            expense("2024-07-01", "fixed", 60_000.0, Currency::Krw),
            expense("2024-07-02", "variable", 10.0, Currency::Usd),
            expense("2024-07-03", "fixed", 7_000.0, Currency::Krw),
        ];
        let summary =
            ExpenseSummary::from_expenses(&expenses, &ExchangeRates::default(), Currency::Krw)
                .unwrap();
        assert_eq!(summary.total, 80_000.0);
        let names: Vec<_> = summary.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, ["fixed", "variable"]);
        assert_eq!(summary.categories[0].amount, 67_000.0);
        assert!((summary.categories[0].percentage - 83.75).abs() < 1e-9);
        assert!((summary.categories[1].percentage - 16.25).abs() < 1e-9);
    }

    #[test]
    fn summary_of_nothing_is_zero() {
        let none: [Expense; 0] = [];
        let summary =
            ExpenseSummary::from_expenses(&none, &ExchangeRates::default(), Currency::Usd).unwrap();
        assert_eq!(summary.total, 0.0);
        assert!(summary.categories.is_empty());
    }

    #[test]
    fn trends_are_sorted_by_month() {
        let expenses = [
            expense("2024-08-05", "a", 100.0, Currency::Krw),
            expense("2023-12-31", "a", 50.0, Currency::Krw),
            expense("2024-08-20", "b", 1.0, Currency::Usd),
        ];
        let trends = monthly_trends(&expenses, &ExchangeRates::default(), Currency::Krw).unwrap();
        assert_eq!(
            trends,
            [
                (YearMonth::new(2023, 12).unwrap(), 50.0),
                (YearMonth::new(2024, 8).unwrap(), 1_400.0),
            ]
        );
    }

    #[test]
    fn trends_skip_stored_subscription_charges() {
        let mut stale = expense("2024-08-01", "software", 9_000.0, Currency::Krw);
        stale.id = "sub-3-2024-8".to_string();
        let expenses = [expense("2024-08-05", "a", 100.0, Currency::Krw), stale];
        let trends = monthly_trends(&expenses, &ExchangeRates::default(), Currency::Krw).unwrap();
        assert_eq!(trends, [(YearMonth::new(2024, 8).unwrap(), 100.0)]);
    }
}

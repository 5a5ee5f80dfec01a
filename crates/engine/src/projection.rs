//! Projection of subscriptions onto monthly expense lists.
//!
//! Synthetic expenses are computed views: they are rebuilt on every call and
//! never stored. Their ids only depend on the subscription id and the
//! requested month, so projecting the same month twice yields the same ids.
use chrono::Months;

use crate::{
    AUTO_DEBIT, BillingSchedule, EngineError, Expense, ExpenseStatus, ResultEngine, Subscription,
    YearMonth,
};

/// How many years past the requested month a schedule may be walked.
pub const MATERIALIZE_SLACK_YEARS: u32 = 5;

/// Deterministic id of the expense `subscription_id` produces in `period`.
#[must_use]
pub fn synthetic_expense_id(subscription_id: &str, period: YearMonth) -> String {
    format!(
        "sub-{subscription_id}-{}-{}",
        period.year(),
        period.month()
    )
}

/// The charge `subscription` produces in `period`, if any.
///
/// Inactive subscriptions never produce a charge. Charges fall on the
/// start date's day of month, so the occurrence whose own month is `period`
/// is searched for, rather than any occurrence in a date range.
pub fn expense_for_month(
    subscription: &Subscription,
    period: YearMonth,
) -> ResultEngine<Option<Expense>> {
    if !subscription.is_active {
        return Ok(None);
    }

    let first_day = period.first_day()?;
    let horizon = first_day
        .checked_add_months(Months::new(MATERIALIZE_SLACK_YEARS * 12))
        .ok_or_else(|| EngineError::DateOverflow(format!("{period} + {MATERIALIZE_SLACK_YEARS} years")))?;

    let schedule = BillingSchedule::new(subscription.start_date, subscription.billing_interval);
    let billing_date = schedule.first_on_or_after(first_day, horizon)?;
    if !period.contains(billing_date) {
        return Ok(None);
    }

    Ok(Some(Expense {
        id: synthetic_expense_id(&subscription.id, period),
        date: billing_date,
        item: format!("Subscription: {}", subscription.service_name),
        category: subscription.category.clone(),
        amount: subscription.amount,
        currency: subscription.currency,
        payment_method: AUTO_DEBIT.to_string(),
        status: ExpenseStatus::Paid,
        transaction_type: None,
    }))
}

/// Charges of every active subscription billed in `period`, in input order.
///
/// A subscription whose schedule cannot be evaluated is skipped and logged.
#[must_use]
pub fn materialize_month(subscriptions: &[Subscription], period: YearMonth) -> Vec<Expense> {
    let expenses: Vec<Expense> = subscriptions
        .iter()
        .filter_map(|subscription| match expense_for_month(subscription, period) {
            Ok(expense) => expense,
            Err(err) => {
                tracing::warn!(
                    subscription = %subscription.id,
                    "skipping subscription for {period}: {err}"
                );
                None
            }
        })
        .collect();
    tracing::debug!("{} subscription charges in {period}", expenses.len());
    expenses
}

/// Everything a month page lists: hand-entered expenses dated inside
/// `period` followed by the subscription charges of that month.
#[must_use]
pub fn month_expenses(
    expenses: &[Expense],
    subscriptions: &[Subscription],
    period: YearMonth,
) -> Vec<Expense> {
    expenses
        .iter()
        .filter(|expense| period.contains(expense.date) && !expense.is_synthetic())
        .cloned()
        .chain(materialize_month(subscriptions, period))
        .collect()
}

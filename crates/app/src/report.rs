//! Plain-text renderings of the engine computations, one per subcommand.
use chrono::NaiveDateTime;
use engine::{
    Currency, ExchangeRates, ExpenseFilters, ExpenseSummary, SubscriptionFilters, YearMonth,
    format_amount, month_expenses, monthly_trends, next_billing_date_at,
    subscription_monthly_total, subscription_total_in_krw,
};

use crate::{error::Result, snapshot::Snapshot};

/// What the reports need besides the data itself.
pub struct Context<'a> {
    pub snapshot: &'a Snapshot,
    pub rates: &'a ExchangeRates,
    pub display: Currency,
}

/// Active subscriptions with their next billing date relative to `now`.
pub fn next_charges(ctx: &Context<'_>, now: NaiveDateTime) -> String {
    let mut out = String::new();
    for sub in ctx.snapshot.subscriptions.iter().filter(|s| s.is_active) {
        let next = match next_billing_date_at(sub.start_date, sub.billing_interval, now) {
            Ok(date) => date.to_string(),
            Err(err) => {
                tracing::warn!(subscription = %sub.id, "no next billing date: {err}");
                "-".to_string()
            }
        };
        out.push_str(&format!(
            "{next:<10}  {:<24} {:>14} {}\n",
            sub.service_name,
            format_amount(sub.amount, sub.currency),
            sub.billing_interval
        ));
    }
    out
}

/// Expense list of a month followed by its category breakdown.
pub fn month(ctx: &Context<'_>, period: YearMonth, filters: &ExpenseFilters) -> Result<String> {
    let combined = month_expenses(
        &ctx.snapshot.expenses,
        &ctx.snapshot.subscriptions,
        period,
    );
    let listed = filters.apply(&combined);

    let mut out = String::new();
    out.push_str(&format!("{period}: {} expenses\n", listed.len()));
    for expense in &listed {
        out.push_str(&format!(
            "{}  {:<32} {:<14} {:>14} {}\n",
            expense.date,
            expense.item,
            expense.category,
            format_amount(expense.amount, expense.currency),
            expense.status
        ));
    }

    let summary = ExpenseSummary::from_expenses(listed.iter().copied(), ctx.rates, ctx.display)?;
    out.push_str(&format!("total {}\n", format_amount(summary.total, summary.currency)));
    for share in &summary.categories {
        out.push_str(&format!(
            "  {:<14} {:>14} {:>6.1}%\n",
            share.category,
            format_amount(share.amount, summary.currency),
            share.percentage
        ));
    }
    Ok(out)
}

/// Monthly subscription cost in KRW, plus the display currency when it
/// differs.
pub fn total(ctx: &Context<'_>) -> Result<String> {
    let subs = &ctx.snapshot.subscriptions;
    let active = subs.iter().filter(|s| s.is_active).count();
    let krw = subscription_total_in_krw(subs, ctx.rates)?;

    let mut out = format!(
        "{active} active subscriptions, {} per month",
        format_amount(krw, Currency::Krw)
    );
    if ctx.display != Currency::Krw {
        let converted = subscription_monthly_total(subs, ctx.rates, ctx.display)?;
        out.push_str(&format!(" ({})", format_amount(converted, ctx.display)));
    }
    out.push('\n');
    Ok(out)
}

/// Spending per month over the recorded expenses, oldest first.
pub fn trends(ctx: &Context<'_>) -> Result<String> {
    let mut out = String::new();
    for (period, amount) in monthly_trends(&ctx.snapshot.expenses, ctx.rates, ctx.display)? {
        out.push_str(&format!("{period}  {:>16}\n", format_amount(amount, ctx.display)));
    }
    Ok(out)
}

pub fn subscriptions(ctx: &Context<'_>, filters: &SubscriptionFilters) -> String {
    let mut out = String::new();
    for sub in filters.apply(&ctx.snapshot.subscriptions) {
        let state = if sub.is_active { "active" } else { "paused" };
        out.push_str(&format!(
            "{:<24} {:>14} {:<10} since {}  {state}\n",
            sub.service_name,
            format_amount(sub.amount, sub.currency),
            sub.billing_interval,
            sub.start_date
        ));
    }
    out
}

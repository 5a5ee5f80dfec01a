//! Billing engine of the ops dashboard.
//!
//! Pure computations over subscription and expense records:
//!
//! - [`next_billing_date_at`] finds the next charge of a subscription.
//! - [`materialize_month`] projects subscriptions onto a month's expenses.
//! - [`ExchangeRates`] and [`subscription_total_in_krw`] normalize amounts
//!   between currencies.
//!
//! Nothing here performs I/O; the only side effect is `tracing` events for
//! inputs that had to be skipped.
pub use currency::{Currency, ExchangeRates, USD_TO_KRW};
pub use error::EngineError;
pub use expense::{AUTO_DEBIT, Expense, ExpenseFilters, ExpenseStatus, SYNTHETIC_ID_PREFIX};
pub use interval::BillingInterval;
pub use money::format_amount;
pub use period::YearMonth;
pub use projection::{
    MATERIALIZE_SLACK_YEARS, expense_for_month, materialize_month, month_expenses,
    synthetic_expense_id,
};
pub use schedule::{
    BillingSchedule, HORIZON_YEARS, Occurrences, next_billing_date, next_billing_date_at,
    next_billing_date_label,
};
pub use subscription::{Subscription, SubscriptionFilters};
pub use summary::{
    CategoryShare, ExpenseSummary, monthly_trends, subscription_monthly_total,
    subscription_total_in_krw,
};

mod currency;
mod error;
mod expense;
mod interval;
mod money;
mod period;
mod projection;
mod schedule;
mod subscription;
mod summary;

pub type ResultEngine<T> = Result<T, EngineError>;

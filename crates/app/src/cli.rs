use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use engine::{BillingInterval, Currency, ExpenseStatus, YearMonth};

#[derive(Parser, Debug)]
#[command(name = "opsboard")]
#[command(about = "Subscription projections and expense summaries for the ops dashboard")]
pub struct Cli {
    /// Config file path (TOML). Defaults to `settings.toml` when present.
    #[arg(long, env = "OPSBOARD_CONFIG")]
    pub config: Option<String>,

    /// Override the snapshot file exported from the dashboard.
    #[arg(long)]
    pub snapshot: Option<String>,

    /// Override the currency totals are shown in (KRW or USD).
    #[arg(long)]
    pub display_currency: Option<Currency>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Next billing date of every active subscription.
    Next(NextArgs),
    /// Expenses of a month, subscription charges included.
    Month(MonthArgs),
    /// Monthly cost of the active subscriptions.
    Total,
    /// Spending per month over all recorded expenses.
    Trends,
    /// List subscriptions.
    Subscriptions(SubscriptionArgs),
    /// Write the expenses of a month as CSV.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
pub struct NextArgs {
    /// Reference day instead of today (YYYY-MM-DD).
    #[arg(long)]
    pub at: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct MonthArgs {
    /// Month to show (YYYY-MM).
    pub period: YearMonth,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub status: Option<ExpenseStatus>,
    /// Case-insensitive match on item or category.
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub from: Option<NaiveDate>,
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct SubscriptionArgs {
    #[arg(long)]
    pub currency: Option<Currency>,
    #[arg(long)]
    pub interval: Option<BillingInterval>,
    /// Case-insensitive match on service name or category.
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Month to export (YYYY-MM).
    pub period: YearMonth,
    /// Output file; stdout when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_month_with_filters() {
        let cli = Cli::try_parse_from([
            "opsboard",
            "--display-currency",
            "usd",
            "month",
            "2024-07",
            "--status",
            "paid",
            "--search",
            "coffee",
        ])
        .unwrap();
        assert_eq!(cli.display_currency, Some(Currency::Usd));
        let Command::Month(args) = cli.command else {
            panic!("expected month command");
        };
        assert_eq!(args.period, YearMonth::new(2024, 7).unwrap());
        assert_eq!(args.status, Some(ExpenseStatus::Paid));
        assert_eq!(args.search.as_deref(), Some("coffee"));
    }

    #[test]
    fn rejects_unknown_interval() {
        let parsed = Cli::try_parse_from(["opsboard", "subscriptions", "--interval", "weekly"]);
        assert!(parsed.is_err());
    }
}

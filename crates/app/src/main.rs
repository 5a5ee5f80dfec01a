use std::{fs::File, io};

use chrono::{NaiveTime, Utc};
use clap::Parser;
use engine::{ExpenseFilters, SubscriptionFilters, month_expenses};

use cli::{Cli, Command};
use error::{AppError, Result};
use report::Context;
use settings::Settings;
use snapshot::Snapshot;

mod cli;
mod error;
mod export;
mod report;
mod settings;
mod snapshot;

fn main() {
    if let Err(err) = run() {
        eprintln!("opsboard: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::new(cli.config.as_deref())?;
    if let Some(snapshot) = cli.snapshot {
        settings.data.snapshot = snapshot;
    }
    if let Some(currency) = cli.display_currency {
        settings.display.currency = currency;
    }

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "opsboard={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(io::stderr)
        .init();

    let rates = settings.exchange_rates()?;
    let snapshot = Snapshot::load(&settings.data.snapshot)?;
    let ctx = Context {
        snapshot: &snapshot,
        rates: &rates,
        display: settings.display.currency,
    };

    match cli.command {
        Command::Next(args) => {
            let now = match args.at {
                Some(day) => day.and_time(NaiveTime::MIN),
                None => Utc::now().naive_utc(),
            };
            print!("{}", report::next_charges(&ctx, now));
        }
        Command::Month(args) => {
            let filters = ExpenseFilters {
                category: args.category,
                status: args.status,
                search: args.search,
                date_from: args.from,
                date_to: args.to,
                period: None,
            };
            print!("{}", report::month(&ctx, args.period, &filters)?);
        }
        Command::Total => print!("{}", report::total(&ctx)?),
        Command::Trends => print!("{}", report::trends(&ctx)?),
        Command::Subscriptions(args) => {
            let filters = SubscriptionFilters {
                currency: args.currency,
                interval: args.interval,
                search: args.search,
            };
            print!("{}", report::subscriptions(&ctx, &filters));
        }
        Command::Export(args) => {
            let expenses = month_expenses(&snapshot.expenses, &snapshot.subscriptions, args.period);
            match args.out {
                Some(path) => {
                    let file = File::create(&path)
                        .map_err(|err| AppError::io(path.display().to_string(), err))?;
                    export::write_csv(&expenses, file)?;
                    tracing::info!("exported {} expenses to {}", expenses.len(), path.display());
                }
                None => export::write_csv(&expenses, io::stdout().lock())?,
            }
        }
    }

    Ok(())
}

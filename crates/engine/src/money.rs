//! Display formatting of amounts.
use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

use crate::Currency;

/// Renders `amount` the way the dashboard shows it.
///
/// The number of fraction digits follows [`Currency::minor_units`], the
/// integer part is grouped by thousands (through `numfmt`) and the currency
/// symbol is prefixed.
/// Negative amounts put the sign before the symbol.
///
/// # Examples
///
/// ```rust
/// use engine::{Currency, format_amount};
///
/// assert_eq!(format_amount(14_000.0, Currency::Krw), "₩14,000");
/// assert_eq!(format_amount(1234.5, Currency::Usd), "$1,234.50");
/// assert_eq!(format_amount(-0.5, Currency::Usd), "-$0.50");
/// ```
#[must_use]
pub fn format_amount(amount: f64, currency: Currency) -> String {
    let digits = usize::from(currency.minor_units());
    let symbol = currency.symbol();
    if !amount.is_finite() {
        return format!("{symbol}{amount}");
    }

    let scale = 10f64.powi(i32::from(currency.minor_units()));
    let rounded = (amount * scale).round() / scale;
    // numfmt renders zero as a bare "0"
    if rounded == 0.0 {
        return format!("{symbol}{:.digits$}", 0.0);
    }

    let negative = rounded < 0.0;
    match formatter(currency, negative) {
        Some(fmt) => pad_fraction(fmt.fmt_string(rounded.abs()), digits),
        None => {
            let sign = if negative { "-" } else { "" };
            format!("{sign}{symbol}{:.digits$}", rounded.abs())
        }
    }
}

fn formatter(currency: Currency, negative: bool) -> Option<&'static Formatter> {
    static KRW: OnceLock<Option<Formatter>> = OnceLock::new();
    static KRW_NEGATIVE: OnceLock<Option<Formatter>> = OnceLock::new();
    static USD: OnceLock<Option<Formatter>> = OnceLock::new();
    static USD_NEGATIVE: OnceLock<Option<Formatter>> = OnceLock::new();

    let (cell, prefix) = match (currency, negative) {
        (Currency::Krw, false) => (&KRW, "₩"),
        (Currency::Krw, true) => (&KRW_NEGATIVE, "-₩"),
        (Currency::Usd, false) => (&USD, "$"),
        (Currency::Usd, true) => (&USD_NEGATIVE, "-$"),
    };
    cell.get_or_init(|| {
        Formatter::currency(prefix)
            .map(|fmt| fmt.precision(Precision::Decimals(currency.minor_units())))
            .inspect_err(|err| tracing::warn!("cannot build {prefix} formatter: {err:?}"))
            .ok()
    })
    .as_ref()
}

/// numfmt drops trailing zeros of the fraction; pads it back to `digits`.
fn pad_fraction(mut formatted: String, digits: usize) -> String {
    // exponent notation is left alone
    if formatted.contains(|c: char| c.is_ascii_alphabetic()) {
        return formatted;
    }
    match formatted.find('.') {
        Some(dot) if digits == 0 => formatted.truncate(dot),
        Some(dot) => {
            let missing = digits.saturating_sub(formatted.len() - dot - 1);
            formatted.extend(std::iter::repeat_n('0', missing));
        }
        None if digits > 0 => {
            formatted.push('.');
            formatted.extend(std::iter::repeat_n('0', digits));
        }
        None => {}
    }
    formatted
}

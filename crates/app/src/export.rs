//! CSV export of a month's expenses.
use std::io::Write;

use csv::WriterBuilder;
use engine::Expense;
use serde::Serialize;

use crate::error::{AppError, Result};

const HEADER: [&str; 8] = [
    "date",
    "item",
    "category",
    "amount",
    "currency",
    "payment_method",
    "status",
    "id",
];

#[derive(Serialize)]
struct ExportRow<'a> {
    date: String,
    item: &'a str,
    category: &'a str,
    amount: f64,
    currency: &'static str,
    payment_method: &'a str,
    status: &'static str,
    id: &'a str,
}

/// Writes `expenses` as CSV. The header row is written even for an empty
/// month.
pub fn write_csv<W: Write>(expenses: &[Expense], out: W) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(out);
    writer.write_record(HEADER)?;
    for expense in expenses {
        writer.serialize(ExportRow {
            date: expense.date.format("%Y-%m-%d").to_string(),
            item: &expense.item,
            category: &expense.category,
            amount: expense.amount,
            currency: expense.currency.code(),
            payment_method: &expense.payment_method,
            status: expense.status.label(),
            id: &expense.id,
        })?;
    }
    writer.flush().map_err(|err| AppError::io("csv output", err))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use engine::{Currency, ExpenseStatus};

    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let expenses = [Expense {
            id: "sub-7-2024-7".to_string(),
            date: "2024-07-01".parse().unwrap(),
            item: "Subscription: Figma, Pro".to_string(),
            category: "design".to_string(),
            amount: 15.0,
            currency: Currency::Usd,
            payment_method: "auto-debit".to_string(),
            status: ExpenseStatus::Paid,
            transaction_type: None,
        }];

        let mut buf = Vec::new();
        write_csv(&expenses, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("date,item,category,amount,currency,payment_method,status,id")
        );
        assert_eq!(
            lines.next(),
            Some("2024-07-01,\"Subscription: Figma, Pro\",design,15.0,USD,auto-debit,paid,sub-7-2024-7")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_month_still_has_header() {
        let mut buf = Vec::new();
        write_csv(&[], &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "date,item,category,amount,currency,payment_method,status,id\n"
        );
    }
}

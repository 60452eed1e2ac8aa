//! CSV export of expense lists
//!
//! Amounts are written as plain decimals so spreadsheets can sum them.

use serde::Serialize;
use std::io::Write;

use crate::error::{FicError, FicResult};
use crate::models::ExpenseSummary;

#[derive(Serialize)]
struct CsvRow<'a> {
    id: u64,
    date: String,
    supplier: &'a str,
    description: &'a str,
    category: &'a str,
    amount_net: String,
    amount_vat: String,
    amount_gross: String,
    status: &'static str,
    next_due_date: String,
}

/// Write expenses as CSV with a header row
pub fn export_expenses_csv<W: Write>(writer: W, expenses: &[ExpenseSummary]) -> FicResult<()> {
    let mut csv_writer = ::csv::Writer::from_writer(writer);

    for expense in expenses {
        let row = CsvRow {
            id: expense.id,
            date: expense.date.format("%Y-%m-%d").to_string(),
            supplier: &expense.supplier,
            description: expense.description.as_deref().unwrap_or(""),
            category: expense.category.as_deref().unwrap_or(""),
            amount_net: expense.amount_net.to_plain_string(),
            amount_vat: expense.amount_vat.to_plain_string(),
            amount_gross: expense.amount_gross.to_plain_string(),
            status: if expense.is_paid() { "paid" } else { "unpaid" },
            next_due_date: expense
                .next_due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        };
        csv_writer
            .serialize(row)
            .map_err(|e| FicError::Export(format!("Failed to write CSV row: {}", e)))?;
    }

    csv_writer
        .flush()
        .map_err(|e| FicError::Export(format!("Failed to flush CSV: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;

    #[test]
    fn test_csv_export() {
        let expenses = vec![ExpenseSummary {
            id: 3,
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            supplier: "ACME, Inc".into(),
            description: Some("Hosting".into()),
            category: None,
            amount_net: Money::from_cents(100000),
            amount_vat: Money::from_cents(22000),
            amount_gross: Money::from_cents(122000),
            next_due_date: NaiveDate::from_ymd_opt(2024, 3, 31),
        }];
        let mut out = Vec::new();
        export_expenses_csv(&mut out, &expenses).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,date,supplier,description,category,amount_net,amount_vat,amount_gross,status,next_due_date"
        );
        assert_eq!(
            lines.next().unwrap(),
            "3,2024-02-01,\"ACME, Inc\",Hosting,,1000.00,220.00,1220.00,unpaid,2024-03-31"
        );
    }
}

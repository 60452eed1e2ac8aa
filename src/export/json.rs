//! JSON export of expense lists
//!
//! Writes the listed expenses together with schema version and metadata.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::error::{FicError, FicResult};
use crate::models::{ExpenseSummary, Money};
use crate::services::ExpenseFilter;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// A list of expenses as written by `list --format json|yaml`
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseExport<'a> {
    pub schema_version: &'static str,
    pub exported_at: DateTime<Utc>,
    pub app_version: &'static str,
    pub filter: &'a ExpenseFilter,
    pub metadata: ExportMetadata,
    pub expenses: &'a [ExpenseSummary],
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportMetadata {
    pub count: usize,
    pub total_gross: Money,
    pub unpaid_count: usize,
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

impl<'a> ExpenseExport<'a> {
    pub fn new(filter: &'a ExpenseFilter, expenses: &'a [ExpenseSummary]) -> Self {
        let metadata = ExportMetadata {
            count: expenses.len(),
            total_gross: expenses.iter().map(|e| e.amount_gross).sum(),
            unpaid_count: expenses.iter().filter(|e| !e.is_paid()).count(),
            earliest: expenses.iter().map(|e| e.date).min().map(|d| d.to_string()),
            latest: expenses.iter().map(|e| e.date).max().map(|d| d.to_string()),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION"),
            filter,
            metadata,
            expenses,
        }
    }
}

/// Write expenses as pretty-printed JSON
pub fn export_expenses_json<W: Write>(
    writer: &mut W,
    filter: &ExpenseFilter,
    expenses: &[ExpenseSummary],
) -> FicResult<()> {
    let export = ExpenseExport::new(filter, expenses);
    serde_json::to_writer_pretty(&mut *writer, &export)
        .map_err(|e| FicError::Export(format!("Failed to write JSON: {}", e)))?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_json_export() {
        let expenses = vec![ExpenseSummary {
            id: 3,
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            supplier: "ACME".into(),
            description: None,
            category: None,
            amount_net: Money::from_cents(1000),
            amount_vat: Money::from_cents(220),
            amount_gross: Money::from_cents(1220),
            next_due_date: None,
        }];
        let mut out = Vec::new();
        export_expenses_json(&mut out, &ExpenseFilter::default(), &expenses).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["schema_version"], EXPORT_SCHEMA_VERSION);
        assert_eq!(value["metadata"]["count"], 1);
        assert_eq!(value["metadata"]["total_gross"], 1220);
        assert_eq!(value["expenses"][0]["supplier"], "ACME");
        assert_eq!(value["filter"]["status"], "all");
    }
}

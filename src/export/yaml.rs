//! YAML export of expense lists

use std::io::Write;

use super::json::ExpenseExport;
use crate::error::{FicError, FicResult};
use crate::models::ExpenseSummary;
use crate::services::ExpenseFilter;

/// Write expenses as YAML, same structure as the JSON export
pub fn export_expenses_yaml<W: Write>(
    writer: &mut W,
    filter: &ExpenseFilter,
    expenses: &[ExpenseSummary],
) -> FicResult<()> {
    let export = ExpenseExport::new(filter, expenses);
    serde_yaml::to_writer(&mut *writer, &export)
        .map_err(|e| FicError::Export(format!("Failed to write YAML: {}", e)))
}

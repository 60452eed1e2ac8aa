//! Export of expense lists
//!
//! - CSV: one row per expense (spreadsheet-compatible)
//! - JSON / YAML: expenses plus filter and summary metadata

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::export_expenses_csv;
pub use json::{export_expenses_json, ExpenseExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_expenses_yaml;

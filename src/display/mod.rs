//! Display formatting for terminal output
//!
//! Formats expenses, schedules, statistics and quota readings as plain text
//! for the command-line interface.

pub mod expense;
pub mod quota;

pub use expense::{
    format_create_summary, format_date, format_expense_details, format_expense_table,
    format_installment_preview, format_money, format_stats, summary_status, truncate,
};
pub use quota::format_quota;

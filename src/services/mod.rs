//! Service layer for fic-expenses
//!
//! The schedule generator is pure date and amount arithmetic. The expense
//! service orchestrates list/create/pay workflows on top of the API port.

pub mod expense;
pub mod filter;
pub mod schedule;
pub mod stats;

pub use expense::{
    require_account, BatchFailure, BatchReport, CreatedExpense, ExpenseService,
    InstallmentSelector, PaidExpense,
};
pub use filter::{ExpenseFilter, StatusFilter};
pub use stats::ExpenseStats;

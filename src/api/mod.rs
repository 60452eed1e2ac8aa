//! Remote API access
//!
//! `ExpenseApi` is the narrow interface the services depend on. `FicClient`
//! implements it over HTTP; tests use an in-memory double.

pub mod client;
pub mod dto;

#[cfg(test)]
pub mod mock;

pub use client::FicClient;

use crate::error::FicResult;
use crate::models::{
    Expense, ExpenseDraft, ExpenseId, ExpenseSummary, Installment, PaymentAccount, QuotaInfo,
};

/// Smallest page size the API accepts
pub const MIN_PER_PAGE: u32 = 5;
/// Largest page size the API accepts
pub const MAX_PER_PAGE: u32 = 100;

/// Operations on expense documents of one company
pub trait ExpenseApi {
    /// One page of expenses, newest first. `query` is a filter expression
    /// such as `date >= '2024-01-01'`.
    fn list_expenses(
        &self,
        query: Option<&str>,
        page: u32,
        per_page: u32,
    ) -> FicResult<Vec<ExpenseSummary>>;

    /// Full record including installments
    fn get_expense(&self, id: ExpenseId) -> FicResult<Expense>;

    /// Create an expense, returning its new id
    fn create_expense(&self, draft: &ExpenseDraft) -> FicResult<ExpenseId>;

    /// Replace the installment list of an existing expense
    fn update_expense_payments(&self, id: ExpenseId, installments: &[Installment])
        -> FicResult<()>;

    fn list_payment_accounts(&self) -> FicResult<Vec<PaymentAccount>>;

    /// Quota reported by the most recent response, if any
    fn last_quota(&self) -> Option<QuotaInfo>;
}

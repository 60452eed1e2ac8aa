//! Core data models for fic-expenses
//!
//! Money amounts, period kinds, expense records as returned by the API, the
//! create request entered by the user and API quota readings.

pub mod expense;
pub mod input;
pub mod money;
pub mod period;
pub mod quota;

pub use expense::{
    Expense, ExpenseDraft, ExpenseId, ExpenseSummary, Installment, PaymentAccount,
    PaymentAccountId, PaymentStatus,
};
pub use input::{ExpenseInput, VatRate};
pub use money::Money;
pub use period::RecurrencePeriod;
pub use quota::QuotaInfo;

//! Expense records as seen through the API
//!
//! `ExpenseSummary` is the shape returned by bulk listing; `Expense` is the
//! full record including its installment schedule.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Numeric document id assigned by the remote service
pub type ExpenseId = u64;

/// Numeric payment account id assigned by the remote service
pub type PaymentAccountId = u64;

/// One scheduled payment of an expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    /// Payment item id; `None` until the remote service has stored it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// 1-based position in the schedule
    pub sequence: u32,
    pub due_date: NaiveDate,
    pub amount: Money,
    #[serde(default)]
    pub paid: bool,
    pub paid_date: Option<NaiveDate>,
    pub payment_account: Option<PaymentAccountId>,
}

impl Installment {
    /// Create an unpaid installment
    pub fn unpaid(sequence: u32, due_date: NaiveDate, amount: Money) -> Self {
        Self {
            id: None,
            sequence,
            due_date,
            amount,
            paid: false,
            paid_date: None,
            payment_account: None,
        }
    }

    /// Mark this installment paid from the given account
    pub fn mark_paid(&mut self, paid_date: NaiveDate, account: PaymentAccountId) {
        self.paid = true;
        self.paid_date = Some(paid_date);
        self.payment_account = Some(account);
    }
}

/// Payment state derived from an expense's installments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    /// No installment schedule at all
    NoPayments,
    Paid,
    Unpaid,
    Partial { paid: usize, total: usize },
}

impl PaymentStatus {
    /// Derive the status from a list of installments
    pub fn from_installments(installments: &[Installment]) -> Self {
        let total = installments.len();
        let paid = installments.iter().filter(|i| i.paid).count();
        match (total, paid) {
            (0, _) => Self::NoPayments,
            (t, p) if t == p => Self::Paid,
            (_, 0) => Self::Unpaid,
            (total, paid) => Self::Partial { paid, total },
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPayments => write!(f, "No payments"),
            Self::Paid => write!(f, "Paid ✓"),
            Self::Unpaid => write!(f, "Unpaid"),
            Self::Partial { paid, total } => write!(f, "{}/{} paid", paid, total),
        }
    }
}

/// Row returned by bulk listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSummary {
    pub id: ExpenseId,
    pub date: NaiveDate,
    pub supplier: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub amount_net: Money,
    pub amount_vat: Money,
    pub amount_gross: Money,
    /// Earliest unpaid due date; absent once everything is paid
    pub next_due_date: Option<NaiveDate>,
}

impl ExpenseSummary {
    /// An expense counts as paid when nothing is left to pay
    pub fn is_paid(&self) -> bool {
        self.next_due_date.is_none()
    }

    /// Unpaid with a due date strictly before `today`
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        matches!(self.next_due_date, Some(due) if due < today)
    }
}

/// Full expense record with its installment schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub date: NaiveDate,
    pub supplier: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub amount_net: Money,
    pub amount_vat: Money,
    pub amount_gross: Money,
    #[serde(default)]
    pub installments: Vec<Installment>,
}

impl Expense {
    pub fn status(&self) -> PaymentStatus {
        PaymentStatus::from_installments(&self.installments)
    }

    pub fn unpaid_installments(&self) -> impl Iterator<Item = &Installment> {
        self.installments.iter().filter(|i| !i.paid)
    }

    /// Sum of installments still to be paid
    pub fn outstanding(&self) -> Money {
        self.unpaid_installments().map(|i| i.amount).sum()
    }

    /// Earliest due date among unpaid installments
    pub fn next_due_date(&self) -> Option<NaiveDate> {
        self.unpaid_installments().map(|i| i.due_date).min()
    }

    pub fn summary(&self) -> ExpenseSummary {
        ExpenseSummary {
            id: self.id,
            date: self.date,
            supplier: self.supplier.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            amount_net: self.amount_net,
            amount_vat: self.amount_vat,
            amount_gross: self.amount_gross,
            next_due_date: self.next_due_date(),
        }
    }
}

/// Fields sent when creating a new expense
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseDraft {
    pub date: NaiveDate,
    pub supplier: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub amount_net: Money,
    pub amount_vat: Money,
    pub installments: Vec<Installment>,
}

impl ExpenseDraft {
    pub fn amount_gross(&self) -> Money {
        self.amount_net + self.amount_vat
    }
}

/// A bank account, card or cash drawer payments can be booked against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentAccount {
    pub id: PaymentAccountId,
    pub name: String,
}

impl fmt::Display for PaymentAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (ID: {})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_expense() -> Expense {
        let mut first = Installment::unpaid(1, date(2024, 1, 31), Money::from_cents(5000));
        first.mark_paid(date(2024, 1, 30), 7);
        Expense {
            id: 10,
            date: date(2024, 1, 15),
            supplier: "ACME".into(),
            description: None,
            category: None,
            amount_net: Money::from_cents(8197),
            amount_vat: Money::from_cents(1803),
            amount_gross: Money::from_cents(10000),
            installments: vec![
                first,
                Installment::unpaid(2, date(2024, 2, 29), Money::from_cents(5000)),
            ],
        }
    }

    #[test]
    fn test_status_derivation() {
        let expense = sample_expense();
        assert_eq!(
            expense.status(),
            PaymentStatus::Partial { paid: 1, total: 2 }
        );
        assert_eq!(expense.status().to_string(), "1/2 paid");
        assert_eq!(PaymentStatus::from_installments(&[]).to_string(), "No payments");
    }

    #[test]
    fn test_outstanding_and_next_due() {
        let expense = sample_expense();
        assert_eq!(expense.outstanding(), Money::from_cents(5000));
        assert_eq!(expense.next_due_date(), Some(date(2024, 2, 29)));
    }

    #[test]
    fn test_summary_paid_flag() {
        let mut expense = sample_expense();
        assert!(!expense.summary().is_paid());
        expense.installments[1].mark_paid(date(2024, 2, 28), 7);
        let summary = expense.summary();
        assert!(summary.is_paid());
        assert!(!summary.is_overdue(date(2030, 1, 1)));
    }

    #[test]
    fn test_overdue() {
        let summary = sample_expense().summary();
        assert!(summary.is_overdue(date(2024, 3, 1)));
        assert!(!summary.is_overdue(date(2024, 2, 29)));
    }
}

//! Expense list filters
//!
//! Supplier and date bounds are pushed to the API as a query expression;
//! supplier and payment status are also checked locally on every row.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::ExpenseSummary;

pub const DEFAULT_LIMIT: usize = 50;

/// Which expenses to keep by payment state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Paid,
    Unpaid,
}

impl StatusFilter {
    pub fn matches(&self, expense: &ExpenseSummary) -> bool {
        match self {
            Self::All => true,
            Self::Paid => expense.is_paid(),
            Self::Unpaid => !expense.is_paid(),
        }
    }

    /// Next value in the All → Unpaid → Paid cycle
    pub fn cycle(&self) -> Self {
        match self {
            Self::All => Self::Unpaid,
            Self::Unpaid => Self::Paid,
            Self::Paid => Self::All,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "All"),
            Self::Paid => write!(f, "Paid"),
            Self::Unpaid => write!(f, "Unpaid"),
        }
    }
}

/// Criteria for listing expenses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseFilter {
    pub supplier: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: StatusFilter,
    /// Maximum rows returned; `None` fetches everything
    pub limit: Option<usize>,
}

impl Default for ExpenseFilter {
    fn default() -> Self {
        Self {
            supplier: None,
            from: None,
            to: None,
            status: StatusFilter::All,
            limit: Some(DEFAULT_LIMIT),
        }
    }
}

impl ExpenseFilter {
    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        let supplier = supplier.into();
        self.supplier = if supplier.trim().is_empty() {
            None
        } else {
            Some(supplier)
        };
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// True when a supplier or date bound narrows the selection
    pub fn has_criteria(&self) -> bool {
        self.supplier.is_some() || self.from.is_some() || self.to.is_some()
    }

    /// True when rows may be dropped after fetching, so a page of exactly
    /// `limit` rows might not be enough
    pub fn filters_locally(&self) -> bool {
        self.supplier.is_some() || self.status != StatusFilter::All
    }

    /// Query expression understood by the API, `None` when unfiltered
    pub fn to_query(&self) -> Option<String> {
        let mut clauses = Vec::new();

        if let Some(supplier) = &self.supplier {
            clauses.push(format!(
                "entity.name LIKE '%{}%'",
                supplier.trim().replace('\'', "''")
            ));
        }
        if let Some(from) = self.from {
            clauses.push(format!("date >= '{}'", from.format("%Y-%m-%d")));
        }
        if let Some(to) = self.to {
            clauses.push(format!("date <= '{}'", to.format("%Y-%m-%d")));
        }

        if clauses.is_empty() {
            None
        } else {
            Some(clauses.join(" AND "))
        }
    }

    /// Local check applied to every fetched row
    pub fn matches(&self, expense: &ExpenseSummary) -> bool {
        if !self.status.matches(expense) {
            return false;
        }
        if let Some(supplier) = &self.supplier {
            let needle = supplier.trim().to_lowercase();
            if !expense.supplier.to_lowercase().contains(&needle) {
                return false;
            }
        }
        if matches!(self.from, Some(from) if expense.date < from) {
            return false;
        }
        if matches!(self.to, Some(to) if expense.date > to) {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn summary(supplier: &str, next_due: Option<NaiveDate>) -> ExpenseSummary {
        ExpenseSummary {
            id: 1,
            date: date(2024, 6, 1),
            supplier: supplier.into(),
            description: None,
            category: None,
            amount_net: Money::from_cents(100),
            amount_vat: Money::from_cents(22),
            amount_gross: Money::from_cents(122),
            next_due_date: next_due,
        }
    }

    #[test]
    fn test_empty_filter_has_no_query() {
        assert_eq!(ExpenseFilter::default().to_query(), None);
        assert_eq!(ExpenseFilter::default().limit, Some(DEFAULT_LIMIT));
    }

    #[test]
    fn test_query_joins_clauses() {
        let filter = ExpenseFilter::default()
            .with_supplier("Bar's")
            .with_range(Some(date(2024, 1, 1)), Some(date(2024, 12, 31)));
        assert_eq!(
            filter.to_query().unwrap(),
            "entity.name LIKE '%Bar''s%' AND date >= '2024-01-01' AND date <= '2024-12-31'"
        );
    }

    #[test]
    fn test_blank_supplier_is_ignored() {
        let filter = ExpenseFilter::default().with_supplier("   ");
        assert!(filter.supplier.is_none());
        assert!(!filter.has_criteria());
    }

    #[test]
    fn test_status_matching() {
        let paid = summary("ACME", None);
        let unpaid = summary("ACME", Some(date(2024, 7, 31)));
        assert!(StatusFilter::Paid.matches(&paid));
        assert!(!StatusFilter::Paid.matches(&unpaid));
        assert!(StatusFilter::Unpaid.matches(&unpaid));
        assert!(StatusFilter::All.matches(&paid));
    }

    #[test]
    fn test_supplier_match_is_case_insensitive_substring() {
        let filter = ExpenseFilter::default().with_supplier("acme");
        assert!(filter.matches(&summary("ACME Srl", None)));
        assert!(!filter.matches(&summary("Globex", None)));
    }

    #[test]
    fn test_status_cycle() {
        assert_eq!(StatusFilter::All.cycle(), StatusFilter::Unpaid);
        assert_eq!(StatusFilter::Paid.cycle(), StatusFilter::All);
    }
}

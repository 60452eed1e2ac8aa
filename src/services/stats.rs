//! Aggregate figures over a list of expenses
//!
//! All figures use gross amounts. `today` is passed in so results are
//! reproducible.

use chrono::{Datelike, Months, NaiveDate};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::models::{ExpenseSummary, Money};

/// Totals shown under the CLI list and in the TUI stats panel
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExpenseStats {
    pub count: usize,
    pub total: Money,
    pub paid_count: usize,
    pub paid_total: Money,
    pub unpaid_count: usize,
    pub unpaid_total: Money,
    pub overdue_count: usize,
    pub overdue_total: Money,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub supplier_count: usize,
    pub this_month: Money,
    pub last_month: Money,
    pub year_to_date: Money,
    /// Mean of completed calendar months present in the list
    pub monthly_average: Money,
    /// Up to three suppliers with the highest totals, largest first
    pub top_suppliers: Vec<(String, Money)>,
}

impl ExpenseStats {
    pub fn compute(expenses: &[ExpenseSummary], today: NaiveDate) -> Self {
        let mut stats = Self {
            count: expenses.len(),
            ..Default::default()
        };

        let this_month_start = today.with_day(1).unwrap_or(today);
        let last_month_start = this_month_start
            .checked_sub_months(Months::new(1))
            .unwrap_or(this_month_start);
        let year_start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);

        let mut suppliers = BTreeSet::new();
        let mut by_supplier: HashMap<&str, Money> = HashMap::new();
        let mut by_month: BTreeMap<(i32, u32), Money> = BTreeMap::new();

        for expense in expenses {
            let gross = expense.amount_gross;
            stats.total += gross;

            if expense.is_paid() {
                stats.paid_count += 1;
                stats.paid_total += gross;
            } else {
                stats.unpaid_count += 1;
                stats.unpaid_total += gross;
                if expense.is_overdue(today) {
                    stats.overdue_count += 1;
                    stats.overdue_total += gross;
                }
            }

            stats.first_date = Some(stats.first_date.map_or(expense.date, |d| d.min(expense.date)));
            stats.last_date = Some(stats.last_date.map_or(expense.date, |d| d.max(expense.date)));

            if expense.date >= this_month_start {
                stats.this_month += gross;
            }
            if expense.date >= last_month_start && expense.date < this_month_start {
                stats.last_month += gross;
            }
            if expense.date >= year_start {
                stats.year_to_date += gross;
            }
            *by_month
                .entry((expense.date.year(), expense.date.month()))
                .or_default() += gross;

            let name = if expense.supplier.is_empty() {
                "Unknown"
            } else {
                expense.supplier.as_str()
            };
            suppliers.insert(name);
            *by_supplier.entry(name).or_default() += gross;
        }

        stats.supplier_count = suppliers.len();

        let current = (today.year(), today.month());
        let completed: Vec<Money> = by_month
            .iter()
            .filter(|(month, _)| **month != current)
            .map(|(_, total)| *total)
            .collect();
        if !completed.is_empty() {
            let sum: Money = completed.iter().sum();
            stats.monthly_average = Money::from_cents(sum.cents() / completed.len() as i64);
        }

        let mut ranked: Vec<(String, Money)> = by_supplier
            .into_iter()
            .map(|(name, total)| (name.to_string(), total))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(3);
        stats.top_suppliers = ranked;

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(supplier: &str, day: NaiveDate, cents: i64, due: Option<NaiveDate>) -> ExpenseSummary {
        ExpenseSummary {
            id: 0,
            date: day,
            supplier: supplier.into(),
            description: None,
            category: None,
            amount_net: Money::from_cents(cents),
            amount_vat: Money::zero(),
            amount_gross: Money::from_cents(cents),
            next_due_date: due,
        }
    }

    #[test]
    fn test_empty_list() {
        let stats = ExpenseStats::compute(&[], date(2024, 6, 15));
        assert_eq!(stats.count, 0);
        assert_eq!(stats.total, Money::zero());
        assert!(stats.first_date.is_none());
        assert!(stats.top_suppliers.is_empty());
    }

    #[test]
    fn test_paid_unpaid_and_overdue() {
        let today = date(2024, 6, 15);
        let rows = vec![
            row("A", date(2024, 6, 1), 1000, None),
            row("B", date(2024, 5, 1), 2000, Some(date(2024, 6, 1))),
            row("B", date(2024, 4, 1), 3000, Some(date(2024, 7, 1))),
        ];
        let stats = ExpenseStats::compute(&rows, today);
        assert_eq!(stats.paid_count, 1);
        assert_eq!(stats.unpaid_count, 2);
        assert_eq!(stats.unpaid_total, Money::from_cents(5000));
        assert_eq!(stats.overdue_count, 1);
        assert_eq!(stats.overdue_total, Money::from_cents(2000));
        assert_eq!(stats.first_date, Some(date(2024, 4, 1)));
        assert_eq!(stats.last_date, Some(date(2024, 6, 1)));
        assert_eq!(stats.supplier_count, 2);
    }

    #[test]
    fn test_time_periods_cross_year() {
        let today = date(2025, 1, 10);
        let rows = vec![
            row("A", date(2025, 1, 2), 100, None),
            row("A", date(2024, 12, 31), 200, None),
            row("A", date(2024, 11, 5), 400, None),
        ];
        let stats = ExpenseStats::compute(&rows, today);
        assert_eq!(stats.this_month, Money::from_cents(100));
        assert_eq!(stats.last_month, Money::from_cents(200));
        assert_eq!(stats.year_to_date, Money::from_cents(100));
        // Current month excluded from the average
        assert_eq!(stats.monthly_average, Money::from_cents(300));
    }

    #[test]
    fn test_top_suppliers() {
        let today = date(2024, 6, 15);
        let rows = vec![
            row("Small", date(2024, 1, 1), 100, None),
            row("Big", date(2024, 1, 1), 5000, None),
            row("Mid", date(2024, 1, 1), 1000, None),
            row("Big", date(2024, 2, 1), 5000, None),
            row("Tiny", date(2024, 1, 1), 1, None),
        ];
        let stats = ExpenseStats::compute(&rows, today);
        let names: Vec<_> = stats.top_suppliers.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Big", "Mid", "Small"]);
        assert_eq!(stats.top_suppliers[0].1, Money::from_cents(10000));
        assert_eq!(stats.supplier_count, 4);
    }
}

//! Expense display formatting
//!
//! Tables, detail views and statistics for plain terminal output.

use chrono::NaiveDate;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::models::{Expense, ExpenseDraft, ExpenseInput, ExpenseSummary, Money, PaymentStatus};
use crate::services::ExpenseStats;

/// Status of a list row, where only the next due date is known
pub fn summary_status(expense: &ExpenseSummary) -> PaymentStatus {
    if expense.is_paid() {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Unpaid
    }
}

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Supplier")]
    supplier: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Gross")]
    gross: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Next Due")]
    next_due: String,
}

impl From<&ExpenseSummary> for ExpenseRow {
    fn from(expense: &ExpenseSummary) -> Self {
        Self {
            id: expense.id,
            date: expense.date.format("%Y-%m-%d").to_string(),
            supplier: or_dash(Some(expense.supplier.as_str())),
            description: truncate(expense.description.as_deref().unwrap_or("-"), 30),
            gross: expense.amount_gross.to_string(),
            status: summary_status(expense).to_string(),
            next_due: format_date(expense.next_due_date),
        }
    }
}

/// Format a list of expenses as a table
pub fn format_expense_table(expenses: &[ExpenseSummary]) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let rows: Vec<ExpenseRow> = expenses.iter().map(ExpenseRow::from).collect();
    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::single(0)).with(Alignment::right()))
        .with(Modify::new(Columns::single(4)).with(Alignment::right()));

    format!("{}\n", table)
}

/// Summary lines printed under the table
pub fn format_stats(stats: &ExpenseStats) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Total: {} expense(s)  •  {}\n",
        stats.count, stats.total
    ));
    output.push_str(&format!(
        "├─ Paid: {} ({})  •  Unpaid: {} ({})\n",
        stats.paid_count, stats.paid_total, stats.unpaid_count, stats.unpaid_total
    ));
    if stats.overdue_count > 0 {
        output.push_str(&format!(
            "├─ Overdue: {} ({})\n",
            stats.overdue_count, stats.overdue_total
        ));
    }

    let mut parts = Vec::new();
    match (stats.first_date, stats.last_date) {
        (Some(first), Some(last)) if first == last => parts.push(format!("Date: {}", first)),
        (Some(first), Some(last)) => parts.push(format!("Period: {} → {}", first, last)),
        _ => {}
    }
    parts.push(format!("Suppliers: {}", stats.supplier_count));
    output.push_str(&format!("└─ {}\n", parts.join(" • ")));

    output
}

/// Detailed view of a single expense with its payment schedule
pub fn format_expense_details(expense: &Expense) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense #{}\n", expense.id));
    output.push_str(&"=".repeat(40));
    output.push('\n');
    output.push_str(&format!("Supplier:     {}\n", or_dash(Some(&expense.supplier))));
    output.push_str(&format!("Date:         {}\n", expense.date));
    output.push_str(&format!(
        "Description:  {}\n",
        or_dash(expense.description.as_deref())
    ));
    output.push_str(&format!(
        "Category:     {}\n",
        or_dash(expense.category.as_deref())
    ));
    output.push('\n');
    output.push_str(&format!("Net:          {}\n", expense.amount_net));
    output.push_str(&format!("VAT:          {}\n", expense.amount_vat));
    output.push_str(&format!("Gross:        {}\n", expense.amount_gross));
    output.push_str(&format!("Status:       {}\n", expense.status()));

    if !expense.installments.is_empty() {
        output.push_str("\nPayment Schedule\n");
        output.push_str(&"─".repeat(50));
        output.push('\n');
        for installment in &expense.installments {
            let (icon, paid_info) = if installment.paid {
                let info = installment
                    .paid_date
                    .map(|d| format!(" (paid {})", d))
                    .unwrap_or_default();
                ("✓", info)
            } else {
                ("○", String::new())
            };
            output.push_str(&format!(
                "  {} Installment {}: {} - due {}{}\n",
                icon, installment.sequence, installment.amount, installment.due_date, paid_info
            ));
        }
    }

    output
}

/// Summary shown before creating an expense
pub fn format_create_summary(input: &ExpenseInput, drafts: &[ExpenseDraft]) -> String {
    let mut output = String::new();

    output.push_str("Expense Summary\n");
    output.push_str(&"─".repeat(40));
    output.push('\n');
    output.push_str(&format!("Supplier:     {}\n", input.supplier.trim()));
    output.push_str(&format!(
        "Description:  {}\n",
        or_dash(input.description.as_deref())
    ));
    output.push_str(&format!(
        "Category:     {}\n",
        or_dash(input.category.as_deref())
    ));
    output.push_str(&format!("Date:         {}\n", input.expense_date));
    output.push_str(&format!("Net:          {}\n", input.amount_net));
    output.push_str(&format!(
        "VAT ({}):    {}\n",
        input.vat_rate,
        input.amount_vat()
    ));
    if let Ok(gross) = input.amount_gross() {
        output.push_str(&format!("Gross:        {}\n", gross));
    }

    if let Some(first) = drafts.first() {
        output.push_str(&format!(
            "\nInstallments: {} ({})\n",
            first.installments.len(),
            input.installment_period.describe()
        ));
        output.push_str(&format_installment_preview(first));
    }

    if let (Some(period), true) = (input.recurrence, drafts.len() > 1) {
        output.push_str(&format!(
            "\nRecurrence: {} occurrences, {}\n",
            drafts.len(),
            period.describe()
        ));
        for (k, draft) in drafts.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", k + 1, draft.date));
        }
    }

    output
}

/// Installment lines of a draft, eliding the middle of long schedules
pub fn format_installment_preview(draft: &ExpenseDraft) -> String {
    const SHOWN: usize = 6;
    let mut output = String::new();
    let count = draft.installments.len();

    for (i, installment) in draft.installments.iter().enumerate() {
        if count > SHOWN && i == SHOWN - 1 {
            output.push_str(&format!("  ... {} more\n", count - SHOWN));
        }
        if count > SHOWN && i >= SHOWN - 1 && i < count - 1 {
            continue;
        }
        output.push_str(&format!(
            "  {}. {} due {}\n",
            installment.sequence, installment.amount, installment.due_date
        ));
    }

    output
}

/// Money or a dash when absent
pub fn format_money(amount: Option<Money>) -> String {
    amount.map_or_else(|| "-".to_string(), |m| m.to_string())
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string())
}

fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

/// Truncate to `max_len` characters, ending with "..." when cut
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Installment;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn summary(id: u64, next_due: Option<NaiveDate>) -> ExpenseSummary {
        ExpenseSummary {
            id,
            date: date(2024, 3, 1),
            supplier: "ACME".into(),
            description: Some("A rather long description that will be truncated".into()),
            category: None,
            amount_net: Money::from_cents(100000),
            amount_vat: Money::from_cents(22000),
            amount_gross: Money::from_cents(122000),
            next_due_date: next_due,
        }
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(format_expense_table(&[]), "No expenses found.\n");
    }

    #[test]
    fn test_table_contains_rows() {
        let output = format_expense_table(&[
            summary(7, None),
            summary(8, Some(date(2024, 4, 30))),
        ]);
        assert!(output.contains("Next Due"));
        assert!(output.contains("€1,220.00"));
        assert!(output.contains("Paid ✓"));
        assert!(output.contains("2024-04-30"));
        assert!(output.contains("A rather long description t..."));
    }

    #[test]
    fn test_stats_lines() {
        let rows = vec![summary(1, None), summary(2, Some(date(2024, 1, 1)))];
        let stats = ExpenseStats::compute(&rows, date(2024, 6, 1));
        let output = format_stats(&stats);
        assert!(output.starts_with("Total: 2 expense(s)"));
        assert!(output.contains("Overdue: 1"));
        assert!(output.contains("Date: 2024-03-01"));
        assert!(output.contains("Suppliers: 1"));
    }

    #[test]
    fn test_details_show_schedule() {
        let mut first = Installment::unpaid(1, date(2024, 3, 31), Money::from_cents(61000));
        first.mark_paid(date(2024, 3, 30), 1);
        let expense = Expense {
            id: 9,
            date: date(2024, 3, 1),
            supplier: "ACME".into(),
            description: None,
            category: None,
            amount_net: Money::from_cents(100000),
            amount_vat: Money::from_cents(22000),
            amount_gross: Money::from_cents(122000),
            installments: vec![
                first,
                Installment::unpaid(2, date(2024, 4, 30), Money::from_cents(61000)),
            ],
        };
        let output = format_expense_details(&expense);
        assert!(output.contains("Expense #9"));
        assert!(output.contains("✓ Installment 1: €610.00 - due 2024-03-31 (paid 2024-03-30)"));
        assert!(output.contains("○ Installment 2: €610.00 - due 2024-04-30"));
        assert!(output.contains("Status:       1/2 paid"));
    }

    #[test]
    fn test_preview_elides_long_schedules() {
        let installments = (1..=12)
            .map(|i| Installment::unpaid(i, date(2024, i, 1), Money::from_cents(100)))
            .collect();
        let draft = ExpenseDraft {
            date: date(2024, 1, 1),
            supplier: "ACME".into(),
            description: None,
            category: None,
            amount_net: Money::from_cents(1200),
            amount_vat: Money::zero(),
            installments,
        };
        let preview = format_installment_preview(&draft);
        assert!(preview.contains("  5. "));
        assert!(!preview.contains("  6. "));
        assert!(preview.contains("... 6 more"));
        assert!(preview.contains("  12. "));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly ten", 11), "exactly ten");
        assert_eq!(truncate("this is long", 8), "this ...");
    }
}

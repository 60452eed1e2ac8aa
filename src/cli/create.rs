//! `create` command
//!
//! With `--supplier` the expense is built from flags; without it an
//! interactive wizard asks for each field. Either way the full plan is
//! computed and shown before anything is sent.

use chrono::Datelike;
use clap::Args;

use super::prompt::{
    confirm, parse_amount, parse_count, parse_date, parse_optional_date, prompt_parsed,
    prompt_string, today,
};
use crate::display::{format_create_summary, format_expense_details};
use crate::error::{FicError, FicResult};
use crate::models::input::{MAX_INSTALLMENTS, MAX_OCCURRENCES};
use crate::models::{ExpenseDraft, ExpenseInput, RecurrencePeriod, VatRate};
use crate::services::expense::plan_instances;
use crate::services::schedule::default_first_due;
use crate::services::{BatchReport, CreatedExpense, ExpenseService};
use crate::session::Session;

/// Arguments of `create`
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Supplier name; without it an interactive wizard starts
    #[arg(short, long)]
    pub supplier: Option<String>,

    /// Net amount before VAT (e.g. "1000" or "99.90")
    #[arg(short, long = "amount-net")]
    pub amount_net: Option<String>,

    /// Expense description
    #[arg(short = 'D', long)]
    pub description: Option<String>,

    /// Expense category
    #[arg(short, long)]
    pub category: Option<String>,

    /// VAT rate percentage
    #[arg(long, default_value = "22")]
    pub vat_rate: String,

    /// Expense date (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    pub date: Option<String>,

    /// Number of payment installments
    #[arg(short = 'n', long, default_value_t = 1)]
    pub installments: u32,

    /// First installment due date (YYYY-MM-DD), defaults to the end of next month
    #[arg(long)]
    pub first_due: Option<String>,

    /// Spacing between installments (monthly, biannual, yearly)
    #[arg(long, default_value = "monthly")]
    pub installment_period: String,

    /// Recurrence period (monthly, biannual, yearly)
    #[arg(short, long)]
    pub recurrence: Option<String>,

    /// Number of recurring expenses, including the first
    #[arg(short, long, default_value_t = 1)]
    pub occurrences: u32,

    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,
}

impl CreateArgs {
    /// Build the create request from flags
    pub fn to_input(&self) -> FicResult<ExpenseInput> {
        let supplier = self
            .supplier
            .as_deref()
            .ok_or_else(|| FicError::Validation("--supplier is required".to_string()))?;
        let amount = self.amount_net.as_deref().ok_or_else(|| {
            FicError::Validation("--amount-net is required with --supplier".to_string())
        })?;

        let expense_date = parse_optional_date(self.date.as_deref())?.unwrap_or_else(today);
        let mut input = ExpenseInput::new(supplier, parse_amount(amount)?, expense_date);
        input.description = non_empty(self.description.as_deref());
        input.category = non_empty(self.category.as_deref());
        input.vat_rate = self.vat_rate.parse()?;
        input.installments = self.installments;
        input.first_due = parse_optional_date(self.first_due.as_deref())?;
        input.installment_period = self.installment_period.parse()?;
        input.recurrence = self
            .recurrence
            .as_deref()
            .map(str::parse::<RecurrencePeriod>)
            .transpose()?;
        input.occurrences = self.occurrences;
        Ok(input)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Handle the `create` command
pub fn handle_create_command(session: &mut Session, args: CreateArgs) -> FicResult<()> {
    let interactive = args.supplier.is_none();
    let input = if interactive {
        prompt_expense_wizard()?
    } else {
        args.to_input()?
    };

    let drafts = plan_instances(&input)?;
    if interactive || !args.yes {
        println!();
        print!("{}", format_create_summary(&input, &drafts));
        println!();
        if !confirm("Create this expense?", true)? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let service = ExpenseService::new(session.client()?);
    let report = service.create(&input)?;
    print_report(&report, &drafts);

    if let Some(first) = report.succeeded.first() {
        let expense = service.show(first.id)?;
        println!();
        print!("{}", format_expense_details(&expense));
    }

    match report.failed.into_iter().next() {
        Some(failure) => Err(failure.error),
        None => Ok(()),
    }
}

fn print_report(report: &BatchReport<CreatedExpense>, drafts: &[ExpenseDraft]) {
    let series = drafts.len() > 1;
    for created in &report.succeeded {
        if series {
            println!("✓ Created expense #{} ({})", created.id, created.date.year());
        } else {
            println!("✓ Created expense #{}", created.id);
        }
    }
    for failure in &report.failed {
        println!("✗ {}: {}", failure.item, failure.error);
    }
    if report.skipped > 0 {
        println!(
            "Skipped {} occurrence(s) after an authentication failure",
            report.skipped
        );
    }

    println!();
    if report.is_complete_success() {
        println!("Done! Created {} expense(s).", report.succeeded.len());
    } else {
        println!(
            "Created {} of {} expense(s).",
            report.succeeded.len(),
            report.total()
        );
    }
}

/// Ask for every field of a new expense
pub fn prompt_expense_wizard() -> FicResult<ExpenseInput> {
    println!();
    println!("Create New Expense");
    println!("{}", "─".repeat(30));

    let supplier = prompt_parsed("Supplier name", None, |s| {
        if s.trim().is_empty() {
            Err(FicError::Validation("Supplier name is required".to_string()))
        } else {
            Ok(s.trim().to_string())
        }
    })?;
    let description = non_empty(Some(&prompt_string("Description", None)?));
    let category = non_empty(Some(&prompt_string("Category", None)?));

    println!();
    println!("Amounts");
    let amount_net = prompt_parsed("Amount (net, €)", None, parse_amount)?;
    let vat_rate: VatRate = prompt_parsed("VAT rate %", Some("22"), |s| s.parse())?;
    let default_date = today().to_string();
    let expense_date = prompt_parsed("Date", Some(&default_date), parse_date)?;

    let mut input = ExpenseInput::new(supplier, amount_net, expense_date);
    input.description = description;
    input.category = category;
    input.vat_rate = vat_rate;

    println!();
    println!("Payment Options");
    println!("{}", "─".repeat(30));
    input.installments = prompt_parsed("Number of installments", Some("1"), |s| {
        parse_count(s, "Installments", 1, MAX_INSTALLMENTS)
    })?;
    if input.installments > 1 {
        let default_due = default_first_due(expense_date)?.to_string();
        input.first_due = Some(prompt_parsed(
            "First payment due date",
            Some(&default_due),
            parse_date,
        )?);
        input.installment_period =
            prompt_parsed("Installment period (monthly, biannual, yearly)", Some("monthly"), |s| {
                s.parse()
            })?;
    }

    println!();
    println!("Recurrence");
    println!("{}", "─".repeat(30));
    if confirm("Is this recurring?", false)? {
        println!("Recurrence period:");
        for (i, period) in RecurrencePeriod::ALL.iter().enumerate() {
            println!("  {}. {}", i + 1, capitalize(period.describe()));
        }
        input.recurrence = Some(prompt_parsed("Select", Some("3"), |s| {
            let choice = parse_count(s, "Choice", 1, RecurrencePeriod::ALL.len() as u32)?;
            Ok(RecurrencePeriod::ALL[choice as usize - 1])
        })?);
        input.occurrences = prompt_parsed(
            "How many occurrences (including this one)?",
            Some("3"),
            |s| parse_count(s, "Occurrences", 1, MAX_OCCURRENCES),
        )?;
    }

    Ok(input)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;

    fn args() -> CreateArgs {
        CreateArgs {
            supplier: Some("ACME Srl".into()),
            amount_net: Some("1000".into()),
            description: Some("Hosting".into()),
            category: Some("  ".into()),
            vat_rate: "22".into(),
            date: Some("2024-01-15".into()),
            installments: 1,
            first_due: None,
            installment_period: "monthly".into(),
            recurrence: None,
            occurrences: 1,
            yes: true,
        }
    }

    #[test]
    fn test_to_input() {
        let input = args().to_input().unwrap();
        assert_eq!(input.supplier, "ACME Srl");
        assert_eq!(input.amount_net, Money::from_cents(100000));
        assert_eq!(input.amount_gross().unwrap(), Money::from_cents(122000));
        assert_eq!(input.description.as_deref(), Some("Hosting"));
        assert_eq!(input.category, None);
        assert_eq!(input.expense_date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_to_input_parses_periods() {
        let mut args = args();
        args.recurrence = Some("yearly".into());
        args.occurrences = 3;
        args.installment_period = "biannual".into();
        let input = args.to_input().unwrap();
        assert_eq!(input.recurrence, Some(RecurrencePeriod::Yearly));
        assert_eq!(input.installment_period, RecurrencePeriod::Biannual);

        args.recurrence = Some("weekly".into());
        assert!(matches!(args.to_input(), Err(FicError::Config(_))));
    }

    #[test]
    fn test_to_input_rejects_bad_amounts() {
        let mut args = args();
        args.amount_net = Some("12,345.678".into());
        assert!(args.to_input().unwrap_err().is_validation());
        args.amount_net = None;
        assert!(args.to_input().is_err());
    }

    #[test]
    fn test_plan_from_flags_rejects_zero_occurrences() {
        let mut args = args();
        args.occurrences = 0;
        let input = args.to_input().unwrap();
        assert!(matches!(plan_instances(&input), Err(FicError::Config(_))));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("every month"), "Every month");
        assert_eq!(capitalize(""), "");
    }
}

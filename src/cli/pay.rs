//! `pay` command
//!
//! Marks one expense (or one of its installments) paid, or every unpaid
//! expense matching a supplier or date range after confirmation.

use chrono::NaiveDate;
use clap::Args;

use super::prompt::{confirm, parse_optional_date, today};
use crate::display::{format_expense_details, format_expense_table};
use crate::error::{FicError, FicResult};
use crate::models::{ExpenseId, PaymentAccountId};
use crate::services::{
    require_account, BatchReport, ExpenseFilter, ExpenseService, InstallmentSelector, PaidExpense,
};
use crate::session::Session;

/// Arguments of `pay`
#[derive(Debug, Args)]
pub struct PayArgs {
    /// Expense ID to mark as paid
    pub id: Option<ExpenseId>,

    /// Mark only this installment as paid (1-indexed)
    #[arg(short, long)]
    pub installment: Option<u32>,

    /// Payment date (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    pub date: Option<String>,

    /// Mark all unpaid expenses from this supplier as paid
    #[arg(short, long, conflicts_with = "id")]
    pub supplier: Option<String>,

    /// Mark unpaid expenses from this date
    #[arg(long, conflicts_with = "id")]
    pub from: Option<String>,

    /// Mark unpaid expenses up to this date
    #[arg(long, conflicts_with = "id")]
    pub to: Option<String>,

    /// Skip confirmation for batch operations
    #[arg(short, long)]
    pub yes: bool,
}

/// What a `pay` invocation targets, resolved before any API call
#[derive(Debug, Clone, PartialEq)]
pub enum PayTarget {
    Single {
        id: ExpenseId,
        selector: InstallmentSelector,
    },
    Batch(ExpenseFilter),
}

impl PayArgs {
    pub fn target(&self) -> FicResult<PayTarget> {
        if let Some(id) = self.id {
            if self.installment == Some(0) {
                return Err(FicError::Validation(
                    "Installment numbers start at 1".to_string(),
                ));
            }
            return Ok(PayTarget::Single {
                id,
                selector: InstallmentSelector::from_option(self.installment),
            });
        }

        if self.installment.is_some() {
            return Err(FicError::Validation(
                "--installment needs an expense ID".to_string(),
            ));
        }

        let mut filter = ExpenseFilter::default().with_range(
            parse_optional_date(self.from.as_deref())?,
            parse_optional_date(self.to.as_deref())?,
        );
        if let Some(supplier) = &self.supplier {
            filter = filter.with_supplier(supplier.as_str());
        }
        if !filter.has_criteria() {
            return Err(FicError::Validation(
                "Provide an expense ID or use --supplier/--from/--to for batch payment"
                    .to_string(),
            ));
        }
        Ok(PayTarget::Batch(filter))
    }

    pub fn payment_date(&self) -> FicResult<NaiveDate> {
        Ok(parse_optional_date(self.date.as_deref())?.unwrap_or_else(today))
    }
}

/// Handle the `pay` command
pub fn handle_pay_command(session: &mut Session, args: PayArgs) -> FicResult<()> {
    let account = require_account(session.default_account()?)?;
    let paid_date = args.payment_date()?;
    let target = args.target()?;

    let service = ExpenseService::new(session.client()?);
    match target {
        PayTarget::Single { id, selector } => {
            pay_single(&service, id, selector, paid_date, account)
        }
        PayTarget::Batch(filter) => pay_filtered(&service, &filter, paid_date, account, args.yes),
    }
}

fn pay_single(
    service: &ExpenseService,
    id: ExpenseId,
    selector: InstallmentSelector,
    paid_date: NaiveDate,
    account: PaymentAccountId,
) -> FicResult<()> {
    match selector {
        InstallmentSelector::Index(i) => {
            println!("Marking installment {} of expense #{} as paid...", i, id)
        }
        InstallmentSelector::AllUnpaid => println!("Marking expense #{} as paid...", id),
    }

    let paid = service.mark_paid(id, selector, Some(paid_date), Some(account))?;
    if paid.marked == 0 {
        println!("Expense #{} has nothing left to pay", id);
    } else {
        println!("✓ Expense #{} updated", id);
    }
    println!();
    print!("{}", format_expense_details(&paid.expense));
    Ok(())
}

fn pay_filtered(
    service: &ExpenseService,
    filter: &ExpenseFilter,
    paid_date: NaiveDate,
    account: PaymentAccountId,
    yes: bool,
) -> FicResult<()> {
    let unpaid = service.unpaid_matching(filter)?;
    if unpaid.is_empty() {
        println!("No unpaid expenses match the criteria.");
        return Ok(());
    }

    println!("Found {} unpaid expense(s):", unpaid.len());
    print!("{}", format_expense_table(&unpaid));

    if !yes && !confirm(&format!("Mark these {} expense(s) as paid?", unpaid.len()), false)? {
        println!("Cancelled.");
        return Ok(());
    }

    let ids: Vec<ExpenseId> = unpaid.iter().map(|e| e.id).collect();
    let report = service.pay_many(&ids, Some(paid_date), Some(account))?;
    print_report(&report);

    match report.failed.into_iter().next() {
        Some(failure) => Err(failure.error),
        None => Ok(()),
    }
}

fn print_report(report: &BatchReport<PaidExpense>) {
    for paid in &report.succeeded {
        println!("✓ Marked expense #{} as paid", paid.expense.id);
    }
    for failure in &report.failed {
        println!("✗ {}: {}", failure.item, failure.error);
    }
    if report.skipped > 0 {
        println!("Skipped {} expense(s) after an authentication failure", report.skipped);
    }

    println!();
    if report.is_complete_success() {
        println!("Done! Marked {} expense(s) as paid.", report.succeeded.len());
    } else {
        println!(
            "Marked {} of {} expense(s) as paid.",
            report.succeeded.len(),
            report.total()
        );
    }
}

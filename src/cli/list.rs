//! `list` command
//!
//! Prints expenses as a table with summary statistics, or exports them as
//! JSON, YAML or CSV on stdout.

use clap::{Args, ValueEnum};
use std::io::{self, Write};

use super::prompt::{parse_optional_date, today};
use crate::display::{format_expense_table, format_quota, format_stats};
use crate::error::{FicError, FicResult};
use crate::export::{export_expenses_csv, export_expenses_json, export_expenses_yaml};
use crate::services::filter::DEFAULT_LIMIT;
use crate::services::{ExpenseFilter, ExpenseService, ExpenseStats, StatusFilter};
use crate::session::Session;

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table with summary statistics
    #[default]
    Table,
    /// JSON with filter and summary metadata
    Json,
    /// YAML with filter and summary metadata
    Yaml,
    /// CSV, one row per expense
    Csv,
}

/// Arguments of `list`
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Show only fully paid expenses
    #[arg(long, conflicts_with = "unpaid")]
    pub paid: bool,

    /// Show only expenses with installments still due
    #[arg(long)]
    pub unpaid: bool,

    /// Filter by supplier name (case-insensitive substring)
    #[arg(short, long)]
    pub supplier: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Fetch every matching expense instead of the most recent ones
    #[arg(short, long)]
    pub all: bool,

    /// Number of expenses to show
    #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl ListArgs {
    /// Build the filter, rejecting malformed dates and limits
    pub fn to_filter(&self) -> FicResult<ExpenseFilter> {
        let status = if self.paid {
            StatusFilter::Paid
        } else if self.unpaid {
            StatusFilter::Unpaid
        } else {
            StatusFilter::All
        };

        if !self.all && self.limit == 0 {
            return Err(FicError::Validation(
                "Limit must be at least 1".to_string(),
            ));
        }

        let from = parse_optional_date(self.from.as_deref())?;
        let to = parse_optional_date(self.to.as_deref())?;
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(FicError::Validation(format!(
                    "--from {} is after --to {}",
                    from, to
                )));
            }
        }

        let mut filter = ExpenseFilter::default()
            .with_status(status)
            .with_range(from, to)
            .with_limit(if self.all { None } else { Some(self.limit) });
        if let Some(supplier) = &self.supplier {
            filter = filter.with_supplier(supplier.as_str());
        }
        Ok(filter)
    }
}

/// Handle the `list` command
pub fn handle_list_command(session: &mut Session, args: ListArgs) -> FicResult<()> {
    let filter = args.to_filter()?;
    let service = ExpenseService::new(session.client()?);
    let expenses = service.list(&filter)?;

    let mut out = io::stdout().lock();
    match args.format {
        OutputFormat::Table => {
            write!(out, "{}", format_expense_table(&expenses))?;
            if !expenses.is_empty() {
                writeln!(out)?;
                write!(out, "{}", format_stats(&ExpenseStats::compute(&expenses, today())))?;
                if !args.all && expenses.len() == args.limit {
                    writeln!(
                        out,
                        "Showing the {} most recent. Use --all to see everything.",
                        args.limit
                    )?;
                }
            }
            writeln!(out, "{}", format_quota(service.quota().as_ref()))?;
        }
        OutputFormat::Json => export_expenses_json(&mut out, &filter, &expenses)?,
        OutputFormat::Yaml => export_expenses_yaml(&mut out, &filter, &expenses)?,
        OutputFormat::Csv => export_expenses_csv(&mut out, &expenses)?,
    }
    out.flush()?;

    Ok(())
}

//! `show` command

use clap::Args;

use crate::display::format_expense_details;
use crate::error::FicResult;
use crate::models::ExpenseId;
use crate::services::ExpenseService;
use crate::session::Session;

/// Arguments of `show`
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Expense ID
    pub id: ExpenseId,
}

/// Handle the `show` command
pub fn handle_show_command(session: &mut Session, args: ShowArgs) -> FicResult<()> {
    let service = ExpenseService::new(session.client()?);
    let expense = service.show(args.id)?;
    print!("{}", format_expense_details(&expense));
    Ok(())
}

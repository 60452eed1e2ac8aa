//! Runs queued actions against the session
//!
//! Every blocking call of the TUI goes through here, one action per loop
//! iteration, so the status line is drawn before the call starts.

use crate::api::ExpenseApi;
use crate::services::{ExpenseService, InstallmentSelector};
use crate::session::Session;

use super::app::{App, PendingAction};
use super::dialogs::create::error_text;
use super::dialogs::pay::PayRequest;
use super::dialogs::settings;
use super::widgets::Notification;

/// Run one queued action
pub fn run(app: &mut App, session: &mut Session, action: PendingAction) {
    tracing::debug!(?action, "running action");
    app.clear_status();

    match action {
        PendingAction::OpenSettings => settings::open(app, session),
        PendingAction::ValidateCredentials => settings::validate(app, session),
        PendingAction::SaveSettings => settings::save(app, session),
        other => match session.client() {
            Ok(client) => execute(app, client, other),
            Err(error) => app.show_error(&error),
        },
    }
}

/// Run an API-backed action
pub fn execute(app: &mut App, api: &dyn ExpenseApi, action: PendingAction) {
    let service = ExpenseService::new(api);

    match action {
        PendingAction::LoadExpenses => match service.list(&app.applied_filter) {
            Ok(expenses) => {
                let count = expenses.len();
                app.set_expenses(expenses);
                let scope = match app.applied_filter.limit {
                    Some(limit) => format!("limit {}", limit),
                    None => "all".to_string(),
                };
                app.notify(Notification::info(format!(
                    "Loaded {} expenses ({})",
                    count, scope
                )));
            }
            Err(error) => app.show_error(&error),
        },
        PendingAction::LoadDetails(id) => match service.show(id) {
            Ok(expense) => app.show_details(expense),
            Err(error) => app.show_error(&error),
        },
        PendingAction::Pay(request) => pay(app, &service, request),
        PendingAction::Create(input) => match service.create(&input) {
            Ok(report) if report.succeeded.is_empty() => {
                let message = report
                    .failed
                    .first()
                    .map(|f| error_text(&f.error))
                    .unwrap_or_else(|| "Nothing was created".to_string());
                app.create_state.set_error(message);
            }
            Ok(report) => {
                app.close_dialog();
                let ids: Vec<String> = report
                    .succeeded
                    .iter()
                    .map(|c| format!("#{}", c.id))
                    .collect();
                if report.is_complete_success() {
                    app.notify(Notification::success(format!(
                        "Created {} expense(s): {}",
                        report.succeeded.len(),
                        ids.join(", ")
                    )));
                } else {
                    app.notify(Notification::warning(format!(
                        "Created {} of {} expense(s): {}",
                        report.succeeded.len(),
                        report.total(),
                        ids.join(", ")
                    )));
                }
                app.reload();
            }
            Err(error) => app.create_state.set_error(error_text(&error)),
        },
        PendingAction::OpenSettings
        | PendingAction::ValidateCredentials
        | PendingAction::SaveSettings => {}
    }

    if let Some(quota) = service.quota() {
        app.quota = Some(quota);
    }
}

fn pay(app: &mut App, service: &ExpenseService, request: PayRequest) {
    let PayRequest {
        ids,
        selector,
        paid_date,
        account,
    } = request;

    if let &[id] = ids.as_slice() {
        match service.mark_paid(id, selector, paid_date, Some(account)) {
            Ok(paid) => {
                if paid.marked == 0 {
                    app.notify(Notification::warning(format!(
                        "Expense #{}: nothing left to pay",
                        id
                    )));
                } else {
                    let message = match selector {
                        InstallmentSelector::Index(n) => {
                            format!("Installment {} of expense #{} marked as paid", n, id)
                        }
                        InstallmentSelector::AllUnpaid => {
                            format!("Expense #{} marked as paid", id)
                        }
                    };
                    app.notify(Notification::success(message));
                }
                app.checked.remove(&id);
                if app.details.as_ref().is_some_and(|e| e.id == id) {
                    app.details = Some(paid.expense);
                }
            }
            Err(error) => {
                app.show_error(&error);
                return;
            }
        }
    } else {
        match service.pay_many(&ids, paid_date, Some(account)) {
            Ok(report) => {
                for paid in &report.succeeded {
                    app.checked.remove(&paid.expense.id);
                }
                match report.failed.first() {
                    None => app.notify(Notification::success(format!(
                        "Marked {} expense(s) as paid",
                        report.succeeded.len()
                    ))),
                    Some(failure) => app.notify(Notification::error(format!(
                        "Marked {} of {} expense(s) as paid. {}: {}",
                        report.succeeded.len(),
                        report.total(),
                        failure.item,
                        error_text(&failure.error)
                    ))),
                }
            }
            Err(error) => {
                app.show_error(&error);
                return;
            }
        }
    }

    app.reload();
}

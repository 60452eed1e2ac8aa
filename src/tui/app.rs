//! Application state for the TUI
//!
//! The App struct holds everything needed for rendering and handling
//! events. It never talks to the API itself: handlers queue a
//! `PendingAction` which the event loop runs against the session after the
//! next redraw, so "Loading..." is on screen while the call blocks.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::error::FicError;
use crate::models::{
    Expense, ExpenseId, ExpenseInput, ExpenseSummary, Money, PaymentAccountId, QuotaInfo,
};
use crate::services::{ExpenseFilter, ExpenseStats, InstallmentSelector};

use super::dialogs::create::CreateWizardState;
use super::dialogs::pay::{PayDialogState, PayRequest};
use super::dialogs::settings::SettingsState;
use super::views::filter_bar::FilterBarState;
use super::widgets::{ErrorInfo, Notification, NotificationQueue};

/// Which screen is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    List,
    Details,
}

/// Which part of the list screen receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedPanel {
    #[default]
    Table,
    FilterBar,
}

/// Mode of input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Currently active dialog (if any)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveDialog {
    #[default]
    None,
    Help,
    Pay,
    Create,
    Settings,
    Error,
}

/// Work that needs the session (config store or API)
#[derive(Debug, Clone)]
pub enum PendingAction {
    LoadExpenses,
    LoadDetails(ExpenseId),
    Pay(PayRequest),
    Create(ExpenseInput),
    OpenSettings,
    ValidateCredentials,
    SaveSettings,
}

/// Main application state
pub struct App {
    pub should_quit: bool,
    pub active_view: ActiveView,
    pub focused_panel: FocusedPanel,
    pub input_mode: InputMode,
    pub active_dialog: ActiveDialog,

    /// Rows of the last successful load, newest first
    pub expenses: Vec<ExpenseSummary>,
    /// Filter the rows were loaded with
    pub applied_filter: ExpenseFilter,
    pub filter_bar: FilterBarState,
    pub stats: ExpenseStats,
    pub quota: Option<QuotaInfo>,

    /// Cursor row in the table
    pub selected_index: usize,
    /// Rows checked for a batch payment
    pub checked: BTreeSet<ExpenseId>,

    /// Expense shown on the details screen
    pub details: Option<Expense>,

    pub default_account: Option<PaymentAccountId>,

    pub pay_state: PayDialogState,
    pub create_state: CreateWizardState,
    pub settings_state: SettingsState,
    pub error: Option<ErrorInfo>,

    pub notifications: NotificationQueue,
    pub status_message: Option<String>,
    pub pending: Option<PendingAction>,

    /// Reference date for overdue markers and defaults
    pub today: NaiveDate,
}

impl App {
    pub fn new(default_account: Option<PaymentAccountId>, today: NaiveDate) -> Self {
        Self {
            should_quit: false,
            active_view: ActiveView::default(),
            focused_panel: FocusedPanel::default(),
            input_mode: InputMode::default(),
            active_dialog: ActiveDialog::default(),
            expenses: Vec::new(),
            applied_filter: ExpenseFilter::default(),
            filter_bar: FilterBarState::new(),
            stats: ExpenseStats::compute(&[], today),
            quota: None,
            selected_index: 0,
            checked: BTreeSet::new(),
            details: None,
            default_account,
            pay_state: PayDialogState::default(),
            create_state: CreateWizardState::new(today),
            settings_state: SettingsState::default(),
            error: None,
            notifications: NotificationQueue::new(),
            status_message: None,
            pending: None,
            today,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Periodic housekeeping
    pub fn on_tick(&mut self) {
        self.notifications.remove_expired();
    }

    /// Queue work for the event loop with a status shown meanwhile
    pub fn request(&mut self, action: PendingAction, status: impl Into<String>) {
        self.pending = Some(action);
        self.set_status(status);
    }

    pub fn take_pending(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }

    /// Reload the list with the applied filter
    pub fn reload(&mut self) {
        self.request(PendingAction::LoadExpenses, "Loading expenses...");
    }

    pub fn open_dialog(&mut self, dialog: ActiveDialog) {
        self.active_dialog = dialog;
        self.input_mode = match dialog {
            ActiveDialog::Pay | ActiveDialog::Create | ActiveDialog::Settings => {
                InputMode::Editing
            }
            _ => InputMode::Normal,
        };
    }

    pub fn close_dialog(&mut self) {
        self.active_dialog = ActiveDialog::None;
        self.input_mode = if self.focused_panel == FocusedPanel::FilterBar {
            InputMode::Editing
        } else {
            InputMode::Normal
        };
    }

    pub fn has_dialog(&self) -> bool {
        self.active_dialog != ActiveDialog::None
    }

    /// Show an error dialog for a failed operation
    pub fn show_error(&mut self, error: &FicError) {
        tracing::warn!(%error, "operation failed");
        self.error = Some(ErrorInfo::from_error(error));
        self.clear_status();
        self.open_dialog(ActiveDialog::Error);
    }

    /// Replace the table rows after a load
    pub fn set_expenses(&mut self, expenses: Vec<ExpenseSummary>) {
        self.stats = ExpenseStats::compute(&expenses, self.today);
        self.checked
            .retain(|id| expenses.iter().any(|e| e.id == *id && !e.is_paid()));
        self.expenses = expenses;
        self.selected_index = self
            .selected_index
            .min(self.expenses.len().saturating_sub(1));
    }

    /// Row under the cursor
    pub fn selected_expense(&self) -> Option<&ExpenseSummary> {
        self.expenses.get(self.selected_index)
    }

    pub fn move_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected_index + 1 < self.expenses.len() {
            self.selected_index += 1;
        }
    }

    pub fn move_to_top(&mut self) {
        self.selected_index = 0;
    }

    pub fn move_to_bottom(&mut self) {
        self.selected_index = self.expenses.len().saturating_sub(1);
    }

    /// Check or uncheck the row under the cursor. Paid rows cannot be checked.
    pub fn toggle_check(&mut self) {
        let Some(expense) = self.selected_expense() else {
            return;
        };
        let id = expense.id;
        if expense.is_paid() {
            self.notify(Notification::warning(format!(
                "Expense #{} is already paid",
                id
            )));
            return;
        }
        if !self.checked.remove(&id) {
            self.checked.insert(id);
        }
    }

    pub fn select_all_unpaid(&mut self) {
        self.checked = self
            .expenses
            .iter()
            .filter(|e| !e.is_paid())
            .map(|e| e.id)
            .collect();
    }

    pub fn clear_selection(&mut self) {
        self.checked.clear();
    }

    /// Gross total of the checked rows
    pub fn checked_total(&self) -> Money {
        self.expenses
            .iter()
            .filter(|e| self.checked.contains(&e.id))
            .map(|e| e.amount_gross)
            .sum()
    }

    /// Open the details screen for the row under the cursor
    pub fn request_details(&mut self) {
        if let Some(id) = self.selected_expense().map(|e| e.id) {
            self.request(
                PendingAction::LoadDetails(id),
                format!("Loading expense #{}...", id),
            );
        }
    }

    pub fn show_details(&mut self, expense: Expense) {
        self.details = Some(expense);
        self.active_view = ActiveView::Details;
    }

    pub fn back_to_list(&mut self) {
        self.active_view = ActiveView::List;
        self.details = None;
    }

    /// Pay dialog for the checked rows, or the cursor row when none are
    /// checked
    pub fn open_pay_for_selection(&mut self) {
        let targets: Vec<&ExpenseSummary> = if self.checked.is_empty() {
            self.selected_expense()
                .filter(|e| !e.is_paid())
                .into_iter()
                .collect()
        } else {
            self.expenses
                .iter()
                .filter(|e| self.checked.contains(&e.id))
                .collect()
        };

        if targets.is_empty() {
            self.notify(Notification::warning("Nothing to pay: select an unpaid expense"));
            return;
        }
        self.pay_state = PayDialogState::for_summaries(&targets);
        self.open_dialog(ActiveDialog::Pay);
    }

    /// Pay dialog for the expense on the details screen
    pub fn open_pay_for_details(&mut self, selector: InstallmentSelector) {
        let Some(expense) = &self.details else {
            return;
        };
        match PayDialogState::for_expense(expense, selector) {
            Ok(state) => {
                self.pay_state = state;
                self.open_dialog(ActiveDialog::Pay);
            }
            Err(message) => self.notify(Notification::warning(message)),
        }
    }

    pub fn open_create(&mut self) {
        self.create_state = CreateWizardState::new(self.today);
        self.open_dialog(ActiveDialog::Create);
    }

    pub fn open_settings(&mut self) {
        self.request(PendingAction::OpenSettings, "Opening settings...");
    }

    pub fn focus_filter_bar(&mut self) {
        self.focused_panel = FocusedPanel::FilterBar;
        self.input_mode = InputMode::Editing;
        let field = self.filter_bar.focused;
        self.filter_bar.focus(field);
    }

    pub fn focus_table(&mut self) {
        self.focused_panel = FocusedPanel::Table;
        self.input_mode = InputMode::Normal;
        self.filter_bar.blur();
    }
}

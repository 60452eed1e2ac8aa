//! Pay dialog
//!
//! Confirms a payment for the checked rows, the cursor row, or one
//! installment from the details screen. An empty date pays each installment
//! on its own due date.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::display::truncate;
use crate::models::{Expense, ExpenseId, ExpenseSummary, Money, PaymentAccountId};
use crate::services::InstallmentSelector;
use crate::tui::app::{App, PendingAction};
use crate::tui::layout::{centered_rect_fixed, dialog_inner};
use crate::tui::widgets::TextInput;

/// Rows listed before collapsing the rest into "... and N more"
const MAX_LISTED: usize = 8;

/// One expense the dialog will pay
#[derive(Debug, Clone, PartialEq)]
pub struct PayTarget {
    pub id: ExpenseId,
    pub supplier: String,
    /// Outstanding amount; list rows only know their gross
    pub amount: Money,
}

/// A confirmed payment, ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct PayRequest {
    pub ids: Vec<ExpenseId>,
    pub selector: InstallmentSelector,
    /// `None` pays each installment on its due date
    pub paid_date: Option<NaiveDate>,
    pub account: PaymentAccountId,
}

/// State for the pay dialog
#[derive(Debug, Clone, Default)]
pub struct PayDialogState {
    pub targets: Vec<PayTarget>,
    /// 1-based installment, `None` for everything unpaid
    pub installment: Option<u32>,
    pub date_input: TextInput,
    pub error_message: Option<String>,
}

impl PayDialogState {
    fn with_targets(targets: Vec<PayTarget>) -> Self {
        Self {
            targets,
            installment: None,
            date_input: TextInput::new()
                .label("Payment date")
                .placeholder("each installment's due date")
                .focused(true),
            error_message: None,
        }
    }

    /// Pay everything unpaid on list rows
    pub fn for_summaries(expenses: &[&ExpenseSummary]) -> Self {
        Self::with_targets(
            expenses
                .iter()
                .map(|e| PayTarget {
                    id: e.id,
                    supplier: e.supplier.clone(),
                    amount: e.amount_gross,
                })
                .collect(),
        )
    }

    /// Pay one loaded expense. A single installment pre-fills its due date.
    pub fn for_expense(expense: &Expense, selector: InstallmentSelector) -> Result<Self, String> {
        if expense.installments.is_empty() {
            return Err(format!("Expense #{} has no payment schedule", expense.id));
        }

        match selector {
            InstallmentSelector::AllUnpaid => {
                if expense.unpaid_installments().next().is_none() {
                    return Err(format!("Expense #{} is already paid", expense.id));
                }
                Ok(Self::with_targets(vec![PayTarget {
                    id: expense.id,
                    supplier: expense.supplier.clone(),
                    amount: expense.outstanding(),
                }]))
            }
            InstallmentSelector::Index(index) => {
                let installment = index
                    .checked_sub(1)
                    .and_then(|i| expense.installments.get(i as usize))
                    .ok_or_else(|| {
                        format!(
                            "Expense #{} has {} installment(s)",
                            expense.id,
                            expense.installments.len()
                        )
                    })?;
                if installment.paid {
                    return Err(format!("Installment {} is already paid", index));
                }

                let mut state = Self::with_targets(vec![PayTarget {
                    id: expense.id,
                    supplier: expense.supplier.clone(),
                    amount: installment.amount,
                }]);
                state.installment = Some(index);
                state
                    .date_input
                    .set_content(installment.due_date.format("%Y-%m-%d").to_string());
                Ok(state)
            }
        }
    }

    pub fn total(&self) -> Money {
        self.targets.iter().map(|t| t.amount).sum()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    /// Build the request, or explain what is missing
    pub fn validate(&self, account: Option<PaymentAccountId>) -> Result<PayRequest, String> {
        let account = account.ok_or(
            "No payment account configured. Close this dialog and press 's' to open Settings.",
        )?;

        let paid_date = match self.date_input.trimmed() {
            None => None,
            Some(text) => Some(
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .map_err(|_| "Invalid date format. Use YYYY-MM-DD.")?,
            ),
        };

        Ok(PayRequest {
            ids: self.targets.iter().map(|t| t.id).collect(),
            selector: InstallmentSelector::from_option(self.installment),
            paid_date,
            account,
        })
    }
}

/// Render the pay dialog
pub fn render(frame: &mut Frame, app: &mut App) {
    let state = &app.pay_state;
    let listed = state.targets.len().min(MAX_LISTED);
    let overflow = usize::from(state.targets.len() > MAX_LISTED);
    let height = (listed + overflow) as u16 + 11;
    let area = centered_rect_fixed(64, height, frame.area());

    frame.render_widget(Clear, area);

    let title = match state.installment {
        Some(i) => format!(" Pay Installment {} ", i),
        None => " Mark as Paid ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .title_style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    frame.render_widget(block, area);

    let inner = dialog_inner(area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Heading
            Constraint::Length((listed + overflow) as u16),
            Constraint::Length(1), // Total
            Constraint::Length(1),
            Constraint::Length(1), // Date
            Constraint::Length(1),
            Constraint::Length(1), // Error
            Constraint::Length(1), // Hints
            Constraint::Min(0),
        ])
        .split(inner);

    let heading = if state.targets.len() == 1 {
        "Mark this expense as paid:".to_string()
    } else {
        format!("Mark these {} expenses as paid:", state.targets.len())
    };
    frame.render_widget(
        Paragraph::new(Span::styled(heading, Style::default().fg(Color::White))),
        chunks[0],
    );

    let mut lines: Vec<Line> = state
        .targets
        .iter()
        .take(MAX_LISTED)
        .map(|t| {
            Line::from(vec![
                Span::styled(format!("#{:<8}", t.id), Style::default().fg(Color::Cyan)),
                Span::raw(format!("{:<32}", truncate(&t.supplier, 30))),
                Span::styled(
                    format!("{:>14}", t.amount.to_string()),
                    Style::default().fg(Color::Yellow),
                ),
            ])
        })
        .collect();
    if overflow > 0 {
        lines.push(Line::from(Span::styled(
            format!("... and {} more", state.targets.len() - MAX_LISTED),
            Style::default().fg(Color::DarkGray),
        )));
    }
    frame.render_widget(Paragraph::new(lines), chunks[1]);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                "Total: ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                state.total().to_string(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ])),
        chunks[2],
    );

    frame.render_widget(&state.date_input, chunks[4]);

    if let Some(ref error) = state.error_message {
        frame.render_widget(
            Paragraph::new(Span::styled(error.as_str(), Style::default().fg(Color::Red))),
            chunks[6],
        );
    }

    let hints = Line::from(vec![
        Span::styled("[Enter]", Style::default().fg(Color::Green)),
        Span::raw(" Pay  "),
        Span::styled("[Esc]", Style::default().fg(Color::Red)),
        Span::raw(" Cancel"),
    ]);
    frame.render_widget(Paragraph::new(hints), chunks[7]);
}

/// Handle key events for the pay dialog
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            app.close_dialog();
            true
        }
        KeyCode::Enter => {
            match app.pay_state.validate(app.default_account) {
                Ok(request) => {
                    let status = format!("Recording payment for {} expense(s)...", request.ids.len());
                    app.close_dialog();
                    app.request(PendingAction::Pay(request), status);
                }
                Err(message) => app.pay_state.set_error(message),
            }
            true
        }
        _ => {
            let handled = app.pay_state.date_input.handle_key(key);
            if handled {
                app.pay_state.error_message = None;
            }
            handled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Installment;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense() -> Expense {
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
    fn test_all_unpaid_targets_outstanding_amount() {
        let state = PayDialogState::for_expense(&expense(), InstallmentSelector::AllUnpaid).unwrap();
        assert_eq!(state.total(), Money::from_cents(5000));
        assert_eq!(state.date_input.value(), "");
        assert_eq!(state.installment, None);
    }

    #[test]
    fn test_single_installment_prefills_due_date() {
        let state = PayDialogState::for_expense(&expense(), InstallmentSelector::Index(2)).unwrap();
        assert_eq!(state.installment, Some(2));
        assert_eq!(state.date_input.value(), "2024-02-29");

        let request = state.validate(Some(3)).unwrap();
        assert_eq!(request.selector, InstallmentSelector::Index(2));
        assert_eq!(request.paid_date, Some(date(2024, 2, 29)));
        assert_eq!(request.account, 3);
    }

    #[test]
    fn test_paid_or_missing_installments_are_refused() {
        assert!(PayDialogState::for_expense(&expense(), InstallmentSelector::Index(1)).is_err());
        assert!(PayDialogState::for_expense(&expense(), InstallmentSelector::Index(5)).is_err());

        let mut paid = expense();
        paid.installments[1].mark_paid(date(2024, 2, 1), 7);
        let err = PayDialogState::for_expense(&paid, InstallmentSelector::AllUnpaid).unwrap_err();
        assert!(err.contains("already paid"));
    }

    #[test]
    fn test_validate_requires_account_and_valid_date() {
        let mut state = PayDialogState::for_expense(&expense(), InstallmentSelector::AllUnpaid).unwrap();
        let err = state.validate(None).unwrap_err();
        assert!(err.contains("No payment account configured"));

        state.date_input.set_content("31/01/2024");
        assert_eq!(
            state.validate(Some(1)).unwrap_err(),
            "Invalid date format. Use YYYY-MM-DD."
        );

        state.date_input.clear();
        let request = state.validate(Some(1)).unwrap();
        assert_eq!(request.paid_date, None);
        assert_eq!(request.ids, vec![10]);
    }

    #[test]
    fn test_enter_queues_payment() {
        let mut app = App::new(Some(4), date(2024, 5, 1));
        app.show_details(expense());
        app.open_pay_for_details(InstallmentSelector::AllUnpaid);

        assert!(handle_key(&mut app, KeyEvent::from(KeyCode::Enter)));
        assert!(!app.has_dialog());
        match app.take_pending() {
            Some(PendingAction::Pay(request)) => assert_eq!(request.ids, vec![10]),
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_enter_without_account_keeps_dialog_open() {
        let mut app = App::new(None, date(2024, 5, 1));
        app.show_details(expense());
        app.open_pay_for_details(InstallmentSelector::AllUnpaid);

        handle_key(&mut app, KeyEvent::from(KeyCode::Enter));
        assert!(app.has_dialog());
        assert!(app.pending.is_none());
        assert!(app.pay_state.error_message.is_some());
    }
}

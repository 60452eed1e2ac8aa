//! Event handler for the TUI
//!
//! Routes keyboard events to the appropriate handlers based on the current
//! application state.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{ActiveDialog, ActiveView, App, FocusedPanel, PendingAction};
use super::dialogs;
use super::event::Event;
use super::views::filter_bar;
use crate::services::InstallmentSelector;

/// Handle an incoming event
pub fn handle_event(app: &mut App, event: Event) -> Result<()> {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Tick => {
            app.on_tick();
            Ok(())
        }
        Event::Mouse(_) | Event::Resize(_, _) => Ok(()),
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return Ok(());
    }

    // Check if we're in a dialog first
    if app.has_dialog() {
        handle_dialog_key(app, key);
        return Ok(());
    }

    match app.active_view {
        ActiveView::Details => handle_details_key(app, key),
        ActiveView::List => match app.focused_panel {
            FocusedPanel::FilterBar => {
                filter_bar::handle_key(app, key);
            }
            FocusedPanel::Table => handle_list_key(app, key),
        },
    }
    Ok(())
}

/// Handle keys on the expense table
fn handle_list_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('x') => app.quit(),
        KeyCode::Char('?') => app.open_dialog(ActiveDialog::Help),

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('g') | KeyCode::Home => app.move_to_top(),
        KeyCode::Char('G') | KeyCode::End => app.move_to_bottom(),
        KeyCode::Enter => app.request_details(),

        // Selection
        KeyCode::Char('a') if ctrl => app.select_all_unpaid(),
        KeyCode::Char(' ') => app.toggle_check(),
        KeyCode::Esc => app.clear_selection(),

        // Actions
        KeyCode::Char('p') | KeyCode::Char('P') => app.open_pay_for_selection(),
        KeyCode::Char('n') => app.open_create(),
        KeyCode::Char('s') => app.open_settings(),
        KeyCode::Char('r') => app.reload(),
        KeyCode::Char('/') | KeyCode::Tab => app.focus_filter_bar(),

        _ => {}
    }
}

/// Handle keys on the details screen
fn handle_details_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace => app.back_to_list(),
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('?') => app.open_dialog(ActiveDialog::Help),
        KeyCode::Char('p') => app.open_pay_for_details(InstallmentSelector::AllUnpaid),
        KeyCode::Char(c @ '1'..='9') => {
            let index = c.to_digit(10).unwrap_or(1);
            app.open_pay_for_details(InstallmentSelector::Index(index));
        }
        KeyCode::Char('r') => {
            if let Some(id) = app.details.as_ref().map(|e| e.id) {
                app.request(
                    PendingAction::LoadDetails(id),
                    format!("Loading expense #{}...", id),
                );
            }
        }
        KeyCode::Char('s') => app.open_settings(),
        _ => {}
    }
}

/// Handle keys while a dialog is open
fn handle_dialog_key(app: &mut App, key: KeyEvent) {
    match app.active_dialog {
        ActiveDialog::Help => app.close_dialog(),
        ActiveDialog::Pay => {
            dialogs::pay::handle_key(app, key);
        }
        ActiveDialog::Create => {
            dialogs::create::handle_key(app, key);
        }
        ActiveDialog::Settings => {
            dialogs::settings::handle_key(app, key);
        }
        ActiveDialog::Error => match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                app.error = None;
                app.close_dialog();
            }
            KeyCode::Char('s') if app.error.as_ref().is_some_and(|e| e.needs_settings()) => {
                app.error = None;
                app.close_dialog();
                app.open_settings();
            }
            _ => {}
        },
        ActiveDialog::None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FicError;
    use crate::models::{Expense, ExpenseSummary, Installment, Money};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn summary(id: u64, paid: bool) -> ExpenseSummary {
        ExpenseSummary {
            id,
            date: date(2024, 3, 1),
            supplier: format!("Supplier {}", id),
            description: None,
            category: None,
            amount_net: Money::from_cents(10_000),
            amount_vat: Money::from_cents(2_200),
            amount_gross: Money::from_cents(12_200),
            next_due_date: if paid { None } else { Some(date(2024, 4, 30)) },
        }
    }

    fn app() -> App {
        let mut app = App::new(Some(9), date(2024, 4, 1));
        app.set_expenses(vec![summary(1, false), summary(2, true), summary(3, false)]);
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_event(app, Event::Key(KeyEvent::from(code))).unwrap();
    }

    fn ctrl(app: &mut App, c: char) {
        handle_event(
            app,
            Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)),
        )
        .unwrap();
    }

    #[test]
    fn test_navigation_and_selection() {
        let mut app = app();
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected_index, 1);
        press(&mut app, KeyCode::Char('G'));
        assert_eq!(app.selected_index, 2);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.checked.contains(&3));

        ctrl(&mut app, 'a');
        assert_eq!(app.checked.len(), 2);
        press(&mut app, KeyCode::Esc);
        assert!(app.checked.is_empty());
    }

    #[test]
    fn test_pay_opens_dialog_for_checked_rows() {
        let mut app = app();
        ctrl(&mut app, 'a');
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.active_dialog, ActiveDialog::Pay);
        assert_eq!(app.pay_state.targets.len(), 2);

        press(&mut app, KeyCode::Esc);
        assert!(!app.has_dialog());
    }

    #[test]
    fn test_enter_requests_details() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert!(matches!(
            app.take_pending(),
            Some(PendingAction::LoadDetails(1))
        ));
    }

    #[test]
    fn test_tab_focuses_filter_bar() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_panel, FocusedPanel::FilterBar);

        // Typing goes to the filter, not the table
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert_eq!(app.filter_bar.supplier.value(), "q");
    }

    #[test]
    fn test_ctrl_c_quits_from_dialog() {
        let mut app = app();
        app.open_create();
        ctrl(&mut app, 'c');
        assert!(app.should_quit);
    }

    #[test]
    fn test_details_keys() {
        let mut app = app();
        app.show_details(Expense {
            id: 1,
            date: date(2024, 3, 1),
            supplier: "Acme".into(),
            description: None,
            category: None,
            amount_net: Money::from_cents(10_000),
            amount_vat: Money::from_cents(2_200),
            amount_gross: Money::from_cents(12_200),
            installments: vec![
                Installment::unpaid(1, date(2024, 3, 31), Money::from_cents(6_100)),
                Installment::unpaid(2, date(2024, 4, 30), Money::from_cents(6_100)),
            ],
        });

        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.active_dialog, ActiveDialog::Pay);
        assert_eq!(app.pay_state.installment, Some(2));
        press(&mut app, KeyCode::Esc);

        press(&mut app, KeyCode::Char('7'));
        assert!(!app.has_dialog());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.active_view, ActiveView::List);
        assert!(app.details.is_none());
    }

    #[test]
    fn test_error_dialog_offers_settings() {
        let mut app = app();
        app.show_error(&FicError::Config("Missing credentials".into()));
        press(&mut app, KeyCode::Char('s'));
        assert!(app.error.is_none());
        assert!(matches!(
            app.take_pending(),
            Some(PendingAction::OpenSettings)
        ));
    }

    #[test]
    fn test_help_closes_on_any_key() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.active_dialog, ActiveDialog::Help);
        press(&mut app, KeyCode::Char('z'));
        assert!(!app.has_dialog());
    }
}

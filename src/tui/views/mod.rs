//! TUI Views module
//!
//! Contains the main screens: the expense list with its filter bar and
//! stats panel, the details screen, and the status bars.

pub mod details;
pub mod expense_list;
pub mod filter_bar;
pub mod stats_panel;
pub mod status_bar;

use ratatui::Frame;

use super::app::{ActiveDialog, ActiveView, App};
use super::dialogs;
use super::layout::AppLayout;
use super::widgets::{error_dialog_area, notification_area, ErrorDialog, NotificationWidget};

/// Render the entire application
pub fn render(frame: &mut Frame, app: &mut App) {
    let layout = AppLayout::new(frame.area());

    filter_bar::render(frame, app, layout.filter_bar);

    match app.active_view {
        ActiveView::List => {
            expense_list::render(frame, app, layout.main);
        }
        ActiveView::Details => {
            details::render(frame, app, layout.main);
        }
    }

    if layout.stats.width > 0 {
        stats_panel::render(frame, app, layout.stats);
    }

    status_bar::render_selection(frame, app, layout.selection_bar);
    status_bar::render(frame, app, layout.status_bar);

    // Render dialog if active
    if app.has_dialog() {
        render_dialog(frame, app);
    }

    // Notifications float above everything
    if let Some(notification) = app.notifications.current() {
        let area = notification_area(frame.area(), &notification.message);
        frame.render_widget(NotificationWidget::new(notification), area);
    }
}

/// Render active dialog
fn render_dialog(frame: &mut Frame, app: &mut App) {
    match app.active_dialog {
        ActiveDialog::Help => {
            dialogs::help::render(frame, app);
        }
        ActiveDialog::Pay => {
            dialogs::pay::render(frame, app);
        }
        ActiveDialog::Create => {
            dialogs::create::render(frame, app);
        }
        ActiveDialog::Settings => {
            dialogs::settings::render(frame, app);
        }
        ActiveDialog::Error => {
            if let Some(ref error) = app.error {
                let area = error_dialog_area(frame.area());
                frame.render_widget(ErrorDialog::new(error), area);
            }
        }
        ActiveDialog::None => {}
    }
}

//! Filter bar above the expense table
//!
//! Edits status, supplier, date range and row limit. Changes only take
//! effect when applied, which reloads the list.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::cli::prompt::parse_optional_date;
use crate::error::{FicError, FicResult};
use crate::services::filter::DEFAULT_LIMIT;
use crate::services::{ExpenseFilter, StatusFilter};
use crate::tui::app::{App, FocusedPanel};
use crate::tui::dialogs::create::error_text;
use crate::tui::widgets::{Notification, TextInput};

/// Row limits offered by the filter bar; `None` loads everything
pub const LIMITS: [Option<usize>; 4] = [Some(DEFAULT_LIMIT), Some(100), Some(200), None];

/// Fields of the filter bar, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterField {
    Status,
    #[default]
    Supplier,
    From,
    To,
    Limit,
    Apply,
}

impl FilterField {
    const ORDER: [FilterField; 6] = [
        Self::Status,
        Self::Supplier,
        Self::From,
        Self::To,
        Self::Limit,
        Self::Apply,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Edited, not yet applied, filter values
#[derive(Debug, Clone)]
pub struct FilterBarState {
    pub focused: FilterField,
    pub status: StatusFilter,
    pub supplier: TextInput,
    pub from: TextInput,
    pub to: TextInput,
    pub limit_index: usize,
}

impl Default for FilterBarState {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterBarState {
    pub fn new() -> Self {
        Self {
            focused: FilterField::default(),
            status: StatusFilter::All,
            supplier: TextInput::new().label("Supplier").placeholder("any"),
            from: TextInput::new().label("From").placeholder("YYYY-MM-DD"),
            to: TextInput::new().label("To").placeholder("YYYY-MM-DD"),
            limit_index: 0,
        }
    }

    pub fn limit(&self) -> Option<usize> {
        LIMITS[self.limit_index % LIMITS.len()]
    }

    /// Focus a field, syncing the input cursors
    pub fn focus(&mut self, field: FilterField) {
        self.focused = field;
        self.supplier.focused = field == FilterField::Supplier;
        self.from.focused = field == FilterField::From;
        self.to.focused = field == FilterField::To;
    }

    /// Drop input focus when the table takes over
    pub fn blur(&mut self) {
        self.supplier.focused = false;
        self.from.focused = false;
        self.to.focused = false;
    }

    fn is_choice(&self) -> bool {
        matches!(self.focused, FilterField::Status | FilterField::Limit)
    }

    fn input_mut(&mut self) -> Option<&mut TextInput> {
        match self.focused {
            FilterField::Supplier => Some(&mut self.supplier),
            FilterField::From => Some(&mut self.from),
            FilterField::To => Some(&mut self.to),
            _ => None,
        }
    }

    /// Step the focused choice field forwards or backwards
    pub fn cycle(&mut self, forward: bool) {
        match self.focused {
            FilterField::Status => {
                self.status = if forward {
                    self.status.cycle()
                } else {
                    self.status.cycle().cycle()
                };
            }
            FilterField::Limit => {
                let len = LIMITS.len();
                self.limit_index = if forward {
                    (self.limit_index + 1) % len
                } else {
                    (self.limit_index + len - 1) % len
                };
            }
            _ => {}
        }
    }

    /// Build the filter, rejecting malformed or reversed dates
    pub fn to_filter(&self) -> FicResult<ExpenseFilter> {
        let from = parse_optional_date(self.from.trimmed())?;
        let to = parse_optional_date(self.to.trimmed())?;
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(FicError::Validation(format!(
                    "From {} is after To {}",
                    from, to
                )));
            }
        }

        Ok(ExpenseFilter::default()
            .with_supplier(self.supplier.value().trim())
            .with_range(from, to)
            .with_status(self.status)
            .with_limit(self.limit()))
    }
}

fn limit_label(limit: Option<usize>) -> String {
    limit.map_or_else(|| "All".to_string(), |n| n.to_string())
}

/// Render the filter bar
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let is_focused = app.focused_panel == FocusedPanel::FilterBar && !app.has_dialog();
    let border_color = if is_focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .title(" Filters ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(19), // Status
            Constraint::Min(22),    // Supplier
            Constraint::Length(19), // From
            Constraint::Length(17), // To
            Constraint::Length(14), // Limit
            Constraint::Length(9),  // Apply
        ])
        .split(inner);

    let state = &app.filter_bar;
    let highlight = |field: FilterField| {
        if is_focused && state.focused == field {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Yellow)
        }
    };

    let status = Line::from(vec![
        Span::styled("Status: ", Style::default().fg(Color::Cyan)),
        Span::styled(format!("◀ {} ▶", state.status), highlight(FilterField::Status)),
    ]);
    frame.render_widget(Paragraph::new(status), chunks[0]);

    frame.render_widget(&state.supplier, chunks[1]);
    frame.render_widget(&state.from, chunks[2]);
    frame.render_widget(&state.to, chunks[3]);

    let limit = Line::from(vec![
        Span::styled("Limit: ", Style::default().fg(Color::Cyan)),
        Span::styled(
            format!("◀ {} ▶", limit_label(state.limit())),
            highlight(FilterField::Limit),
        ),
    ]);
    frame.render_widget(Paragraph::new(limit), chunks[4]);

    frame.render_widget(
        Paragraph::new(Span::styled("[Apply]", highlight(FilterField::Apply))),
        chunks[5],
    );
}

/// Handle key events while the filter bar is focused
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => app.focus_table(),
        KeyCode::Tab => {
            let next = app.filter_bar.focused.next();
            app.filter_bar.focus(next);
        }
        KeyCode::BackTab => {
            let prev = app.filter_bar.focused.prev();
            app.filter_bar.focus(prev);
        }
        KeyCode::Enter => apply(app),
        KeyCode::Left if app.filter_bar.is_choice() => app.filter_bar.cycle(false),
        KeyCode::Right | KeyCode::Char(' ') if app.filter_bar.is_choice() => {
            app.filter_bar.cycle(true)
        }
        _ => {
            return app
                .filter_bar
                .input_mut()
                .is_some_and(|input| input.handle_key(key));
        }
    }
    true
}

/// Apply the edited filters and reload the list
fn apply(app: &mut App) {
    match app.filter_bar.to_filter() {
        Ok(filter) => {
            tracing::debug!(?filter, "applying filter");
            app.applied_filter = filter;
            app.focus_table();
            app.selected_index = 0;
            app.reload();
        }
        Err(error) => app.notify(Notification::error(error_text(&error))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn app() -> App {
        let mut app = App::new(Some(1), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        app.focus_filter_bar();
        app.filter_bar.focus(FilterField::Supplier);
        app
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_key(app, KeyEvent::from(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_to_filter() {
        let mut state = FilterBarState::new();
        assert_eq!(state.to_filter().unwrap(), ExpenseFilter::default());

        state.supplier.set_content("  Acme ");
        state.from.set_content("2024-01-01");
        state.status = StatusFilter::Unpaid;
        state.limit_index = 3;
        let filter = state.to_filter().unwrap();
        assert_eq!(filter.supplier.as_deref(), Some("Acme"));
        assert_eq!(filter.from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(filter.to, None);
        assert_eq!(filter.status, StatusFilter::Unpaid);
        assert_eq!(filter.limit, None);
    }

    #[test]
    fn test_to_filter_rejects_bad_dates() {
        let mut state = FilterBarState::new();
        state.from.set_content("2024-13-01");
        assert!(state.to_filter().unwrap_err().is_validation());

        state.from.set_content("2024-03-01");
        state.to.set_content("2024-02-01");
        assert!(state.to_filter().is_err());
    }

    #[test]
    fn test_cycle_choices() {
        let mut state = FilterBarState::new();
        state.focus(FilterField::Status);
        state.cycle(true);
        assert_eq!(state.status, StatusFilter::Unpaid);
        state.cycle(false);
        assert_eq!(state.status, StatusFilter::All);

        state.focus(FilterField::Limit);
        state.cycle(false);
        assert_eq!(state.limit(), None);
        state.cycle(true);
        assert_eq!(state.limit(), Some(DEFAULT_LIMIT));
    }

    #[test]
    fn test_field_order_wraps() {
        assert_eq!(FilterField::Apply.next(), FilterField::Status);
        assert_eq!(FilterField::Status.prev(), FilterField::Apply);
    }

    #[test]
    fn test_enter_applies_and_reloads() {
        let mut app = app();
        type_text(&mut app, "Acme");
        assert_eq!(app.applied_filter.supplier, None);

        handle_key(&mut app, KeyEvent::from(KeyCode::Enter));
        assert_eq!(app.applied_filter.supplier.as_deref(), Some("Acme"));
        assert_eq!(app.focused_panel, FocusedPanel::Table);
        assert!(app.take_pending().is_some());
    }

    #[test]
    fn test_invalid_filter_keeps_focus() {
        let mut app = app();
        app.filter_bar.focus(FilterField::From);
        type_text(&mut app, "yesterday");
        handle_key(&mut app, KeyEvent::from(KeyCode::Enter));

        assert_eq!(app.focused_panel, FocusedPanel::FilterBar);
        assert!(app.take_pending().is_none());
        assert!(!app.notifications.is_empty());
    }

    #[test]
    fn test_esc_returns_to_table() {
        let mut app = app();
        handle_key(&mut app, KeyEvent::from(KeyCode::Esc));
        assert_eq!(app.focused_panel, FocusedPanel::Table);
        assert!(!app.filter_bar.supplier.focused);
    }
}

//! Expense table
//!
//! One row per loaded expense, with a checkbox column for batch payment.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::display::{format_date, truncate};
use crate::models::ExpenseSummary;
use crate::tui::app::{App, FocusedPanel};

/// Render the expense table
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let is_focused = app.focused_panel == FocusedPanel::Table;
    let border_color = if is_focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let title = format!(" Expenses ({}) ", app.expenses.len());
    let block = Block::default()
        .title(title)
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    if app.expenses.is_empty() {
        let text = Paragraph::new("No expenses. Press 'n' to create one or 'r' to reload.")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(text, area);
        return;
    }

    let widths = [
        Constraint::Length(2),  // Checkbox
        Constraint::Length(8),  // ID
        Constraint::Length(10), // Date
        Constraint::Min(16),    // Supplier
        Constraint::Length(12), // Net
        Constraint::Length(11), // VAT
        Constraint::Length(12), // Gross
        Constraint::Length(8),  // Status
        Constraint::Length(10), // Due
    ];

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let header = Row::new(vec![
        Cell::from(""),
        Cell::from("ID").style(bold),
        Cell::from("Date").style(bold),
        Cell::from("Supplier").style(bold),
        Cell::from("Net").style(bold),
        Cell::from("VAT").style(bold),
        Cell::from("Gross").style(bold),
        Cell::from("Status").style(bold),
        Cell::from("Due").style(bold),
    ])
    .style(Style::default().fg(Color::Yellow))
    .height(1);

    let rows: Vec<Row> = app
        .expenses
        .iter()
        .map(|expense| expense_row(app, expense))
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(table, area, &mut state);
}

fn expense_row(app: &App, expense: &ExpenseSummary) -> Row<'static> {
    let checkbox = if app.checked.contains(&expense.id) {
        Cell::from("☑").style(Style::default().fg(Color::Cyan))
    } else {
        Cell::from("☐").style(Style::default().fg(Color::DarkGray))
    };

    let status = if expense.is_paid() {
        Cell::from("Paid ✓").style(Style::default().fg(Color::Green))
    } else {
        Cell::from("Unpaid").style(Style::default().fg(Color::Yellow))
    };

    let due_style = if expense.is_overdue(app.today) {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    Row::new(vec![
        checkbox,
        Cell::from(format!("#{}", expense.id)),
        Cell::from(expense.date.format("%Y-%m-%d").to_string()),
        Cell::from(truncate(&expense.supplier, 30)),
        Cell::from(format!("{:>12}", expense.amount_net.to_string())),
        Cell::from(format!("{:>11}", expense.amount_vat.to_string())),
        Cell::from(format!("{:>12}", expense.amount_gross.to_string()))
            .style(Style::default().add_modifier(Modifier::BOLD)),
        status,
        Cell::from(format_date(expense.next_due_date)).style(due_style),
    ])
}

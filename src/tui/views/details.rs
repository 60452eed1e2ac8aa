//! Expense details screen
//!
//! Header with the document fields, then the payment schedule.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::display::format_date;
use crate::models::{Expense, Installment, PaymentStatus};
use crate::tui::app::App;

/// Render the details of the loaded expense
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(expense) = &app.details else {
        let text = Paragraph::new("No expense loaded. Press Esc to go back.")
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(text, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9), // Header
            Constraint::Min(4),    // Installments
            Constraint::Length(1), // Hints
        ])
        .split(area);

    render_header(frame, expense, chunks[0]);
    render_installments(frame, expense, app, chunks[1]);
    render_hints(frame, chunks[2]);
}

fn field<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<13}", label), Style::default().fg(Color::Cyan)),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

fn render_header(frame: &mut Frame, expense: &Expense, area: Rect) {
    let block = Block::default()
        .title(format!(" Expense #{} ", expense.id))
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let status = expense.status();
    let status_color = match status {
        PaymentStatus::Paid => Color::Green,
        PaymentStatus::Partial { .. } => Color::Yellow,
        PaymentStatus::Unpaid => Color::Red,
        PaymentStatus::NoPayments => Color::DarkGray,
    };

    let lines = vec![
        field("Supplier", expense.supplier.clone()),
        field("Date", expense.date.format("%Y-%m-%d").to_string()),
        field(
            "Description",
            expense.description.clone().unwrap_or_else(|| "-".to_string()),
        ),
        field(
            "Category",
            expense.category.clone().unwrap_or_else(|| "-".to_string()),
        ),
        Line::from(vec![
            Span::styled(format!("{:<13}", "Amounts"), Style::default().fg(Color::Cyan)),
            Span::raw(format!(
                "net {} • VAT {} • ",
                expense.amount_net, expense.amount_vat
            )),
            Span::styled(
                format!("gross {}", expense.amount_gross),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled(format!("{:<13}", "Status"), Style::default().fg(Color::Cyan)),
            Span::styled(status.to_string(), Style::default().fg(status_color)),
        ]),
        field("Outstanding", expense.outstanding().to_string()),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_installments(frame: &mut Frame, expense: &Expense, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Payment Schedule ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    if expense.installments.is_empty() {
        let text = Paragraph::new("This expense has no payment schedule.")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(text, area);
        return;
    }

    let widths = [
        Constraint::Length(4),  // Sequence
        Constraint::Length(12), // Due
        Constraint::Length(13), // Amount
        Constraint::Length(8),  // Status
        Constraint::Length(12), // Paid on
        Constraint::Min(8),     // Account
    ];

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let header = Row::new(vec![
        Cell::from("#").style(bold),
        Cell::from("Due").style(bold),
        Cell::from("Amount").style(bold),
        Cell::from("Status").style(bold),
        Cell::from("Paid on").style(bold),
        Cell::from("Account").style(bold),
    ])
    .style(Style::default().fg(Color::Yellow))
    .height(1);

    let rows: Vec<Row> = expense
        .installments
        .iter()
        .map(|installment| installment_row(installment, app))
        .collect();

    frame.render_widget(Table::new(rows, widths).header(header).block(block), area);
}

fn installment_row(installment: &Installment, app: &App) -> Row<'static> {
    let (status, status_style) = if installment.paid {
        ("Paid ✓", Style::default().fg(Color::Green))
    } else if installment.due_date < app.today {
        (
            "Overdue",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else {
        ("Unpaid", Style::default().fg(Color::Yellow))
    };

    let account = installment
        .payment_account
        .map_or_else(|| "-".to_string(), |id| format!("ID {}", id));

    Row::new(vec![
        Cell::from(installment.sequence.to_string()),
        Cell::from(installment.due_date.format("%Y-%m-%d").to_string()),
        Cell::from(format!("{:>13}", installment.amount.to_string())),
        Cell::from(status).style(status_style),
        Cell::from(format_date(installment.paid_date)),
        Cell::from(account),
    ])
}

fn render_hints(frame: &mut Frame, area: Rect) {
    let hints = Line::from(vec![
        Span::styled(" [p]", Style::default().fg(Color::Green)),
        Span::raw(" Pay all unpaid  "),
        Span::styled("[1-9]", Style::default().fg(Color::Green)),
        Span::raw(" Pay installment  "),
        Span::styled("[r]", Style::default().fg(Color::White)),
        Span::raw(" Refresh  "),
        Span::styled("[Esc]", Style::default().fg(Color::Red)),
        Span::raw(" Back"),
    ]);
    frame.render_widget(Paragraph::new(hints), area);
}

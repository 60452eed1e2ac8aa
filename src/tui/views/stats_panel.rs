//! Statistics panel beside the expense table
//!
//! Figures cover the loaded rows only, not the whole company.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::display::{format_date, truncate};
use crate::models::Money;
use crate::tui::app::App;

const TOP_SUPPLIERS: usize = 5;

/// Render the stats panel
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title(" Statistics ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let stats = &app.stats;
    let mut lines = vec![
        heading("Totals"),
        amount_line("Expenses", stats.count, stats.total, Color::White),
        amount_line("Paid", stats.paid_count, stats.paid_total, Color::Green),
        amount_line("Unpaid", stats.unpaid_count, stats.unpaid_total, Color::Yellow),
        amount_line("Overdue", stats.overdue_count, stats.overdue_total, Color::Red),
        Line::from(""),
        heading("Periods"),
        money_line("This month", stats.this_month),
        money_line("Last month", stats.last_month),
        money_line("Year to date", stats.year_to_date),
        money_line("Monthly avg", stats.monthly_average),
        Line::from(""),
        Line::from(vec![
            Span::styled("Range ", Style::default().fg(Color::Cyan)),
            Span::raw(format!(
                "{} → {}",
                format_date(stats.first_date),
                format_date(stats.last_date)
            )),
        ]),
        Line::from(""),
        heading("Top suppliers"),
    ];

    if stats.top_suppliers.is_empty() {
        lines.push(Line::from(Span::styled(
            "  none",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (supplier, total) in stats.top_suppliers.iter().take(TOP_SUPPLIERS) {
        lines.push(Line::from(vec![
            Span::raw(format!("{:<16}", truncate(supplier, 16))),
            Span::styled(
                format!("{:>12}", total.to_string()),
                Style::default().fg(Color::White),
            ),
        ]));
    }
    lines.push(Line::from(Span::styled(
        format!("{} supplier(s)", stats.supplier_count),
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
}

fn amount_line(label: &str, count: usize, total: Money, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<8}", label), Style::default().fg(color)),
        Span::raw(format!("{:>4} ", count)),
        Span::styled(
            format!("{:>15}", total.to_string()),
            Style::default().fg(color),
        ),
    ])
}

fn money_line(label: &str, amount: Money) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<13}", label), Style::default().fg(Color::Cyan)),
        Span::raw(format!("{:>15}", amount.to_string())),
    ])
}

//! Help dialog
//!
//! Shows contextual keyboard shortcuts

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::app::{ActiveView, App};
use crate::tui::layout::centered_rect;

/// Render the help dialog
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = centered_rect(60, 80, frame.area());

    // Clear the background
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_lines(app.active_view))
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

/// Help lines for the current screen
fn help_lines(view: ActiveView) -> Vec<Line<'static>> {
    let mut lines = vec![
        heading("Global Keys"),
        Line::from(""),
        key_line("q", "Quit application"),
        key_line("Ctrl+C", "Quit from anywhere"),
        key_line("?", "Show/hide help"),
        key_line("s", "Settings (credentials, payment account)"),
        key_line("r", "Reload"),
        Line::from(""),
    ];

    match view {
        ActiveView::List => {
            lines.push(heading("Expense List"));
            lines.push(Line::from(""));
            lines.push(key_line("j/k ↑/↓", "Move selection"));
            lines.push(key_line("g/G", "First/last expense"));
            lines.push(key_line("Enter", "Open expense details"));
            lines.push(key_line("Space", "Check/uncheck for payment"));
            lines.push(key_line("Ctrl+A", "Check all unpaid"));
            lines.push(key_line("Esc", "Clear checked expenses"));
            lines.push(key_line("p", "Pay checked (or selected) expenses"));
            lines.push(key_line("n", "New expense"));
            lines.push(key_line("/ Tab", "Edit filters"));
            lines.push(Line::from(""));
            lines.push(heading("Filter Bar"));
            lines.push(Line::from(""));
            lines.push(key_line("Tab", "Next field"));
            lines.push(key_line("←/→", "Change status or limit"));
            lines.push(key_line("Enter", "Apply filters"));
            lines.push(key_line("Esc", "Back to the table"));
        }
        ActiveView::Details => {
            lines.push(heading("Expense Details"));
            lines.push(Line::from(""));
            lines.push(key_line("p", "Pay all unpaid installments"));
            lines.push(key_line("1-9", "Pay one installment"));
            lines.push(key_line("Esc", "Back to the list"));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(Color::DarkGray),
    )));

    lines
}

fn heading(text: &'static str) -> Line<'static> {
    Line::from(vec![Span::styled(
        text,
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::Yellow),
    )])
}

/// Format a key-description line
fn key_line(key: &str, description: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:>12}", key), Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled(description.to_string(), Style::default().fg(Color::White)),
    ])
}

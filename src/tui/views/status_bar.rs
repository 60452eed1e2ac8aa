//! Status bar and selection bar
//!
//! The status bar shows the loaded row count, API quota, the current
//! status message and key hints. The selection bar summarizes the rows
//! checked for payment.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::display::format_quota;
use crate::tui::app::{ActiveView, App};

/// Render the status bar
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let mut spans = vec![];

    let limit = match app.applied_filter.limit {
        Some(limit) => format!("limit {}", limit),
        None => "all".to_string(),
    };
    spans.push(Span::styled(
        format!(" {} expense(s) ({})", app.expenses.len(), limit),
        Style::default().fg(Color::White),
    ));

    spans.push(Span::raw(" │ "));
    let quota_color = match app.quota {
        Some(q) if q.hourly_fraction() >= 0.9 => Color::Red,
        Some(q) if q.hourly_fraction() >= 0.7 => Color::Yellow,
        Some(_) => Color::Green,
        None => Color::DarkGray,
    };
    spans.push(Span::styled(
        format_quota(app.quota.as_ref()),
        Style::default().fg(quota_color),
    ));

    if app.default_account.is_none() {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            "no payment account",
            Style::default().fg(Color::Red),
        ));
    }

    // Status message if any
    if let Some(ref message) = app.status_message {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Yellow),
        ));
    }

    // Key hints (right-aligned)
    let hints = match app.active_view {
        ActiveView::List => " n:New  p:Pay  s:Settings  ?:Help  q:Quit ",
        ActiveView::Details => " p:Pay  Esc:Back  ?:Help  q:Quit ",
    };

    let left_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let padding_len = (area.width as usize).saturating_sub(left_len + hints.chars().count());
    spans.push(Span::raw(" ".repeat(padding_len.max(1))));
    spans.push(Span::styled(hints, Style::default().fg(Color::White)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the selection bar; blank when nothing is checked
pub fn render_selection(frame: &mut Frame, app: &mut App, area: Rect) {
    if app.checked.is_empty() || app.active_view != ActiveView::List {
        return;
    }

    let line = Line::from(vec![
        Span::styled(
            format!(" {} selected ({})", app.checked.len(), app.checked_total()),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
        Span::styled("P", Style::default().fg(Color::Green)),
        Span::raw(": Pay All │ "),
        Span::styled("Esc", Style::default().fg(Color::Red)),
        Span::raw(": Clear │ "),
        Span::styled("Ctrl+A", Style::default().fg(Color::Cyan)),
        Span::raw(": Select All"),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

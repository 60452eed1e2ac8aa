//! Layout definitions for the TUI
//!
//! The main screen stacks the filter bar, the expense table with the stats
//! panel beside it, the selection bar and the status bar.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width of the stats panel next to the table
const STATS_WIDTH: u16 = 34;

/// Layout regions for the main screen
pub struct AppLayout {
    pub filter_bar: Rect,
    /// Expense table, or the details screen
    pub main: Rect,
    /// Statistics next to the table; empty on narrow terminals
    pub stats: Rect,
    pub selection_bar: Rect,
    pub status_bar: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Filter bar
                Constraint::Min(5),    // Table + stats
                Constraint::Length(1), // Selection bar
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        let stats_width = if vertical[1].width >= STATS_WIDTH * 3 {
            STATS_WIDTH
        } else {
            0
        };
        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(40), Constraint::Length(stats_width)])
            .split(vertical[1]);

        Self {
            filter_bar: vertical[0],
            main: horizontal[0],
            stats: horizontal[1],
            selection_bar: vertical[2],
            status_bar: vertical[3],
        }
    }
}

/// Create a centered rect for dialogs
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Create a fixed-size centered rect for dialogs
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

/// Area inside a bordered dialog, leaving a one-column margin
pub fn dialog_inner(area: Rect) -> Rect {
    Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_panel_hidden_when_narrow() {
        let wide = AppLayout::new(Rect::new(0, 0, 140, 40));
        assert_eq!(wide.stats.width, STATS_WIDTH);
        assert_eq!(wide.filter_bar.height, 3);
        assert_eq!(wide.status_bar.height, 1);

        let narrow = AppLayout::new(Rect::new(0, 0, 80, 24));
        assert_eq!(narrow.stats.width, 0);
        assert_eq!(narrow.main.width, 80);
    }

    #[test]
    fn test_centered_rect_fixed_clamps() {
        let area = centered_rect_fixed(100, 50, Rect::new(0, 0, 60, 20));
        assert_eq!(area, Rect::new(0, 0, 60, 20));
    }
}

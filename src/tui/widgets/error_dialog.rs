//! Error dialog widget
//!
//! Shows a failed operation with a short explanation and what to try next.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::error::FicError;

/// An error with details and suggestions
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    pub title: String,
    pub details: String,
    pub suggestions: Vec<String>,
}

impl ErrorInfo {
    /// Describe a `FicError` for the user
    pub fn from_error(error: &FicError) -> Self {
        let (title, details, suggestions): (&str, String, Vec<&str>) = match error {
            FicError::Config(msg) => (
                "Configuration Required",
                msg.clone(),
                vec![
                    "Press 's' to open Settings",
                    "Or run 'fic-expenses configs' from a shell",
                ],
            ),
            FicError::Auth(msg) => (
                "Authentication Failed",
                msg.clone(),
                vec![
                    "Check the access token in Settings",
                    "Make sure the token can access this company",
                ],
            ),
            FicError::RateLimited(msg) => (
                "Rate Limit Reached",
                msg.clone(),
                vec!["Wait a few minutes before retrying"],
            ),
            FicError::NotFound {
                entity_type,
                identifier,
            } => (
                "Not Found",
                format!("{} '{}' does not exist", entity_type, identifier),
                vec!["Press 'r' to refresh the list"],
            ),
            FicError::Api { .. } => (
                "API Error",
                error.to_string(),
                vec![
                    "Check your network connection",
                    "Press 'r' to retry",
                ],
            ),
            FicError::Validation(msg) => (
                "Invalid Input",
                msg.clone(),
                vec!["Review the values and try again"],
            ),
            other => ("Error", other.to_string(), vec![]),
        };

        Self {
            title: title.to_string(),
            details,
            suggestions: suggestions.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn simple(title: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            details: details.into(),
            suggestions: vec![],
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Whether opening Settings is the likely fix
    pub fn needs_settings(&self) -> bool {
        self.title == "Configuration Required" || self.title == "Authentication Failed"
    }
}

/// Widget for rendering an error dialog
pub struct ErrorDialog<'a> {
    error: &'a ErrorInfo,
}

impl<'a> ErrorDialog<'a> {
    pub fn new(error: &'a ErrorInfo) -> Self {
        Self { error }
    }
}

impl<'a> Widget for ErrorDialog<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(format!(" {} ", self.error.title))
            .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));

        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(inner);

        Paragraph::new(self.error.details.as_str())
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: true })
            .render(chunks[0], buf);

        if !self.error.suggestions.is_empty() {
            let mut lines = vec![Line::from(Span::styled(
                "Suggestions:",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ))];
            lines.extend(
                self.error
                    .suggestions
                    .iter()
                    .map(|s| Line::from(vec![Span::raw("  - "), Span::raw(s.as_str())])),
            );
            Paragraph::new(lines)
                .style(Style::default().fg(Color::Gray))
                .wrap(Wrap { trim: true })
                .render(chunks[1], buf);
        }

        let hint = if self.error.needs_settings() {
            "s: Settings  Esc/Enter: Close"
        } else {
            "Esc/Enter: Close"
        };
        Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);
    }
}

/// Area for an error dialog, centered in `parent`
pub fn error_dialog_area(parent: Rect) -> Rect {
    let width = (parent.width * 70 / 100).clamp(40, 80).min(parent.width);
    let height = (parent.height * 50 / 100).clamp(10, 16).min(parent.height);

    let x = parent.x + (parent.width - width) / 2;
    let y = parent.y + (parent.height - height) / 2;

    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials_point_to_settings() {
        let error = FicError::Config("Access token not set".to_string());
        let info = ErrorInfo::from_error(&error);

        assert_eq!(info.title, "Configuration Required");
        assert!(info.details.contains("Access token"));
        assert!(info.needs_settings());
    }

    #[test]
    fn test_not_found() {
        let info = ErrorInfo::from_error(&FicError::expense_not_found("42"));
        assert_eq!(info.title, "Not Found");
        assert!(info.details.contains("42"));
        assert!(!info.needs_settings());
    }

    #[test]
    fn test_api_error_keeps_status() {
        let info = ErrorInfo::from_error(&FicError::api(500, "boom"));
        assert!(info.details.contains("500"));
        assert_eq!(info.suggestions.len(), 2);
    }

    #[test]
    fn test_simple_error_info() {
        let info = ErrorInfo::simple("Load Failed", "timeout").with_suggestion("Try again");
        assert_eq!(info.details, "timeout");
        assert_eq!(info.suggestions.len(), 1);
    }
}

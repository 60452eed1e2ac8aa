//! Toast notifications
//!
//! Short-lived messages shown in the top-right corner: load results,
//! payment and creation outcomes, validation problems. Errors stay on
//! screen longer than the rest.

use std::time::{Duration, Instant};

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

/// Oldest notifications are dropped beyond this
const MAX_QUEUED: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationType {
    pub fn color(&self) -> Color {
        match self {
            Self::Info => Color::Blue,
            Self::Success => Color::Green,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Info => "i",
            Self::Success => "✓",
            Self::Warning => "!",
            Self::Error => "✗",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Success => "Success",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }

    fn lifetime(&self) -> Duration {
        match self {
            Self::Error => Duration::from_secs(6),
            Self::Warning => Duration::from_secs(5),
            Self::Info | Self::Success => Duration::from_secs(3),
        }
    }
}

/// A toast notification
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub notification_type: NotificationType,
    pub created_at: Instant,
    pub lifetime: Duration,
}

impl Notification {
    pub fn new(message: impl Into<String>, notification_type: NotificationType) -> Self {
        Self {
            message: message.into(),
            notification_type,
            created_at: Instant::now(),
            lifetime: notification_type.lifetime(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Success)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Error)
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.lifetime
    }
}

/// Widget for rendering a notification
pub struct NotificationWidget<'a> {
    notification: &'a Notification,
}

impl<'a> NotificationWidget<'a> {
    pub fn new(notification: &'a Notification) -> Self {
        Self { notification }
    }
}

impl<'a> Widget for NotificationWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let kind = self.notification.notification_type;
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(kind.color()))
            .title(format!(" {} {} ", kind.icon(), kind.title()))
            .title_style(
                Style::default()
                    .fg(kind.color())
                    .add_modifier(Modifier::BOLD),
            );

        Paragraph::new(self.notification.message.as_str())
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}

/// Area for a toast in the top-right corner of `parent`
pub fn notification_area(parent: Rect, message: &str) -> Rect {
    let width = (message.chars().count() as u16 + 4).clamp(24, 60).min(parent.width);
    let inner_width = width.saturating_sub(2).max(1);
    let lines = (message.chars().count() as u16).div_ceil(inner_width).max(1);
    let height = (lines + 2).min(parent.height);
    Rect::new(
        parent.x + parent.width.saturating_sub(width + 1),
        parent.y + 1,
        width,
        height,
    )
}

/// Notifications waiting to be shown, oldest first
#[derive(Debug, Default)]
pub struct NotificationQueue {
    notifications: Vec<Notification>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: Notification) {
        if self.notifications.len() == MAX_QUEUED {
            self.notifications.remove(0);
        }
        self.notifications.push(notification);
    }

    pub fn remove_expired(&mut self) {
        self.notifications.retain(|n| !n.is_expired());
    }

    /// Most recent notification
    pub fn current(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    /// Drop the notification on screen
    pub fn dismiss(&mut self) {
        self.notifications.pop();
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_outlive_info() {
        let info = Notification::info("Loaded 3 expenses");
        let error = Notification::error("Payment failed");
        assert!(error.lifetime > info.lifetime);
        assert!(!info.is_expired());
    }

    #[test]
    fn test_queue_shows_latest_and_caps() {
        let mut queue = NotificationQueue::new();
        assert!(queue.is_empty());
        for i in 0..7 {
            queue.push(Notification::info(format!("n{}", i)));
        }
        assert_eq!(queue.len(), MAX_QUEUED);
        assert_eq!(queue.current().unwrap().message, "n6");

        queue.dismiss();
        assert_eq!(queue.current().unwrap().message, "n5");
    }

    #[test]
    fn test_expired_notifications_are_removed() {
        let mut queue = NotificationQueue::new();
        let mut old = Notification::success("done");
        old.lifetime = Duration::ZERO;
        queue.push(old);
        queue.push(Notification::error("still here"));
        queue.remove_expired();
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_notification_area_fits_parent() {
        let parent = Rect::new(0, 0, 80, 24);
        let area = notification_area(parent, "Loaded 50 expenses (limit 50)");
        assert!(area.x + area.width <= parent.width);
        assert_eq!(area.height, 3);
    }
}

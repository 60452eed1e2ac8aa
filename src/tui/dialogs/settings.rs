//! Settings dialog
//!
//! Edits the access token and company id, checks them by listing the
//! company's payment accounts and picks the default account. Nothing is
//! written until the user saves.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use zeroize::Zeroizing;

use crate::config::{default_account, mask_token, ConfigKey, ConfigStore, Credentials};
use crate::error::{FicError, FicResult};
use crate::models::{PaymentAccount, PaymentAccountId};
use crate::services::ExpenseService;
use crate::session::{connect, Session};
use crate::tui::app::{ActiveDialog, App, PendingAction};
use crate::tui::layout::{centered_rect, dialog_inner};
use crate::tui::widgets::{Notification, TextInput};

use super::create::error_text;

/// Which field is focused in the settings dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsField {
    #[default]
    Token,
    CompanyId,
    Account,
}

impl SettingsField {
    pub fn next(self) -> Self {
        match self {
            Self::Token => Self::CompanyId,
            Self::CompanyId => Self::Account,
            Self::Account => Self::Token,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Token => Self::Account,
            Self::CompanyId => Self::Token,
            Self::Account => Self::CompanyId,
        }
    }
}

/// State for the settings dialog
#[derive(Debug, Clone, Default)]
pub struct SettingsState {
    pub focused_field: SettingsField,
    /// New token; empty keeps the stored one
    pub token: TextInput,
    /// Masked stored token, if any
    pub current_token: Option<String>,
    pub company_id: TextInput,
    /// Accounts found by the last successful validation
    pub accounts: Vec<PaymentAccount>,
    pub account_index: usize,
    pub current_account: Option<PaymentAccountId>,
    pub error_message: Option<String>,
    pub info_message: Option<String>,
}

impl SettingsState {
    pub fn from_store(store: &dyn ConfigStore) -> Self {
        let current_token = store.get(ConfigKey::AccessToken);
        let placeholder = if current_token.is_some() {
            "(unchanged)"
        } else {
            "paste your access token"
        };
        let mut state = Self {
            token: TextInput::new()
                .label("Access token")
                .placeholder(placeholder)
                .masked(true),
            current_token: current_token.as_deref().map(mask_token),
            company_id: TextInput::new()
                .label("Company ID")
                .content(store.get(ConfigKey::CompanyId).unwrap_or_default()),
            current_account: default_account(store).ok().flatten(),
            ..Self::default()
        };
        state.sync_focus();
        state
    }

    fn sync_focus(&mut self) {
        self.token.focused = self.focused_field == SettingsField::Token;
        self.company_id.focused = self.focused_field == SettingsField::CompanyId;
    }

    pub fn next_field(&mut self) {
        self.focused_field = self.focused_field.next();
        self.sync_focus();
    }

    pub fn prev_field(&mut self) {
        self.focused_field = self.focused_field.prev();
        self.sync_focus();
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
        self.info_message = None;
    }

    pub fn set_info(&mut self, message: impl Into<String>) {
        self.info_message = Some(message.into());
        self.error_message = None;
    }

    /// Credentials from the form, falling back to the stored token
    pub fn credentials(&self, store: &dyn ConfigStore) -> FicResult<Credentials> {
        let access_token = match self.token.trimmed() {
            Some(token) => token.to_string(),
            None => store
                .get(ConfigKey::AccessToken)
                .ok_or_else(|| FicError::Validation("Access token is required".to_string()))?,
        };
        let company = self
            .company_id
            .trimmed()
            .ok_or_else(|| FicError::Validation("Company ID is required".to_string()))?;
        let company_id = company.parse::<u64>().map_err(|_| {
            FicError::Validation(format!("Company ID must be a number, got '{}'", company))
        })?;
        Ok(Credentials {
            access_token: Zeroizing::new(access_token),
            company_id,
        })
    }

    /// Store the accounts found by a validation, keeping the current choice
    pub fn set_accounts(&mut self, accounts: Vec<PaymentAccount>) {
        self.account_index = self
            .current_account
            .and_then(|id| accounts.iter().position(|a| a.id == id))
            .unwrap_or(0);
        self.accounts = accounts;
    }

    pub fn selected_account(&self) -> Option<&PaymentAccount> {
        self.accounts.get(self.account_index)
    }
}

/// Load the stored settings into the dialog and show it
pub fn open(app: &mut App, session: &Session) {
    app.settings_state = SettingsState::from_store(session.store());
    app.open_dialog(ActiveDialog::Settings);
}

/// Check the entered credentials by listing payment accounts
pub fn validate(app: &mut App, session: &Session) {
    let state = &mut app.settings_state;
    let result = state
        .credentials(session.store())
        .and_then(|credentials| connect(&credentials))
        .and_then(|client| ExpenseService::new(&client).payment_accounts());

    match result {
        Ok(accounts) if accounts.is_empty() => {
            state.set_accounts(accounts);
            state.set_error("Credentials valid, but the company has no payment accounts");
        }
        Ok(accounts) => {
            let count = accounts.len();
            state.set_accounts(accounts);
            state.focused_field = SettingsField::Account;
            state.sync_focus();
            state.set_info(format!(
                "✓ Credentials valid! {} payment account(s) found",
                count
            ));
        }
        Err(FicError::Auth(_)) => state.set_error("Invalid access token or access denied"),
        Err(FicError::NotFound { .. }) => state.set_error("Company not found"),
        Err(error) => state.set_error(error_text(&error)),
    }
}

/// Write the form to the config store, then reload the list
pub fn save(app: &mut App, session: &mut Session) {
    match write_settings(&app.settings_state, session) {
        Ok(account) => {
            if account.is_some() {
                app.default_account = account;
            }
            app.close_dialog();
            app.notify(Notification::success("Configuration saved!"));
            app.reload();
        }
        Err(error) => app.settings_state.set_error(error_text(&error)),
    }
}

fn write_settings(
    state: &SettingsState,
    session: &mut Session,
) -> FicResult<Option<PaymentAccountId>> {
    let credentials = state.credentials(session.store())?;
    let account = state.selected_account().map(|a| a.id);

    let store = session.store_mut();
    if state.token.trimmed().is_some() {
        store.set(ConfigKey::AccessToken, &credentials.access_token)?;
    }
    store.set(ConfigKey::CompanyId, &credentials.company_id.to_string())?;
    if let Some(id) = account {
        store.set(ConfigKey::DefaultAccountId, &id.to_string())?;
    }
    tracing::info!(company_id = credentials.company_id, ?account, "settings saved");
    Ok(account)
}

/// Render the settings dialog
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Settings ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    let inner = dialog_inner(area);
    if inner.height < 10 {
        return;
    }
    let state = &app.settings_state;
    let row = |offset: u16| Rect::new(inner.x, inner.y + offset, inner.width, 1);
    let muted = Style::default().fg(Color::DarkGray);

    frame.render_widget(
        Paragraph::new(Span::styled(
            "Fatture in Cloud API credentials",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        row(0),
    );

    frame.render_widget(&state.token, row(2));
    if let Some(ref current) = state.current_token {
        frame.render_widget(
            Paragraph::new(Span::styled(format!("  current: {}", current), muted)),
            row(3),
        );
    }
    frame.render_widget(&state.company_id, row(4));

    let account_label_style = if state.focused_field == SettingsField::Account {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    frame.render_widget(
        Paragraph::new(Span::styled("Default payment account", account_label_style)),
        row(6),
    );

    let list_area = Rect::new(
        inner.x,
        inner.y + 7,
        inner.width,
        inner.height.saturating_sub(10),
    );
    if state.accounts.is_empty() {
        let hint = match state.current_account {
            Some(id) => format!("  ID {} (press Enter to validate and list accounts)", id),
            None => "  (press Enter to validate and list accounts)".to_string(),
        };
        frame.render_widget(Paragraph::new(Span::styled(hint, muted)), list_area);
    } else {
        let items: Vec<ListItem> = state
            .accounts
            .iter()
            .map(|account| {
                let marker = if Some(account.id) == state.current_account {
                    " (current)"
                } else {
                    ""
                };
                ListItem::new(format!("  {}{}", account, marker))
            })
            .collect();
        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        let mut list_state = ListState::default();
        list_state.select(Some(state.account_index));
        frame.render_stateful_widget(list, list_area, &mut list_state);
    }

    let message_row = row(inner.height - 2);
    if let Some(ref error) = state.error_message {
        frame.render_widget(
            Paragraph::new(Span::styled(error.as_str(), Style::default().fg(Color::Red))),
            message_row,
        );
    } else if let Some(ref info) = state.info_message {
        frame.render_widget(
            Paragraph::new(Span::styled(info.as_str(), Style::default().fg(Color::Green))),
            message_row,
        );
    }

    let hints = Line::from(vec![
        Span::styled("[Tab]", Style::default().fg(Color::White)),
        Span::raw(" Next  "),
        Span::styled("[Enter]", Style::default().fg(Color::Green)),
        Span::raw(" Validate  "),
        Span::styled("[Ctrl+S]", Style::default().fg(Color::Green)),
        Span::raw(" Save  "),
        Span::styled("[Esc]", Style::default().fg(Color::Red)),
        Span::raw(" Cancel"),
    ]);
    frame.render_widget(Paragraph::new(hints), row(inner.height - 1));
}

/// Handle key events for the settings dialog
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    let state = &mut app.settings_state;
    match key.code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.request(PendingAction::SaveSettings, "Saving settings...");
        }
        KeyCode::Tab => state.next_field(),
        KeyCode::BackTab => state.prev_field(),
        KeyCode::Up if state.focused_field == SettingsField::Account => {
            state.account_index = state.account_index.saturating_sub(1);
        }
        KeyCode::Down if state.focused_field == SettingsField::Account => {
            if state.account_index + 1 < state.accounts.len() {
                state.account_index += 1;
            }
        }
        KeyCode::Enter if state.focused_field == SettingsField::Account && !state.accounts.is_empty() => {
            app.request(PendingAction::SaveSettings, "Saving settings...");
        }
        KeyCode::Enter => {
            app.request(PendingAction::ValidateCredentials, "Checking credentials...");
        }
        _ => {
            let input = match state.focused_field {
                SettingsField::Token => &mut state.token,
                SettingsField::CompanyId => &mut state.company_id,
                SettingsField::Account => return false,
            };
            if !input.handle_key(key) {
                return false;
            }
            state.error_message = None;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfigStore;
    use chrono::NaiveDate;

    fn store() -> MemoryConfigStore {
        let mut store = MemoryConfigStore::new();
        store.set(ConfigKey::AccessToken, "a/abcdefghijklmnop").unwrap();
        store.set(ConfigKey::CompanyId, "42").unwrap();
        store.set(ConfigKey::DefaultAccountId, "7").unwrap();
        store
    }

    fn accounts() -> Vec<PaymentAccount> {
        vec![
            PaymentAccount {
                id: 3,
                name: "Cash".into(),
            },
            PaymentAccount {
                id: 7,
                name: "Bank".into(),
            },
        ]
    }

    #[test]
    fn test_from_store_masks_token() {
        let state = SettingsState::from_store(&store());
        assert_eq!(state.token.value(), "");
        assert_eq!(state.company_id.value(), "42");
        assert_eq!(state.current_account, Some(7));
        assert!(!state.current_token.as_deref().unwrap().contains("abcdefghijklmnop"));
        assert!(state.token.focused);
    }

    #[test]
    fn test_credentials_keep_stored_token() {
        let store = store();
        let mut state = SettingsState::from_store(&store);
        let credentials = state.credentials(&store).unwrap();
        assert_eq!(credentials.access_token.as_str(), "a/abcdefghijklmnop");
        assert_eq!(credentials.company_id, 42);

        state.token.set_content("new-token");
        state.company_id.set_content("x1");
        assert!(state.credentials(&store).unwrap_err().is_validation());
        state.company_id.set_content("43");
        assert_eq!(
            state.credentials(&store).unwrap().access_token.as_str(),
            "new-token"
        );
    }

    #[test]
    fn test_credentials_need_a_token() {
        let store = MemoryConfigStore::new();
        let mut state = SettingsState::from_store(&store);
        state.company_id.set_content("1");
        assert!(state.credentials(&store).is_err());
    }

    #[test]
    fn test_set_accounts_selects_current() {
        let mut state = SettingsState::from_store(&store());
        state.set_accounts(accounts());
        assert_eq!(state.selected_account().unwrap().id, 7);

        state.current_account = None;
        state.set_accounts(accounts());
        assert_eq!(state.account_index, 0);
    }

    #[test]
    fn test_keys() {
        let mut app = App::new(None, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        app.settings_state = SettingsState::from_store(&store());
        app.open_dialog(ActiveDialog::Settings);

        handle_key(&mut app, KeyEvent::from(KeyCode::Char('x')));
        assert_eq!(app.settings_state.token.value(), "x");

        handle_key(&mut app, KeyEvent::from(KeyCode::Enter));
        assert!(matches!(
            app.take_pending(),
            Some(PendingAction::ValidateCredentials)
        ));

        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL),
        );
        assert!(matches!(app.take_pending(), Some(PendingAction::SaveSettings)));

        handle_key(&mut app, KeyEvent::from(KeyCode::Esc));
        assert!(!app.has_dialog());
    }
}

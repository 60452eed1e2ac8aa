//! New expense wizard
//!
//! Five steps: basics, amounts, installments, recurrence and a review of
//! everything that will be created. Each step is validated before moving on
//! and the schedule previews use the same planner as the final request.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use chrono::NaiveDate;

use crate::cli::prompt::{parse_amount, parse_count, parse_date};
use crate::display::{format_create_summary, format_installment_preview};
use crate::error::{FicError, FicResult};
use crate::models::input::{MAX_INSTALLMENTS, MAX_OCCURRENCES};
use crate::models::{ExpenseDraft, ExpenseInput, Money, RecurrencePeriod, VatRate};
use crate::services::expense::plan_instances;
use crate::services::schedule::default_first_due;
use crate::tui::app::{App, PendingAction};
use crate::tui::layout::{centered_rect, dialog_inner};
use crate::tui::widgets::TextInput;

/// Wizard steps, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    #[default]
    Basics,
    Amount,
    Payment,
    Recurrence,
    Review,
}

impl WizardStep {
    pub const COUNT: usize = 5;

    pub fn number(self) -> usize {
        match self {
            Self::Basics => 1,
            Self::Amount => 2,
            Self::Payment => 3,
            Self::Recurrence => 4,
            Self::Review => 5,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Basics => "Basic Information",
            Self::Amount => "Amount",
            Self::Payment => "Installments",
            Self::Recurrence => "Recurrence",
            Self::Review => "Review",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Basics => Self::Amount,
            Self::Amount => Self::Payment,
            Self::Payment => Self::Recurrence,
            Self::Recurrence | Self::Review => Self::Review,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Basics | Self::Amount => Self::Basics,
            Self::Payment => Self::Amount,
            Self::Recurrence => Self::Payment,
            Self::Review => Self::Recurrence,
        }
    }

    pub fn fields(self) -> &'static [WizardField] {
        use WizardField::*;
        match self {
            Self::Basics => &[Supplier, Description, Category, ExpenseDate],
            Self::Amount => &[AmountNet, VatRate],
            Self::Payment => &[Installments, FirstDue, InstallmentPeriod],
            Self::Recurrence => &[Recurring, RecurrencePeriod, Occurrences],
            Self::Review => &[],
        }
    }
}

/// Every editable field of the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardField {
    Supplier,
    Description,
    Category,
    ExpenseDate,
    AmountNet,
    VatRate,
    Installments,
    FirstDue,
    InstallmentPeriod,
    Recurring,
    RecurrencePeriod,
    Occurrences,
}

impl WizardField {
    /// Fields changed with arrow keys rather than typed into
    fn is_choice(self) -> bool {
        matches!(
            self,
            Self::VatRate | Self::InstallmentPeriod | Self::Recurring | Self::RecurrencePeriod
        )
    }
}

/// State for the create wizard
#[derive(Debug, Clone)]
pub struct CreateWizardState {
    pub step: WizardStep,
    /// Index into the current step's fields
    pub focus: usize,
    pub supplier: TextInput,
    pub description: TextInput,
    pub category: TextInput,
    pub expense_date: TextInput,
    pub amount_net: TextInput,
    /// Index into `VatRate::PRESETS`
    pub vat_index: usize,
    pub installments: TextInput,
    pub first_due: TextInput,
    /// Index into `RecurrencePeriod::ALL`
    pub installment_period: usize,
    pub recurring: bool,
    pub recurrence_period: usize,
    pub occurrences: TextInput,
    pub error_message: Option<String>,
}

impl CreateWizardState {
    pub fn new(today: NaiveDate) -> Self {
        let mut state = Self {
            step: WizardStep::Basics,
            focus: 0,
            supplier: TextInput::new().label("Supplier*").placeholder("e.g. ACME Srl"),
            description: TextInput::new().label("Description"),
            category: TextInput::new().label("Category"),
            expense_date: TextInput::new()
                .label("Expense date")
                .content(today.format("%Y-%m-%d").to_string()),
            amount_net: TextInput::new().label("Net amount*").placeholder("e.g. 1000 or 99.90"),
            vat_index: 0,
            installments: TextInput::new().label("Installments").content("1"),
            first_due: TextInput::new()
                .label("First due date")
                .placeholder("end of next month"),
            installment_period: 0,
            recurring: false,
            // Yearly
            recurrence_period: 2,
            occurrences: TextInput::new().label("Occurrences").content("3"),
            error_message: None,
        };
        state.sync_focus();
        state
    }

    pub fn focused_field(&self) -> Option<WizardField> {
        self.step.fields().get(self.focus).copied()
    }

    fn input(&self, field: WizardField) -> Option<&TextInput> {
        match field {
            WizardField::Supplier => Some(&self.supplier),
            WizardField::Description => Some(&self.description),
            WizardField::Category => Some(&self.category),
            WizardField::ExpenseDate => Some(&self.expense_date),
            WizardField::AmountNet => Some(&self.amount_net),
            WizardField::Installments => Some(&self.installments),
            WizardField::FirstDue => Some(&self.first_due),
            WizardField::Occurrences => Some(&self.occurrences),
            _ => None,
        }
    }

    fn input_mut(&mut self, field: WizardField) -> Option<&mut TextInput> {
        match field {
            WizardField::Supplier => Some(&mut self.supplier),
            WizardField::Description => Some(&mut self.description),
            WizardField::Category => Some(&mut self.category),
            WizardField::ExpenseDate => Some(&mut self.expense_date),
            WizardField::AmountNet => Some(&mut self.amount_net),
            WizardField::Installments => Some(&mut self.installments),
            WizardField::FirstDue => Some(&mut self.first_due),
            WizardField::Occurrences => Some(&mut self.occurrences),
            _ => None,
        }
    }

    fn sync_focus(&mut self) {
        let focused = self.focused_field();
        for field in [
            WizardField::Supplier,
            WizardField::Description,
            WizardField::Category,
            WizardField::ExpenseDate,
            WizardField::AmountNet,
            WizardField::Installments,
            WizardField::FirstDue,
            WizardField::Occurrences,
        ] {
            if let Some(input) = self.input_mut(field) {
                input.focused = focused == Some(field);
            }
        }
    }

    pub fn next_field(&mut self) {
        let count = self.step.fields().len();
        if count > 0 {
            self.focus = (self.focus + 1) % count;
            self.sync_focus();
        }
    }

    pub fn prev_field(&mut self) {
        let count = self.step.fields().len();
        if count > 0 {
            self.focus = (self.focus + count - 1) % count;
            self.sync_focus();
        }
    }

    /// Change a choice field; returns false for text fields
    pub fn cycle_choice(&mut self, forward: bool) -> bool {
        let step = |index: usize, len: usize| {
            if forward {
                (index + 1) % len
            } else {
                (index + len - 1) % len
            }
        };
        match self.focused_field() {
            Some(WizardField::VatRate) => {
                self.vat_index = step(self.vat_index, VatRate::PRESETS.len());
            }
            Some(WizardField::InstallmentPeriod) => {
                self.installment_period =
                    step(self.installment_period, RecurrencePeriod::ALL.len());
            }
            Some(WizardField::RecurrencePeriod) => {
                self.recurrence_period = step(self.recurrence_period, RecurrencePeriod::ALL.len());
            }
            Some(WizardField::Recurring) => self.recurring = !self.recurring,
            _ => return false,
        }
        true
    }

    pub fn vat_rate(&self) -> VatRate {
        VatRate::PRESETS[self.vat_index % VatRate::PRESETS.len()]
    }

    fn period(index: usize) -> RecurrencePeriod {
        RecurrencePeriod::ALL[index % RecurrencePeriod::ALL.len()]
    }

    fn parsed_date(&self) -> FicResult<NaiveDate> {
        parse_date(self.expense_date.value())
    }

    /// VAT and gross for the amount typed so far
    pub fn amount_preview(&self) -> Option<(Money, Money)> {
        let net = parse_amount(self.amount_net.value()).ok()?;
        let vat = self.vat_rate().vat_on(net);
        Some((vat, net.checked_add(vat)?))
    }

    /// Default first due date for the current expense date
    pub fn default_first_due(&self) -> Option<NaiveDate> {
        self.parsed_date()
            .ok()
            .and_then(|d| default_first_due(d).ok())
    }

    /// Check the fields of one step
    pub fn validate_step(&self, step: WizardStep) -> FicResult<()> {
        match step {
            WizardStep::Basics => {
                if self.supplier.trimmed().is_none() {
                    return Err(FicError::Validation("Supplier name is required".to_string()));
                }
                self.parsed_date().map(|_| ())
            }
            WizardStep::Amount => parse_amount(self.amount_net.value()).map(|_| ()),
            WizardStep::Payment => {
                parse_count(
                    self.installments.value(),
                    "Installments",
                    1,
                    MAX_INSTALLMENTS,
                )?;
                match self.first_due.trimmed() {
                    Some(text) => parse_date(text).map(|_| ()),
                    None => Ok(()),
                }
            }
            WizardStep::Recurrence => {
                if self.recurring {
                    parse_count(self.occurrences.value(), "Occurrences", 1, MAX_OCCURRENCES)?;
                }
                Ok(())
            }
            WizardStep::Review => self.plan().map(|_| ()),
        }
    }

    /// The request described by the wizard
    pub fn build_input(&self) -> FicResult<ExpenseInput> {
        let supplier = self
            .supplier
            .trimmed()
            .ok_or_else(|| FicError::Validation("Supplier name is required".to_string()))?;
        let mut input = ExpenseInput::new(
            supplier,
            parse_amount(self.amount_net.value())?,
            self.parsed_date()?,
        );
        input.description = self.description.trimmed().map(str::to_string);
        input.category = self.category.trimmed().map(str::to_string);
        input.vat_rate = self.vat_rate();
        input.installments = parse_count(
            self.installments.value(),
            "Installments",
            1,
            MAX_INSTALLMENTS,
        )?;
        input.first_due = self.first_due.trimmed().map(parse_date).transpose()?;
        input.installment_period = Self::period(self.installment_period);
        if self.recurring {
            input.recurrence = Some(Self::period(self.recurrence_period));
            input.occurrences =
                parse_count(self.occurrences.value(), "Occurrences", 1, MAX_OCCURRENCES)?;
        }
        Ok(input)
    }

    /// Input plus every draft it expands to
    pub fn plan(&self) -> FicResult<(ExpenseInput, Vec<ExpenseDraft>)> {
        let input = self.build_input()?;
        let drafts = plan_instances(&input)?;
        Ok((input, drafts))
    }

    /// Move to the next step when the current one is valid
    pub fn advance(&mut self) -> bool {
        match self.validate_step(self.step) {
            Ok(()) => {
                self.step = self.step.next();
                self.focus = 0;
                self.error_message = None;
                self.sync_focus();
                true
            }
            Err(error) => {
                self.set_error(error_text(&error));
                false
            }
        }
    }

    pub fn back(&mut self) {
        self.step = self.step.prev();
        self.focus = 0;
        self.error_message = None;
        self.sync_focus();
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }
}

/// Message of an error without its category prefix
pub fn error_text(error: &FicError) -> String {
    match error {
        FicError::Validation(msg) | FicError::Config(msg) => msg.clone(),
        other => other.to_string(),
    }
}

/// Render the create wizard
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = centered_rect(70, 85, frame.area());
    frame.render_widget(Clear, area);

    let state = &app.create_state;
    let block = Block::default()
        .title(format!(
            " New Expense - Step {}/{}: {} ",
            state.step.number(),
            WizardStep::COUNT,
            state.step.title()
        ))
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    let inner = dialog_inner(area);
    if inner.height < 4 {
        return;
    }

    // Body rows; the last two rows hold the error and the hints
    let body = Rect {
        height: inner.height - 2,
        ..inner
    };
    let mut y = body.y + 1;
    for field in state.step.fields() {
        if y >= body.y + body.height {
            break;
        }
        let row = Rect::new(body.x, y, body.width, 1);
        match state.input(*field) {
            Some(input) => frame.render_widget(input, row),
            None => frame.render_widget(Paragraph::new(choice_line(state, *field)), row),
        }
        y += 1;
    }

    let preview = preview_lines(state);
    if !preview.is_empty() && y + 1 < body.y + body.height {
        let preview_area = Rect::new(body.x, y + 1, body.width, body.y + body.height - y - 1);
        frame.render_widget(Paragraph::new(preview), preview_area);
    }

    if let Some(ref error) = state.error_message {
        frame.render_widget(
            Paragraph::new(Span::styled(error.as_str(), Style::default().fg(Color::Red))),
            Rect::new(inner.x, inner.y + inner.height - 2, inner.width, 1),
        );
    }

    let enter = if state.step == WizardStep::Review {
        " Create  "
    } else {
        " Next  "
    };
    let hints = Line::from(vec![
        Span::styled("[Tab]", Style::default().fg(Color::White)),
        Span::raw(" Field  "),
        Span::styled("[←/→]", Style::default().fg(Color::White)),
        Span::raw(" Change  "),
        Span::styled("[Enter]", Style::default().fg(Color::Green)),
        Span::raw(enter),
        Span::styled("[Ctrl+B]", Style::default().fg(Color::Yellow)),
        Span::raw(" Back  "),
        Span::styled("[Esc]", Style::default().fg(Color::Red)),
        Span::raw(" Cancel"),
    ]);
    frame.render_widget(
        Paragraph::new(hints),
        Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1),
    );
}

fn choice_line(state: &CreateWizardState, field: WizardField) -> Line<'static> {
    let (label, value) = match field {
        WizardField::VatRate => ("VAT rate", state.vat_rate().to_string()),
        WizardField::InstallmentPeriod => (
            "Every",
            CreateWizardState::period(state.installment_period)
                .describe()
                .to_string(),
        ),
        WizardField::Recurring => (
            "Recurring",
            if state.recurring { "Yes" } else { "No" }.to_string(),
        ),
        WizardField::RecurrencePeriod => (
            "Repeats",
            CreateWizardState::period(state.recurrence_period)
                .describe()
                .to_string(),
        ),
        _ => ("", String::new()),
    };

    let focused = state.focused_field() == Some(field);
    let value_style = if focused {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default().fg(Color::Yellow)
    };
    let dimmed = field == WizardField::RecurrencePeriod && !state.recurring;
    Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().fg(Color::Cyan)),
        Span::styled(
            format!("◀ {} ▶", value),
            if dimmed && !focused {
                Style::default().fg(Color::DarkGray)
            } else {
                value_style
            },
        ),
    ])
}

fn preview_lines(state: &CreateWizardState) -> Vec<Line<'static>> {
    let muted = Style::default().fg(Color::DarkGray);
    let mut lines = Vec::new();

    match state.step {
        WizardStep::Basics => {
            lines.push(Line::from(Span::styled("* required", muted)));
        }
        WizardStep::Amount => match state.amount_preview() {
            Some((vat, gross)) => {
                lines.push(Line::from(format!("VAT:   {}", vat)));
                lines.push(Line::from(Span::styled(
                    format!("Gross: {}", gross),
                    Style::default().add_modifier(Modifier::BOLD),
                )));
            }
            None => lines.push(Line::from(Span::styled(
                "Enter a net amount to see VAT and gross",
                muted,
            ))),
        },
        WizardStep::Payment => {
            if state.first_due.trimmed().is_none() {
                if let Some(due) = state.default_first_due() {
                    lines.push(Line::from(Span::styled(
                        format!("First due date defaults to {}", due),
                        muted,
                    )));
                }
            }
            match state.plan() {
                Ok((_, drafts)) => {
                    if let Some(first) = drafts.first() {
                        lines.push(Line::from("Schedule:"));
                        lines.extend(
                            format_installment_preview(first)
                                .lines()
                                .map(|l| Line::from(l.to_string())),
                        );
                    }
                }
                Err(error) => lines.push(Line::from(Span::styled(error_text(&error), muted))),
            }
        }
        WizardStep::Recurrence => {
            if !state.recurring {
                lines.push(Line::from(Span::styled(
                    "A single expense will be created",
                    muted,
                )));
            } else {
                match state.plan() {
                    Ok((_, drafts)) => {
                        lines.push(Line::from(format!("{} expenses:", drafts.len())));
                        lines.extend(drafts.iter().enumerate().map(|(k, d)| {
                            Line::from(format!("  {}. {}  {}", k + 1, d.date, d.amount_gross()))
                        }));
                    }
                    Err(error) => {
                        lines.push(Line::from(Span::styled(error_text(&error), muted)))
                    }
                }
            }
        }
        WizardStep::Review => match state.plan() {
            Ok((input, drafts)) => lines.extend(
                format_create_summary(&input, &drafts)
                    .lines()
                    .map(|l| Line::from(l.to_string())),
            ),
            Err(error) => lines.push(Line::from(Span::styled(
                error_text(&error),
                Style::default().fg(Color::Red),
            ))),
        },
    }

    lines
}

/// Handle key events for the create wizard
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    let state = &mut app.create_state;
    match key.code {
        KeyCode::Esc => {
            app.close_dialog();
        }
        KeyCode::Char('b') if key.modifiers.contains(KeyModifiers::CONTROL) => state.back(),
        KeyCode::Enter => {
            if state.step == WizardStep::Review {
                submit(app);
            } else {
                state.advance();
            }
        }
        KeyCode::Tab | KeyCode::Down => state.next_field(),
        KeyCode::BackTab | KeyCode::Up => state.prev_field(),
        KeyCode::Left | KeyCode::Right
            if state.focused_field().is_some_and(WizardField::is_choice) =>
        {
            state.cycle_choice(key.code == KeyCode::Right);
        }
        KeyCode::Char(' ') if state.focused_field() == Some(WizardField::Recurring) => {
            state.cycle_choice(true);
        }
        _ => {
            let Some(field) = state.focused_field() else {
                return false;
            };
            let Some(input) = state.input_mut(field) else {
                return false;
            };
            if !input.handle_key(key) {
                return false;
            }
            state.error_message = None;
        }
    }
    true
}

/// Queue the creation; the wizard stays open until the result is known
fn submit(app: &mut App) {
    match app.create_state.plan() {
        Ok((input, drafts)) => {
            let status = format!("Creating {} expense(s)...", drafts.len());
            app.request(PendingAction::Create(input), status);
        }
        Err(error) => app.create_state.set_error(error_text(&error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn filled() -> CreateWizardState {
        let mut state = CreateWizardState::new(date(2024, 1, 15));
        state.supplier.set_content("ACME Srl");
        state.amount_net.set_content("1000");
        state
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_basics_require_supplier() {
        let mut state = CreateWizardState::new(date(2024, 1, 15));
        assert!(!state.advance());
        assert_eq!(state.step, WizardStep::Basics);
        assert_eq!(state.error_message.as_deref(), Some("Supplier name is required"));

        state.supplier.set_content("ACME");
        assert!(state.advance());
        assert_eq!(state.step, WizardStep::Amount);
        assert!(state.error_message.is_none());
    }

    #[test]
    fn test_amount_preview_follows_vat_choice() {
        let mut state = filled();
        let (vat, gross) = state.amount_preview().unwrap();
        assert_eq!(vat, Money::from_cents(22000));
        assert_eq!(gross, Money::from_cents(122000));

        state.step = WizardStep::Amount;
        state.focus = 1;
        assert!(state.cycle_choice(true));
        assert_eq!(state.vat_rate(), VatRate::from_percent(10));
        assert!(state.cycle_choice(false));
        assert!(state.cycle_choice(false));
        assert_eq!(state.vat_rate(), VatRate::from_percent(0));
    }

    #[test]
    fn test_installment_bounds() {
        let mut state = filled();
        state.installments.set_content("0");
        assert!(state.validate_step(WizardStep::Payment).is_err());
        state.installments.set_content("121");
        assert!(state.validate_step(WizardStep::Payment).is_err());
        state.installments.set_content("120");
        assert!(state.validate_step(WizardStep::Payment).is_ok());
        state.first_due.set_content("2024-02-31");
        assert!(state.validate_step(WizardStep::Payment).is_err());
    }

    #[test]
    fn test_build_input_with_recurrence() {
        let mut state = filled();
        state.installments.set_content("3");
        state.recurring = true;
        let (input, drafts) = state.plan().unwrap();
        assert_eq!(input.recurrence, Some(RecurrencePeriod::Yearly));
        assert_eq!(input.occurrences, 3);
        assert_eq!(input.first_due, None);
        assert_eq!(drafts.len(), 3);
        assert_eq!(drafts[0].installments.len(), 3);
        assert_eq!(drafts[2].date, date(2026, 1, 15));
    }

    #[test]
    fn test_recurrence_fields_ignored_when_off() {
        let mut state = filled();
        state.occurrences.set_content("abc");
        let input = state.build_input().unwrap();
        assert_eq!(input.recurrence, None);
        assert_eq!(input.occurrences, 1);
    }

    #[test]
    fn test_focus_wraps_within_step() {
        let mut state = filled();
        assert!(state.supplier.focused);
        state.prev_field();
        assert_eq!(state.focused_field(), Some(WizardField::ExpenseDate));
        assert!(state.expense_date.focused);
        assert!(!state.supplier.focused);
        state.next_field();
        assert_eq!(state.focused_field(), Some(WizardField::Supplier));
    }

    #[test]
    fn test_walkthrough_queues_create() {
        let mut app = App::new(Some(1), date(2024, 1, 15));
        app.open_create();
        for c in "ACME".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        for c in "250".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.create_state.step, WizardStep::Review);

        press(&mut app, KeyCode::Enter);
        match app.take_pending() {
            Some(PendingAction::Create(input)) => {
                assert_eq!(input.supplier, "ACME");
                assert_eq!(input.amount_net, Money::from_cents(25000));
            }
            other => panic!("unexpected action {:?}", other),
        }
        // Stays open until the result arrives
        assert!(app.has_dialog());
    }

    #[test]
    fn test_back_and_cancel() {
        let mut app = App::new(None, date(2024, 1, 15));
        app.open_create();
        app.create_state = filled();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.create_state.step, WizardStep::Amount);
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('b'), KeyModifiers::CONTROL),
        );
        assert_eq!(app.create_state.step, WizardStep::Basics);
        press(&mut app, KeyCode::Esc);
        assert!(!app.has_dialog());
    }
}

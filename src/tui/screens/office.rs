//! Office settings screen. Edits the clinic's own profile and logo.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::LoadState;
use crate::api::OfficePayload;
use crate::model::{LogoSelection, OfficeFields, OfficeProfile, validate_email};
use crate::tui::action::{Action, ScreenState};
use crate::tui::app::Screen;
use crate::tui::feedback::Feedback;
use crate::tui::tasks::{Outcome, Request};
use crate::tui::widgets::form::{Form, FormField, draw_form};

const NAME: usize = 0;
const TAX_ID: usize = 1;
const ADDRESS: usize = 2;
const EMAIL: usize = 3;
const PHONE: usize = 4;
const LOGO: usize = 5;

const LOAD_FAILED: &str = "Could not load the office settings.";
const SAVED: &str = "Office settings saved.";
const SAVE_FAILED: &str = "Could not save. Check the data or the server.";
const INVALID_EMAIL: &str = "Enter a valid e-mail address";

/// State for the office settings screen.
#[derive(Debug, Clone)]
pub struct OfficeState {
    load: LoadState,
    form: Form,
    /// URI of the logo the backend has on record.
    logo_uri: Option<String>,
    /// Logo chosen locally, uploaded with the next save.
    pending_logo: Option<LogoSelection>,
    saving: bool,
    feedback: Feedback,
}

impl Default for OfficeState {
    fn default() -> Self {
        Self::new()
    }
}

impl OfficeState {
    /// Creates an empty, not yet loaded screen.
    pub fn new() -> Self {
        Self {
            load: LoadState::Idle,
            form: Form::new(vec![
                FormField::new("Name", true),
                FormField::new("Tax ID", true).with_hint("e.g. J-12345678-9"),
                FormField::new("Address", false),
                FormField::new("E-mail", false),
                FormField::new("Phone", false),
                FormField::new("Logo path", false).with_hint("PNG, JPG up to 2MB"),
            ]),
            logo_uri: None,
            pending_logo: None,
            saving: false,
            feedback: Feedback::new(),
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn pending_logo(&self) -> Option<&LogoSelection> {
        self.pending_logo.as_ref()
    }

    /// Returns the logo to show: the pending selection if there is one,
    /// otherwise the persisted logo.
    pub fn logo_preview(&self) -> Option<&str> {
        self.pending_logo
            .as_ref()
            .map(LogoSelection::preview_uri)
            .or(self.logo_uri.as_deref())
    }

    /// Label of the save control.
    pub fn save_label(&self) -> &'static str {
        if self.saving { "Saving..." } else { "Save settings" }
    }

    /// Current text values, as they would be saved.
    pub fn fields(&self) -> OfficeFields {
        OfficeFields {
            name: self.form.value(NAME).to_string(),
            tax_id: self.form.value(TAX_ID).to_string(),
            address: self.form.value(ADDRESS).to_string(),
            email: self.form.value(EMAIL).to_string(),
            phone: self.form.value(PHONE).to_string(),
        }
    }

    fn fill(&mut self, profile: &OfficeProfile) {
        let fields = OfficeFields::from(profile);
        self.form.set_value(NAME, fields.name);
        self.form.set_value(TAX_ID, fields.tax_id);
        self.form.set_value(ADDRESS, fields.address);
        self.form.set_value(EMAIL, fields.email);
        self.form.set_value(PHONE, fields.phone);
        self.logo_uri = profile.logo.clone();
    }

    /// Attaches the path typed in the logo field as the pending logo.
    fn attach_logo(&mut self) {
        let path = self.form.value(LOGO).trim().to_string();
        if path.is_empty() {
            self.pending_logo = None;
            self.form.clear_error(LOGO);
            return;
        }
        match LogoSelection::from_path(path) {
            Ok(selection) => {
                tracing::debug!(path = %selection.path().display(), "logo attached");
                self.pending_logo = Some(selection);
                self.form.clear_error(LOGO);
            }
            Err(e) => {
                tracing::debug!("logo rejected: {e}");
                self.form.set_error(LOGO, e.to_string());
            }
        }
    }

    /// The form only takes input once the load has resolved, either way.
    pub fn is_editable(&self) -> bool {
        matches!(self.load, LoadState::Ready | LoadState::Failed(_))
    }

    fn save(&mut self) -> Action {
        if self.saving || !self.is_editable() {
            return Action::None;
        }
        let fields = self.fields();
        if !fields.email.is_empty() {
            if let Err(e) = validate_email(&fields.email) {
                tracing::debug!("save blocked: {e}");
                self.form.set_error(EMAIL, INVALID_EMAIL.to_string());
                return Action::None;
            }
        }
        self.form.clear_error(EMAIL);
        self.feedback.clear();
        self.saving = true;
        Action::Request(Request::SaveOffice(OfficePayload::build(
            &fields,
            self.pending_logo.as_ref(),
        )))
    }
}

impl ScreenState for OfficeState {
    fn begin_load(&mut self) -> Action {
        self.load = LoadState::Loading;
        Action::Request(Request::LoadOffice)
    }

    fn handle_key(&mut self, key: KeyEvent, _now: Instant) -> Action {
        if !self.is_editable() {
            return match key.code {
                KeyCode::Esc => Action::Navigate(Screen::Specialties),
                _ => Action::None,
            };
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return if key.code == KeyCode::Char('s') {
                self.save()
            } else {
                Action::None
            };
        }

        match key.code {
            KeyCode::Tab => {
                self.form.focus_next();
                Action::None
            }
            KeyCode::BackTab => {
                self.form.focus_prev();
                Action::None
            }
            KeyCode::Char(ch) => {
                self.form.insert_char(ch);
                Action::None
            }
            KeyCode::Backspace => {
                self.form.delete_char();
                Action::None
            }
            KeyCode::Enter if self.form.focus() == LOGO => {
                self.attach_logo();
                Action::None
            }
            KeyCode::Enter => self.save(),
            KeyCode::Esc => Action::Navigate(Screen::Specialties),
            _ => Action::None,
        }
    }

    fn apply(&mut self, outcome: Outcome, now: Instant) {
        match outcome {
            Outcome::OfficeLoaded(Ok(profile)) => {
                tracing::info!(name = %profile.name, "office settings loaded");
                self.fill(&profile);
                self.load = LoadState::Ready;
            }
            Outcome::OfficeLoaded(Err(e)) => {
                tracing::error!(error = %e, "failed to load office settings");
                self.load = LoadState::Failed(LOAD_FAILED.to_string());
            }
            Outcome::OfficeSaved(Ok(())) => {
                tracing::info!("office settings saved");
                self.saving = false;
                if let Some(selection) = self.pending_logo.take() {
                    self.logo_uri = Some(selection.preview_uri().to_string());
                    self.form.set_value(LOGO, "");
                }
                self.feedback.set_success(SAVED, now);
            }
            Outcome::OfficeSaved(Err(e)) => {
                tracing::error!(error = %e, "failed to save office settings");
                self.saving = false;
                self.feedback.set_error(SAVE_FAILED, now);
            }
            other => tracing::warn!(?other, "office screen ignored unrelated outcome"),
        }
    }

    fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    fn tick(&mut self, now: Instant) {
        self.feedback.tick(now);
    }
}

/// Renders the office settings screen.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_office(state: &OfficeState, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" Office Settings ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [status_area, form_area, logo_area, button_area, _, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(state.form().height()),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(inner);

    match state.load_state() {
        LoadState::Idle | LoadState::Loading => {
            frame.render_widget(
                Paragraph::new("Loading office settings...").alignment(Alignment::Center),
                status_area,
            );
        }
        LoadState::Failed(msg) => {
            frame.render_widget(
                Paragraph::new(msg.as_str())
                    .style(Style::default().fg(Color::Red))
                    .alignment(Alignment::Center),
                status_area,
            );
        }
        LoadState::Ready => {}
    }

    draw_form(state.form(), frame, form_area);

    let logo_line = match state.logo_preview() {
        Some(uri) if state.pending_logo().is_some() => Line::from(vec![
            Span::styled("Logo (pending): ", Style::default().fg(Color::Yellow)),
            Span::raw(uri),
        ]),
        Some(uri) => Line::from(vec![Span::raw("Logo: "), Span::raw(uri)]),
        None => Line::from(Span::styled("No logo", Style::default().fg(Color::DarkGray))),
    };
    frame.render_widget(Paragraph::new(logo_line), logo_area);

    let button_style = if state.is_saving() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    };
    frame.render_widget(
        Paragraph::new(Span::styled(format!("[ {} ]", state.save_label()), button_style)),
        button_area,
    );

    let footer = Paragraph::new(Line::from(
        "Tab: next field  Enter: save (on Logo: attach)  Ctrl+S: save  Esc: back  F1: help",
    ))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}

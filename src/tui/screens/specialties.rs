//! Specialties screen: register new specialties and delete existing ones.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table};

use super::LoadState;
use crate::model::{NewSpecialty, PendingDelete, Specialty, SpecialtyId, validate_specialty_name};
use crate::tui::action::{Action, ScreenState};
use crate::tui::feedback::Feedback;
use crate::tui::tasks::{Outcome, Request};
use crate::tui::widgets::form::{Form, FormField, draw_form};

/// Field index for the specialty name.
const NAME: usize = 0;
/// Field index for the optional description.
const DESCRIPTION: usize = 1;

const LOAD_FAILED: &str = "Could not load specialties.";
const CREATED: &str = "Specialty registered successfully.";
const CREATE_FAILED: &str = "Could not register the specialty. It may already exist.";
const DELETED: &str = "Specialty deleted.";
const DELETE_FAILED: &str = "Could not delete the specialty.";

/// What the screen is waiting on, if anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activity {
    Idle,
    Creating,
    Deleting(SpecialtyId),
}

/// State for the specialties screen.
#[derive(Debug, Clone)]
pub struct SpecialtiesState {
    load: LoadState,
    /// Newest first.
    specialties: Vec<Specialty>,
    selected: Option<usize>,
    form: Form,
    confirm: Option<PendingDelete>,
    activity: Activity,
    feedback: Feedback,
}

impl Default for SpecialtiesState {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecialtiesState {
    /// Creates an empty, not yet loaded screen.
    pub fn new() -> Self {
        Self {
            load: LoadState::Idle,
            specialties: Vec::new(),
            selected: None,
            form: Form::new(vec![
                FormField::new("Specialty name", true).with_hint("e.g. Cardiology, Pediatrics"),
                FormField::new("Description (optional)", false),
            ]),
            confirm: None,
            activity: Activity::Idle,
            feedback: Feedback::new(),
        }
    }

    /// Returns the load state.
    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    /// Returns the specialties, newest first.
    pub fn specialties(&self) -> &[Specialty] {
        &self.specialties
    }

    /// Returns the highlighted row.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Returns the form for rendering.
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Returns the delete awaiting confirmation, if any.
    pub fn pending_delete(&self) -> Option<&PendingDelete> {
        self.confirm.as_ref()
    }

    /// Returns what the screen is waiting on.
    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    /// Returns `true` when the register control is enabled.
    pub fn can_submit(&self) -> bool {
        self.activity == Activity::Idle && validate_specialty_name(self.form.value(NAME)).is_ok()
    }

    /// Validates the form and starts a create request.
    fn submit(&mut self) -> Action {
        if self.activity != Activity::Idle {
            return Action::None;
        }
        match NewSpecialty::from_input(self.form.value(NAME), self.form.value(DESCRIPTION)) {
            Ok(new) => {
                self.activity = Activity::Creating;
                Action::Request(Request::CreateSpecialty(new))
            }
            Err(e) => {
                tracing::debug!("submit ignored: {e}");
                Action::None
            }
        }
    }

    /// Asks for confirmation to delete the highlighted specialty.
    fn request_delete(&mut self) {
        if self.activity != Activity::Idle {
            return;
        }
        if let Some(specialty) = self.selected.and_then(|i| self.specialties.get(i)) {
            self.confirm = Some(PendingDelete::new(specialty));
        }
    }

    /// Handles a key while the confirmation prompt is open.
    fn handle_confirm_key(&mut self, pending: PendingDelete, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('y' | 'Y') => {
                self.activity = Activity::Deleting(pending.id().clone());
                Action::Request(Request::DeleteSpecialty(pending.confirm()))
            }
            KeyCode::Char('n' | 'N') | KeyCode::Esc => {
                tracing::debug!(id = %pending.id(), "delete declined");
                Action::None
            }
            _ => {
                self.confirm = Some(pending);
                Action::None
            }
        }
    }

    fn select_prev(&mut self) {
        self.selected = match self.selected {
            Some(i) if i > 0 => Some(i - 1),
            other => other,
        };
    }

    fn select_next(&mut self) {
        self.selected = match self.selected {
            Some(i) if i + 1 < self.specialties.len() => Some(i + 1),
            other => other,
        };
    }

    fn clamp_selection(&mut self) {
        self.selected = match self.specialties.len() {
            0 => None,
            len => Some(self.selected.unwrap_or(0).min(len - 1)),
        };
    }
}

impl ScreenState for SpecialtiesState {
    fn begin_load(&mut self) -> Action {
        self.load = LoadState::Loading;
        Action::Request(Request::LoadSpecialties)
    }

    fn handle_key(&mut self, key: KeyEvent, _now: Instant) -> Action {
        if let Some(pending) = self.confirm.take() {
            return self.handle_confirm_key(pending, key);
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('d') {
                self.request_delete();
            }
            return Action::None;
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
            KeyCode::Up => {
                self.select_prev();
                Action::None
            }
            KeyCode::Down => {
                self.select_next();
                Action::None
            }
            KeyCode::Delete => {
                self.request_delete();
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
            KeyCode::Enter => self.submit(),
            KeyCode::Esc => Action::Quit,
            _ => Action::None,
        }
    }

    fn apply(&mut self, outcome: Outcome, now: Instant) {
        match outcome {
            Outcome::SpecialtiesLoaded(Ok(list)) => {
                tracing::info!(count = list.len(), "specialties loaded");
                self.specialties = list;
                self.load = LoadState::Ready;
                self.selected = None;
                self.clamp_selection();
            }
            Outcome::SpecialtiesLoaded(Err(e)) => {
                tracing::error!(error = %e, "failed to load specialties");
                self.specialties.clear();
                self.selected = None;
                self.load = LoadState::Failed(LOAD_FAILED.to_string());
            }
            Outcome::SpecialtyCreated(result) => {
                self.activity = Activity::Idle;
                match result {
                    Ok(specialty) => {
                        tracing::info!(id = %specialty.id, "specialty created");
                        self.specialties.insert(0, specialty);
                        self.selected = self.selected.map(|i| i + 1);
                        self.clamp_selection();
                        self.form.reset();
                        self.feedback.set_success(CREATED, now);
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to create specialty");
                        self.feedback.set_error(CREATE_FAILED, now);
                    }
                }
            }
            Outcome::SpecialtyDeleted(id, result) => {
                self.activity = Activity::Idle;
                match result {
                    Ok(()) => {
                        tracing::info!(%id, "specialty deleted");
                        self.specialties.retain(|s| s.id != id);
                        self.clamp_selection();
                        self.feedback.set_success(DELETED, now);
                    }
                    Err(e) => {
                        tracing::error!(%id, error = %e, "failed to delete specialty");
                        self.feedback.set_error(DELETE_FAILED, now);
                    }
                }
            }
            other => tracing::warn!(?other, "specialties screen ignored unrelated outcome"),
        }
    }

    fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    fn tick(&mut self, now: Instant) {
        self.feedback.tick(now);
    }
}

/// Renders the specialties screen.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_specialties(state: &SpecialtiesState, frame: &mut Frame, area: Rect) {
    let form_height = state.form().height() + 1;
    let [form_block_area, table_block_area, prompt_area, footer_area] = Layout::vertical([
        Constraint::Length(form_height + 2),
        Constraint::Min(5),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    draw_register_form(state, frame, form_block_area);
    draw_table(state, frame, table_block_area);

    if let Some(pending) = state.pending_delete() {
        let prompt = Paragraph::new(Line::from(vec![
            Span::styled(
                format!("Delete specialty \"{}\"? ", pending.name()),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled("(y/n)", Style::default().add_modifier(Modifier::BOLD)),
        ]));
        frame.render_widget(prompt, prompt_area);
    }

    let footer = Paragraph::new(Line::from(
        "Tab: next field  Enter: register  ↑/↓: select  Del: delete  F1: help",
    ))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}

fn draw_register_form(state: &SpecialtiesState, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" Register Specialty ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [fields_area, button_area] =
        Layout::vertical([Constraint::Length(state.form().height()), Constraint::Length(1)])
            .areas(inner);
    draw_form(state.form(), frame, fields_area);

    let (label, style) = match state.activity() {
        Activity::Creating => ("[ Registering... ]", Style::default().fg(Color::DarkGray)),
        _ if state.can_submit() => (
            "[ Register ]",
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        _ => ("[ Register ]", Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(Paragraph::new(Span::styled(label, style)), button_area);
}

fn draw_table(state: &SpecialtiesState, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" Registered Specialties ")
        .title(
            Line::from(format!(" Total: {} ", state.specialties().len())).alignment(Alignment::Right),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let message = match state.load_state() {
        LoadState::Idle | LoadState::Loading => Some(("Loading specialties...", Color::Reset)),
        LoadState::Failed(msg) if state.specialties().is_empty() => {
            Some((msg.as_str(), Color::Red))
        }
        _ if state.specialties().is_empty() => {
            Some(("No specialties registered.", Color::DarkGray))
        }
        _ => None,
    };
    if let Some((text, color)) = message {
        let paragraph = Paragraph::new(vec![Line::from(""), Line::from(text)])
            .style(Style::default().fg(color))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec!["ID", "Name", "Description"])
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);

    let rows: Vec<Row> = state
        .specialties()
        .iter()
        .enumerate()
        .map(|(i, specialty)| {
            let style = if state.selected() == Some(i) {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else {
                Style::default()
            };
            Row::new(vec![
                specialty.id.to_string(),
                specialty.display_name(),
                specialty.display_description().to_string(),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Length(24),
        Constraint::Min(10),
    ];
    frame.render_widget(Table::new(rows, widths).header(header).block(block), area);
}

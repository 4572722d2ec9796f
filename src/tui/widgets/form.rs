//! Text form widget shared by both admin screens.
//!
//! Every field is set independently: typing into, clearing, or loading one
//! field never touches the others.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

/// Height of one rendered field, borders included.
pub const FIELD_HEIGHT: u16 = 3;

/// A single field within a [`Form`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    /// Display label shown in the field border.
    pub label: String,
    /// Placeholder shown while the value is empty.
    pub hint: Option<String>,
    /// Current text value.
    pub value: String,
    /// Validation error message, if any.
    pub error: Option<String>,
    /// Whether the label carries a required marker.
    pub required: bool,
}

impl FormField {
    /// Creates a new empty field.
    pub fn new(label: impl Into<String>, required: bool) -> Self {
        Self {
            label: label.into(),
            hint: None,
            value: String::new(),
            error: None,
            required,
        }
    }

    /// Adds a placeholder hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// A multi-field text form with focus management.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    fields: Vec<FormField>,
    focus: usize,
}

impl Form {
    /// Creates a new form with the given fields. Focus starts on the first field.
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields, focus: 0 }
    }

    /// Returns the index of the currently focused field.
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Moves focus to the next field, wrapping around.
    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    /// Moves focus to the previous field, wrapping around.
    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Appends a character to the focused field.
    pub fn insert_char(&mut self, ch: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.push(ch);
        }
    }

    /// Removes the last character of the focused field.
    pub fn delete_char(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
        }
    }

    /// Replaces the value of one field, leaving the others as they are.
    pub fn set_value(&mut self, index: usize, value: impl Into<String>) {
        if let Some(field) = self.fields.get_mut(index) {
            field.value = value.into();
        }
    }

    /// Returns the value of the field at `index`, or an empty string if out of bounds.
    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", |f| f.value.as_str())
    }

    /// Sets an error message on a field by index.
    pub fn set_error(&mut self, index: usize, error: String) {
        if let Some(field) = self.fields.get_mut(index) {
            field.error = Some(error);
        }
    }

    /// Clears the error of one field.
    pub fn clear_error(&mut self, index: usize) {
        if let Some(field) = self.fields.get_mut(index) {
            field.error = None;
        }
    }

    /// Clears all field errors.
    pub fn clear_errors(&mut self) {
        for field in &mut self.fields {
            field.error = None;
        }
    }

    /// Returns `true` if any field has an error set.
    pub fn has_errors(&self) -> bool {
        self.fields.iter().any(|f| f.error.is_some())
    }

    /// Empties every value and error and moves focus back to the first field.
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.value.clear();
            field.error = None;
        }
        self.focus = 0;
    }

    /// Returns the fields, for rendering.
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Returns the height needed to draw every field.
    pub fn height(&self) -> u16 {
        FIELD_HEIGHT.saturating_mul(u16::try_from(self.fields.len()).unwrap_or(u16::MAX))
    }
}

/// Renders a form within the given area, one bordered row per field.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_form(form: &Form, frame: &mut Frame, area: Rect) {
    let constraints: Vec<Constraint> = form
        .fields
        .iter()
        .map(|_| Constraint::Length(FIELD_HEIGHT))
        .collect();
    let rows = Layout::vertical(constraints).split(area);

    for (i, field) in form.fields.iter().enumerate() {
        let is_focused = i == form.focus;

        let border_color = if field.error.is_some() {
            Color::Red
        } else if is_focused {
            Color::Yellow
        } else {
            Color::DarkGray
        };

        let title = if field.required {
            format!("{} *", field.label)
        } else {
            field.label.clone()
        };

        let mut block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));
        if let Some(err) = &field.error {
            block = block.title_bottom(Line::from(Span::styled(
                format!(" {err} "),
                Style::default().fg(Color::Red),
            )));
        }

        let mut spans = Vec::new();
        match (&field.hint, field.value.is_empty()) {
            (Some(hint), true) if !is_focused => {
                spans.push(Span::styled(hint.as_str(), Style::default().fg(Color::DarkGray)));
            }
            _ => spans.push(Span::raw(field.value.as_str())),
        }
        if is_focused {
            spans.push(Span::styled(
                "\u{2588}",
                Style::default().add_modifier(Modifier::SLOW_BLINK),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), rows[i]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_form() -> Form {
        Form::new(vec![
            FormField::new("Name", true),
            FormField::new("Tax ID", true).with_hint("e.g. J-12345678-9"),
            FormField::new("Phone", false),
        ])
    }

    mod focus {
        use super::*;

        #[test]
        fn starts_at_zero() {
            assert_eq!(make_form().focus(), 0);
        }

        #[test]
        fn next_wraps() {
            let mut form = make_form();
            form.focus_next();
            assert_eq!(form.focus(), 1);
            form.focus_next();
            form.focus_next();
            assert_eq!(form.focus(), 0);
        }

        #[test]
        fn prev_wraps() {
            let mut form = make_form();
            form.focus_prev();
            assert_eq!(form.focus(), 2);
        }

        #[test]
        fn empty_form_is_noop() {
            let mut form = Form::new(vec![]);
            form.focus_next();
            form.focus_prev();
            assert_eq!(form.focus(), 0);
        }
    }

    mod editing {
        use super::*;

        #[test]
        fn insert_goes_to_focused_field_only() {
            let mut form = make_form();
            form.focus_next();
            form.insert_char('J');
            assert_eq!(form.value(0), "");
            assert_eq!(form.value(1), "J");
        }

        #[test]
        fn delete_char_removes_last() {
            let mut form = make_form();
            form.insert_char('í');
            form.insert_char('a');
            form.delete_char();
            assert_eq!(form.value(0), "í");
        }

        #[test]
        fn delete_char_on_empty_is_noop() {
            let mut form = make_form();
            form.delete_char();
            assert_eq!(form.value(0), "");
        }

        #[test]
        fn set_value_leaves_other_fields() {
            let mut form = make_form();
            form.insert_char('X');
            form.set_value(2, "555");
            assert_eq!(form.value(0), "X");
            assert_eq!(form.value(1), "");
            assert_eq!(form.value(2), "555");
        }

        #[test]
        fn set_value_out_of_bounds_is_noop() {
            let mut form = make_form();
            form.set_value(9, "x");
            assert_eq!(form, make_form());
        }

        #[test]
        fn value_out_of_bounds_is_empty() {
            assert_eq!(make_form().value(99), "");
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn set_and_clear_single() {
            let mut form = make_form();
            form.set_error(1, "bad".into());
            assert!(form.has_errors());
            form.clear_error(1);
            assert!(!form.has_errors());
        }

        #[test]
        fn clear_errors_removes_all() {
            let mut form = make_form();
            form.set_error(0, "a".into());
            form.set_error(2, "b".into());
            form.clear_errors();
            assert!(!form.has_errors());
        }

        #[test]
        fn out_of_bounds_is_noop() {
            let mut form = make_form();
            form.set_error(99, "nope".into());
            assert!(!form.has_errors());
        }
    }

    #[test]
    fn reset_clears_values_errors_and_focus() {
        let mut form = make_form();
        form.insert_char('X');
        form.focus_next();
        form.set_error(0, "err".into());
        form.reset();
        assert_eq!(form.value(0), "");
        assert_eq!(form.focus(), 0);
        assert!(!form.has_errors());
    }

    #[test]
    fn height_is_three_rows_per_field() {
        assert_eq!(make_form().height(), 9);
    }

    #[test]
    fn hint_and_required_flags() {
        let form = make_form();
        assert!(form.fields()[0].required);
        assert!(!form.fields()[2].required);
        assert_eq!(form.fields()[1].hint.as_deref(), Some("e.g. J-12345678-9"));
    }

    mod rendering {
        use ratatui::Terminal;
        use ratatui::backend::TestBackend;

        use super::*;

        fn render(form: &Form) -> String {
            let mut terminal = Terminal::new(TestBackend::new(40, form.height())).unwrap();
            terminal
                .draw(|frame| draw_form(form, frame, frame.area()))
                .unwrap();
            let buf = terminal.backend().buffer();
            let mut s = String::new();
            for y in 0..buf.area.height {
                for x in 0..buf.area.width {
                    s.push(buf[(x, y)].symbol().chars().next().unwrap_or(' '));
                }
                s.push('\n');
            }
            s
        }

        #[test]
        fn shows_required_marker_and_hint() {
            let output = render(&make_form());
            assert!(output.contains("Name *"));
            assert!(output.contains("e.g. J-12345678-9"));
        }

        #[test]
        fn shows_field_error() {
            let mut form = make_form();
            form.set_error(2, "invalid".into());
            assert!(render(&form).contains("invalid"));
        }
    }
}

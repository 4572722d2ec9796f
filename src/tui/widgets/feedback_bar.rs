//! Feedback bar widget, a two-line success/error message display.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::feedback::Feedback;

/// Renders the feedback channel: success on the first line (green), error
/// on the second (red). Empty slots leave their line blank.
#[mutants::skip]
pub fn draw_feedback_bar(feedback: &Feedback, frame: &mut Frame, area: Rect) {
    let [success_area, error_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

    if let Some(msg) = feedback.success() {
        let line = Line::from(Span::styled(
            format!("✓ {msg}"),
            Style::default().fg(Color::Green),
        ));
        frame.render_widget(Paragraph::new(line), success_area);
    }
    if let Some(msg) = feedback.error() {
        let line = Line::from(Span::styled(
            format!("✗ {msg}"),
            Style::default().fg(Color::Red),
        ));
        frame.render_widget(Paragraph::new(line), error_area);
    }
}

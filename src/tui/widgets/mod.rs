//! Reusable TUI widgets.

pub mod feedback_bar;
pub mod form;

pub use feedback_bar::draw_feedback_bar;
pub use form::{Form, FormField, draw_form};

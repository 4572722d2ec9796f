//! TUI: App state, event loop, background requests, screens, widgets.

pub mod action;
pub mod app;
pub mod error;
pub mod feedback;
pub mod screens;
pub mod tasks;
pub mod widgets;

pub use app::{App, Screen};
pub use error::AppError;

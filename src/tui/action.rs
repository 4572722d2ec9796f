//! Actions returned by screen event handlers.

use std::time::Instant;

use crossterm::event::KeyEvent;

use super::app::Screen;
use super::feedback::Feedback;
use super::tasks::{Outcome, Request};

/// An action that a screen handler returns to the [`App`](super::App).
///
/// The `App` interprets these to start requests and navigate between screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No state change needed.
    None,
    /// Tear down the current screen and mount the given one.
    Navigate(Screen),
    /// Run a backend request on behalf of the current screen.
    Request(Request),
    /// Close the help overlay.
    CloseHelp,
    /// Quit the application.
    Quit,
}

/// Common behavior of the mountable screens.
pub trait ScreenState {
    /// Moves the loader to `Loading` and returns the request that fills it.
    fn begin_load(&mut self) -> Action;

    /// Process a key event and return an [`Action`] for the `App` to apply.
    fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Action;

    /// Applies the result of a request this screen started.
    fn apply(&mut self, outcome: Outcome, now: Instant);

    /// Returns the screen's feedback channel.
    fn feedback(&self) -> &Feedback;

    /// Expires feedback messages whose deadline has passed.
    fn tick(&mut self, now: Instant);
}

//! Transient success/error messages shown after an action.

use std::time::{Duration, Instant};

/// How long a message stays visible after it was last set.
pub const FEEDBACK_TTL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Slot {
    message: Option<String>,
    expires_at: Option<Instant>,
}

impl Slot {
    /// Replaces the message and restarts the deadline; the old deadline is dropped.
    fn set(&mut self, message: String, now: Instant) {
        self.message = Some(message);
        self.expires_at = Some(now + FEEDBACK_TTL);
    }

    fn clear(&mut self) {
        self.message = None;
        self.expires_at = None;
    }

    fn expire(&mut self, now: Instant) {
        if self.expires_at.is_some_and(|deadline| now >= deadline) {
            self.clear();
        }
    }
}

/// A pair of independent message slots, one for success and one for errors.
///
/// Each slot holds at most one message and clears itself once
/// [`FEEDBACK_TTL`] has elapsed since it was last set. Time is passed in
/// explicitly so callers (and tests) control the clock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feedback {
    success: Slot,
    error: Slot,
}

impl Feedback {
    /// Creates an empty channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current success message, if any.
    pub fn success(&self) -> Option<&str> {
        self.success.message.as_deref()
    }

    /// Returns the current error message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.message.as_deref()
    }

    /// Shows a success message for [`FEEDBACK_TTL`] from `now`.
    pub fn set_success(&mut self, message: impl Into<String>, now: Instant) {
        self.success.set(message.into(), now);
    }

    /// Shows an error message for [`FEEDBACK_TTL`] from `now`.
    pub fn set_error(&mut self, message: impl Into<String>, now: Instant) {
        self.error.set(message.into(), now);
    }

    /// Clears both slots immediately.
    pub fn clear(&mut self) {
        self.success.clear();
        self.error.clear();
    }

    /// Clears every slot whose deadline is at or before `now`.
    pub fn tick(&mut self, now: Instant) {
        self.success.expire(now);
        self.error.expire(now);
    }

    /// Returns `true` if neither slot holds a message.
    pub fn is_empty(&self) -> bool {
        self.success.message.is_none() && self.error.message.is_none()
    }
}

//! TUI screen implementations.

pub mod help;
pub mod office;
pub mod specialties;

pub use help::{HelpState, draw_help};
pub use office::{OfficeState, draw_office};
pub use specialties::{SpecialtiesState, draw_specialties};

/// Progress of a screen's initial load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Mounted, load not started.
    #[default]
    Idle,
    /// Waiting for the backend.
    Loading,
    /// Data arrived.
    Ready,
    /// The load failed; the message is shown in place of the data.
    Failed(String),
}

impl LoadState {
    /// Returns `true` while waiting for the backend.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

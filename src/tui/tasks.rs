//! Background requests and their delivery back to the event loop.
//!
//! Every mounted screen owns a [`TaskScope`]. Requests are spawned on the
//! tokio runtime inside that scope; dropping the scope cancels whatever is
//! still in flight, and completions carry the [`MountId`] so the app can
//! discard anything that was queued before the screen went away.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::{ApiError, Backend, OfficePayload};
use crate::model::{ConfirmedDelete, NewSpecialty, OfficeProfile, Specialty, SpecialtyId};

/// Identifies one mount of a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MountId(u64);

impl MountId {
    /// Creates a mount id from a counter value.
    pub fn new(n: u64) -> Self {
        Self(n)
    }

    /// Returns the id that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Lifetime of one mounted screen's requests. Cancels them on drop.
#[derive(Debug)]
pub struct TaskScope {
    mount: MountId,
    token: CancellationToken,
}

impl TaskScope {
    /// Opens a scope for the given mount.
    pub fn new(mount: MountId) -> Self {
        Self {
            mount,
            token: CancellationToken::new(),
        }
    }

    /// Returns the mount this scope belongs to.
    pub fn mount(&self) -> MountId {
        self.mount
    }

    /// Returns `true` once the scope has been torn down.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// A backend call requested by a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Fetch the specialty list.
    LoadSpecialties,
    /// Create a specialty.
    CreateSpecialty(NewSpecialty),
    /// Delete a specialty the user confirmed.
    DeleteSpecialty(ConfirmedDelete),
    /// Fetch the active office profile.
    LoadOffice,
    /// Save the office profile.
    SaveOffice(OfficePayload),
}

/// Result of a finished [`Request`].
#[derive(Debug)]
pub enum Outcome {
    SpecialtiesLoaded(Result<Vec<Specialty>, ApiError>),
    SpecialtyCreated(Result<Specialty, ApiError>),
    SpecialtyDeleted(SpecialtyId, Result<(), ApiError>),
    OfficeLoaded(Result<OfficeProfile, ApiError>),
    OfficeSaved(Result<(), ApiError>),
}

/// An [`Outcome`] tagged with the mount that asked for it.
#[derive(Debug)]
pub struct Completion {
    pub mount: MountId,
    pub outcome: Outcome,
}

/// Spawns requests against a [`Backend`] and reports completions on a channel.
pub struct TaskRunner {
    backend: Arc<dyn Backend>,
    runtime: Handle,
    tx: UnboundedSender<Completion>,
}

impl TaskRunner {
    /// Creates a runner and the receiving end of its completion channel.
    pub fn new(backend: Arc<dyn Backend>, runtime: Handle) -> (Self, UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                backend,
                runtime,
                tx,
            },
            rx,
        )
    }

    /// Runs `request` in the background. Nothing is reported if `scope` is
    /// cancelled before the request finishes.
    pub fn spawn(&self, scope: &TaskScope, request: Request) -> JoinHandle<()> {
        let backend = Arc::clone(&self.backend);
        let token = scope.token.clone();
        let mount = scope.mount;
        let tx = self.tx.clone();

        self.runtime.spawn(async move {
            tokio::select! {
                biased;
                () = token.cancelled() => {
                    tracing::debug!(?mount, "request cancelled by screen teardown");
                }
                outcome = execute(backend.as_ref(), request) => {
                    if tx.send(Completion { mount, outcome }).is_err() {
                        tracing::debug!(?mount, "completion dropped, event loop gone");
                    }
                }
            }
        })
    }
}

async fn execute(backend: &dyn Backend, request: Request) -> Outcome {
    match request {
        Request::LoadSpecialties => Outcome::SpecialtiesLoaded(backend.list_specialties().await),
        Request::CreateSpecialty(new) => {
            Outcome::SpecialtyCreated(backend.create_specialty(&new).await)
        }
        Request::DeleteSpecialty(target) => {
            let result = backend.delete_specialty(&target).await;
            Outcome::SpecialtyDeleted(target.id().clone(), result)
        }
        Request::LoadOffice => Outcome::OfficeLoaded(backend.active_office().await),
        Request::SaveOffice(payload) => Outcome::OfficeSaved(backend.save_office(payload).await),
    }
}

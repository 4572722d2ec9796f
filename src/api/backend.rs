use async_trait::async_trait;

use super::error::ApiError;
use super::payload::OfficePayload;
use crate::model::{ConfirmedDelete, NewSpecialty, OfficeProfile, Specialty};

/// The REST operations the admin screens depend on.
///
/// [`HttpBackend`](super::HttpBackend) is the production implementation;
/// tests substitute an in-memory one.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Lists all specialties, in backend order.
    async fn list_specialties(&self) -> Result<Vec<Specialty>, ApiError>;

    /// Creates a specialty and returns the stored record.
    async fn create_specialty(&self, new: &NewSpecialty) -> Result<Specialty, ApiError>;

    /// Deletes a specialty. Only a confirmed delete can be issued.
    async fn delete_specialty(&self, target: &ConfirmedDelete) -> Result<(), ApiError>;

    /// Fetches the active office profile.
    async fn active_office(&self) -> Result<OfficeProfile, ApiError>;

    /// Creates or replaces the office profile.
    async fn save_office(&self, payload: OfficePayload) -> Result<(), ApiError>;
}

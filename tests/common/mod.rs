#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use clinic_admin::api::{ApiError, Backend, OfficePayload};
use clinic_admin::model::{ConfirmedDelete, NewSpecialty, OfficeProfile, Specialty, SpecialtyId};

/// A backend call as seen by [`MockBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Create(NewSpecialty),
    Delete(SpecialtyId),
    LoadOffice,
    SaveOffice(Vec<&'static str>),
}

/// Sets its flag when dropped before [`DropFlag::disarm`] is called.
struct DropFlag(Arc<AtomicBool>);

impl DropFlag {
    fn disarm(self) {
        std::mem::forget(self);
    }
}

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// In-memory backend that records every call.
#[derive(Default)]
pub struct MockBackend {
    specialties: Mutex<Vec<Specialty>>,
    office: Mutex<Option<OfficeProfile>>,
    calls: Mutex<Vec<Call>>,
    next_id: Mutex<i64>,
    fail_create: AtomicBool,
    fail_delete: AtomicBool,
    /// When set, `list_specialties` signals `list_started` and then waits here.
    list_gate: Option<Arc<Notify>>,
    pub list_started: Arc<Notify>,
    pub list_dropped: Arc<AtomicBool>,
}

impl MockBackend {
    pub fn with_specialties(specialties: Vec<Specialty>) -> Self {
        let next_id = specialties
            .iter()
            .filter_map(|s| match s.id {
                SpecialtyId::Number(n) => Some(n),
                SpecialtyId::Text(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            specialties: Mutex::new(specialties),
            next_id: Mutex::new(next_id),
            ..Self::default()
        }
    }

    pub fn with_office(mut self, profile: OfficeProfile) -> Self {
        self.office = Mutex::new(Some(profile));
        self
    }

    pub fn failing_create(self) -> Self {
        self.fail_create.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_delete(self) -> Self {
        self.fail_delete.store(true, Ordering::SeqCst);
        self
    }

    /// Makes `list_specialties` block until `gate` is notified.
    pub fn gated_list(mut self, gate: Arc<Notify>) -> Self {
        self.list_gate = Some(gate);
        self
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, call: Call) {
        self.calls.lock().await.push(call);
    }
}

fn rejected(body: &str) -> ApiError {
    ApiError::Status {
        status: 400,
        body: body.to_string(),
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn list_specialties(&self) -> Result<Vec<Specialty>, ApiError> {
        self.record(Call::List).await;
        if let Some(gate) = &self.list_gate {
            let flag = DropFlag(Arc::clone(&self.list_dropped));
            self.list_started.notify_one();
            gate.notified().await;
            flag.disarm();
        }
        Ok(self.specialties.lock().await.clone())
    }

    async fn create_specialty(&self, new: &NewSpecialty) -> Result<Specialty, ApiError> {
        self.record(Call::Create(new.clone())).await;
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(rejected(r#"{"nombre":["already exists"]}"#));
        }
        let mut next_id = self.next_id.lock().await;
        let created = Specialty {
            id: SpecialtyId::Number(*next_id),
            name: new.name.clone(),
            description: new.description.clone(),
        };
        *next_id += 1;
        self.specialties.lock().await.insert(0, created.clone());
        Ok(created)
    }

    async fn delete_specialty(&self, target: &ConfirmedDelete) -> Result<(), ApiError> {
        self.record(Call::Delete(target.id().clone())).await;
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(rejected("protected"));
        }
        self.specialties.lock().await.retain(|s| &s.id != target.id());
        Ok(())
    }

    async fn active_office(&self) -> Result<OfficeProfile, ApiError> {
        self.record(Call::LoadOffice).await;
        self.office
            .lock()
            .await
            .clone()
            .ok_or_else(|| rejected("no active office"))
    }

    async fn save_office(&self, payload: OfficePayload) -> Result<(), ApiError> {
        self.record(Call::SaveOffice(payload.keys())).await;
        Ok(())
    }
}

pub fn specialty(id: i64, name: &str, description: Option<&str>) -> Specialty {
    Specialty {
        id: SpecialtyId::Number(id),
        name: name.to_string(),
        description: description.map(str::to_string),
    }
}

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use super::backend::Backend;
use super::error::{ApiError, truncate_for_log};
use super::payload::OfficePayload;
use crate::model::{ConfirmedDelete, NewSpecialty, OfficeProfile, Specialty, SpecialtyId};

const SPECIALTIES_PATH: &str = "/api/especialidades/";
const ACTIVE_OFFICE_PATH: &str = "/api/consultorio/activo/";
const SAVE_OFFICE_PATH: &str = "/api/consultorio/guardar/";

/// [`Backend`] over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Creates a backend rooted at `base_url` (e.g. `http://localhost:8000`).
    ///
    /// A trailing `/` is ignored; any path prefix is kept.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Returns the base URL requests are joined onto.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// URL of one specialty. The id is pushed as a single escaped path segment.
    fn specialty_url(&self, id: &SpecialtyId) -> Result<Url, ApiError> {
        let base = self.endpoint(SPECIALTIES_PATH);
        let invalid = |detail: String| ApiError::InvalidUrl {
            url: base.clone(),
            detail,
        };
        let mut url = Url::parse(&base).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("URL cannot have a path".to_string()))?
            .pop_if_empty()
            .push(&id.to_string())
            .push("");
        Ok(url)
    }

    /// Sends a request and returns the body of a 2xx response.
    async fn execute(
        &self,
        request: RequestBuilder,
        method: &str,
        url: &str,
    ) -> Result<String, ApiError> {
        tracing::debug!("{method} {url}");

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("{method} {url} -> {}", status.as_u16());

        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: truncate_for_log(&body),
            });
        }
        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let body = self.execute(self.client.get(url), "GET", url).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(url, body = %truncate_for_log(&body), "unexpected response shape");
            ApiError::Decode(e)
        })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_specialties(&self) -> Result<Vec<Specialty>, ApiError> {
        self.get_json(&self.endpoint(SPECIALTIES_PATH)).await
    }

    async fn create_specialty(&self, new: &NewSpecialty) -> Result<Specialty, ApiError> {
        let url = self.endpoint(SPECIALTIES_PATH);
        let body = self
            .execute(self.client.post(&url).json(new), "POST", &url)
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn delete_specialty(&self, target: &ConfirmedDelete) -> Result<(), ApiError> {
        let url = self.specialty_url(target.id())?;
        self.execute(self.client.delete(url.clone()), "DELETE", url.as_str())
            .await
            .map(|_| ())
    }

    async fn active_office(&self) -> Result<OfficeProfile, ApiError> {
        self.get_json(&self.endpoint(ACTIVE_OFFICE_PATH)).await
    }

    async fn save_office(&self, payload: OfficePayload) -> Result<(), ApiError> {
        let url = self.endpoint(SAVE_OFFICE_PATH);
        tracing::debug!(parts = ?payload.keys(), "saving office profile");
        let form = payload.into_multipart().await?;
        self.execute(self.client.post(&url).multipart(form), "POST", &url)
            .await
            .map(|_| ())
    }
}

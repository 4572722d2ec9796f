//! Multipart payload for saving the office profile.

use reqwest::multipart::{Form, Part};

use super::error::ApiError;
use crate::model::{LogoSelection, MAX_LOGO_BYTES, OfficeFields};

/// Field names understood by the save endpoint.
pub const NAME: &str = "nombre";
pub const TAX_ID: &str = "rif";
pub const ADDRESS: &str = "direccion";
pub const EMAIL: &str = "correo";
pub const PHONE: &str = "telefono";
pub const LOGO: &str = "logo";

/// The parts of an office save request.
///
/// Only non-empty fields are included. A field the user cleared is left out
/// rather than sent empty, so the backend keeps its previous value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfficePayload {
    fields: Vec<(&'static str, String)>,
    logo: Option<LogoSelection>,
}

impl OfficePayload {
    /// Builds the payload from the form values and the pending logo, if any.
    pub fn build(form: &OfficeFields, logo: Option<&LogoSelection>) -> Self {
        let fields = [
            (NAME, &form.name),
            (TAX_ID, &form.tax_id),
            (ADDRESS, &form.address),
            (EMAIL, &form.email),
            (PHONE, &form.phone),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key, value.clone()))
        .collect();

        Self {
            fields,
            logo: logo.cloned(),
        }
    }

    /// Returns the text fields that will be sent, in form order.
    pub fn text_fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }

    /// Returns the logo that will be uploaded, if any.
    pub fn logo(&self) -> Option<&LogoSelection> {
        self.logo.as_ref()
    }

    /// Returns the names of every part that will be sent.
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<&'static str> = self.fields.iter().map(|(k, _)| *k).collect();
        if self.logo.is_some() {
            keys.push(LOGO);
        }
        keys
    }

    /// Reads the logo file (if any) and assembles the multipart form.
    pub async fn into_multipart(self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (key, value) in self.fields {
            form = form.text(key, value);
        }

        if let Some(logo) = self.logo {
            let path = logo.path().to_path_buf();
            let metadata = tokio::fs::metadata(&path)
                .await
                .map_err(|source| ApiError::LogoRead {
                    path: path.clone(),
                    source,
                })?;
            if metadata.len() > MAX_LOGO_BYTES {
                return Err(ApiError::LogoTooLarge {
                    path,
                    size: metadata.len(),
                    max: MAX_LOGO_BYTES,
                });
            }
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|source| ApiError::LogoRead {
                    path: path.clone(),
                    source,
                })?;
            let part = Part::bytes(bytes)
                .file_name(logo.file_name())
                .mime_str(logo.mime_type())?;
            form = form.part(LOGO, part);
        }

        Ok(form)
    }
}

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use super::validation::{ValidationError, logo_mime_type};

/// Largest logo file the backend accepts.
pub const MAX_LOGO_BYTES: u64 = 2 * 1024 * 1024;

/// The office's own profile, as returned by the active-office endpoint.
///
/// `null` or missing text values deserialize as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct OfficeProfile {
    #[serde(rename = "nombre", default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(rename = "rif", default, deserialize_with = "null_as_empty")]
    pub tax_id: String,
    #[serde(rename = "direccion", default, deserialize_with = "null_as_empty")]
    pub address: String,
    #[serde(rename = "correo", default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(rename = "telefono", default, deserialize_with = "null_as_empty")]
    pub phone: String,
    /// URI of the persisted logo image.
    #[serde(default)]
    pub logo: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Editable text fields of the office profile form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OfficeFields {
    pub name: String,
    pub tax_id: String,
    pub address: String,
    pub email: String,
    pub phone: String,
}

impl From<&OfficeProfile> for OfficeFields {
    fn from(profile: &OfficeProfile) -> Self {
        Self {
            name: profile.name.clone(),
            tax_id: profile.tax_id.clone(),
            address: profile.address.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
        }
    }
}

/// A logo file chosen locally but not yet saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoSelection {
    path: PathBuf,
    mime_type: &'static str,
    preview_uri: String,
}

impl LogoSelection {
    /// Selects the image at `path`. Only the extension is checked here; the
    /// file is read when the save payload is sent.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, ValidationError> {
        let path = path.into();
        let mime_type = logo_mime_type(&path)
            .ok_or_else(|| ValidationError::UnsupportedLogoFormat(path.display().to_string()))?;
        let absolute = std::path::absolute(&path).unwrap_or_else(|_| path.clone());
        let preview_uri = format!("file://{}", absolute.display());
        Ok(Self {
            path,
            mime_type,
            preview_uri,
        })
    }

    /// Returns the local file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the MIME type derived from the extension.
    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    /// Returns the `file://` URI used as a preview reference.
    pub fn preview_uri(&self) -> &str {
        &self.preview_uri
    }

    /// Returns the file name sent with the upload.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(|| "logo".to_string(), |n| n.to_string_lossy().into_owned())
    }
}

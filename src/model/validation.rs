use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Validation errors for form input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("specialty name cannot be empty")]
    EmptySpecialtyName,
    #[error("invalid e-mail address: {0}")]
    InvalidEmail(String),
    #[error("unsupported logo file: {0} (use PNG, JPG, GIF or WebP)")]
    UnsupportedLogoFormat(String),
}

// Same grammar as an HTML `type=email` input.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("valid hardcoded regex")
});

/// Image types accepted as an office logo, keyed by lowercase file extension.
const LOGO_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
];

/// Validates a specialty name: must contain something other than whitespace.
pub fn validate_specialty_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        Err(ValidationError::EmptySpecialtyName)
    } else {
        Ok(())
    }
}

/// Validates an e-mail address.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}

/// Returns the MIME type for a logo file, or `None` if the extension is not an accepted image type.
pub fn logo_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    LOGO_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}

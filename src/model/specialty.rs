use std::fmt;

use serde::{Deserialize, Serialize};

use super::validation::{ValidationError, validate_specialty_name};

/// Backend-assigned identifier of a [`Specialty`].
///
/// Opaque to the client: it is only compared for identity and echoed back in
/// delete URLs. Accepts either a JSON number or a JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecialtyId {
    Number(i64),
    Text(String),
}

impl fmt::Display for SpecialtyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for SpecialtyId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

/// A medical specialty as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialty {
    pub id: SpecialtyId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
}

impl Specialty {
    /// Name as shown in the table: lowercased, then each word capitalised.
    pub fn display_name(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        let mut at_word_start = true;
        for ch in self.name.chars() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = ch.is_whitespace();
        }
        out
    }

    /// Description as shown in the table, with a placeholder when absent or empty.
    pub fn display_description(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.is_empty() => d,
            _ => "No description",
        }
    }
}

/// Body of a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSpecialty {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
}

impl NewSpecialty {
    /// Builds a create request from raw form input.
    ///
    /// The name is sent as typed; the description is trimmed and becomes
    /// `None` when nothing is left.
    pub fn from_input(name: &str, description: &str) -> Result<Self, ValidationError> {
        validate_specialty_name(name)?;
        let description = description.trim();
        Ok(Self {
            name: name.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
        })
    }
}

/// A delete the user has asked for but not yet confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    id: SpecialtyId,
    name: String,
}

impl PendingDelete {
    /// Starts a delete of the given specialty.
    pub fn new(specialty: &Specialty) -> Self {
        Self {
            id: specialty.id.clone(),
            name: specialty.name.clone(),
        }
    }

    /// Returns the id of the specialty to delete.
    pub fn id(&self) -> &SpecialtyId {
        &self.id
    }

    /// Returns the name of the specialty to delete, for the prompt.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Confirms the delete. This is the only way to obtain a [`ConfirmedDelete`].
    pub fn confirm(self) -> ConfirmedDelete {
        ConfirmedDelete { id: self.id }
    }
}

/// A delete the user has explicitly confirmed; required by the delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedDelete {
    id: SpecialtyId,
}

impl ConfirmedDelete {
    /// Returns the id of the specialty to delete.
    pub fn id(&self) -> &SpecialtyId {
        &self.id
    }
}

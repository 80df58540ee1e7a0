use serde::{Deserialize, Serialize};

use crate::error::InputError;

pub const NO_RESPONSE: &str = "No response";
pub const EMPTY_COMMENT: &str = " ";

const SLOT_WIDTH: usize = 6; // len("onsite") == len("hybrid") == len("remote")

/// One job application, the unit that gets stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApplicationData {
    pub company: String,
    pub role: String,
    pub location: String,
    pub work_type: String, // onsite/hybrid/remote display string
    pub is_hybrid: bool,
    pub is_remote: bool,
    pub application_date: String,
    pub response_date: String, // empty until a response arrives
    pub response: String,
    pub comment: String,
}

impl ApplicationData {
    pub fn validate(&self) -> Result<(), InputError> {
        if self.company.trim().is_empty() {
            return Err(InputError::MissingCompany);
        }
        if self.role.trim().is_empty() {
            return Err(InputError::MissingRole);
        }
        Ok(())
    }
}

/// Search filters. Empty strings and `false` flags mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchData {
    pub company: String,
    pub role: String,
    pub location: String,
    pub work_type: Vec<String>,
    pub is_hybrid: bool,
    pub is_remote: bool,
    pub response: String,
    /// Only applications dated at or before this timestamp match.
    pub older_than_date: String,
}

/// Render the `onsite/hybrid/remote` column.
///
/// The onsite slot carries the location (or the word `onsite` when there is
/// none) for hybrid jobs and for jobs that are neither hybrid nor remote.
/// Every slot is padded to the same width.
pub fn format_work_type(location: &str, is_remote: bool, is_hybrid: bool) -> String {
    // A slash inside the location would read as an extra slot.
    let location = location.trim().replace('/', "-");
    let width = SLOT_WIDTH.max(location.chars().count());

    let onsite = if is_hybrid || !is_remote {
        if location.is_empty() { "onsite" } else { location.as_str() }
    } else {
        ""
    };
    let hybrid = if is_hybrid { "hybrid" } else { "" };
    let remote = if is_remote { "remote" } else { "" };

    format!("{onsite:<width$}/{hybrid:<width$}/{remote:<width$}")
}

//! Load-boundary errors
//!
//! The engine itself never fails; malformed project data is stopped here
//! with a message fit to show the user.

/// Structural problems in a persisted project
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("Project file is not valid JSON: {reason}")]
    InvalidJson { reason: String },

    #[error("Project file is missing required field '{field}'")]
    MissingField { field: String },

    #[error("Project field '{field}' must be {expected}")]
    WrongFieldType { field: String, expected: String },

    #[error("Project data is malformed: {reason}")]
    Malformed { reason: String },

    #[error("Failed to access project file: {0}")]
    Io(#[from] std::io::Error),
}

impl ProjectError {
    pub fn missing(field: &str) -> Self {
        Self::MissingField {
            field: field.to_string(),
        }
    }

    pub fn wrong_type(field: &str, expected: &str) -> Self {
        Self::WrongFieldType {
            field: field.to_string(),
            expected: expected.to_string(),
        }
    }
}

pub type ProjectResult<T> = std::result::Result<T, ProjectError>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FocusError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Assignment not found: {id}")]
    AssignmentNotFound { id: String },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl FocusError {
    /// Short error code string, logged next to every failed request.
    pub fn code(&self) -> &'static str {
        match self {
            FocusError::Config(_) => "CONFIG_ERROR",
            FocusError::MissingField { .. } => "MISSING_FIELD",
            FocusError::InvalidField { .. } => "INVALID_FIELD",
            FocusError::AssignmentNotFound { .. } => "ASSIGNMENT_NOT_FOUND",
            FocusError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, FocusError>;

use focuslock_core::FocusError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),

    /// The store accepted the insert but returned no row.
    #[error("no record created in {table}")]
    NotCreated { table: &'static str },

    #[error("record not found in {table}: {id}")]
    NotFound { table: &'static str, id: String },
}

impl From<StoreError> for FocusError {
    fn from(e: StoreError) -> Self {
        FocusError::Storage(e.to_string())
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NgitungError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Note not found: {0}")]
    NoteNotFound(String),

    #[error("Cost item not found: {0}")]
    CostItemNotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for NgitungError {
    fn from(e: serde_json::Error) -> Self {
        NgitungError::SerializationError(e.to_string())
    }
}

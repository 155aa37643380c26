use crate::validation::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContactsError {
    #[error("Contact not found: {0}")]
    NotFound(String),

    #[error("A contact with email {0} already exists")]
    DuplicateEmail(String),

    #[error("Invalid contact: {0}")]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Store worker is not running")]
    WorkerStopped,
}

impl ContactsError {
    /// True for failures of the underlying storage rather than of the request.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            ContactsError::Io(_) | ContactsError::Serialization(_) | ContactsError::Store(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ContactsError>;

use thiserror::Error;

/// Failures raised by a `TermsRepository`.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("storage backend unreachable: {0}")]
    Unavailable(String),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("corrupt record '{id}': {reason}")]
    Corrupt { id: String, reason: String },
}

impl RepositoryError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

/// Domain-specific errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Term with id {id} not found")]
    TermNotFound { id: String },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Storage error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn term_not_found(id: impl Into<String>) -> Self {
        Self::TermNotFound { id: id.into() }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Storage failures are opaque to callers of the service.
impl From<RepositoryError> for DomainError {
    fn from(e: RepositoryError) -> Self {
        Self::Internal {
            message: e.to_string(),
        }
    }
}

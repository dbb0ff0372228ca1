use tonic::{Code, Status};

/// Error type for glossary operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GlossaryError {
    /// The requested term does not exist
    #[error("{0}")]
    NotFound(String),

    /// The service (or the channel to it) cannot be reached
    #[error("gRPC service unavailable: {0}")]
    Unavailable(String),

    /// The request was rejected as malformed
    #[error("invalid request: {0}")]
    Validation(String),

    /// Anything else
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<Status> for GlossaryError {
    fn from(status: Status) -> Self {
        let message = status.message().to_owned();
        match status.code() {
            Code::NotFound => Self::NotFound(message),
            // tonic reports an expired client timeout as Cancelled
            Code::Unavailable | Code::DeadlineExceeded | Code::Cancelled => {
                Self::Unavailable(message)
            }
            Code::InvalidArgument => Self::Validation(message),
            _ => Self::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_onto_taxonomy() {
        assert_eq!(
            GlossaryError::from(Status::not_found("Term with id 9 not found")),
            GlossaryError::NotFound("Term with id 9 not found".to_owned())
        );
        assert!(matches!(
            GlossaryError::from(Status::unavailable("tcp connect error")),
            GlossaryError::Unavailable(_)
        ));
        assert!(matches!(
            GlossaryError::from(Status::deadline_exceeded("timeout")),
            GlossaryError::Unavailable(_)
        ));
        assert!(matches!(
            GlossaryError::from(Status::invalid_argument("bad")),
            GlossaryError::Validation(_)
        ));
        assert!(matches!(
            GlossaryError::from(Status::internal("boom")),
            GlossaryError::Internal(_)
        ));
    }
}

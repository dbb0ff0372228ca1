//! Storage backends for the term catalog.
//!
//! `redis_repo` is the durable store; `memory` is the process-local fallback
//! chosen by [`select::select_repository`] when the durable store does not
//! answer at startup.

pub mod memory;
pub mod record;
pub mod redis_repo;
pub mod seed;
pub mod select;

pub use memory::InMemoryTermsRepository;
pub use redis_repo::RedisTermsRepository;
pub use select::select_repository;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::domain::error::RepositoryError;

/// Current UTC time as an RFC 3339 string.
pub(crate) fn now_rfc3339() -> Result<String, RepositoryError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| RepositoryError::backend(format!("timestamp formatting failed: {e}")))
}

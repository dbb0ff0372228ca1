use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::memory::InMemoryTermsRepository;
use super::redis_repo::RedisTermsRepository;
use crate::domain::error::RepositoryError;
use crate::domain::repo::TermsRepository;

/// Pick the backend once at startup: Redis if it answers within `timeout`,
/// otherwise a seeded in-memory store. The choice is not revisited.
///
/// # Errors
/// Only if the fallback store itself cannot be built.
pub async fn select_repository(
    redis_url: &str,
    timeout: Duration,
) -> Result<Arc<dyn TermsRepository>, RepositoryError> {
    match RedisTermsRepository::connect(redis_url, timeout).await {
        Ok(repo) => {
            info!(backend = "redis", "storage backend selected");
            Ok(Arc::new(repo))
        }
        Err(e) => {
            warn!(error = %e, "redis unavailable, falling back to in-memory storage");
            let repo = InMemoryTermsRepository::seeded()?;
            info!(backend = "memory", "storage backend selected");
            Ok(Arc::new(repo))
        }
    }
}

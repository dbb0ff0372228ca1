use std::sync::Arc;
use std::time::Duration;

use glossary_sdk::{NewTerm, OperationOutcome, Term, TermList};
use tracing::{debug, info, instrument, warn};

use crate::domain::error::DomainError;
use crate::domain::repo::{TermsRepository, in_category};
use crate::domain::stream::{FeedLimits, FeedStats, FeedStatsSnapshot, TermFeed};

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Capacity of the per-stream channel between producer and transport.
    pub stream_buffer: usize,
    /// Longest wait for a stream consumer to take the next term.
    pub stream_idle_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let limits = FeedLimits::default();
        Self {
            stream_buffer: limits.buffer,
            stream_idle_timeout: limits.idle_timeout,
        }
    }
}

/// Catalog business rules on top of a [`TermsRepository`].
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn TermsRepository>,
    config: ServiceConfig,
    feeds: Arc<FeedStats>,
}

impl Service {
    pub fn new(repo: Arc<dyn TermsRepository>, config: ServiceConfig) -> Self {
        Self {
            repo,
            config,
            feeds: Arc::default(),
        }
    }

    /// Running and finished `StreamTerms` producers.
    pub fn feed_stats(&self) -> FeedStatsSnapshot {
        self.feeds.snapshot()
    }

    /// Name of the storage backend in use.
    pub fn backend(&self) -> &'static str {
        self.repo.backend()
    }

    #[instrument(skip(self), fields(term_id = %id))]
    pub async fn get_term(&self, id: &str) -> Result<Term, DomainError> {
        debug!("Getting term by id");
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| DomainError::term_not_found(id))
    }

    #[instrument(skip(self))]
    pub async fn list_terms(&self) -> Result<TermList, DomainError> {
        let terms = self.repo.list().await?;
        debug!(count = terms.len(), "Listed terms");
        Ok(TermList::from(terms))
    }

    /// `limit == 0` means unlimited. `total_count` is the truncated length.
    #[instrument(skip(self))]
    pub async fn search_terms(
        &self,
        query: &str,
        category: Option<&str>,
        limit: usize,
    ) -> Result<TermList, DomainError> {
        let mut terms = self.repo.search(query, category).await?;
        if limit > 0 {
            terms.truncate(limit);
        }
        debug!(count = terms.len(), "Search finished");
        Ok(TermList::from(terms))
    }

    /// Never fails at the transport level: validation and storage problems
    /// are reported through `success = false`.
    #[instrument(skip(self, new_term), fields(name = %new_term.name))]
    pub async fn add_term(&self, new_term: NewTerm) -> OperationOutcome {
        if let Err(e) = validate_new_term(&new_term) {
            return OperationOutcome {
                success: false,
                message: e.to_string(),
                term_id: String::new(),
            };
        }

        match self.repo.add(new_term).await {
            Ok(id) => {
                info!(term_id = %id, "Term added");
                OperationOutcome {
                    success: true,
                    message: "Term added successfully".to_owned(),
                    term_id: id,
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to add term");
                OperationOutcome {
                    success: false,
                    message: format!("Error adding term: {e}"),
                    term_id: String::new(),
                }
            }
        }
    }

    /// A missing id is a normal outcome (`success = false`), not an error.
    #[instrument(skip(self), fields(term_id = %id))]
    pub async fn delete_term(&self, id: &str) -> Result<OperationOutcome, DomainError> {
        if self.repo.delete(id).await? {
            info!("Term deleted");
            Ok(OperationOutcome {
                success: true,
                message: "Term deleted successfully".to_owned(),
                term_id: id.to_owned(),
            })
        } else {
            Ok(OperationOutcome {
                success: false,
                message: DomainError::term_not_found(id).to_string(),
                term_id: id.to_owned(),
            })
        }
    }

    /// Snapshot the matching terms, then hand them to a producer task.
    #[instrument(skip(self))]
    pub async fn stream_terms(
        &self,
        category: Option<&str>,
        batch_size: usize,
    ) -> Result<TermFeed, DomainError> {
        let mut candidates = self.repo.list().await?;
        candidates.retain(|t| in_category(t, category));
        debug!(count = candidates.len(), "Starting term feed");
        let limits = FeedLimits {
            buffer: self.config.stream_buffer,
            idle_timeout: self.config.stream_idle_timeout,
        };
        Ok(TermFeed::spawn(
            candidates,
            batch_size,
            limits,
            Arc::clone(&self.feeds),
        ))
    }
}

fn validate_new_term(new_term: &NewTerm) -> Result<(), DomainError> {
    if new_term.name.trim().is_empty() {
        return Err(DomainError::validation("name", "must not be empty"));
    }
    if new_term.definition.trim().is_empty() {
        return Err(DomainError::validation("definition", "must not be empty"));
    }
    Ok(())
}

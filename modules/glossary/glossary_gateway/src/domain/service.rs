//! Domain service for the glossary gateway
//!
//! Holds the shared SDK client. Each method is one upstream call.

use std::sync::Arc;
use std::time::Duration;

use futures::{Stream, StreamExt};
use glossary_sdk::{
    GlossaryClientV1, GlossaryError, NewTerm, OperationOutcome, SearchQuery, StreamQuery, Term,
    TermList, TermStream,
};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, instrument, warn};

/// Name reported by `/` and `/api/health`.
pub const SERVICE_NAME: &str = "Glossary API Gateway";

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Upstream address, reported by the health endpoint.
    pub grpc_server: String,
    /// Longest wait for the next streamed term before the feed is abandoned.
    pub stream_idle_timeout: Duration,
}

/// Payload of a successful health probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub grpc_server: String,
    pub timestamp: String,
}

/// One step of a relayed term feed. `Failed` is always the last item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedItem {
    Term(Term),
    Failed(String),
}

pub struct Service {
    client: Arc<dyn GlossaryClientV1>,
    config: ServiceConfig,
}

impl Service {
    pub fn new(client: Arc<dyn GlossaryClientV1>, config: ServiceConfig) -> Self {
        Self { client, config }
    }

    /// Healthy only when the upstream answers.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<HealthReport, GlossaryError> {
        self.client.probe().await?;
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|e| GlossaryError::Internal(e.to_string()))?;
        Ok(HealthReport {
            grpc_server: self.config.grpc_server.clone(),
            timestamp,
        })
    }

    #[instrument(skip(self))]
    pub async fn list_terms(&self) -> Result<TermList, GlossaryError> {
        self.client.list_terms().await
    }

    #[instrument(skip(self))]
    pub async fn get_term(&self, id: &str) -> Result<Term, GlossaryError> {
        self.client.get_term(id).await
    }

    #[instrument(skip(self))]
    pub async fn search_terms(&self, query: SearchQuery) -> Result<TermList, GlossaryError> {
        self.client.search_terms(query).await
    }

    #[instrument(skip(self, new_term), fields(name = %new_term.name))]
    pub async fn add_term(&self, new_term: NewTerm) -> Result<OperationOutcome, GlossaryError> {
        let outcome = self.client.add_term(new_term).await?;
        debug!(success = outcome.success, term_id = %outcome.term_id, "AddTerm answered");
        Ok(outcome)
    }

    #[instrument(skip(self))]
    pub async fn delete_term(&self, id: &str) -> Result<OperationOutcome, GlossaryError> {
        let outcome = self.client.delete_term(id).await?;
        debug!(success = outcome.success, "DeleteTerm answered");
        Ok(outcome)
    }

    /// Open the upstream stream and bound the gap between terms.
    ///
    /// Errors opening the stream are returned directly. Later failures,
    /// including the idle timeout, become one final [`FeedItem::Failed`].
    /// Dropping the returned stream drops the upstream call.
    #[instrument(skip(self))]
    pub async fn open_feed(
        &self,
        query: StreamQuery,
    ) -> Result<impl Stream<Item = FeedItem> + Send + 'static, GlossaryError> {
        let upstream = self.client.stream_terms(query).await?;
        Ok(relay(upstream, self.config.stream_idle_timeout))
    }
}

fn relay(upstream: TermStream, idle: Duration) -> impl Stream<Item = FeedItem> + Send + 'static {
    futures::stream::unfold(Some(upstream), move |state| async move {
        let mut upstream = state?;
        match tokio::time::timeout(idle, upstream.next()).await {
            Ok(Some(Ok(term))) => Some((FeedItem::Term(term), Some(upstream))),
            Ok(Some(Err(e))) => {
                warn!(error = %e, "term stream failed");
                Some((FeedItem::Failed(e.to_string()), None))
            }
            Ok(None) => None,
            Err(_) => {
                let idle_ms = u64::try_from(idle.as_millis()).unwrap_or(u64::MAX);
                warn!(idle_ms, "term stream idle timeout");
                Some((
                    FeedItem::Failed(format!("stream idle for more than {idle_ms}ms")),
                    None,
                ))
            }
        }
    })
}

//! Glossary API trait
//!
//! Contract consumed by the REST gateway and any other caller.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::errors::GlossaryError;
use crate::models::{NewTerm, OperationOutcome, SearchQuery, StreamQuery, Term, TermList};

/// Server-streamed terms, one item per term.
pub type TermStream = Pin<Box<dyn Stream<Item = Result<Term, GlossaryError>> + Send>>;

/// Glossary API trait.
///
/// Not-found is reported differently per operation: `get_term` fails with
/// [`GlossaryError::NotFound`], while `delete_term` succeeds with
/// `OperationOutcome { success: false, .. }`. `add_term` likewise reports
/// storage failures inside the outcome.
#[async_trait]
pub trait GlossaryClientV1: Send + Sync {
    /// Fetch a term by id.
    async fn get_term(&self, id: &str) -> Result<Term, GlossaryError>;

    /// Fetch every term.
    async fn list_terms(&self) -> Result<TermList, GlossaryError>;

    /// Substring search over name and definition.
    async fn search_terms(&self, query: SearchQuery) -> Result<TermList, GlossaryError>;

    /// Add a term; `outcome.term_id` carries the assigned id on success.
    async fn add_term(&self, new_term: NewTerm) -> Result<OperationOutcome, GlossaryError>;

    /// Delete a term by id.
    async fn delete_term(&self, id: &str) -> Result<OperationOutcome, GlossaryError>;

    /// Open the term feed. Dropping the stream cancels it.
    async fn stream_terms(&self, query: StreamQuery) -> Result<TermStream, GlossaryError>;

    /// Check that the service answers at all.
    async fn probe(&self) -> Result<(), GlossaryError> {
        self.list_terms().await.map(|_| ())
    }
}

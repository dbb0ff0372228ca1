use std::cmp::Ordering;

use async_trait::async_trait;
use glossary_sdk::{NewTerm, Term};

use crate::domain::error::RepositoryError;

/// Storage port for the term catalog.
///
/// Implementations keep three structures in step: the term records, the set
/// of all ids, and one id set per category. A term is visible in the id set
/// only while its record exists.
#[async_trait]
pub trait TermsRepository: Send + Sync {
    /// Short backend name for logs, e.g. `redis` or `memory`.
    fn backend(&self) -> &'static str;

    async fn get(&self, id: &str) -> Result<Option<Term>, RepositoryError>;

    /// All terms in [`id_order`].
    async fn list(&self) -> Result<Vec<Term>, RepositoryError>;

    /// Case-insensitive substring match on name or definition, then an exact
    /// category filter. An empty query matches every term.
    async fn search(
        &self,
        query: &str,
        category: Option<&str>,
    ) -> Result<Vec<Term>, RepositoryError> {
        let needle = query.to_lowercase();
        let mut terms = self.list().await?;
        terms.retain(|t| in_category(t, category) && matches_query(t, &needle));
        Ok(terms)
    }

    /// Store a new term and return its freshly assigned id.
    async fn add(&self, new_term: NewTerm) -> Result<String, RepositoryError>;

    /// Remove a term from all three structures. `false` when it did not exist.
    async fn delete(&self, id: &str) -> Result<bool, RepositoryError>;

    /// Ids recorded in the category index, in [`id_order`].
    async fn category_members(&self, category: &str) -> Result<Vec<String>, RepositoryError>;
}

/// `None` or an empty category accepts everything.
pub fn in_category(term: &Term, category: Option<&str>) -> bool {
    match category {
        Some(c) if !c.is_empty() => term.category == c,
        _ => true,
    }
}

/// `needle` must already be lowercase.
fn matches_query(term: &Term, needle: &str) -> bool {
    needle.is_empty()
        || term.name.to_lowercase().contains(needle)
        || term.definition.to_lowercase().contains(needle)
}

/// Numeric ids ascending, then non-numeric ids lexically.
pub fn id_order(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

//! Process-local fallback store.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use glossary_sdk::{NewTerm, Term};
use parking_lot::Mutex;

use super::now_rfc3339;
use super::seed::{SEED_MAX_ID, seed_terms};
use crate::domain::error::RepositoryError;
use crate::domain::repo::{TermsRepository, id_order};

#[derive(Default)]
struct State {
    terms: HashMap<String, Term>,
    categories: HashMap<String, BTreeSet<String>>,
    next_id: u64,
}

impl State {
    fn insert(&mut self, term: Term) {
        self.categories
            .entry(term.category.clone())
            .or_default()
            .insert(term.id.clone());
        self.terms.insert(term.id.clone(), term);
    }
}

/// Mutex-guarded maps; contents are lost on restart.
pub struct InMemoryTermsRepository {
    state: Mutex<State>,
}

impl InMemoryTermsRepository {
    /// An empty catalog whose first id is `1`.
    pub fn empty() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 1,
                ..State::default()
            }),
        }
    }

    /// The catalog pre-filled with the seed terms.
    ///
    /// # Errors
    /// Fails only if the current time cannot be formatted.
    pub fn seeded() -> Result<Self, RepositoryError> {
        let now = now_rfc3339()?;
        let mut state = State {
            next_id: SEED_MAX_ID + 1,
            ..State::default()
        };
        for term in seed_terms(&now) {
            state.insert(term);
        }
        Ok(Self {
            state: Mutex::new(state),
        })
    }
}

#[async_trait]
impl TermsRepository for InMemoryTermsRepository {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, id: &str) -> Result<Option<Term>, RepositoryError> {
        Ok(self.state.lock().terms.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Term>, RepositoryError> {
        let mut terms: Vec<Term> = self.state.lock().terms.values().cloned().collect();
        terms.sort_by(|a, b| id_order(&a.id, &b.id));
        Ok(terms)
    }

    async fn add(&self, new_term: NewTerm) -> Result<String, RepositoryError> {
        let now = now_rfc3339()?;
        let category = new_term.effective_category().to_owned();

        let mut state = self.state.lock();
        let id = state.next_id.to_string();
        state.next_id += 1;
        state.insert(Term {
            id: id.clone(),
            name: new_term.name,
            definition: new_term.definition,
            category,
            examples: new_term.examples,
            synonyms: new_term.synonyms,
            created_at: now.clone(),
            updated_at: now,
        });
        Ok(id)
    }

    async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock();
        let Some(term) = state.terms.remove(id) else {
            return Ok(false);
        };
        if let Some(members) = state.categories.get_mut(&term.category) {
            members.remove(id);
            if members.is_empty() {
                state.categories.remove(&term.category);
            }
        }
        Ok(true)
    }

    async fn category_members(&self, category: &str) -> Result<Vec<String>, RepositoryError> {
        let mut ids: Vec<String> = self
            .state
            .lock()
            .categories
            .get(category)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default();
        ids.sort_by(|a, b| id_order(a, b));
        Ok(ids)
    }
}

//! Transport-neutral glossary models.

/// Category assigned when a new term is created without one.
pub const DEFAULT_CATEGORY: &str = "General";

/// A catalog entry.
///
/// `updated_at` is written once at creation and never touched afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Term {
    pub id: String,
    pub name: String,
    pub definition: String,
    pub category: String,
    pub examples: Vec<String>,
    pub synonyms: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields supplied when adding a term; id and timestamps are assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTerm {
    pub name: String,
    pub definition: String,
    pub category: String,
    pub examples: Vec<String>,
    pub synonyms: Vec<String>,
}

impl NewTerm {
    /// Category to store: the given one, or [`DEFAULT_CATEGORY`] when blank.
    #[must_use]
    pub fn effective_category(&self) -> &str {
        if self.category.trim().is_empty() {
            DEFAULT_CATEGORY
        } else {
            &self.category
        }
    }
}

/// A list of terms with its size.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TermList {
    pub terms: Vec<Term>,
    pub total_count: usize,
}

impl From<Vec<Term>> for TermList {
    fn from(terms: Vec<Term>) -> Self {
        let total_count = terms.len();
        Self { terms, total_count }
    }
}

/// Structured result of a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OperationOutcome {
    pub success: bool,
    pub message: String,
    pub term_id: String,
}

/// Parameters of `SearchTerms`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    /// Case-insensitive substring matched against name and definition.
    pub query: String,
    /// Exact category filter.
    pub category: Option<String>,
    /// Maximum number of results; `0` returns everything.
    pub limit: u32,
}

/// Parameters of `StreamTerms`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamQuery {
    /// Exact category filter.
    pub category: Option<String>,
    /// Entries grouped per producer step; `0` means `1`.
    pub batch_size: u32,
}

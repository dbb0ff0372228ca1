//! Hash-field encoding of a term in the durable store.
//!
//! Scalar fields are stored as-is; `examples` and `synonyms` are JSON arrays.

use std::collections::HashMap;

use glossary_sdk::Term;
use tracing::warn;

use crate::domain::error::RepositoryError;

pub const FIELD_ID: &str = "id";
pub const FIELD_NAME: &str = "name";
pub const FIELD_DEFINITION: &str = "definition";
pub const FIELD_CATEGORY: &str = "category";
pub const FIELD_EXAMPLES: &str = "examples";
pub const FIELD_SYNONYMS: &str = "synonyms";
pub const FIELD_CREATED_AT: &str = "created_at";
pub const FIELD_UPDATED_AT: &str = "updated_at";

pub fn to_fields(term: &Term) -> Result<Vec<(&'static str, String)>, RepositoryError> {
    let json = |values: &[String]| {
        serde_json::to_string(values).map_err(|e| RepositoryError::Corrupt {
            id: term.id.clone(),
            reason: e.to_string(),
        })
    };

    Ok(vec![
        (FIELD_ID, term.id.clone()),
        (FIELD_NAME, term.name.clone()),
        (FIELD_DEFINITION, term.definition.clone()),
        (FIELD_CATEGORY, term.category.clone()),
        (FIELD_EXAMPLES, json(&term.examples)?),
        (FIELD_SYNONYMS, json(&term.synonyms)?),
        (FIELD_CREATED_AT, term.created_at.clone()),
        (FIELD_UPDATED_AT, term.updated_at.clone()),
    ])
}

/// Decode a hash. An empty map means the key does not exist.
///
/// Missing scalar fields decode as empty strings. A list field that is missing
/// or not a JSON array of strings decodes as an empty list.
pub fn from_fields(id: &str, mut fields: HashMap<String, String>) -> Option<Term> {
    if fields.is_empty() {
        return None;
    }

    let mut take = |name: &str| fields.remove(name).unwrap_or_default();
    let examples = take(FIELD_EXAMPLES);
    let synonyms = take(FIELD_SYNONYMS);

    let term = Term {
        id: id.to_owned(),
        name: take(FIELD_NAME),
        definition: take(FIELD_DEFINITION),
        category: take(FIELD_CATEGORY),
        examples: decode_list(id, FIELD_EXAMPLES, &examples),
        synonyms: decode_list(id, FIELD_SYNONYMS, &synonyms),
        created_at: take(FIELD_CREATED_AT),
        updated_at: take(FIELD_UPDATED_AT),
    };
    Some(term)
}

fn decode_list(id: &str, field: &str, raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!(term_id = id, field, error = %e, "malformed list field, reading it as empty");
        Vec::new()
    })
}

//! REST DTOs for the glossary gateway
//!
//! These types are transport-specific (serde for JSON bodies and SSE payloads).

use std::collections::BTreeMap;

use glossary_sdk::{NewTerm, Term, TermList};
use serde::{Deserialize, Serialize};

/// Longest definition relayed on the SSE feed, in characters.
pub const STREAM_DEFINITION_MAX_CHARS: usize = 100;

/// Full term as returned by list and get.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TermDto {
    pub id: String,
    pub name: String,
    pub definition: String,
    pub category: String,
    pub examples: Vec<String>,
    pub synonyms: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Term> for TermDto {
    fn from(t: Term) -> Self {
        Self {
            id: t.id,
            name: t.name,
            definition: t.definition,
            category: t.category,
            examples: t.examples,
            synonyms: t.synonyms,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// Search hit; timestamps are not included.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchHitDto {
    pub id: String,
    pub name: String,
    pub definition: String,
    pub category: String,
    pub examples: Vec<String>,
    pub synonyms: Vec<String>,
}

impl From<Term> for SearchHitDto {
    fn from(t: Term) -> Self {
        Self {
            id: t.id,
            name: t.name,
            definition: t.definition,
            category: t.category,
            examples: t.examples,
            synonyms: t.synonyms,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermListResponse {
    pub terms: Vec<TermDto>,
    pub total: usize,
}

impl From<TermList> for TermListResponse {
    fn from(list: TermList) -> Self {
        Self {
            terms: list.terms.into_iter().map(TermDto::from).collect(),
            total: list.total_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub terms: Vec<SearchHitDto>,
    pub total: usize,
    pub query: String,
}

/// Raw query string of `/api/terms/search`; numbers are parsed by the handler
/// so that bad input gets a JSON error body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub category: Option<String>,
    pub limit: Option<String>,
}

/// Raw query string of `/api/terms/stream`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamParams {
    pub category: Option<String>,
    pub batch_size: Option<String>,
}

/// Body of `POST /api/terms`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTermReq {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl From<CreateTermReq> for NewTerm {
    fn from(req: CreateTermReq) -> Self {
        Self {
            name: req.name,
            definition: req.definition,
            category: req.category.unwrap_or_default(),
            examples: req.examples,
            synonyms: req.synonyms,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub message: String,
    pub term_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub grpc_server: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexResponse {
    pub service: String,
    pub version: String,
    pub endpoints: BTreeMap<String, String>,
}

/// One SSE `data:` payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamedTermDto {
    pub id: String,
    pub name: String,
    pub definition: String,
    pub category: String,
}

impl From<Term> for StreamedTermDto {
    fn from(t: Term) -> Self {
        Self {
            id: t.id,
            name: t.name,
            definition: truncate_definition(&t.definition),
            category: t.category,
        }
    }
}

/// Cut to [`STREAM_DEFINITION_MAX_CHARS`] characters and append `...` when cut.
pub fn truncate_definition(definition: &str) -> String {
    match definition.char_indices().nth(STREAM_DEFINITION_MAX_CHARS) {
        Some((cut, _)) => format!("{}...", &definition[..cut]),
        None => definition.to_owned(),
    }
}

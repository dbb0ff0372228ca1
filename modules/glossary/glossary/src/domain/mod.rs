//! Domain layer for the glossary module
//!
//! Business rules of the catalog; storage is reached through `repo::TermsRepository`.

pub mod error;
pub mod repo;
pub mod service;
pub mod stream;

pub use error::{DomainError, RepositoryError};
pub use repo::TermsRepository;
pub use service::Service;
pub use stream::{FeedLimits, FeedOutcome, FeedStats, FeedStatsSnapshot, TermFeed};

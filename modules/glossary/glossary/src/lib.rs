//! Glossary Module
//!
//! gRPC term catalog.
//!
//! ## Architecture
//!
//! - `domain/repo.rs` - storage port (`TermsRepository`)
//! - `domain/service.rs` - catalog business logic
//! - `domain/stream.rs` - batched, cancellable term feed
//! - `infra/storage` - Redis (durable) and in-memory (fallback) repositories
//! - `api/grpc/server.rs` - tonic service adapter
//! - `module.rs` - wiring and lifecycle
//!
//! Consumers should use the `glossary-sdk` crate for the client side.

// === MODULE DEFINITION ===
mod module;
pub use module::GlossaryModule;

pub mod config;
pub use config::GlossaryConfig;

// === INTERNAL MODULES ===
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;

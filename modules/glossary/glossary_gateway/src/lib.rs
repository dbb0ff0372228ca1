//! Glossary Gateway
//!
//! REST surface over the glossary gRPC service. Every endpoint maps onto one
//! `GlossaryClientV1` call; `/api/terms/stream` relays `StreamTerms` as
//! server-sent events.
//!
//! ## Architecture
//!
//! - `domain/service.rs` - calls into the SDK client, stream idle timeout
//! - `api/rest` - routes, handlers, DTOs, SSE encoding and error mapping
//! - `cors.rs` - CORS layer from config
//! - `module.rs` - wiring and lifecycle

mod module;
pub use module::GatewayModule;

pub mod config;
pub use config::GatewayConfig;

pub mod cors;

#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;

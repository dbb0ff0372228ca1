//! Glossary SDK
//!
//! Everything needed to talk to the glossary service:
//! - API trait (`GlossaryClientV1`) and the `TermStream` it returns
//! - Transport-neutral models (`Term`, `NewTerm`, `TermList`, ...)
//! - Error taxonomy (`GlossaryError`)
//! - gRPC implementation of the trait (`GlossaryGrpcClient`)
//! - Proto stubs for the server implementation
//!
//! ## Usage
//!
//! ```ignore
//! use glossary_sdk::{GlossaryClientV1, GlossaryGrpcClient};
//! use transport_grpc::client::GrpcClientConfig;
//!
//! let client = GlossaryGrpcClient::connect_lazy("http://127.0.0.1:50051", GrpcClientConfig::new("glossary"))?;
//! let term = client.get_term("1").await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

// === API TRAIT AND TYPES ===
mod api;
mod errors;
mod models;
pub use api::{GlossaryClientV1, TermStream};
pub use errors::GlossaryError;
pub use models::{
    DEFAULT_CATEGORY, NewTerm, OperationOutcome, SearchQuery, StreamQuery, Term, TermList,
};

// === GRPC CLIENT ===
mod client;
pub mod convert;
pub use client::GlossaryGrpcClient;

// === GRPC PROTO STUBS (for server implementation) ===
/// Generated protobuf types for `GlossaryService`
pub mod proto {
    #![allow(clippy::pedantic)]
    tonic::include_proto!("glossary.v1");
}

pub use proto::glossary_service_server::{GlossaryService, GlossaryServiceServer};

/// Fully-qualified gRPC service name.
pub const SERVICE_NAME: &str = "glossary.v1.GlossaryService";

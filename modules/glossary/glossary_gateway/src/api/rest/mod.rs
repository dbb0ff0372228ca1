//! REST API layer: one route per glossary operation.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod sse;

pub use error::GatewayError;
pub use routes::router;

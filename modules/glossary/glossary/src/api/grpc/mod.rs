//! gRPC API layer for the glossary module

mod server;

pub use server::GlossaryServiceImpl;

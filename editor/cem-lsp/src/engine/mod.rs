//! LSP engine core
//!
//! Protocol glue around the completion pipeline: configuration, type
//! conversions and the `tower-lsp` server.

pub mod config;
pub mod convert;
pub mod handler;
pub mod server;

pub use config::EngineConfig;
pub use handler::{CompletionEngine, CompletionResult};
pub use server::LspServer;

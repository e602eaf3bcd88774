//! Custom elements Language Server executable
//!
//! Serves the language server over stdio for editor integration.

use cem_lsp::engine::server::MANIFEST_GENERATED_METHOD;
use cem_lsp::LspServer;
use tower_lsp::{LspService, Server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries the protocol
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting custom elements language server");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::build(LspServer::new)
        .custom_method(MANIFEST_GENERATED_METHOD, LspServer::manifest_generated)
        .finish();
    Server::new(stdin, stdout, socket).serve(service).await;
}

//! Custom elements LSP server
//!
//! Answers completion and completion-resolve requests for open documents
//! from the manifests discovered in the workspace.

use super::config::EngineConfig;
use super::convert;
use super::handler::CompletionEngine;
use crate::document::position::utf16_len;
use crate::document::DocumentManager;
use crate::registry::watch::{ManifestWatcher, ReloadScheduler, ReloadSignal};
use crate::registry::ComponentRegistry;
use crate::types::ContextKind;
use arc_swap::ArcSwap;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

/// Characters that open a completion session
pub const TRIGGER_CHARACTERS: &[&str] = &["<", " ", "\"", "'", "=", "@", ".", "?", "-"];

/// Custom notification carrying a freshly generated manifest
pub const MANIFEST_GENERATED_METHOD: &str = "cem/manifestGenerated";

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestGeneratedParams {
    /// Manifest JSON text
    pub manifest: String,
}

/// Background reload machinery, alive from `initialize` to `shutdown`
struct ReloadState {
    scheduler: ReloadScheduler,
    _watcher: Option<ManifestWatcher>,
}

/// Custom elements Language Server
pub struct LspServer {
    /// LSP client for sending notifications
    client: Client,
    /// Open documents
    documents: DocumentManager,
    /// Component registry shared with the reload task
    registry: Arc<ComponentRegistry>,
    /// Engine configuration, replaced once the workspace config is read
    config: ArcSwap<EngineConfig>,
    reload: Mutex<Option<ReloadState>>,
}

impl LspServer {
    pub fn new(client: Client) -> Self {
        Self::with_config(client, EngineConfig::default())
    }

    /// Create with configuration
    pub fn with_config(client: Client, config: EngineConfig) -> Self {
        Self {
            client,
            documents: DocumentManager::new(),
            registry: Arc::new(ComponentRegistry::new()),
            config: ArcSwap::from_pointee(config),
            reload: Mutex::new(None),
        }
    }

    pub fn registry(&self) -> &Arc<ComponentRegistry> {
        &self.registry
    }

    /// Server capabilities: full text sync and resolvable completions
    pub fn capabilities() -> ServerCapabilities {
        ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Options(
                TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::FULL),
                    will_save: None,
                    will_save_wait_until: None,
                    save: None,
                },
            )),

            completion_provider: Some(CompletionOptions {
                trigger_characters: Some(
                    TRIGGER_CHARACTERS.iter().map(|c| c.to_string()).collect(),
                ),
                resolve_provider: Some(true),
                work_done_progress_options: WorkDoneProgressOptions::default(),
                all_commit_characters: None,
                completion_item: None,
            }),

            hover_provider: None,
            document_symbol_provider: None,
            document_formatting_provider: None,
            definition_provider: None,
            references_provider: None,
            signature_help_provider: None,
            declaration_provider: None,
            type_definition_provider: None,
            implementation_provider: None,
            code_action_provider: None,
            code_lens_provider: None,
            document_highlight_provider: None,
            workspace_symbol_provider: None,
            execute_command_provider: None,
            workspace: None,
            selection_range_provider: None,
            rename_provider: None,
            document_range_formatting_provider: None,
            document_on_type_formatting_provider: None,
            folding_range_provider: None,
            linked_editing_range_provider: None,
            call_hierarchy_provider: None,
            semantic_tokens_provider: None,
            moniker_provider: None,
            inlay_hint_provider: None,
            inline_value_provider: None,
            color_provider: None,
            document_link_provider: None,
            diagnostic_provider: None,
            experimental: None,
            position_encoding: None,
        }
    }

    /// Handler for [`MANIFEST_GENERATED_METHOD`]
    pub async fn manifest_generated(&self, params: ManifestGeneratedParams) {
        let sent = self
            .reload
            .lock()
            .ok()
            .and_then(|state| {
                state
                    .as_ref()
                    .map(|s| s.scheduler.signal(ReloadSignal::Generated(params.manifest.clone())))
            })
            .unwrap_or(false);

        if !sent {
            // No scheduler yet: apply directly
            if let Err(e) = self.registry.set_generated(&params.manifest) {
                tracing::warn!("Generated manifest rejected: {}", e);
            }
        }
    }

    fn engine(&self) -> CompletionEngine {
        let config = self.config.load();
        CompletionEngine::new(Arc::clone(&self.registry), config.completion.max_items)
    }

    /// Read the workspace config, load its manifests and start reloading
    fn load_workspace(&self, root: &Path) {
        let config = EngineConfig::load_default(root);

        if config.engine.workspace_discovery {
            for path in config.discover_manifests(root) {
                if let Err(e) = self.registry.load_file(&path) {
                    tracing::warn!("Skipping manifest: {}", e);
                }
            }
        }

        self.config.store(Arc::new(config));
    }

    fn start_reloading(&self) {
        let config = self.config.load();
        let scheduler =
            ReloadScheduler::for_registry(Arc::clone(&self.registry), config.registry.debounce());

        let paths = self.registry.file_paths();
        let watcher = if config.registry.watch && !paths.is_empty() {
            match ManifestWatcher::new(&paths, config.registry.debounce(), scheduler.sender()) {
                Ok(watcher) => {
                    tracing::info!("Watching {} manifest file(s)", paths.len());
                    Some(watcher)
                }
                Err(e) => {
                    tracing::warn!("Failed to watch manifests: {}", e);
                    None
                }
            }
        } else {
            None
        };

        if let Ok(mut state) = self.reload.lock() {
            *state = Some(ReloadState {
                scheduler,
                _watcher: watcher,
            });
        }
    }
}

/// Workspace root from the first workspace folder, else the root URI
#[allow(deprecated)]
fn workspace_root(params: &InitializeParams) -> Option<PathBuf> {
    params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .map(|folder| &folder.uri)
        .or(params.root_uri.as_ref())
        .and_then(|uri| uri.to_file_path().ok())
}

/// Span of the typed tag name, ending at the cursor
fn prefix_range(position: Position, prefix: &str) -> Range {
    Range {
        start: Position {
            line: position.line,
            character: position.character.saturating_sub(utf16_len(prefix)),
        },
        end: position,
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for LspServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        tracing::info!("{} initializing", self.config.load().engine.name);

        match workspace_root(&params) {
            Some(root) => self.load_workspace(&root),
            None => tracing::info!("No workspace root; starting with an empty registry"),
        }

        let config = self.config.load();
        Ok(InitializeResult {
            capabilities: Self::capabilities(),
            server_info: Some(ServerInfo {
                name: config.engine.name.clone(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.start_reloading();

        let name = self.config.load().engine.name.clone();
        let count = self.registry.snapshot().len();
        tracing::info!("{} initialized with {} custom elements", name, count);
        self.client
            .log_message(
                MessageType::INFO,
                format!("{} ready ({} custom elements)", name, count),
            )
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        tracing::info!("{} shutting down", self.config.load().engine.name);
        if let Ok(mut state) = self.reload.lock() {
            state.take();
        }
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents
            .open(uri.clone(), params.text_document.text, params.text_document.version);
        tracing::debug!("Document opened: {} ({} open)", uri, self.documents.count());
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        // Full sync: the last change holds the whole text
        if let Some(change) = params.content_changes.into_iter().last() {
            self.documents.change(&uri, change.text, version);
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.close(&uri);
        tracing::debug!("Document closed: {} ({} open)", uri, self.documents.count());
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;
        let trigger = params
            .context
            .as_ref()
            .and_then(|ctx| ctx.trigger_character.as_deref());

        let Some(document) = self.documents.get(uri) else {
            return Ok(None);
        };

        let result = self
            .engine()
            .complete(&document, position.line, position.character, trigger);

        let range = (result.analysis.kind == ContextKind::TagName)
            .then(|| prefix_range(position, &result.analysis.prefix));

        let items: Vec<_> = result
            .items
            .iter()
            .map(|item| convert::to_lsp_completion(item, range))
            .collect();

        Ok(Some(CompletionResponse::Array(items)))
    }

    async fn completion_resolve(&self, mut item: CompletionItem) -> Result<CompletionItem> {
        if item.documentation.is_some() {
            return Ok(item);
        }

        let resolved = self.engine().resolve(convert::from_lsp_completion(&item));
        if let Some(markdown) = resolved.documentation.as_deref() {
            item.documentation = Some(convert::to_lsp_documentation(markdown));
        }

        Ok(item)
    }
}

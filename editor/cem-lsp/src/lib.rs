//! Custom elements Language Server Protocol implementation
//!
//! Completions for custom elements (web components) described by Custom
//! Elements Manifests, in HTML files and in `html`/`svg` tagged templates:
//!
//! - Tag names of registered elements
//! - Attribute names, including the `slot` attribute inside slotted parents
//! - Attribute values derived from union/literal types, defaults and
//!   common naming conventions
//! - `@event`, `.property` and `?attribute` template bindings
//! - Deferred markdown documentation through `completionItem/resolve`
//!
//! # Architecture
//!
//! - **Document**: open documents with their parse trees and template regions
//! - **Context**: classifies the cursor position, structurally or by scanning
//! - **Registry**: hot-reloadable snapshot of the loaded manifests
//! - **Completions**: turns a context into ranked candidates
//! - **Engine**: `tower-lsp` server, YAML config and protocol conversions
//!
//! # Usage
//!
//! Run the language server via stdio:
//!
//! ```bash
//! cem-lsp
//! ```
//!
//! Manifests are discovered from the workspace root: `custom-elements.json`,
//! the `customElements` field of `package.json`, and the same field in each
//! dependency's `package.json`.
//!
//! # Configuration
//!
//! Create a `.cem-lsp.yaml` in your workspace root:
//!
//! ```yaml
//! engine:
//!   name: cem-lsp
//!
//! registry:
//!   manifest_paths:
//!     - dist/custom-elements.json
//!   watch: true
//!   debounce_ms: 500
//!
//! completion:
//!   max_items: 200
//! ```

pub mod completions;
pub mod context;
pub mod docs;
pub mod document;
pub mod engine;
pub mod manifest;
pub mod registry;
pub mod resolve;
pub mod types;

pub use document::{Document, DocumentManager};
pub use engine::{CompletionEngine, CompletionResult, EngineConfig, LspServer};
pub use registry::{ComponentDefinition, ComponentRegistry, RegistryError, RegistrySnapshot};
pub use types::{
    Completion, CompletionAnalysis, CompletionKind, ContextKind, ResolveKey, ResolveKind,
};

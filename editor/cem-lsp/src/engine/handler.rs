//! Request handling shared by the server and embedders
//!
//! [`CompletionEngine`] runs the context resolver and the generator
//! against one registry snapshot per request.

use crate::completions;
use crate::context;
use crate::document::Document;
use crate::registry::ComponentRegistry;
use crate::resolve;
use crate::types::{Completion, CompletionAnalysis};
use std::sync::Arc;

/// Outcome of one completion request
#[derive(Debug, Clone, Default)]
pub struct CompletionResult {
    /// Where the cursor was found to be
    pub analysis: CompletionAnalysis,
    /// Ranked candidates
    pub items: Vec<Completion>,
}

/// Completion and resolution over a shared registry
#[derive(Debug, Clone)]
pub struct CompletionEngine {
    registry: Arc<ComponentRegistry>,
    max_items: usize,
}

impl CompletionEngine {
    pub fn new(registry: Arc<ComponentRegistry>, max_items: usize) -> Self {
        Self {
            registry,
            max_items,
        }
    }

    pub fn registry(&self) -> &Arc<ComponentRegistry> {
        &self.registry
    }

    /// Candidates for a zero-based (line, UTF-16 character) position
    pub fn complete(
        &self,
        document: &Document,
        line: u32,
        character: u32,
        trigger: Option<&str>,
    ) -> CompletionResult {
        let analysis = context::analyze(document, line, character, trigger);
        let snapshot = self.registry.snapshot();
        let items = completions::get_completions(&snapshot, &analysis, self.max_items);

        tracing::debug!(
            "{:?} at {}:{} in {}: {} candidate(s)",
            analysis.kind,
            line,
            character,
            document.uri(),
            items.len()
        );

        CompletionResult { analysis, items }
    }

    /// Attach documentation to a candidate the client selected
    pub fn resolve(&self, item: Completion) -> Completion {
        resolve::resolve(&self.registry.snapshot(), item)
    }
}

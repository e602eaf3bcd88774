//! Open document table
//!
//! Maps each open URI to its current [`Document`]. Edits are parsed before
//! the table is touched and then swapped in as one `Arc`.

use super::Document;
use dashmap::DashMap;
use std::sync::Arc;
use tower_lsp::lsp_types::Url;

/// Manages open documents in the LSP session
#[derive(Debug, Default)]
pub struct DocumentManager {
    /// Map of document URI to its current version
    documents: DashMap<Url, Arc<Document>>,
}

impl DocumentManager {
    /// Create a new document manager
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }

    /// Open a document, replacing any previous state for the URI
    pub fn open(&self, uri: Url, text: String, version: i32) {
        let document = Arc::new(Document::new(uri.clone(), text, version));
        self.documents.insert(uri, document);
    }

    /// Replace a document's text. Returns false when the URI is not open or
    /// the version is older than the stored one.
    pub fn change(&self, uri: &Url, text: String, version: i32) -> bool {
        match self.documents.get(uri) {
            Some(current) if version < current.version() => {
                tracing::debug!(
                    "Ignoring stale change for {} (v{} < v{})",
                    uri,
                    version,
                    current.version()
                );
                return false;
            }
            Some(_) => {}
            None => {
                tracing::debug!("Ignoring change for unopened document: {}", uri);
                return false;
            }
        }

        let document = Arc::new(Document::new(uri.clone(), text, version));

        match self.documents.get_mut(uri) {
            Some(mut entry) if version >= entry.version() => {
                *entry = document;
                true
            }
            _ => false,
        }
    }

    /// Close a document
    pub fn close(&self, uri: &Url) {
        self.documents.remove(uri);
    }

    /// Current document for a URI
    pub fn get(&self, uri: &Url) -> Option<Arc<Document>> {
        self.documents.get(uri).map(|doc| Arc::clone(doc.value()))
    }

    /// Get number of open documents
    pub fn count(&self) -> usize {
        self.documents.len()
    }
}

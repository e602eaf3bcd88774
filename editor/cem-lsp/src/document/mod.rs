//! Document model
//!
//! A [`Document`] owns one version of a file's text together with every
//! tree derived from it. Documents are immutable; an edit builds a new one
//! and the [`DocumentManager`] swaps it in, so a reader holding an
//! `Arc<Document>` always sees text and trees from the same version.

mod manager;
pub mod parse;
pub mod position;
pub mod template;

pub use manager::DocumentManager;
pub use parse::{DocumentError, Grammar};
pub use template::TemplateRegion;

use crate::types::TemplateContext;
use std::borrow::Cow;
use tower_lsp::lsp_types::Url;
use tree_sitter::Tree;

/// How a document's text is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageSurface {
    /// HTML file; the whole text is markup
    Markup,
    /// TypeScript/JavaScript; markup lives in template regions
    Script,
    /// TSX/JSX; markup lives in template regions
    ScriptJsx,
}

impl LanguageSurface {
    /// Classify by file extension; unknown extensions are treated as markup
    pub fn from_uri(uri: &Url) -> Self {
        let path = uri.path();
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "ts" | "mts" | "cts" | "js" | "mjs" | "cjs" => Self::Script,
            "tsx" | "jsx" => Self::ScriptJsx,
            _ => Self::Markup,
        }
    }

    pub fn grammar(self) -> Grammar {
        match self {
            Self::Markup => Grammar::Html,
            Self::Script => Grammar::TypeScript,
            Self::ScriptJsx => Grammar::Tsx,
        }
    }

    pub fn is_script(self) -> bool {
        !matches!(self, Self::Markup)
    }
}

/// Markup visible at an offset: the text to classify and its tree
#[derive(Debug)]
pub struct MarkupView<'a> {
    /// Markup text (whole document, or one masked template region)
    pub text: Cow<'a, str>,
    /// HTML tree of `text`, when one exists
    pub tree: Option<&'a Tree>,
    /// Cursor offset within `text`
    pub offset: usize,
    /// Templating context of the region
    pub template: TemplateContext,
}

/// One version of an open document
#[derive(Debug)]
pub struct Document {
    uri: Url,
    text: String,
    version: i32,
    surface: LanguageSurface,
    tree: Option<Tree>,
    templates: Vec<TemplateRegion>,
}

impl Document {
    /// Parse `text` and build the document
    pub fn new(uri: Url, text: String, version: i32) -> Self {
        let surface = LanguageSurface::from_uri(&uri);
        let tree = parse::parse(&text, surface.grammar());

        let templates = match (&tree, surface.is_script()) {
            (Some(tree), true) => template::find_regions(tree, &text),
            _ => Vec::new(),
        };

        Self {
            uri,
            text,
            version,
            surface,
            tree,
            templates,
        }
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn surface(&self) -> LanguageSurface {
        self.surface
    }

    /// Tree of the whole text in the document's own grammar
    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    /// Template regions found in the host-language tree
    pub fn templates(&self) -> &[TemplateRegion] {
        &self.templates
    }

    /// Byte offset of a zero-based (line, UTF-16 character) position
    pub fn offset_at(&self, line: u32, character: u32) -> Option<usize> {
        position::offset_at(&self.text, line, character)
    }

    /// Templating context at a byte offset
    pub fn template_context_at(&self, offset: usize) -> TemplateContext {
        if !self.surface.is_script() {
            return TemplateContext::None;
        }
        self.region_at(offset)
            .map(|region| region.context)
            .unwrap_or_default()
    }

    /// Markup to classify for a byte offset.
    ///
    /// Markup documents expose their whole text. Script documents expose
    /// the innermost template region containing the offset, or nothing when
    /// the offset is in plain code or inside a `${...}` substitution.
    pub fn markup_at(&self, offset: usize) -> Option<MarkupView<'_>> {
        let offset = position::floor_char_boundary(&self.text, offset);

        if !self.surface.is_script() {
            return Some(MarkupView {
                text: Cow::Borrowed(&self.text),
                tree: self.tree.as_ref(),
                offset,
                template: TemplateContext::None,
            });
        }

        let region = self.region_at(offset)?;
        let local = offset - region.content.start;
        if region.in_substitution(local) {
            return None;
        }

        Some(match region {
            Cow::Borrowed(region) => MarkupView {
                text: Cow::Borrowed(region.markup.as_str()),
                tree: region.tree.as_ref(),
                offset: local,
                template: region.context,
            },
            Cow::Owned(region) => MarkupView {
                text: Cow::Owned(region.markup),
                tree: None,
                offset: local,
                template: region.context,
            },
        })
    }

    fn region_at(&self, offset: usize) -> Option<Cow<'_, TemplateRegion>> {
        let structural = self
            .templates
            .iter()
            .filter(|region| region.contains(offset))
            .max_by_key(|region| region.content.start);

        match structural {
            Some(region) => Some(Cow::Borrowed(region)),
            None => template::scan_region(&self.text, offset).map(Cow::Owned),
        }
    }
}

//! Core types for cem-lsp

use serde::{Deserialize, Serialize};

// ============================================================================
// Analysis Types
// ============================================================================

/// Binding sigil typed in front of an attribute name inside a tagged template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingSigil {
    /// `@click` - bind an event listener
    Event,
    /// `.value` - bind a property
    Property,
    /// `?disabled` - toggle a boolean attribute
    BooleanAttribute,
}

impl BindingSigil {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '@' => Some(Self::Event),
            '.' => Some(Self::Property),
            '?' => Some(Self::BooleanAttribute),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Event => '@',
            Self::Property => '.',
            Self::BooleanAttribute => '?',
        }
    }

    /// Context kind this sigil selects inside a tagged template
    pub fn context_kind(self) -> ContextKind {
        match self {
            Self::Event => ContextKind::EventBinding,
            Self::Property => ContextKind::PropertyBinding,
            Self::BooleanAttribute => ContextKind::BooleanAttributeBinding,
        }
    }
}

/// Templating context of an offset in a script document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateContext {
    /// Plain markup document, or script code outside any markup string
    #[default]
    None,
    /// `html` / `svg` tagged template literal
    TaggedTemplate,
    /// String assigned to `innerHTML` / `outerHTML`
    MarkupSink,
}

/// Kind of syntactic slot the cursor occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextKind {
    #[default]
    Unknown,
    /// After `<`, possibly with a partial tag name
    TagName,
    /// Inside a start tag where a new attribute name can go
    AttributeName,
    /// Inside an attribute value
    AttributeValue,
    /// `@name` inside a tagged template
    EventBinding,
    /// `.name` inside a tagged template
    PropertyBinding,
    /// `?name` inside a tagged template
    BooleanAttributeBinding,
}

/// Result of classifying a cursor position.
///
/// Derived on every request and never stored. The same document state and
/// the same (position, trigger) input always produce an equal value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompletionAnalysis {
    /// What kind of completion applies
    pub kind: ContextKind,

    /// Tag of the element the cursor is in (empty if none)
    pub tag_name: String,

    /// Attribute in scope for values and bindings (empty otherwise)
    pub attribute_name: String,

    /// Text typed before the cursor back to the nearest tag/attribute boundary
    pub prefix: String,

    /// Nearest enclosing custom element, skipping the current one
    pub parent_tag: String,

    /// Templating region the cursor falls in
    pub template: TemplateContext,

    /// Binding sigil for the binding kinds
    pub sigil: Option<BindingSigil>,
}

impl CompletionAnalysis {
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn tag_name(prefix: impl Into<String>, parent_tag: impl Into<String>) -> Self {
        Self {
            kind: ContextKind::TagName,
            prefix: prefix.into(),
            parent_tag: parent_tag.into(),
            ..Default::default()
        }
    }

    pub fn attribute_name(
        tag_name: impl Into<String>,
        prefix: impl Into<String>,
        parent_tag: impl Into<String>,
    ) -> Self {
        Self {
            kind: ContextKind::AttributeName,
            tag_name: tag_name.into(),
            prefix: prefix.into(),
            parent_tag: parent_tag.into(),
            ..Default::default()
        }
    }

    pub fn attribute_value(
        tag_name: impl Into<String>,
        attribute_name: impl Into<String>,
        prefix: impl Into<String>,
        parent_tag: impl Into<String>,
    ) -> Self {
        Self {
            kind: ContextKind::AttributeValue,
            tag_name: tag_name.into(),
            attribute_name: attribute_name.into(),
            prefix: prefix.into(),
            parent_tag: parent_tag.into(),
            ..Default::default()
        }
    }

    pub fn with_template(mut self, template: TemplateContext) -> Self {
        self.template = template;
        self
    }

    pub fn in_tagged_template(&self) -> bool {
        self.template == TemplateContext::TaggedTemplate
    }
}

// ============================================================================
// Completion Types
// ============================================================================

/// Semantic kind of a completion candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionKind {
    Element,
    Property,
    Value,
    Event,
}

/// Candidate category carried in the deferred-resolution key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolveKind {
    Tag,
    Attribute,
    AttributeValue,
    Event,
    Property,
    BooleanAttribute,
    Slot,
}

/// Opaque key sent to the client and decoded again on resolve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveKey {
    #[serde(rename = "type")]
    pub kind: ResolveKind,
    pub tag_name: String,
    /// Attribute, event or slot name; empty for tags
    #[serde(rename = "attributeName", default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

impl ResolveKey {
    pub fn new(kind: ResolveKind, tag_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            tag_name: tag_name.into(),
            name: name.into(),
        }
    }
}

/// A completion candidate
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Label shown in completion list
    pub label: String,

    /// Kind of completion
    pub kind: CompletionKind,

    /// Text to insert (label when absent)
    pub insert_text: Option<String>,

    /// Whether insert_text is a snippet
    pub is_snippet: bool,

    /// Short detail text
    pub detail: Option<String>,

    /// Markdown documentation, filled lazily by the resolver
    pub documentation: Option<String>,

    /// Sort priority (lower = higher)
    pub sort_priority: u32,

    /// Whether the documented member is deprecated
    pub deprecated: bool,

    /// Replace the typed prefix rather than inserting at the cursor
    pub replaces_prefix: bool,

    /// Key for deferred documentation
    pub resolve: Option<ResolveKey>,
}

impl Completion {
    pub fn new(label: impl Into<String>, kind: CompletionKind) -> Self {
        Self {
            label: label.into(),
            kind,
            insert_text: None,
            is_snippet: false,
            detail: None,
            documentation: None,
            sort_priority: 50,
            deprecated: false,
            replaces_prefix: false,
            resolve: None,
        }
    }

    pub fn with_insert_text(mut self, text: impl Into<String>) -> Self {
        self.insert_text = Some(text.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_documentation(mut self, doc: impl Into<String>) -> Self {
        self.documentation = Some(doc.into());
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.sort_priority = priority;
        self
    }

    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    pub fn with_resolve(mut self, key: ResolveKey) -> Self {
        self.resolve = Some(key);
        self
    }

    pub fn as_snippet(mut self) -> Self {
        self.is_snippet = true;
        self
    }

    pub fn replacing_prefix(mut self) -> Self {
        self.replaces_prefix = true;
        self
    }

    /// Text the client inserts
    pub fn text_to_insert(&self) -> &str {
        self.insert_text.as_deref().unwrap_or(&self.label)
    }
}

//! Type conversions between completion candidates and LSP types

use crate::types::{Completion, CompletionKind, ResolveKey};
use tower_lsp::lsp_types::{
    self, CompletionItem as LspCompletionItem, CompletionItemKind as LspCompletionItemKind,
    CompletionItemTag, CompletionTextEdit, InsertTextFormat, MarkupContent, MarkupKind,
    Range as LspRange, TextEdit,
};

/// Convert a candidate to an LSP completion item.
///
/// `prefix_range` is the span of the typed prefix; candidates that replace
/// their prefix get a text edit over it.
pub fn to_lsp_completion(item: &Completion, prefix_range: Option<LspRange>) -> LspCompletionItem {
    let insert_text = item.text_to_insert().to_string();

    let text_edit = prefix_range
        .filter(|_| item.replaces_prefix)
        .map(|range| {
            CompletionTextEdit::Edit(TextEdit {
                range,
                new_text: insert_text.clone(),
            })
        });

    LspCompletionItem {
        label: item.label.clone(),
        kind: Some(to_lsp_completion_kind(item.kind)),
        detail: item.detail.clone(),
        documentation: item.documentation.as_deref().map(to_lsp_documentation),
        insert_text: Some(insert_text),
        insert_text_format: Some(if item.is_snippet {
            InsertTextFormat::SNIPPET
        } else {
            InsertTextFormat::PLAIN_TEXT
        }),
        insert_text_mode: None,
        sort_text: Some(format!("{:05}", item.sort_priority)),
        filter_text: None,
        deprecated: Some(item.deprecated),
        preselect: None,
        additional_text_edits: None,
        command: None,
        commit_characters: None,
        data: item
            .resolve
            .as_ref()
            .and_then(|key| serde_json::to_value(key).ok()),
        tags: item
            .deprecated
            .then(|| vec![CompletionItemTag::DEPRECATED]),
        label_details: None,
        text_edit,
    }
}

/// Rebuild a candidate from an item the client sent back for resolution
pub fn from_lsp_completion(item: &LspCompletionItem) -> Completion {
    let kind = item
        .kind
        .map(from_lsp_completion_kind)
        .unwrap_or(CompletionKind::Value);

    let resolve = item
        .data
        .clone()
        .and_then(|data| serde_json::from_value::<ResolveKey>(data).ok());

    let documentation = item.documentation.as_ref().map(|doc| match doc {
        lsp_types::Documentation::String(text) => text.clone(),
        lsp_types::Documentation::MarkupContent(content) => content.value.clone(),
    });

    let sort_priority = item
        .sort_text
        .as_deref()
        .and_then(|text| text.parse().ok());

    let mut completion = Completion::new(&item.label, kind);
    completion.insert_text = item.insert_text.clone();
    completion.is_snippet = item.insert_text_format == Some(InsertTextFormat::SNIPPET);
    completion.detail = item.detail.clone();
    completion.documentation = documentation;
    completion.deprecated = item.deprecated.unwrap_or(false);
    completion.resolve = resolve;
    if let Some(priority) = sort_priority {
        completion.sort_priority = priority;
    }
    completion
}

/// Markdown documentation block
pub fn to_lsp_documentation(markdown: &str) -> lsp_types::Documentation {
    lsp_types::Documentation::MarkupContent(MarkupContent {
        kind: MarkupKind::Markdown,
        value: markdown.to_string(),
    })
}

fn to_lsp_completion_kind(kind: CompletionKind) -> LspCompletionItemKind {
    match kind {
        CompletionKind::Element => LspCompletionItemKind::CLASS,
        CompletionKind::Property => LspCompletionItemKind::PROPERTY,
        CompletionKind::Value => LspCompletionItemKind::VALUE,
        CompletionKind::Event => LspCompletionItemKind::EVENT,
    }
}

fn from_lsp_completion_kind(kind: LspCompletionItemKind) -> CompletionKind {
    match kind {
        LspCompletionItemKind::CLASS => CompletionKind::Element,
        LspCompletionItemKind::PROPERTY => CompletionKind::Property,
        LspCompletionItemKind::EVENT => CompletionKind::Event,
        _ => CompletionKind::Value,
    }
}

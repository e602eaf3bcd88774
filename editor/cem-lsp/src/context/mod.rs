//! Completion context resolution
//!
//! Maps a cursor position in a [`Document`] to a [`CompletionAnalysis`].
//! The markup under the cursor is classified from its HTML tree when the
//! tree is usable there, and by the forward [`scan`] otherwise. Inside
//! tagged templates, attribute names starting with a binding sigil are
//! reclassified as bindings.

pub mod scan;
pub mod structural;

use crate::document::{position, Document};
use crate::types::{BindingSigil, CompletionAnalysis, ContextKind, TemplateContext};
use tree_sitter::Tree;

/// Classify a (line, UTF-16 character) position.
///
/// Out-of-range positions, plain script code and `${...}` substitutions
/// all yield [`ContextKind::Unknown`].
pub fn analyze(
    document: &Document,
    line: u32,
    character: u32,
    trigger: Option<&str>,
) -> CompletionAnalysis {
    let Some(offset) = document.offset_at(line, character) else {
        return CompletionAnalysis::unknown();
    };
    let Some(view) = document.markup_at(offset) else {
        return CompletionAnalysis::unknown();
    };

    analyze_markup(&view.text, view.tree, view.offset, view.template, trigger)
}

/// Classify a byte offset in markup text.
///
/// A cursor sitting directly on a `<` only resolves to a tag name, or to
/// anything at all when `<` was the trigger character.
pub fn analyze_markup(
    text: &str,
    tree: Option<&Tree>,
    offset: usize,
    template: TemplateContext,
    trigger: Option<&str>,
) -> CompletionAnalysis {
    let offset = position::floor_char_boundary(text, offset);

    let analysis = tree
        .and_then(|tree| structural::classify(tree, text, offset))
        .unwrap_or_else(|| scan::classify(text, offset));

    let on_tag_open = text.as_bytes().get(offset) == Some(&b'<');
    if on_tag_open && analysis.kind != ContextKind::TagName && trigger != Some("<") {
        return CompletionAnalysis::unknown().with_template(template);
    }

    reclassify_binding(analysis.with_template(template))
}

/// `@name`, `.name` and `?name` are bindings only inside tagged templates
fn reclassify_binding(mut analysis: CompletionAnalysis) -> CompletionAnalysis {
    if analysis.kind != ContextKind::AttributeName || !analysis.in_tagged_template() {
        return analysis;
    }

    let Some(sigil) = analysis.prefix.chars().next().and_then(BindingSigil::from_char) else {
        return analysis;
    };

    analysis.kind = sigil.context_kind();
    analysis.attribute_name = analysis.prefix[1..].to_string();
    analysis.sigil = Some(sigil);
    analysis
}

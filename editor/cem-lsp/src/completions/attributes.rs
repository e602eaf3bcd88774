//! Attribute name completions

use super::matches_prefix;
use crate::manifest::{is_custom_element_tag, Attribute};
use crate::registry::RegistrySnapshot;
use crate::types::{Completion, CompletionAnalysis, CompletionKind, ResolveKey, ResolveKind};

const SLOT_ATTRIBUTE: &str = "slot";

/// Complete attribute names for the element the cursor is in.
///
/// Custom elements get their declared attributes. Any element whose custom
/// parent declares named slots also gets `slot`.
pub fn attribute_name_candidates(
    snapshot: &RegistrySnapshot,
    analysis: &CompletionAnalysis,
) -> Vec<Completion> {
    let tag = analysis.tag_name.as_str();
    let prefix = analysis.prefix.as_str();

    let mut items: Vec<Completion> = Vec::new();

    if is_custom_element_tag(tag) {
        items.extend(
            snapshot
                .attributes(tag)
                .iter()
                .filter(|attr| matches_prefix(&attr.name, prefix))
                .map(|attr| create_attribute_completion(tag, attr)),
        );
    }

    if suggests_slot(snapshot, &analysis.parent_tag)
        && matches_prefix(SLOT_ATTRIBUTE, prefix)
        && !items.iter().any(|item| item.label == SLOT_ATTRIBUTE)
    {
        items.push(create_slot_completion(&analysis.parent_tag));
    }

    items
}

fn create_attribute_completion(tag: &str, attr: &Attribute) -> Completion {
    let mut detail = format!("Attribute of <{}>", tag);
    let type_text = attr.type_text();
    if !type_text.is_empty() {
        detail.push_str(&format!(" ({})", type_text));
    }

    let item = Completion::new(&attr.name, CompletionKind::Property)
        .with_detail(detail)
        .with_deprecated(attr.is_deprecated())
        .with_priority(if attr.is_deprecated() { 60 } else { 50 })
        .with_resolve(ResolveKey::new(ResolveKind::Attribute, tag, &attr.name));

    // Presence of a boolean attribute means true
    if attr.is_boolean() {
        item.with_insert_text(&attr.name)
    } else {
        item.with_insert_text(format!("{}=\"$0\"", attr.name))
            .as_snippet()
    }
}

/// Whether `parent` is a registered element with at least one named slot
pub(crate) fn suggests_slot(snapshot: &RegistrySnapshot, parent: &str) -> bool {
    !parent.is_empty()
        && snapshot
            .definition(parent)
            .is_some_and(|definition| !definition.named_slots().is_empty())
}

fn create_slot_completion(parent: &str) -> Completion {
    Completion::new(SLOT_ATTRIBUTE, CompletionKind::Property)
        .with_insert_text("slot=\"$0\"")
        .with_detail("HTML slot attribute")
        .with_resolve(ResolveKey::new(ResolveKind::Slot, parent, ""))
        .as_snippet()
}

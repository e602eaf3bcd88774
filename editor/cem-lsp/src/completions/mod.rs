//! Completion providers
//!
//! Each provider turns one kind of [`CompletionAnalysis`] into candidates
//! read from a [`RegistrySnapshot`]. [`get_completions`] dispatches on the
//! analysis kind, ranks the result and caps its length.

mod attributes;
mod bindings;
mod elements;
mod values;

pub use attributes::attribute_name_candidates;
pub use bindings::{
    boolean_attribute_binding_candidates, event_binding_candidates, property_binding_candidates,
};
pub use elements::tag_name_candidates;
pub use values::{attribute_value_candidates, parse_type_values};

use crate::registry::RegistrySnapshot;
use crate::types::{Completion, CompletionAnalysis, ContextKind};

/// Get completions for the given context
pub fn get_completions(
    snapshot: &RegistrySnapshot,
    analysis: &CompletionAnalysis,
    max: usize,
) -> Vec<Completion> {
    let tag = analysis.tag_name.as_str();

    let mut items = match analysis.kind {
        ContextKind::Unknown => Vec::new(),
        ContextKind::TagName => tag_name_candidates(snapshot, &analysis.prefix),
        ContextKind::AttributeName => attribute_name_candidates(snapshot, analysis),
        ContextKind::AttributeValue => attribute_value_candidates(snapshot, analysis),
        ContextKind::EventBinding => event_binding_candidates(snapshot, tag, &analysis.prefix),
        ContextKind::PropertyBinding => {
            property_binding_candidates(snapshot, tag, &analysis.prefix)
        }
        ContextKind::BooleanAttributeBinding => {
            boolean_attribute_binding_candidates(snapshot, tag, &analysis.prefix)
        }
    };

    // Sort by priority then label
    items.sort_by(|a, b| {
        a.sort_priority
            .cmp(&b.sort_priority)
            .then_with(|| a.label.cmp(&b.label))
    });

    items.truncate(max);
    items
}

/// Case-insensitive prefix match; an empty prefix matches everything
pub(crate) fn matches_prefix(name: &str, prefix: &str) -> bool {
    if prefix.is_empty() {
        return true;
    }
    name.to_lowercase().starts_with(&prefix.to_lowercase())
}

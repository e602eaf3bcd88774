//! Deferred documentation
//!
//! Candidates leave the generator with a [`ResolveKey`] instead of
//! documentation. When the client asks for one item, the key is looked up
//! in the registry and the markdown is rendered then.

use crate::docs;
use crate::registry::RegistrySnapshot;
use crate::types::{Completion, ResolveKey, ResolveKind};

/// Fill in documentation for one candidate.
///
/// Items that already carry documentation, have no key, or whose key no
/// longer matches the registry come back unchanged.
pub fn resolve(snapshot: &RegistrySnapshot, mut item: Completion) -> Completion {
    if item.documentation.is_some() {
        return item;
    }

    let Some(key) = item.resolve.as_ref() else {
        return item;
    };

    match render(snapshot, key) {
        Some(markdown) => {
            tracing::debug!("Resolved {:?} documentation for {}", key.kind, key.tag_name);
            item.documentation = Some(markdown);
        }
        None => {
            tracing::debug!(
                "No documentation for {:?} {}/{}",
                key.kind,
                key.tag_name,
                key.name
            );
        }
    }

    item
}

/// Markdown for a key, or `None` when the registry has no such entry
pub fn render(snapshot: &RegistrySnapshot, key: &ResolveKey) -> Option<String> {
    let definition = snapshot.definition(&key.tag_name)?;
    let tag = key.tag_name.as_str();

    match key.kind {
        ResolveKind::Tag => Some(docs::element_markdown(definition)),
        ResolveKind::Attribute
        | ResolveKind::AttributeValue
        | ResolveKind::Property
        | ResolveKind::BooleanAttribute => definition
            .attribute(&key.name)
            .map(|attr| docs::attribute_markdown(tag, attr)),
        ResolveKind::Event => definition
            .event(&key.name)
            .map(|event| docs::event_markdown(tag, event)),
        ResolveKind::Slot if key.name.is_empty() => Some(docs::slots_markdown(definition)),
        ResolveKind::Slot => definition
            .slot(&key.name)
            .map(|slot| docs::slot_markdown(tag, slot)),
    }
}

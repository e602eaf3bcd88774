//! Template binding completions
//!
//! Offered only when the cursor follows `@`, `.` or `?` inside a tagged
//! template. Labels carry the sigil so they match the typed prefix; the
//! inserted text is the bare name because the sigil is already there.

use super::matches_prefix;
use crate::manifest::is_custom_element_tag;
use crate::registry::RegistrySnapshot;
use crate::types::{Completion, CompletionKind, ResolveKey, ResolveKind};

/// `@event` candidates from the tag's declared events
pub fn event_binding_candidates(
    snapshot: &RegistrySnapshot,
    tag: &str,
    prefix: &str,
) -> Vec<Completion> {
    if !is_custom_element_tag(tag) {
        return Vec::new();
    }

    snapshot
        .events(tag)
        .iter()
        .map(|event| {
            let mut detail = format!("Event from <{}>", tag);
            let type_text = event.type_text();
            if !type_text.is_empty() {
                detail.push_str(&format!(" ({})", type_text));
            }

            Completion::new(format!("@{}", event.name), CompletionKind::Event)
                .with_insert_text(&event.name)
                .with_detail(detail)
                .with_deprecated(event.is_deprecated())
                .with_resolve(ResolveKey::new(ResolveKind::Event, tag, &event.name))
        })
        .filter(|item| matches_prefix(&item.label, prefix))
        .collect()
}

/// `.property` candidates from every declared attribute
pub fn property_binding_candidates(
    snapshot: &RegistrySnapshot,
    tag: &str,
    prefix: &str,
) -> Vec<Completion> {
    if !is_custom_element_tag(tag) {
        return Vec::new();
    }

    snapshot
        .attributes(tag)
        .iter()
        .map(|attr| {
            let mut detail = format!("Property binding for <{}>", tag);
            let type_text = attr.type_text();
            if !type_text.is_empty() {
                detail.push_str(&format!(" ({})", type_text));
            }

            Completion::new(format!(".{}", attr.name), CompletionKind::Property)
                .with_insert_text(&attr.name)
                .with_detail(detail)
                .with_deprecated(attr.is_deprecated())
                .with_resolve(ResolveKey::new(ResolveKind::Property, tag, &attr.name))
        })
        .filter(|item| matches_prefix(&item.label, prefix))
        .collect()
}

/// `?attribute` candidates from boolean attributes only
pub fn boolean_attribute_binding_candidates(
    snapshot: &RegistrySnapshot,
    tag: &str,
    prefix: &str,
) -> Vec<Completion> {
    if !is_custom_element_tag(tag) {
        return Vec::new();
    }

    snapshot
        .attributes(tag)
        .iter()
        .filter(|attr| attr.is_boolean())
        .map(|attr| {
            Completion::new(format!("?{}", attr.name), CompletionKind::Property)
                .with_insert_text(&attr.name)
                .with_detail(format!("Boolean attribute binding for <{}>", tag))
                .with_deprecated(attr.is_deprecated())
                .with_resolve(ResolveKey::new(ResolveKind::BooleanAttribute, tag, &attr.name))
        })
        .filter(|item| matches_prefix(&item.label, prefix))
        .collect()
}

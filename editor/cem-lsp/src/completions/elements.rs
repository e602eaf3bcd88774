//! Tag name completions

use super::matches_prefix;
use crate::registry::{ComponentDefinition, RegistrySnapshot};
use crate::types::{Completion, CompletionKind, ResolveKey, ResolveKind};

/// Complete registered tag names starting with `prefix`
pub fn tag_name_candidates(snapshot: &RegistrySnapshot, prefix: &str) -> Vec<Completion> {
    snapshot
        .all_tag_names()
        .filter(|tag| matches_prefix(tag, prefix))
        .filter_map(|tag| snapshot.definition(tag))
        .map(|definition| create_element_completion(definition))
        .collect()
}

fn create_element_completion(definition: &ComponentDefinition) -> Completion {
    let tag = definition.tag_name.as_str();

    let mut detail = format!("Custom element: {}", tag);
    if !definition.attributes.is_empty() {
        detail.push_str(&format!(" ({} attributes)", definition.attributes.len()));
    }

    Completion::new(tag, CompletionKind::Element)
        .with_insert_text(format!("{}>$0</{}>", tag, tag))
        .with_detail(detail)
        .with_resolve(ResolveKey::new(ResolveKind::Tag, tag, ""))
        .as_snippet()
        .replacing_prefix()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completions::fixtures::test_snapshot;

    fn labels(items: &[Completion]) -> Vec<&str> {
        items.iter().map(|i| i.label.as_str()).collect()
    }

    #[test]
    fn test_prefix_filters_tags() {
        let snapshot = test_snapshot();
        let items = tag_name_candidates(&snapshot, "my-c");
        assert_eq!(labels(&items), vec!["my-custom-element"]);
    }

    #[test]
    fn test_prefix_is_case_insensitive() {
        let snapshot = test_snapshot();
        let items = tag_name_candidates(&snapshot, "MY-C");
        assert_eq!(labels(&items), vec!["my-custom-element"]);
    }

    #[test]
    fn test_empty_prefix_lists_all() {
        let snapshot = test_snapshot();
        let items = tag_name_candidates(&snapshot, "");
        assert_eq!(items.len(), snapshot.len());
    }

    #[test]
    fn test_no_match() {
        let snapshot = test_snapshot();
        assert!(tag_name_candidates(&snapshot, "zz-").is_empty());
    }

    #[test]
    fn test_element_snippet() {
        let snapshot = test_snapshot();
        let items = tag_name_candidates(&snapshot, "my-button");
        let item = &items[0];

        assert_eq!(item.kind, CompletionKind::Element);
        assert_eq!(item.text_to_insert(), "my-button>$0</my-button>");
        assert!(item.is_snippet);
        assert!(item.replaces_prefix);
        assert_eq!(item.detail.as_deref(), Some("Custom element: my-button (4 attributes)"));
        assert_eq!(
            item.resolve,
            Some(ResolveKey::new(ResolveKind::Tag, "my-button", ""))
        );
    }
}

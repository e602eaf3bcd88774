//! Attribute value completions

use crate::manifest::{is_custom_element_tag, Attribute};
use crate::registry::RegistrySnapshot;
use crate::types::{Completion, CompletionAnalysis, CompletionKind, ResolveKey, ResolveKind};

/// Bare type names that are never offered as literal values
const TYPE_KEYWORDS: &[&str] = &[
    "string", "number", "boolean", "bigint", "object", "symbol", "undefined", "null", "any",
    "unknown", "never", "void",
];

const COLOR_VALUES: &[&str] = &["red", "blue", "green"];
const SIZE_VALUES: &[&str] = &["small", "medium", "large"];
const VARIANT_VALUES: &[&str] = &["primary", "secondary"];
const BOOLEAN_VALUES: &[&str] = &["true", "false"];

/// Where a value candidate came from; earlier variants win on label clashes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum ValueSource {
    Default,
    TypeDerived,
    Heuristic,
}

impl ValueSource {
    fn priority(self) -> u32 {
        match self {
            Self::Default => 0,
            Self::TypeDerived => 10,
            Self::Heuristic => 20,
        }
    }
}

/// Complete values for the attribute under the cursor.
///
/// `slot` values come from the parent element's named slots. Other
/// attributes combine type-derived literals, name heuristics and the
/// declared default. Boolean attributes get nothing.
pub fn attribute_value_candidates(
    snapshot: &RegistrySnapshot,
    analysis: &CompletionAnalysis,
) -> Vec<Completion> {
    let tag = analysis.tag_name.as_str();
    let attr_name = analysis.attribute_name.as_str();

    if attr_name == "slot" {
        return complete_slot_values(snapshot, &analysis.parent_tag);
    }

    if attr_name.is_empty() || !is_custom_element_tag(tag) {
        return Vec::new();
    }

    let Some(attr) = snapshot.definition(tag).and_then(|d| d.attribute(attr_name)) else {
        return Vec::new();
    };

    // Presence means true, absence false
    if attr.is_boolean() {
        return Vec::new();
    }

    let mut candidates: Vec<(ValueSource, Completion)> = Vec::new();

    for (value, detail) in parse_type_values(attr.type_text()) {
        candidates.push((ValueSource::TypeDerived, value_completion(tag, attr_name, value, detail)));
    }

    for (value, detail) in heuristic_values(attr) {
        candidates.push((
            ValueSource::Heuristic,
            value_completion(tag, attr_name, value.to_string(), detail),
        ));
    }

    if let Some(default) = default_value(attr) {
        let item = Completion::new(format!("{} (default)", default), CompletionKind::Value)
            .with_insert_text(default)
            .with_detail("Default value")
            .with_resolve(ResolveKey::new(ResolveKind::AttributeValue, tag, attr_name));
        candidates.push((ValueSource::Default, item));
    }

    deduplicate(candidates)
        .into_iter()
        .map(|(source, item)| item.with_priority(source.priority()))
        .collect()
}

/// Literal values derivable from a declared type, with their detail text.
///
/// `string` offers an empty string. Unions are split on `|`; each member
/// is trimmed and loses one layer of matching quotes, and bare type names
/// and array types are dropped. A lone quoted literal yields itself.
pub fn parse_type_values(type_text: &str) -> Vec<(String, &'static str)> {
    let type_text = type_text.trim();

    if type_text.eq_ignore_ascii_case("string") {
        return vec![("\"\"".to_string(), "Empty string")];
    }

    if type_text.contains('|') {
        let mut values: Vec<(String, &'static str)> = Vec::new();
        for member in type_text.split('|') {
            let member = member.trim();
            let (value, quoted) = match strip_quotes(member) {
                Some(inner) => (inner, true),
                None => (member, false),
            };
            if value.is_empty() || (!quoted && !is_literal_member(value)) {
                continue;
            }
            if !values.iter().any(|(existing, _)| existing == value) {
                values.push((value.to_string(), "Union type value"));
            }
        }
        return values;
    }

    match strip_quotes(type_text) {
        Some(literal) if !literal.is_empty() => vec![(literal.to_string(), "Literal type value")],
        _ => Vec::new(),
    }
}

/// Inner text of a value wrapped in one layer of matching quotes
fn strip_quotes(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(&open), Some(&close))
            if bytes.len() >= 2 && open == close && (open == b'"' || open == b'\'') =>
        {
            Some(&text[1..text.len() - 1])
        }
        _ => None,
    }
}

/// Unquoted union members that read as values rather than types
fn is_literal_member(member: &str) -> bool {
    let is_keyword = TYPE_KEYWORDS
        .iter()
        .any(|keyword| member.eq_ignore_ascii_case(keyword));
    let is_array = member.ends_with("[]") || member.starts_with("Array<");
    !is_keyword && !is_array
}

/// Suggestions guessed from the attribute's name; first matching
/// vocabulary only
fn heuristic_values(attr: &Attribute) -> Vec<(&'static str, &'static str)> {
    let name = attr.name.to_lowercase();

    let (values, detail) = if contains_any(&name, &["color", "colour"]) {
        (COLOR_VALUES, "Color value")
    } else if contains_any(&name, &["size", "width", "height"]) {
        (SIZE_VALUES, "Size value")
    } else if contains_any(&name, &["variant", "type", "kind"]) {
        (VARIANT_VALUES, "Variant value")
    } else if !attr.is_boolean() && contains_any(&name, &["disabled", "hidden", "readonly"]) {
        (BOOLEAN_VALUES, "Boolean value")
    } else {
        return Vec::new();
    };

    values.iter().map(|value| (*value, detail)).collect()
}

fn contains_any(name: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| name.contains(needle))
}

/// Declared default with one layer of source quotes removed
fn default_value(attr: &Attribute) -> Option<&str> {
    let default = attr.default.as_deref()?.trim();
    let value = strip_quotes(default).unwrap_or(default);
    (!value.is_empty()).then_some(value)
}

fn value_completion(tag: &str, attr_name: &str, value: String, detail: &str) -> Completion {
    Completion::new(value, CompletionKind::Value)
        .with_detail(detail)
        .with_resolve(ResolveKey::new(ResolveKind::AttributeValue, tag, attr_name))
}

/// Keep one candidate per label: the best source wins, ties keep the first
fn deduplicate(candidates: Vec<(ValueSource, Completion)>) -> Vec<(ValueSource, Completion)> {
    let mut result: Vec<(ValueSource, Completion)> = Vec::with_capacity(candidates.len());

    for (source, item) in candidates {
        match result.iter_mut().find(|(_, kept)| kept.label == item.label) {
            Some(existing) if source < existing.0 => *existing = (source, item),
            Some(_) => {}
            None => result.push((source, item)),
        }
    }

    result
}

/// Named slots of the parent element
fn complete_slot_values(snapshot: &RegistrySnapshot, parent: &str) -> Vec<Completion> {
    let Some(definition) = snapshot.definition(parent) else {
        return Vec::new();
    };

    definition
        .named_slots()
        .into_iter()
        .map(|slot| {
            Completion::new(&slot.name, CompletionKind::Value)
                .with_detail(format!("Slot in <{}>", parent))
                .with_priority(10)
                .with_resolve(ResolveKey::new(ResolveKind::Slot, parent, &slot.name))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completions::fixtures::test_snapshot;
    use std::collections::BTreeSet;

    fn labels(items: &[Completion]) -> BTreeSet<&str> {
        items.iter().map(|i| i.label.as_str()).collect()
    }

    fn values_for(tag: &str, attr: &str) -> Vec<Completion> {
        let snapshot = test_snapshot();
        let analysis = CompletionAnalysis::attribute_value(tag, attr, "", "");
        attribute_value_candidates(&snapshot, &analysis)
    }

    fn type_labels(type_text: &str) -> Vec<String> {
        parse_type_values(type_text)
            .into_iter()
            .map(|(value, _)| value)
            .collect()
    }

    // ========================================================================
    // Type parsing
    // ========================================================================

    #[test]
    fn test_union_mixed_quotes() {
        assert_eq!(type_labels("\"a\" | 'b' | \"c\""), vec!["a", "b", "c"]);
        assert_eq!(type_labels("'a'|'b'|'c'"), vec!["a", "b", "c"]);
        assert_eq!(type_labels("  \"a\"  |\t'b' |\n\"c\"  "), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_union_duplicates_removed() {
        assert_eq!(type_labels("'a' | \"a\" | 'b'"), vec!["a", "b"]);
    }

    #[test]
    fn test_union_drops_type_members() {
        assert_eq!(type_labels("\"text\" | \"email\" | undefined"), vec!["text", "email"]);
        assert_eq!(type_labels("'x' | string[] | Array<number> | null"), vec!["x"]);
        assert_eq!(type_labels("'string' | 'number'"), vec!["string", "number"]);
    }

    #[test]
    fn test_union_bare_literals() {
        assert_eq!(type_labels("1 | 2 | 3"), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_single_literal() {
        assert_eq!(type_labels("'x'"), vec!["x"]);
        assert_eq!(type_labels("\"promo\""), vec!["promo"]);
        assert!(type_labels("''").is_empty());
        assert!(type_labels("'x\"").is_empty());
    }

    #[test]
    fn test_string_type() {
        assert_eq!(type_labels("string"), vec!["\"\""]);
        assert_eq!(parse_type_values("String")[0].1, "Empty string");
    }

    #[test]
    fn test_types_without_values() {
        assert!(type_labels("boolean").is_empty());
        assert!(type_labels("number").is_empty());
        assert!(type_labels("string[]").is_empty());
        assert!(type_labels("").is_empty());
    }

    // ========================================================================
    // Candidates
    // ========================================================================

    #[test]
    fn test_boolean_attribute_has_no_values() {
        assert!(values_for("my-button", "disabled").is_empty());
        assert!(values_for("my-input", "readonly").is_empty());
    }

    #[test]
    fn test_union_values() {
        let items = values_for("my-button", "variant");
        let expected: BTreeSet<&str> = ["primary", "secondary", "danger"].into_iter().collect();
        assert_eq!(labels(&items), expected);
    }

    #[test]
    fn test_type_derived_wins_over_heuristic() {
        let items = values_for("my-button", "variant");
        let primary = items.iter().find(|i| i.label == "primary").unwrap();
        assert_eq!(primary.detail.as_deref(), Some("Union type value"));
        assert_eq!(primary.sort_priority, 10);
        assert_eq!(items.iter().filter(|i| i.label == "primary").count(), 1);
    }

    #[test]
    fn test_default_value() {
        let items = values_for("my-button", "size");
        let default = items.iter().find(|i| i.label == "medium (default)").unwrap();

        assert_eq!(default.text_to_insert(), "medium");
        assert_eq!(default.detail.as_deref(), Some("Default value"));
        assert_eq!(default.sort_priority, 0);
        assert!(items
            .iter()
            .filter(|i| i.label != "medium (default)")
            .all(|i| i.sort_priority > 0));

        let expected: BTreeSet<&str> = ["small", "medium", "large", "medium (default)"]
            .into_iter()
            .collect();
        assert_eq!(labels(&items), expected);
    }

    #[test]
    fn test_single_literal_candidate() {
        let items = values_for("my-input", "placeholder");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "Search");
        assert_eq!(items[0].detail.as_deref(), Some("Literal type value"));
    }

    #[test]
    fn test_heuristics() {
        let items = values_for("my-custom-element", "color");
        let expected: BTreeSet<&str> = ["red", "blue", "green"].into_iter().collect();
        assert_eq!(labels(&items), expected);
        assert!(items.iter().all(|i| i.sort_priority == 20));

        let items = values_for("my-custom-element", "hidden-label");
        let expected: BTreeSet<&str> = ["\"\"", "true", "false"].into_iter().collect();
        assert_eq!(labels(&items), expected);
    }

    #[test]
    fn test_number_with_default() {
        let items = values_for("my-custom-element", "count");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "0 (default)");
    }

    #[test]
    fn test_array_type_yields_nothing() {
        assert!(values_for("my-custom-element", "items").is_empty());
    }

    #[test]
    fn test_unknown_attribute_or_tag() {
        assert!(values_for("my-button", "missing").is_empty());
        assert!(values_for("other-element", "size").is_empty());
        assert!(values_for("button", "size").is_empty());
    }

    // ========================================================================
    // Slot values
    // ========================================================================

    #[test]
    fn test_slot_values_from_parent() {
        let snapshot = test_snapshot();
        let analysis = CompletionAnalysis::attribute_value("button", "slot", "", "card-element");
        let items = attribute_value_candidates(&snapshot, &analysis);

        assert_eq!(items.len(), 3);
        let expected: BTreeSet<&str> = ["header", "footer", "actions"].into_iter().collect();
        assert_eq!(labels(&items), expected);
        assert_eq!(items[0].detail.as_deref(), Some("Slot in <card-element>"));
        assert_eq!(
            items[0].resolve,
            Some(ResolveKey::new(ResolveKind::Slot, "card-element", "header"))
        );
    }

    #[test]
    fn test_slot_values_without_custom_parent() {
        let snapshot = test_snapshot();
        let analysis = CompletionAnalysis::attribute_value("button", "slot", "", "");
        assert!(attribute_value_candidates(&snapshot, &analysis).is_empty());

        let analysis = CompletionAnalysis::attribute_value("button", "slot", "", "my-button");
        assert!(attribute_value_candidates(&snapshot, &analysis).is_empty());
    }

    #[test]
    fn test_slot_values_nearest_parent() {
        let snapshot = test_snapshot();
        let analysis = CompletionAnalysis::attribute_value("button", "slot", "", "dialog-element");
        let items = attribute_value_candidates(&snapshot, &analysis);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "title");
    }
}

//! Tree-based context classification
//!
//! Walks up from the tree-sitter-html node covering the byte before the
//! cursor. Only positions the tree places on a tag or attribute token are
//! classified. Everything else returns `None` and is left to the scanner:
//! text, end tags, error regions, repaired tags, and whitespace after a
//! start tag that has no `>` yet (which the parser reads as text).

use crate::manifest::is_custom_element_tag;
use crate::types::CompletionAnalysis;
use tree_sitter::{Node, Tree};

/// Classify `offset` using the HTML tree of `text`.
///
/// Never returns [`ContextKind::Unknown`](crate::types::ContextKind::Unknown).
pub fn classify(tree: &Tree, text: &str, offset: usize) -> Option<CompletionAnalysis> {
    if offset == 0 || offset > text.len() || !text.is_char_boundary(offset) {
        return None;
    }

    let root = tree.root_node();
    let node = root.descendant_for_byte_range(offset - 1, offset)?;

    if has_error_ancestor(node) {
        return None;
    }
    if let Some(tag) = enclosing_tag(node) {
        if tag.has_error() {
            return None;
        }
    }

    let mut current = Some(node);
    while let Some(node) = current {
        match node.kind() {
            "attribute_name" => {
                let tag = enclosing_tag(node)?;
                let prefix = text.get(node.start_byte()..offset)?;
                return Some(CompletionAnalysis::attribute_name(
                    tag_name(tag, text),
                    prefix,
                    parent_custom_tag(tag, text),
                ));
            }
            "quoted_attribute_value" => return quoted_value(node, text, offset),
            "attribute_value" => {
                if node
                    .parent()
                    .is_some_and(|parent| parent.kind() == "quoted_attribute_value")
                {
                    current = node.parent();
                    continue;
                }
                let prefix = text.get(node.start_byte()..offset)?;
                return attribute_value(node, text, prefix);
            }
            "attribute" => {
                // Only reached on the `=` token
                return attribute_value(node, text, "");
            }
            "tag_name" => {
                let tag = node.parent()?;
                if !matches!(tag.kind(), "start_tag" | "self_closing_tag") {
                    return None;
                }
                let prefix = text.get(node.start_byte()..offset)?;
                return Some(CompletionAnalysis::tag_name(
                    prefix,
                    parent_custom_tag(tag, text),
                ));
            }
            "start_tag" | "self_closing_tag" => return inside_tag(node, text, offset),
            "end_tag" | "erroneous_end_tag" | "text" | "raw_text" | "comment" | "doctype"
            | "entity" | "element" | "script_element" | "style_element" | "document" => {
                return None;
            }
            _ => current = node.parent(),
        }
    }

    None
}

/// Cursor on a token of a start tag itself (`<`, whitespace, `/>`, `>`)
fn inside_tag(tag: Node, text: &str, offset: usize) -> Option<CompletionAnalysis> {
    let before = text.as_bytes()[offset - 1];

    if offset >= tag.end_byte() || before == b'/' {
        return None;
    }
    if before == b'<' {
        return Some(CompletionAnalysis::tag_name("", parent_custom_tag(tag, text)));
    }
    Some(CompletionAnalysis::attribute_name(
        tag_name(tag, text),
        "",
        parent_custom_tag(tag, text),
    ))
}

/// Cursor within or just after a quoted value
fn quoted_value(node: Node, text: &str, offset: usize) -> Option<CompletionAnalysis> {
    let start = node.start_byte();
    let end = node.end_byte();
    let bytes = text.as_bytes();
    let closed = end - start >= 2 && bytes.get(end - 1) == bytes.get(start);

    if closed && offset >= end {
        let tag = enclosing_tag(node)?;
        return Some(CompletionAnalysis::attribute_name(
            tag_name(tag, text),
            "",
            parent_custom_tag(tag, text),
        ));
    }

    let prefix = text.get(start + 1..offset).unwrap_or("");
    attribute_value(node, text, prefix)
}

fn attribute_value(node: Node, text: &str, prefix: &str) -> Option<CompletionAnalysis> {
    let attribute = ancestor_of_kind(node, &["attribute"])?;
    let tag = enclosing_tag(attribute)?;
    let name = child_of_kind(attribute, "attribute_name")
        .map(|name| node_text(name, text))
        .unwrap_or("");

    Some(CompletionAnalysis::attribute_value(
        tag_name(tag, text),
        name,
        prefix,
        parent_custom_tag(tag, text),
    ))
}

/// Nearest custom element enclosing the element that owns `tag`
fn parent_custom_tag<'t>(tag: Node, text: &'t str) -> &'t str {
    let mut current = tag.parent().and_then(|element| element.parent());

    while let Some(node) = current {
        if node.kind() == "element" {
            let name = child_of_kind(node, "start_tag")
                .or_else(|| child_of_kind(node, "self_closing_tag"))
                .map(|start| tag_name(start, text))
                .unwrap_or("");
            if is_custom_element_tag(name) {
                return name;
            }
        }
        current = node.parent();
    }

    ""
}

fn tag_name<'t>(tag: Node, text: &'t str) -> &'t str {
    child_of_kind(tag, "tag_name")
        .map(|name| node_text(name, text))
        .unwrap_or("")
}

fn enclosing_tag(node: Node) -> Option<Node> {
    ancestor_of_kind(node, &["start_tag", "self_closing_tag"])
}

fn ancestor_of_kind<'tree>(node: Node<'tree>, kinds: &[&str]) -> Option<Node<'tree>> {
    let mut current = Some(node);
    while let Some(node) = current {
        if kinds.contains(&node.kind()) {
            return Some(node);
        }
        current = node.parent();
    }
    None
}

fn child_of_kind<'tree>(node: Node<'tree>, kind: &str) -> Option<Node<'tree>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}

fn has_error_ancestor(node: Node) -> bool {
    let mut current = Some(node);
    while let Some(node) = current {
        if node.is_error() || node.is_missing() {
            return true;
        }
        current = node.parent();
    }
    false
}

fn node_text<'t>(node: Node, text: &'t str) -> &'t str {
    text.get(node.byte_range()).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse::{parse, Grammar};
    use crate::types::ContextKind;

    /// Classify at the `|` marker
    fn at_cursor(marked: &str) -> Option<CompletionAnalysis> {
        let offset = marked.find('|').expect("cursor marker");
        let text = marked.replacen('|', "", 1);
        let tree = parse(&text, Grammar::Html).expect("html tree");
        classify(&tree, &text, offset)
    }

    // ========================================================================
    // Well-formed markup
    // ========================================================================

    #[test]
    fn test_start_of_document() {
        assert!(at_cursor("|<my-el></my-el>").is_none());
    }

    #[test]
    fn test_tag_name() {
        let analysis = at_cursor("<card-element><my-b|></my-b></card-element>").unwrap();
        assert_eq!(analysis.kind, ContextKind::TagName);
        assert_eq!(analysis.prefix, "my-b");
        assert_eq!(analysis.parent_tag, "card-element");
    }

    #[test]
    fn test_attribute_name() {
        let analysis = at_cursor("<my-button si|ze=\"large\"></my-button>").unwrap();
        assert_eq!(analysis.kind, ContextKind::AttributeName);
        assert_eq!(analysis.tag_name, "my-button");
        assert_eq!(analysis.prefix, "si");
    }

    #[test]
    fn test_whitespace_in_tag() {
        let analysis = at_cursor("<my-button |></my-button>").unwrap();
        assert_eq!(analysis.kind, ContextKind::AttributeName);
        assert_eq!(analysis.tag_name, "my-button");
        assert_eq!(analysis.prefix, "");
    }

    #[test]
    fn test_quoted_value() {
        let analysis = at_cursor("<my-button size=\"me|\"></my-button>").unwrap();
        assert_eq!(analysis.kind, ContextKind::AttributeValue);
        assert_eq!(analysis.attribute_name, "size");
        assert_eq!(analysis.prefix, "me");
    }

    #[test]
    fn test_empty_quoted_value() {
        let analysis = at_cursor("<my-button size=\"|\"></my-button>").unwrap();
        assert_eq!(analysis.kind, ContextKind::AttributeValue);
        assert_eq!(analysis.tag_name, "my-button");
        assert_eq!(analysis.attribute_name, "size");
        assert_eq!(analysis.prefix, "");
    }

    #[test]
    fn test_after_closing_quote() {
        let analysis = at_cursor("<my-button size=\"large\"|></my-button>").unwrap();
        assert_eq!(analysis.kind, ContextKind::AttributeName);
        assert_eq!(analysis.prefix, "");
    }

    #[test]
    fn test_unquoted_value() {
        let analysis = at_cursor("<my-button size=lar|></my-button>").unwrap();
        assert_eq!(analysis.kind, ContextKind::AttributeValue);
        assert_eq!(analysis.attribute_name, "size");
        assert_eq!(analysis.prefix, "lar");
    }

    #[test]
    fn test_text_content_defers() {
        assert!(at_cursor("<my-button>Click| me</my-button>").is_none());
    }

    #[test]
    fn test_after_start_tag_defers() {
        assert!(at_cursor("<my-button>|</my-button>").is_none());
    }

    #[test]
    fn test_end_tag_name_defers() {
        assert!(at_cursor("<my-button></my-b|utton>").is_none());
    }

    #[test]
    fn test_self_closing_slash_defers() {
        assert!(at_cursor("<my-el /|>").is_none());
    }

    #[test]
    fn test_slot_parent_skips_standard_elements() {
        let analysis =
            at_cursor("<card-element><div><button slot=\"|\"></button></div></card-element>")
                .unwrap();
        assert_eq!(analysis.kind, ContextKind::AttributeValue);
        assert_eq!(analysis.tag_name, "button");
        assert_eq!(analysis.parent_tag, "card-element");
    }

    #[test]
    fn test_slot_parent_nearest() {
        let analysis = at_cursor(
            "<card-element><dialog-element><button slot=\"|\"></button></dialog-element></card-element>",
        )
        .unwrap();
        assert_eq!(analysis.parent_tag, "dialog-element");
    }

    #[test]
    fn test_own_tag_is_not_parent() {
        let analysis = at_cursor("<card-element slot=\"|\"></card-element>").unwrap();
        assert_eq!(analysis.parent_tag, "");
    }

    // ========================================================================
    // Malformed markup
    // ========================================================================

    #[test]
    fn test_error_region_defers_to_scanner() {
        assert!(at_cursor("<card-element><<button slot=\"|").is_none());
    }

    #[test]
    fn test_space_after_unclosed_start_tag_defers() {
        assert!(at_cursor("<my-button |").is_none());
        assert!(at_cursor("<div>\n  <my-button |\n</div>").is_none());
        assert!(at_cursor("<card-element>\n  <button |\n</card-element>").is_none());
        assert!(at_cursor("<my-button size=\"large\" |").is_none());
    }

    #[test]
    fn test_offset_past_end() {
        let text = "<a>";
        let tree = parse(text, Grammar::Html).unwrap();
        assert!(classify(&tree, text, 10).is_none());
    }
}

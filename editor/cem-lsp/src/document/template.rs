//! Markup regions inside script documents
//!
//! Two shapes are recognised: template literals tagged with `html`/`svg`
//! (the Lit convention, where `@`, `.` and `?` bindings are meaningful) and
//! string literals assigned to `innerHTML`/`outerHTML`. Regions come from
//! the host-language tree when it has a literal at the offset, and from a
//! text scan otherwise (an unterminated literal while typing).

use super::parse::{parse, Grammar};
use crate::types::TemplateContext;
use std::ops::Range;
use tree_sitter::{Node, Tree};

const TEMPLATE_TAGS: &[&str] = &["html", "svg"];
const MARKUP_SINKS: &[&str] = &["innerHTML", "outerHTML"];

/// Byte written over `${...}` substitutions
const MASK: u8 = b'_';

/// Markup content of one literal
#[derive(Debug, Clone)]
pub struct TemplateRegion {
    /// Tagged template or markup sink
    pub context: TemplateContext,
    /// Document byte range of the literal's content
    pub content: Range<usize>,
    /// Substitution ranges relative to `content.start`
    pub substitutions: Vec<Range<usize>>,
    /// Content with substitutions masked byte-for-byte
    pub markup: String,
    /// HTML parse of `markup`
    pub tree: Option<Tree>,
}

impl TemplateRegion {
    fn new(
        context: TemplateContext,
        text: &str,
        content: Range<usize>,
        substitutions: Vec<Range<usize>>,
        with_tree: bool,
    ) -> Self {
        let markup = mask(&text[content.clone()], &substitutions);
        let tree = if with_tree {
            parse(&markup, Grammar::Html)
        } else {
            None
        };
        Self {
            context,
            content,
            substitutions,
            markup,
            tree,
        }
    }

    /// Whether a document offset falls inside the content
    pub fn contains(&self, offset: usize) -> bool {
        self.content.start <= offset && offset <= self.content.end
    }

    /// Whether a content-relative offset is inside a `${...}`
    pub fn in_substitution(&self, local: usize) -> bool {
        self.substitutions
            .iter()
            .any(|range| range.start < local && local < range.end)
    }
}

fn mask(content: &str, substitutions: &[Range<usize>]) -> String {
    let mut bytes = content.as_bytes().to_vec();
    for range in substitutions {
        let end = range.end.min(bytes.len());
        if range.start < end {
            bytes[range.start..end].fill(MASK);
        }
    }
    String::from_utf8(bytes).unwrap_or_else(|_| content.to_string())
}

// ============================================================================
// Structural detection
// ============================================================================

/// Every markup region the host-language tree exposes, in document order
pub fn find_regions(tree: &Tree, text: &str) -> Vec<TemplateRegion> {
    let mut regions = Vec::new();
    let mut cursor = tree.walk();

    loop {
        let node = cursor.node();
        if let Some(region) = region_for(node, text) {
            regions.push(region);
        }

        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return regions;
            }
        }
    }
}

fn region_for(node: Node, text: &str) -> Option<TemplateRegion> {
    let kind = node.kind();
    if kind != "template_string" && kind != "string" {
        return None;
    }

    let context = literal_context(node, text)?;
    let content = literal_content(node, text)?;

    let substitutions = if kind == "template_string" {
        let mut walker = node.walk();
        node.named_children(&mut walker)
            .filter(|child| child.kind() == "template_substitution")
            .map(|child| {
                let start = child.start_byte().saturating_sub(content.start);
                let end = child.end_byte().saturating_sub(content.start);
                start..end
            })
            .collect()
    } else {
        Vec::new()
    };

    Some(TemplateRegion::new(context, text, content, substitutions, true))
}

fn literal_context(node: Node, text: &str) -> Option<TemplateContext> {
    let parent = node.parent()?;

    match parent.kind() {
        "call_expression" if node.kind() == "template_string" => {
            let function = parent.child_by_field_name("function")?;
            let is_argument = parent.child_by_field_name("arguments") == Some(node);
            (is_argument && is_template_tag(function, text)).then_some(TemplateContext::TaggedTemplate)
        }
        "assignment_expression" | "augmented_assignment_expression" => {
            let left = parent.child_by_field_name("left")?;
            let right = parent.child_by_field_name("right")?;
            (right == node && is_markup_sink(left, text)).then_some(TemplateContext::MarkupSink)
        }
        _ => None,
    }
}

fn is_template_tag(function: Node, text: &str) -> bool {
    let name = match function.kind() {
        "identifier" => node_text(function, text),
        "member_expression" => function
            .child_by_field_name("property")
            .and_then(|property| node_text(property, text)),
        _ => None,
    };
    name.is_some_and(|name| TEMPLATE_TAGS.contains(&name))
}

fn is_markup_sink(left: Node, text: &str) -> bool {
    left.kind() == "member_expression"
        && left
            .child_by_field_name("property")
            .and_then(|property| node_text(property, text))
            .is_some_and(|name| MARKUP_SINKS.contains(&name))
}

/// Content range between the delimiters; an unterminated literal runs to
/// the node's end
fn literal_content(node: Node, text: &str) -> Option<Range<usize>> {
    let bytes = text.as_bytes();
    let start = node.start_byte();
    let end = node.end_byte().min(bytes.len());
    if start >= end {
        return None;
    }

    let open = bytes[start];
    let content_start = start + 1;
    let content_end = if end - start >= 2 && bytes[end - 1] == open {
        end - 1
    } else {
        end
    };

    (content_start <= content_end).then_some(content_start..content_end)
}

fn node_text<'a>(node: Node, text: &'a str) -> Option<&'a str> {
    text.get(node.start_byte()..node.end_byte())
}

// ============================================================================
// Text scan fallback
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lex {
    Code,
    LineComment,
    BlockComment,
    Quoted(u8),
    Template,
}

/// Literal open at `offset`, found by lexing the text before it.
///
/// Returns the region from the literal's opening delimiter up to `offset`,
/// or `None` when `offset` is in code, a comment, a substitution, or a
/// literal that is neither tagged nor assigned to a markup sink.
pub fn scan_region(text: &str, offset: usize) -> Option<TemplateRegion> {
    let bytes = text.as_bytes();
    let offset = offset.min(bytes.len());

    let mut state = Lex::Code;
    // Open template literals: (opening backtick, closed substitutions)
    let mut templates: Vec<(usize, Vec<Range<usize>>)> = Vec::new();
    // Brace depth of each open substitution, innermost last
    let mut braces: Vec<(usize, usize)> = Vec::new();
    let mut quote_start = 0usize;

    let mut i = 0usize;
    while i < offset {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();

        match state {
            Lex::Code => match b {
                b'/' if next == Some(b'/') => {
                    state = Lex::LineComment;
                    i += 1;
                }
                b'/' if next == Some(b'*') => {
                    state = Lex::BlockComment;
                    i += 1;
                }
                b'"' | b'\'' => {
                    state = Lex::Quoted(b);
                    quote_start = i;
                }
                b'`' => {
                    templates.push((i, Vec::new()));
                    state = Lex::Template;
                }
                b'{' => {
                    if let Some((_, depth)) = braces.last_mut() {
                        *depth += 1;
                    }
                }
                b'}' => match braces.last_mut() {
                    Some((_, depth)) if *depth > 0 => *depth -= 1,
                    Some(_) => {
                        if let Some((start, _)) = braces.pop() {
                            if let Some((open, subs)) = templates.last_mut() {
                                subs.push(start - (*open + 1)..i + 1 - (*open + 1));
                            }
                        }
                        state = Lex::Template;
                    }
                    None => {}
                },
                _ => {}
            },
            Lex::LineComment => {
                if b == b'\n' {
                    state = Lex::Code;
                }
            }
            Lex::BlockComment => {
                if b == b'*' && next == Some(b'/') {
                    state = Lex::Code;
                    i += 1;
                }
            }
            Lex::Quoted(quote) => {
                if b == b'\\' {
                    i += 1;
                } else if b == quote || b == b'\n' {
                    state = Lex::Code;
                }
            }
            Lex::Template => match b {
                b'\\' => i += 1,
                b'`' => {
                    templates.pop();
                    state = Lex::Code;
                }
                b'$' if next == Some(b'{') => {
                    braces.push((i, 0));
                    state = Lex::Code;
                    i += 1;
                }
                _ => {}
            },
        }
        i += 1;
    }

    let (open, substitutions) = match state {
        Lex::Template => templates.pop()?,
        Lex::Quoted(_) => (quote_start, Vec::new()),
        _ => return None,
    };

    let context = context_before(&text[..open], bytes[open])?;
    let content = (open + 1).min(offset)..offset;
    Some(TemplateRegion::new(context, text, content, substitutions, false))
}

/// Classify a literal from the code that precedes its opening delimiter
fn context_before(before: &str, delimiter: u8) -> Option<TemplateContext> {
    let trimmed = before.trim_end();

    if delimiter == b'`' {
        let tag_end = strip_type_arguments(trimmed);
        let ident = trailing_identifier(tag_end);
        if TEMPLATE_TAGS.contains(&ident) {
            return Some(TemplateContext::TaggedTemplate);
        }
    }

    let lhs = trimmed
        .strip_suffix("+=")
        .or_else(|| trimmed.strip_suffix('='))?;
    if lhs.ends_with(|c| matches!(c, '=' | '!' | '<' | '>')) {
        return None;
    }
    let lhs = lhs.trim_end();
    let property = trailing_identifier(lhs);
    let is_member = lhs[..lhs.len() - property.len()].trim_end().ends_with('.');

    (is_member && MARKUP_SINKS.contains(&property)).then_some(TemplateContext::MarkupSink)
}

/// `html<Foo>` -> `html`
fn strip_type_arguments(text: &str) -> &str {
    if !text.ends_with('>') {
        return text;
    }
    let mut depth = 0usize;
    for (idx, ch) in text.char_indices().rev() {
        match ch {
            '>' => depth += 1,
            '<' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return text[..idx].trim_end();
                }
            }
            _ => {}
        }
    }
    text
}

fn trailing_identifier(text: &str) -> &str {
    let start = text
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_alphanumeric() || *c == '_' || *c == '$')
        .last()
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    &text[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regions(source: &str) -> Vec<TemplateRegion> {
        let tree = parse(source, Grammar::TypeScript).unwrap();
        find_regions(&tree, source)
    }

    // ========================================================================
    // Structural detection
    // ========================================================================

    #[test]
    fn test_tagged_template() {
        let source = "const t = html`<my-el size=\"s\"></my-el>`;";
        let found = regions(source);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].context, TemplateContext::TaggedTemplate);
        assert_eq!(found[0].markup, "<my-el size=\"s\"></my-el>");
        assert!(found[0].tree.is_some());
    }

    #[test]
    fn test_member_tag() {
        let found = regions("const t = lit.html`<my-el></my-el>`;");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].context, TemplateContext::TaggedTemplate);
    }

    #[test]
    fn test_svg_tag() {
        let found = regions("const t = svg`<circle></circle>`;");
        assert_eq!(found[0].context, TemplateContext::TaggedTemplate);
    }

    #[test]
    fn test_untagged_template_ignored() {
        assert!(regions("const t = `<my-el></my-el>`;").is_empty());
        assert!(regions("const t = css`:host { color: red }`;").is_empty());
    }

    #[test]
    fn test_inner_html_template() {
        let found = regions("el.innerHTML = `<my-el></my-el>`;");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].context, TemplateContext::MarkupSink);
    }

    #[test]
    fn test_inner_html_string() {
        let found = regions("el.outerHTML = '<my-el></my-el>';");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].context, TemplateContext::MarkupSink);
        assert_eq!(found[0].markup, "<my-el></my-el>");
    }

    #[test]
    fn test_plain_assignment_ignored() {
        assert!(regions("el.textContent = '<my-el>';").is_empty());
        assert!(regions("const s = '<my-el>';").is_empty());
    }

    #[test]
    fn test_substitutions_masked() {
        let source = "html`<my-el .value=${x} a=\"${y}\"></my-el>`";
        let found = regions(source);
        assert_eq!(found.len(), 1);
        let region = &found[0];
        assert_eq!(region.markup.len(), region.content.len());
        assert_eq!(region.markup, "<my-el .value=____ a=\"____\"></my-el>");
        assert_eq!(region.substitutions.len(), 2);

        let sub = region.substitutions[0].clone();
        assert!(region.in_substitution(sub.start + 1));
        assert!(!region.in_substitution(sub.start));
        assert!(!region.in_substitution(sub.end));
    }

    #[test]
    fn test_nested_templates() {
        let source = "html`<ul>${items.map(i => html`<li></li>`)}</ul>`";
        let found = regions(source);
        assert_eq!(found.len(), 2);
        assert!(found
            .iter()
            .all(|r| r.context == TemplateContext::TaggedTemplate));
    }

    #[test]
    fn test_contains() {
        let source = "html`<a>`";
        let region = &regions(source)[0];
        assert_eq!(region.content, 5..8);
        assert!(region.contains(5));
        assert!(region.contains(8));
        assert!(!region.contains(4));
        assert!(!region.contains(9));
    }

    // ========================================================================
    // Text scan
    // ========================================================================

    #[test]
    fn test_scan_unterminated_tagged_template() {
        let source = "const t = html`\n  <my-element @cli";
        let region = scan_region(source, source.len()).unwrap();
        assert_eq!(region.context, TemplateContext::TaggedTemplate);
        assert_eq!(region.markup, "\n  <my-element @cli");
        assert!(region.tree.is_none());
    }

    #[test]
    fn test_scan_generic_tag() {
        let source = "render() { return html<Props>`<my-el ";
        let region = scan_region(source, source.len()).unwrap();
        assert_eq!(region.context, TemplateContext::TaggedTemplate);
    }

    #[test]
    fn test_scan_inner_html() {
        let source = "element.innerHTML = `\n  <my-element @cli";
        let region = scan_region(source, source.len()).unwrap();
        assert_eq!(region.context, TemplateContext::MarkupSink);

        let source = "element.innerHTML += \"<my-el ";
        let region = scan_region(source, source.len()).unwrap();
        assert_eq!(region.context, TemplateContext::MarkupSink);
        assert_eq!(region.markup, "<my-el ");
    }

    #[test]
    fn test_scan_code_position() {
        let source = "const a = html`<b></b>`; const c = ";
        assert!(scan_region(source, source.len()).is_none());
    }

    #[test]
    fn test_scan_inside_substitution() {
        let source = "html`<my-el .value=${foo";
        assert!(scan_region(source, source.len()).is_none());
    }

    #[test]
    fn test_scan_after_substitution() {
        let source = "html`<my-el .value=${{a: 1}} ";
        let region = scan_region(source, source.len()).unwrap();
        assert_eq!(region.markup, "<my-el .value=_________ ");
    }

    #[test]
    fn test_scan_ignores_comments_and_strings() {
        let source = "// html`\nconst s = '`'; const t = html`<x-y ";
        let region = scan_region(source, source.len()).unwrap();
        assert_eq!(region.markup, "<x-y ");
    }

    #[test]
    fn test_scan_comparison_is_not_sink() {
        let source = "if (el.innerHTML == `<x-y ";
        assert!(scan_region(source, source.len()).is_none());
    }

    #[test]
    fn test_scan_offset_past_end() {
        let source = "html`<x-y";
        let region = scan_region(source, 100).unwrap();
        assert_eq!(region.markup, "<x-y");
    }

    #[test]
    fn test_trailing_identifier() {
        assert_eq!(trailing_identifier("return html"), "html");
        assert_eq!(trailing_identifier("el.innerHTML"), "innerHTML");
        assert_eq!(trailing_identifier("x = "), "");
    }
}

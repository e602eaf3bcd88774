//! Fallback context scanner
//!
//! Lexes raw markup from the start of the text up to the cursor, tracking
//! the tag under construction and the stack of open elements. It accepts
//! anything: stray `<`, unterminated tags and quotes, mismatched end tags,
//! comments and script/style bodies containing fake tags. A tag that is
//! interrupted by another `<` is abandoned.

use crate::manifest::is_custom_element_tag;
use crate::types::CompletionAnalysis;

/// Elements that never have content and are never pushed as parents
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose content is raw text
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Between tags
    Content,
    /// Just after `<`
    TagOpen,
    /// Reading a start tag name
    TagName { start: usize },
    /// Inside `</...>`
    EndTag { start: usize },
    /// Inside a start tag, between attributes
    BeforeAttr,
    /// Reading an attribute name
    AttrName { start: usize },
    /// Whitespace after an attribute name
    AfterAttrName,
    /// After `=`
    BeforeValue,
    QuotedValue { quote: u8, start: usize },
    UnquotedValue { start: usize },
    /// `<!-- ... -->`
    Comment,
    /// `<!doctype>`, `<?...>`
    Declaration,
    /// Body of a script or style element
    RawText,
}

struct Scanner<'a> {
    text: &'a str,
    state: State,
    /// Tag of the start tag under construction
    tag: &'a str,
    /// Attribute whose value is being read
    attr: &'a str,
    /// `/` seen right before a potential `>`
    slash: bool,
    /// Open elements, outermost first
    stack: Vec<&'a str>,
    /// End-tag name that leaves raw text
    raw_text_tag: &'a str,
}

/// Classify `offset` in `text` without a parse tree.
///
/// Never panics. Offsets past the end are clamped and offsets inside a
/// multi-byte character snap back to its start.
pub fn classify(text: &str, offset: usize) -> CompletionAnalysis {
    let offset = crate::document::position::floor_char_boundary(text, offset);
    let mut scanner = Scanner::new(text);
    scanner.run(offset);
    scanner.analysis(offset)
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            state: State::Content,
            tag: "",
            attr: "",
            slash: false,
            stack: Vec::new(),
            raw_text_tag: "",
        }
    }

    fn run(&mut self, offset: usize) {
        let text = self.text;
        let bytes = text.as_bytes();
        let mut i = 0usize;

        while i < offset {
            let b = bytes[i];

            match self.state {
                State::Content => {
                    if b == b'<' {
                        self.state = State::TagOpen;
                    }
                }
                State::TagOpen => match b {
                    b'/' => self.state = State::EndTag { start: i + 1 },
                    b'!' => {
                        if bytes[i..].starts_with(b"!--") {
                            self.state = State::Comment;
                            i += 2;
                        } else {
                            self.state = State::Declaration;
                        }
                    }
                    b'?' => self.state = State::Declaration,
                    b'<' => self.state = State::TagOpen,
                    b if b.is_ascii_alphabetic() => self.state = State::TagName { start: i },
                    _ => self.state = State::Content,
                },
                State::TagName { start } => match b {
                    b'<' => self.state = State::TagOpen,
                    b'>' => {
                        self.tag = &text[start..i];
                        self.finish_start_tag(false);
                    }
                    b'/' => {
                        self.tag = &text[start..i];
                        self.slash = true;
                        self.state = State::BeforeAttr;
                    }
                    b if b.is_ascii_whitespace() => {
                        self.tag = &text[start..i];
                        self.slash = false;
                        self.state = State::BeforeAttr;
                    }
                    _ => {}
                },
                State::EndTag { start } => match b {
                    b'<' => self.state = State::TagOpen,
                    b'>' => {
                        self.close_element(text[start..i].trim());
                        self.state = State::Content;
                    }
                    _ => {}
                },
                State::BeforeAttr => match b {
                    b'<' => self.state = State::TagOpen,
                    b'>' => self.finish_start_tag(self.slash),
                    b'/' => self.slash = true,
                    b if b.is_ascii_whitespace() => self.slash = false,
                    _ => {
                        self.slash = false;
                        self.state = State::AttrName { start: i };
                    }
                },
                State::AttrName { start } => match b {
                    b'<' => self.state = State::TagOpen,
                    b'>' => self.finish_start_tag(false),
                    b'=' => {
                        self.attr = &text[start..i];
                        self.state = State::BeforeValue;
                    }
                    b'/' => {
                        self.slash = true;
                        self.state = State::BeforeAttr;
                    }
                    b if b.is_ascii_whitespace() => {
                        self.attr = &text[start..i];
                        self.state = State::AfterAttrName;
                    }
                    _ => {}
                },
                State::AfterAttrName => match b {
                    b'<' => self.state = State::TagOpen,
                    b'>' => self.finish_start_tag(false),
                    b'=' => self.state = State::BeforeValue,
                    b'/' => {
                        self.slash = true;
                        self.state = State::BeforeAttr;
                    }
                    b if b.is_ascii_whitespace() => {}
                    _ => self.state = State::AttrName { start: i },
                },
                State::BeforeValue => match b {
                    b'<' => self.state = State::TagOpen,
                    b'>' => self.finish_start_tag(false),
                    b'"' | b'\'' => {
                        self.state = State::QuotedValue {
                            quote: b,
                            start: i + 1,
                        }
                    }
                    b if b.is_ascii_whitespace() => {}
                    _ => self.state = State::UnquotedValue { start: i },
                },
                State::QuotedValue { quote, .. } => {
                    if b == quote {
                        self.slash = false;
                        self.state = State::BeforeAttr;
                    }
                }
                State::UnquotedValue { .. } => match b {
                    b'>' => self.finish_start_tag(false),
                    b if b.is_ascii_whitespace() => {
                        self.slash = false;
                        self.state = State::BeforeAttr;
                    }
                    _ => {}
                },
                State::Comment => {
                    if bytes[i..].starts_with(b"-->") {
                        self.state = State::Content;
                        i += 2;
                    }
                }
                State::Declaration => {
                    if b == b'>' {
                        self.state = State::Content;
                    }
                }
                State::RawText => {
                    if b == b'<' && self.closes_raw_text(i) {
                        self.state = State::EndTag { start: i + 2 };
                        i += 1;
                    }
                }
            }

            i += 1;
        }
    }

    fn finish_start_tag(&mut self, self_closing: bool) {
        let tag = self.tag;
        self.state = State::Content;

        if self_closing || is_one_of(tag, VOID_ELEMENTS) {
            return;
        }

        self.stack.push(tag);
        if is_one_of(tag, RAW_TEXT_ELEMENTS) {
            self.raw_text_tag = tag;
            self.state = State::RawText;
        }
    }

    /// Pop up to and including the innermost element named `name`;
    /// unmatched end tags are ignored
    fn close_element(&mut self, name: &str) {
        if let Some(idx) = self
            .stack
            .iter()
            .rposition(|open| open.eq_ignore_ascii_case(name))
        {
            self.stack.truncate(idx);
        }
    }

    /// Whether the `<` at `i` starts the end tag of the raw-text element
    fn closes_raw_text(&self, i: usize) -> bool {
        let rest = &self.text.as_bytes()[i + 1..];
        let name = self.raw_text_tag.as_bytes();
        rest.first() == Some(&b'/')
            && rest.len() > name.len()
            && rest[1..=name.len()].eq_ignore_ascii_case(name)
    }

    /// Nearest custom element on the open stack
    fn parent_custom(&self) -> &'a str {
        self.stack
            .iter()
            .rev()
            .copied()
            .find(|tag| is_custom_element_tag(tag))
            .unwrap_or("")
    }

    fn analysis(&self, offset: usize) -> CompletionAnalysis {
        let parent = self.parent_custom();

        match self.state {
            State::TagOpen => CompletionAnalysis::tag_name("", parent),
            State::TagName { start } => CompletionAnalysis::tag_name(&self.text[start..offset], parent),
            State::BeforeAttr | State::AfterAttrName => {
                if self.slash {
                    CompletionAnalysis::unknown()
                } else {
                    CompletionAnalysis::attribute_name(self.tag, "", parent)
                }
            }
            State::AttrName { start } => {
                CompletionAnalysis::attribute_name(self.tag, &self.text[start..offset], parent)
            }
            State::BeforeValue => CompletionAnalysis::attribute_value(self.tag, self.attr, "", parent),
            State::QuotedValue { start, .. } | State::UnquotedValue { start } => {
                let prefix = self.text.get(start..offset).unwrap_or("");
                CompletionAnalysis::attribute_value(self.tag, self.attr, prefix, parent)
            }
            State::Content
            | State::EndTag { .. }
            | State::Comment
            | State::Declaration
            | State::RawText => CompletionAnalysis::unknown(),
        }
    }
}

fn is_one_of(tag: &str, names: &[&str]) -> bool {
    names.iter().any(|name| tag.eq_ignore_ascii_case(name))
}

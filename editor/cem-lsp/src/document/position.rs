//! Position conversion
//!
//! Protocol positions are zero-based lines and UTF-16 code units; the
//! parsers and scanners work on byte offsets.

/// Byte offset of a (line, UTF-16 character) position.
///
/// Returns `None` for a line past the end of the text or a character past
/// the end of its line. A character that splits a surrogate pair snaps back
/// to the start of that character.
pub fn offset_at(text: &str, line: u32, character: u32) -> Option<usize> {
    let line_start = line_start(text, line as usize)?;
    let rest = &text[line_start..];
    let line_text = match rest.find('\n') {
        Some(end) => &rest[..end],
        None => rest,
    };
    let line_text = line_text.strip_suffix('\r').unwrap_or(line_text);

    let target = character as usize;
    let mut units = 0usize;
    for (idx, ch) in line_text.char_indices() {
        if units == target {
            return Some(line_start + idx);
        }
        let next = units + ch.len_utf16();
        if next > target {
            return Some(line_start + idx);
        }
        units = next;
    }

    if units == target {
        Some(line_start + line_text.len())
    } else {
        None
    }
}

/// Length of `text` in UTF-16 code units
pub fn utf16_len(text: &str) -> u32 {
    text.chars().map(|c| c.len_utf16() as u32).sum()
}

/// Largest char boundary at or before `offset`
pub fn floor_char_boundary(text: &str, offset: usize) -> usize {
    if offset >= text.len() {
        return text.len();
    }
    let mut idx = offset;
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn line_start(text: &str, line: usize) -> Option<usize> {
    if line == 0 {
        return Some(0);
    }
    text.match_indices('\n').nth(line - 1).map(|(idx, _)| idx + 1)
}

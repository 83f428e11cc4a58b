//! Textual excerpt of a snippet body.

use snipkit_shared::TextExcerpt;

use crate::fences::FENCE;

/// Paragraph break.
const PARAGRAPH_BREAK: &str = "\n\n";

/// Derive the prose excerpt of a snippet body.
///
/// `full` is the text before the first fence (the whole body when there is
/// none), with CRLF normalized to LF and surrounding whitespace trimmed.
/// `short` is its first paragraph; without a paragraph break it equals `full`.
pub fn textual_content(body: &str) -> TextExcerpt {
    let body = normalize_line_endings(body);
    let prose = match body.find(FENCE) {
        Some(idx) => &body[..idx],
        None => body.as_str(),
    };
    let full = prose.trim().to_string();

    let short = match full.find(PARAGRAPH_BREAK) {
        Some(idx) => full[..idx].to_string(),
        None => full.clone(),
    };

    TextExcerpt { full, short }
}

/// Replace every CRLF with LF.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_stops_at_first_fence() {
        let body = "\nChunks an array.\n\nUse `Array.from()`.\n\n```js\ncode\n```\n";
        let text = textual_content(body);
        assert_eq!(text.full, "Chunks an array.\n\nUse `Array.from()`.");
        assert_eq!(text.short, "Chunks an array.");
    }

    #[test]
    fn crlf_is_normalized() {
        let body = "First line.\r\n\r\nSecond.\r\n```js\nx\n```";
        let text = textual_content(body);
        assert_eq!(text.full, "First line.\n\nSecond.");
        assert_eq!(text.short, "First line.");
    }

    #[test]
    fn single_paragraph_short_equals_full() {
        let text = textual_content("Only one paragraph.\n\n```js\nx\n```");
        assert_eq!(text.full, "Only one paragraph.");
        assert_eq!(text.short, text.full);
    }

    #[test]
    fn body_without_fence_is_kept_whole() {
        let text = textual_content("No code here.");
        assert_eq!(text.full, "No code here.");
        assert_eq!(text.short, "No code here.");
    }

    #[test]
    fn body_starting_with_fence_has_empty_excerpt() {
        let text = textual_content("```js\nx\n```\nAfter.");
        assert_eq!(text.full, "");
        assert_eq!(text.short, "");
    }
}

//! Fenced code block extraction.
//!
//! A small two-state lexer walks the body looking for ```` ``` ```` markers:
//! outside a fence, a marker opens one; inside, the next marker closes it.
//! An opening marker without a partner is ignored.

use snipkit_shared::{CodeBlocks, CollectionConfig, Result, SnipkitError};

/// Fence marker.
pub const FENCE: &str = "```";

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

/// One fenced region of a snippet body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FencedBlock<'a> {
    /// The block including both fence markers.
    pub raw: &'a str,
    /// First word of the info string (`js` in ```` ```js ````), possibly empty.
    pub lang: &'a str,
    /// Everything after the info line, up to the closing marker.
    pub content: &'a str,
}

impl<'a> FencedBlock<'a> {
    fn new(raw: &'a str) -> Self {
        let inner = &raw[FENCE.len()..raw.len() - FENCE.len()];
        let (info, content) = match inner.split_once('\n') {
            Some((info, content)) => (info, content),
            // Single-line block: the first word is the tag, the rest is code.
            None => inner.split_once(char::is_whitespace).unwrap_or((inner, "")),
        };
        let lang = info.split_whitespace().next().unwrap_or("");
        Self { raw, lang, content }
    }

    /// Raw code if the block is tagged with one of `languages`; otherwise the
    /// block keeps its fences.
    pub fn strip(&self, languages: &[&str]) -> String {
        if languages.contains(&self.lang) {
            self.content.trim().to_string()
        } else {
            self.raw.trim().to_string()
        }
    }
}

enum State {
    Outside,
    Inside { open: usize },
}

/// Scan `body` for every complete fenced block, in order.
pub fn scan_fences(body: &str) -> Vec<FencedBlock<'_>> {
    let mut blocks = Vec::new();
    let mut state = State::Outside;
    let mut cursor = 0;

    while let Some(pos) = body[cursor..].find(FENCE) {
        let at = cursor + pos;
        cursor = at + FENCE.len();
        state = match state {
            State::Outside => State::Inside { open: at },
            State::Inside { open } => {
                blocks.push(FencedBlock::new(&body[open..cursor]));
                State::Outside
            }
        };
    }

    blocks
}

// ---------------------------------------------------------------------------
// Code shaping
// ---------------------------------------------------------------------------

/// Extract a snippet's code blocks, shaped by the collection's languages.
///
/// - optional language and 3+ blocks: `style`, `src`, `example` in order
/// - optional language and fewer blocks: `style` empty, `src`, `example`
/// - no optional language: `src`, `example`
///
/// A missing `example` is empty. A body without any block is a parse error.
pub fn extract_code_blocks(body: &str, config: &CollectionConfig) -> Result<CodeBlocks> {
    let blocks = scan_fences(body);
    if blocks.is_empty() {
        return Err(SnipkitError::parse("no fenced code blocks found"));
    }

    let primary = config.language.short.as_str();
    let mut languages = vec![primary];
    if let Some(optional) = config.optional_language_short() {
        languages.push(optional);
    }

    let mut code = blocks.iter().map(|b| b.strip(&languages));
    let mut next = || code.next().unwrap_or_default();

    let shaped = if config.optional_language_short().is_some() {
        if blocks.len() > 2 {
            let style = next();
            CodeBlocks {
                style: Some(style),
                src: next(),
                example: next(),
            }
        } else {
            CodeBlocks {
                style: Some(String::new()),
                src: next(),
                example: next(),
            }
        }
    } else {
        CodeBlocks {
            style: None,
            src: next(),
            example: next(),
        }
    };

    Ok(shaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use snipkit_shared::Language;

    fn config(short: &str, optional: Option<&str>) -> CollectionConfig {
        CollectionConfig {
            requirable_ids: vec![],
            resolver: Default::default(),
            is_blog: false,
            slug: "test".into(),
            dir_name: "dir".into(),
            snippet_path: "snippets".into(),
            repo_url_prefix: String::new(),
            bias_penalty_multiplier: 1.0,
            featured: 0,
            theme: Default::default(),
            language: Language {
                short: short.into(),
                long: short.to_uppercase(),
            },
            optional_language: optional.map(|s| Language {
                short: s.into(),
                long: s.to_uppercase(),
            }),
        }
    }

    const TWO_BLOCKS: &str = "Intro.\n\n```js\nconst a = 1;\n```\n\n```js\na;\n```\n";
    const THREE_BLOCKS: &str =
        "Intro.\n\n```css\n.a { color: red; }\n```\n\n```jsx\nconst A = () => <div/>;\n```\n\n```jsx\n<A/>\n```\n";

    #[test]
    fn scans_blocks_in_order() {
        let blocks = scan_fences(TWO_BLOCKS);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lang, "js");
        assert_eq!(blocks[0].content, "const a = 1;\n");
        assert_eq!(blocks[1].raw, "```js\na;\n```");
    }

    #[test]
    fn unterminated_fence_is_ignored() {
        let blocks = scan_fences("```js\nfoo\n```\n\n```js\nbar\n");
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn no_fences() {
        assert!(scan_fences("just prose").is_empty());
    }

    #[test]
    fn two_blocks_without_optional_language() {
        let code = extract_code_blocks(TWO_BLOCKS, &config("js", None)).unwrap();
        assert_eq!(code.style, None);
        assert_eq!(code.src, "const a = 1;");
        assert_eq!(code.example, "a;");
    }

    #[test]
    fn extra_blocks_ignored_without_optional_language() {
        let body = format!("{TWO_BLOCKS}\n```js\nextra();\n```\n");
        let code = extract_code_blocks(&body, &config("js", None)).unwrap();
        assert_eq!(code.src, "const a = 1;");
        assert_eq!(code.example, "a;");
    }

    #[test]
    fn three_blocks_with_optional_language() {
        let code = extract_code_blocks(THREE_BLOCKS, &config("jsx", Some("css"))).unwrap();
        assert_eq!(code.style.as_deref(), Some(".a { color: red; }"));
        assert_eq!(code.src, "const A = () => <div/>;");
        assert_eq!(code.example, "<A/>");
    }

    #[test]
    fn two_blocks_with_optional_language_fall_back() {
        let body = "```jsx\nconst A = 1;\n```\n```jsx\n<A/>\n```";
        let code = extract_code_blocks(body, &config("jsx", Some("css"))).unwrap();
        assert_eq!(code.style.as_deref(), Some(""));
        assert_eq!(code.src, "const A = 1;");
        assert_eq!(code.example, "<A/>");
    }

    #[test]
    fn single_block_leaves_example_empty() {
        let body = "```js\nonly();\n```";
        let code = extract_code_blocks(body, &config("js", None)).unwrap();
        assert_eq!(code.src, "only();");
        assert_eq!(code.example, "");
    }

    #[test]
    fn zero_blocks_is_parse_error() {
        let err = extract_code_blocks("prose only", &config("js", None)).unwrap_err();
        assert!(matches!(err, SnipkitError::Parse { .. }));
    }

    #[test]
    fn single_line_blocks_keep_their_code() {
        let blocks = scan_fences("Body\n```js x();```\n``` plain()```");
        assert_eq!(blocks[0].lang, "js");
        assert_eq!(blocks[0].content, "x();");
        assert_eq!(blocks[1].lang, "");
        assert_eq!(blocks[1].content, "plain()");

        let code = extract_code_blocks("```js x();```", &config("js", None)).unwrap();
        assert_eq!(code.src, "x();");
    }

    #[test]
    fn language_must_match_exactly() {
        let body = "```jsx\nconst A = 1;\n```\n```js\nA;\n```";
        let code = extract_code_blocks(body, &config("js", None)).unwrap();
        assert_eq!(code.src, "```jsx\nconst A = 1;\n```");
        assert_eq!(code.example, "A;");
    }
}

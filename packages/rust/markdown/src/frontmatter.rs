//! Snippet header ("frontmatter") parsing.
//!
//! A snippet file opens with a `---` line, carries YAML attributes, and
//! closes the header with another `---` (or `...`) line. Everything after the closing
//! line is the body.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_yaml::Value;
use snipkit_shared::{Result, SnipkitError};

/// Header delimiter line.
const DELIMITER: &str = "---";

/// Alternative closing line (YAML document end marker).
const END_MARKER: &str = "...";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Attributes parsed from a snippet header.
#[derive(Debug, Clone, PartialEq)]
pub struct Attributes {
    pub title: String,
    /// Tags in source order, de-duplicated.
    pub tags: Vec<String>,
    /// Every other attribute, untouched.
    pub extra: BTreeMap<String, Value>,
}

/// A snippet file split into header attributes and body.
#[derive(Debug, Clone, PartialEq)]
pub struct SnippetDocument {
    pub attributes: Attributes,
    pub body: String,
}

#[derive(Deserialize)]
struct RawAttributes {
    title: Option<Value>,
    tags: Option<RawTags>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTags {
    Csv(String),
    List(Vec<String>),
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Split raw snippet text into attributes and body.
pub fn parse_document(raw: &str) -> Result<SnippetDocument> {
    let (header, body) = split_header(raw)?;

    let attrs: RawAttributes = if header.trim().is_empty() {
        RawAttributes {
            title: None,
            tags: None,
            extra: BTreeMap::new(),
        }
    } else {
        serde_yaml::from_str(header)
            .map_err(|e| SnipkitError::parse(format!("malformed header: {e}")))?
    };

    let title = attrs
        .title
        .as_ref()
        .and_then(scalar_to_string)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| SnipkitError::parse("missing required `title` attribute"))?;

    let tags = match attrs.tags {
        Some(RawTags::Csv(s)) => parse_tags(&s),
        Some(RawTags::List(list)) => parse_tags(&list.join(",")),
        None => return Err(SnipkitError::parse("missing required `tags` attribute")),
    };

    Ok(SnippetDocument {
        attributes: Attributes {
            title,
            tags,
            extra: attrs.extra,
        },
        body: body.to_string(),
    })
}

/// Parse a comma-separated tag string into unique, trimmed tags.
///
/// The first occurrence of a tag wins and keeps its position. Empty entries
/// (from stray commas) are dropped.
pub fn parse_tags(tag_str: &str) -> Vec<String> {
    tag_str
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .fold(Vec::new(), |mut acc, t| {
            if !acc.iter().any(|seen: &String| seen == t) {
                acc.push(t.to_string());
            }
            acc
        })
}

/// Locate the header between the opening and closing delimiter lines.
fn split_header(raw: &str) -> Result<(&str, &str)> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let mut lines = raw.split_inclusive('\n');

    let first = lines
        .next()
        .ok_or_else(|| SnipkitError::parse("file is empty"))?;
    if !is_delimiter(first) {
        return Err(SnipkitError::parse(
            "missing header: file must open with a `---` line",
        ));
    }

    let header_start = first.len();
    let mut offset = header_start;
    for line in lines {
        if is_closing(line) {
            let header = &raw[header_start..offset];
            let body = &raw[offset + line.len()..];
            return Ok((header, body));
        }
        offset += line.len();
    }

    Err(SnipkitError::parse(
        "unterminated header: no closing `---` or `...` line",
    ))
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

fn is_closing(line: &str) -> bool {
    is_delimiter(line) || line.trim_end() == END_MARKER
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_header_and_body() {
        let raw = "---\ntitle: chunk\ntags: array,intermediate\n---\n\nChunks an array.\n";
        let doc = parse_document(raw).unwrap();
        assert_eq!(doc.attributes.title, "chunk");
        assert_eq!(doc.attributes.tags, vec!["array", "intermediate"]);
        assert_eq!(doc.body, "\nChunks an array.\n");
    }

    #[test]
    fn handles_crlf_delimiters() {
        let raw = "---\r\ntitle: X\r\ntags: foo,bar\r\n---\r\nBody\r\n";
        let doc = parse_document(raw).unwrap();
        assert_eq!(doc.attributes.title, "X");
        assert_eq!(doc.body, "Body\r\n");
    }

    #[test]
    fn keeps_extra_attributes() {
        let raw = "---\ntitle: X\ntags: a\ncover: blue\n---\n";
        let doc = parse_document(raw).unwrap();
        assert_eq!(doc.attributes.extra.get("cover"), Some(&Value::String("blue".into())));
        assert_eq!(doc.body, "");
    }

    #[test]
    fn numeric_title_is_stringified() {
        let raw = "---\ntitle: 404\ntags: web\n---\nNot found.";
        let doc = parse_document(raw).unwrap();
        assert_eq!(doc.attributes.title, "404");
    }

    #[test]
    fn tags_as_yaml_list() {
        let raw = "---\ntitle: X\ntags: [foo, bar, foo]\n---\n";
        let doc = parse_document(raw).unwrap();
        assert_eq!(doc.attributes.tags, vec!["foo", "bar"]);
    }

    #[test]
    fn missing_opening_delimiter() {
        let err = parse_document("title: X\n---\n").unwrap_err();
        assert!(err.to_string().contains("must open with"));
    }

    #[test]
    fn yaml_end_marker_closes_header() {
        let doc = parse_document("---\ntitle: X\ntags: a\n...\nBody\n").unwrap();
        assert_eq!(doc.attributes.title, "X");
        assert_eq!(doc.body, "Body\n");
    }

    #[test]
    fn missing_closing_delimiter() {
        let err = parse_document("---\ntitle: X\ntags: a\n").unwrap_err();
        assert!(err.to_string().contains("unterminated header"));
    }

    #[test]
    fn missing_title() {
        let err = parse_document("---\ntags: a\n---\nBody").unwrap_err();
        assert!(matches!(err, SnipkitError::Parse { .. }));
        assert!(err.to_string().contains("`title`"));
    }

    #[test]
    fn missing_tags() {
        let err = parse_document("---\ntitle: X\n---\nBody").unwrap_err();
        assert!(err.to_string().contains("`tags`"));
    }

    #[test]
    fn malformed_yaml() {
        let err = parse_document("---\ntitle: [unclosed\ntags: a\n---\n").unwrap_err();
        assert!(err.to_string().contains("malformed header"));
    }

    #[test]
    fn tag_deduplication_keeps_first_occurrence() {
        assert_eq!(parse_tags("a, a, b"), vec!["a", "b"]);
        assert_eq!(parse_tags("b,a,b,c,a"), vec!["b", "a", "c"]);
        assert_eq!(parse_tags(" x ,, y ,"), vec!["x", "y"]);
        assert!(parse_tags("").is_empty());
    }
}

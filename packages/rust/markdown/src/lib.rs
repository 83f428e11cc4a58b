//! Snippet source parsing.
//!
//! Splits a snippet file into header attributes and body, derives the prose
//! excerpt, extracts fenced code blocks shaped by the collection's languages,
//! and renders the body to HTML.

mod excerpt;
mod fences;
mod frontmatter;
mod render;

pub use excerpt::{normalize_line_endings, textual_content};
pub use fences::{FENCE, FencedBlock, extract_code_blocks, scan_fences};
pub use frontmatter::{Attributes, SnippetDocument, parse_document, parse_tags};
pub use render::{MarkdownRenderer, Render};

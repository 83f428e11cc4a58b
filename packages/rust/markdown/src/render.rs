//! Markdown to HTML rendering.

use pulldown_cmark::{Options, Parser, html};
use snipkit_shared::Result;

/// Turns a snippet body into markup.
///
/// Failures propagate and abort the build.
pub trait Render: Send + Sync {
    fn render(&self, markdown: &str) -> Result<String>;
}

/// CommonMark renderer backed by `pulldown-cmark`.
///
/// Fenced blocks become `<pre><code class="language-xx">`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl Render for MarkdownRenderer {
    fn render(&self, markdown: &str) -> Result<String> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);

        let parser = Parser::new_ext(markdown, options);
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        Ok(out)
    }
}

//! Post-render resolvers.
//!
//! A resolver inspects a snippet's rendered markup and contributes extra
//! named fields (description, individual code blocks, ...) that sit next to
//! `html.full` in the snippet record. Each collection picks one resolver by
//! name in its manifest.

mod blog;
mod css;
mod standard;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use snipkit_shared::{ResolverKind, Result, SnipkitError};

pub use blog::BlogResolver;
pub use css::CssResolver;
pub use standard::{JsxResolver, StdResolver};

/// Extra markup fields contributed by a resolver.
pub type ResolvedFields = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Transform applied to rendered snippet markup.
pub trait Resolver: Send + Sync {
    /// The manifest name this resolver answers to.
    fn kind(&self) -> ResolverKind;

    /// Derive extra fields from the rendered markup.
    fn resolve(&self, html: &str) -> ResolvedFields;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Resolvers available to a build, looked up by [`ResolverKind`].
pub struct ResolverRegistry {
    resolvers: Vec<Box<dyn Resolver>>,
}

impl ResolverRegistry {
    /// Create a registry with every built-in resolver.
    pub fn new() -> Self {
        Self {
            resolvers: vec![
                Box::new(StdResolver),
                Box::new(JsxResolver),
                Box::new(CssResolver),
                Box::new(BlogResolver),
            ],
        }
    }

    /// Create a registry with no resolvers.
    pub fn empty() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    /// Register `resolver`, replacing any existing one of the same kind.
    pub fn with(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolvers.retain(|r| r.kind() != resolver.kind());
        self.resolvers.push(Box::new(resolver));
        self
    }

    /// Look up the resolver registered for `kind`.
    pub fn get(&self, kind: ResolverKind) -> Result<&dyn Resolver> {
        self.resolvers
            .iter()
            .find(|r| r.kind() == kind)
            .map(|r| r.as_ref())
            .ok_or_else(|| SnipkitError::config(format!("no resolver registered as `{kind}`")))
    }

    /// Resolve `html` with the resolver registered for `kind`.
    pub fn resolve(&self, kind: ResolverKind, html: &str) -> Result<ResolvedFields> {
        Ok(self.get(kind)?.resolve(html))
    }
}

impl Default for ResolverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Markup helpers
// ---------------------------------------------------------------------------

static PRE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<pre[\s>].*?</pre>").expect("pre regex"));

static PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<p>.*?</p>").expect("paragraph regex"));

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<h[1-6][^>]*>.*?</h[1-6]>").expect("heading regex"));

/// Every `<pre>` block in document order.
fn pre_blocks(html: &str) -> Vec<&str> {
    PRE_RE.find_iter(html).map(|m| m.as_str()).collect()
}

/// Markup preceding the first `<pre>` block (all of it if there is none).
fn before_first_pre(html: &str) -> &str {
    let end = PRE_RE.find(html).map_or(html.len(), |m| m.start());
    html[..end].trim()
}

fn first_paragraph(html: &str) -> &str {
    PARAGRAPH_RE.find(html).map_or("", |m| m.as_str())
}

fn without_first_heading(html: &str) -> String {
    HEADING_RE.replace(html, "").trim().to_string()
}

/// Build a field map, filling missing blocks with empty strings.
fn fields<'a>(pairs: impl IntoIterator<Item = (&'a str, Option<&'a str>)>) -> ResolvedFields {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.unwrap_or_default().to_string()))
        .collect()
}

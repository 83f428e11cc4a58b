//! Core domain types for snipkit collections and snippet records.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ResolverKind
// ---------------------------------------------------------------------------

/// Post-render transform applied to a snippet's HTML.
///
/// Manifests name resolvers by string; unknown names fail deserialization,
/// so a typo surfaces when the registry is loaded rather than mid-build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResolverKind {
    #[default]
    #[serde(rename = "stdResolver")]
    Std,
    #[serde(rename = "jsxResolver")]
    Jsx,
    #[serde(rename = "cssResolver")]
    Css,
    #[serde(rename = "blogResolver")]
    Blog,
}

impl ResolverKind {
    /// Every resolver kind, in registry order.
    pub const ALL: [ResolverKind; 4] = [Self::Std, Self::Jsx, Self::Css, Self::Blog];

    /// The manifest name of this resolver.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Std => "stdResolver",
            Self::Jsx => "jsxResolver",
            Self::Css => "cssResolver",
            Self::Blog => "blogResolver",
        }
    }
}

impl std::fmt::Display for ResolverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CollectionConfig
// ---------------------------------------------------------------------------

/// Colors and icon used when presenting a collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    #[serde(default)]
    pub back_color: String,
    #[serde(default)]
    pub fore_color: String,
    #[serde(default)]
    pub icon_name: String,
}

/// A language a collection's code blocks are written in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Language {
    /// Fence info string, e.g. `js`.
    #[serde(default)]
    pub short: String,
    /// Display name, e.g. `JavaScript`.
    #[serde(default)]
    pub long: String,
}

/// The `meta` object of a collection manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionConfig {
    /// Identifiers of the items this collection indexes.
    #[serde(rename = "requirables", alias = "requirableIds", default)]
    pub requirable_ids: Vec<String>,

    #[serde(alias = "resolverName", default)]
    pub resolver: ResolverKind,

    #[serde(default)]
    pub is_blog: bool,

    pub slug: String,

    /// Directory of the collection under the sources root.
    pub dir_name: String,

    /// Snippet directory inside `dir_name`.
    pub snippet_path: String,

    #[serde(default)]
    pub repo_url_prefix: String,

    #[serde(default = "default_bias_penalty")]
    pub bias_penalty_multiplier: f64,

    #[serde(default)]
    pub featured: i64,

    #[serde(default)]
    pub theme: Theme,

    #[serde(default)]
    pub language: Language,

    /// Secondary language (e.g. CSS alongside JSX) whose block comes first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_language: Option<Language>,
}

fn default_bias_penalty() -> f64 {
    1.0
}

impl CollectionConfig {
    /// `<dirName>/<snippetPath>`, the prefix of every snippet id.
    pub fn source_dir(&self) -> String {
        format!("{}/{}", self.dir_name, self.snippet_path)
    }

    /// The optional language's fence tag, if one is configured and non-empty.
    pub fn optional_language_short(&self) -> Option<&str> {
        self.optional_language
            .as_ref()
            .map(|l| l.short.as_str())
            .filter(|s| !s.is_empty())
    }
}

/// One manifest as loaded from disk: `{ "meta": { ... } }` plus where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Absolute path of the manifest file.
    #[serde(default, skip_serializing)]
    pub manifest_path: PathBuf,
    pub meta: CollectionConfig,
}

// ---------------------------------------------------------------------------
// SnippetRecord
// ---------------------------------------------------------------------------

/// Classification level derived from a snippet's tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expertise {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Expertise {
    /// Parse an expertise tag (case-insensitive). Non-expertise tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

/// Unique tags in source order; `primary` is the first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tags {
    pub all: Vec<String>,
    pub primary: String,
}

impl Tags {
    pub fn new(all: Vec<String>) -> Self {
        let primary = all.first().cloned().unwrap_or_default();
        Self { all, primary }
    }
}

/// Prose preceding the first code fence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextExcerpt {
    pub full: String,
    /// First paragraph of `full`.
    pub short: String,
}

/// Raw code extracted from a snippet's fenced blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeBlocks {
    /// Present only for collections with an optional language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    pub src: String,
    pub example: String,
}

/// Rendered markup plus whatever fields the collection's resolver contributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HtmlContent {
    pub full: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

/// Version-control history of a snippet file.
///
/// All fields are empty when the file was never committed or history is
/// unavailable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryMeta {
    pub first_seen: Option<DateTime<Utc>>,
    pub last_updated: Option<DateTime<Utc>>,
    pub update_count: u32,
}

impl HistoryMeta {
    pub fn is_empty(&self) -> bool {
        self.first_seen.is_none() && self.last_updated.is_none() && self.update_count == 0
    }
}

/// One parsed snippet, ready for page generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetRecord {
    /// `<dirName>/<snippetPath>/<file stem>`.
    pub id: String,
    pub title: String,
    pub tags: Tags,
    pub expertise: Expertise,
    pub code: CodeBlocks,
    pub text: TextExcerpt,
    /// Space-joined, lower-cased, de-duplicated search terms.
    pub search_tokens: String,
    pub html: HtmlContent,
    #[serde(flatten)]
    pub history: HistoryMeta,
}

/// A collection's snippets keyed by source filename.
pub type SnippetIndex = BTreeMap<String, SnippetRecord>;

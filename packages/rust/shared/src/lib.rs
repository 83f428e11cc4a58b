//! Shared types, error model, and configuration for snipkit.
//!
//! This crate is the foundation depended on by all other snipkit crates.
//! It provides:
//! - [`SnipkitError`], the unified error type
//! - Domain types ([`CollectionConfig`], [`Collection`], [`SnippetRecord`])
//! - Configuration ([`AppConfig`], [`ContentConfig`], [`BuildConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, BuildConfig, CONFIG_FILE_NAME, ContentConfig, init_config, load_config,
    load_config_from,
};
pub use error::{Result, SnipkitError};
pub use types::{
    CodeBlocks, Collection, CollectionConfig, Expertise, HistoryMeta, HtmlContent, Language,
    ResolverKind, SnippetIndex, SnippetRecord, Tags, TextExcerpt, Theme,
};

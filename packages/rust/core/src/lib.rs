//! Core build logic for snipkit.
//!
//! This crate ties together the collection registry, snippet parsing, the
//! rendering/resolving/classification collaborators and version-control
//! history into end-to-end builds (e.g., `build_site`).

pub mod build;
pub mod classify;
pub mod emit;
pub mod history;
pub mod reader;
pub mod resolvers;
pub mod search;

pub use build::{BuildResult, CollectionIndex, ProgressReporter, SilentProgress, build_site};
pub use emit::{COLLECTIONS_FILE, emit};
pub use history::{GitCli, HistorySource, fetch_history};
pub use reader::{ReaderOptions, SnippetReader, list_snippet_files, snippet_id};

//! JSON output for a finished build.
//!
//! Layout of the output directory:
//!
//! ```text
//! <out>/
//!   collections.json   collection descriptors, registry order
//!   <slug>.json        filename → snippet record, one per collection
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use snipkit_shared::{Result, SnipkitError};
use tracing::{debug, info, instrument};

use crate::build::CollectionIndex;

/// Name of the descriptor index file.
pub const COLLECTIONS_FILE: &str = "collections.json";

/// Write the build output into `output_dir`.
///
/// Every file is serialized before the first one is written, so a failure
/// leaves the directory untouched. Returns the written paths.
#[instrument(skip_all, fields(out = %output_dir.display(), collections = indexes.len()))]
pub fn emit(output_dir: &Path, indexes: &[CollectionIndex]) -> Result<Vec<PathBuf>> {
    validate_slugs(indexes)?;

    let descriptors: Vec<_> = indexes.iter().map(|i| &i.collection).collect();
    let mut files = vec![(output_dir.join(COLLECTIONS_FILE), to_json(&descriptors)?)];
    for index in indexes {
        let path = output_dir.join(format!("{}.json", index.collection.meta.slug));
        files.push((path, to_json(&index.snippets)?));
    }

    std::fs::create_dir_all(output_dir).map_err(|e| SnipkitError::io(output_dir, e))?;
    for (path, json) in &files {
        std::fs::write(path, json).map_err(|e| SnipkitError::io(path, e))?;
        debug!(path = %path.display(), "wrote JSON file");
    }

    info!(files = files.len(), "build output written");
    Ok(files.into_iter().map(|(path, _)| path).collect())
}

/// Slugs name output files: they must be unique and file-name safe.
fn validate_slugs(indexes: &[CollectionIndex]) -> Result<()> {
    let mut seen = HashSet::new();
    for index in indexes {
        let slug = index.collection.meta.slug.as_str();
        let safe = !slug.is_empty()
            && slug
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !safe || format!("{slug}.json") == COLLECTIONS_FILE {
            return Err(SnipkitError::validation(format!(
                "collection slug `{slug}` ({}) cannot be used as an output file name",
                index.collection.manifest_path.display()
            )));
        }
        if !seen.insert(slug) {
            return Err(SnipkitError::validation(format!(
                "collection slug `{slug}` is declared more than once"
            )));
        }
    }
    Ok(())
}

fn to_json<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    serde_json::to_string_pretty(data)
        .map_err(|e| SnipkitError::validation(format!("JSON serialization failed: {e}")))
}

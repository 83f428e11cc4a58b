//! Collection registry loading.
//!
//! A build starts by discovering every collection manifest under the content
//! root. Each manifest is a JSON document declaring one collection; the
//! loader returns them in enumeration order, which downstream stages treat as
//! collection precedence.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use snipkit_shared::{Collection, ContentConfig, Result, SnipkitError};
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

// ---------------------------------------------------------------------------
// ManifestPattern
// ---------------------------------------------------------------------------

/// Which files under the manifest root count as manifests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestPattern {
    /// Required file extension, without the dot.
    pub extension: String,
    /// Maximum depth below the root (1 = direct children only).
    pub max_depth: usize,
}

impl Default for ManifestPattern {
    fn default() -> Self {
        Self {
            extension: "json".into(),
            max_depth: 1,
        }
    }
}

impl From<&ContentConfig> for ManifestPattern {
    fn from(content: &ContentConfig) -> Self {
        Self {
            extension: content.manifest_extension.clone(),
            max_depth: content.manifest_depth.max(1),
        }
    }
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

/// Discover and load every collection manifest under `root`.
///
/// A missing root or a root without manifests yields an empty registry; the
/// caller decides whether that is acceptable. A manifest that cannot be read
/// or parsed aborts the load.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn load_registry(root: &Path, pattern: &ManifestPattern) -> Result<Vec<Collection>> {
    let paths = discover_manifests(root, pattern)?;

    let collections = paths
        .iter()
        .map(|path| load_manifest(path))
        .collect::<Result<Vec<_>>>()?;

    info!(count = collections.len(), "collection registry loaded");
    Ok(collections)
}

/// List manifest files under `root` in enumeration order.
///
/// Entries are visited sorted by file name within each directory, so the
/// order is stable across runs on an unchanged tree. Returned paths are
/// absolute, independent of the process working directory.
pub fn discover_manifests(root: &Path, pattern: &ManifestPattern) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        debug!(root = %root.display(), "manifest root does not exist");
        return Ok(Vec::new());
    }

    let root = std::fs::canonicalize(root).map_err(|e| SnipkitError::io(root, e))?;
    let extension = OsStr::new(&pattern.extension);
    let mut manifests = Vec::new();

    for entry in WalkDir::new(&root)
        .min_depth(1)
        .max_depth(pattern.max_depth)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| walk_error(&root, e))?;
        if entry.file_type().is_file() && entry.path().extension() == Some(extension) {
            manifests.push(entry.into_path());
        }
    }

    debug!(count = manifests.len(), "manifests discovered");
    Ok(manifests)
}

/// Load a single manifest file.
pub fn load_manifest(path: &Path) -> Result<Collection> {
    let content = std::fs::read_to_string(path).map_err(|e| SnipkitError::io(path, e))?;

    let mut collection: Collection = serde_json::from_str(&content).map_err(|e| {
        SnipkitError::config(format!("malformed manifest {}: {e}", path.display()))
    })?;

    let meta = &collection.meta;
    if meta.dir_name.trim().is_empty() || meta.snippet_path.trim().is_empty() {
        return Err(SnipkitError::config(format!(
            "manifest {} (collection `{}`) must set dirName and snippetPath",
            path.display(),
            meta.slug
        )));
    }

    debug!(slug = %meta.slug, resolver = %meta.resolver, path = %path.display(), "manifest loaded");

    collection.manifest_path = path.to_path_buf();
    Ok(collection)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn walk_error(root: &Path, err: walkdir::Error) -> SnipkitError {
    let path = err.path().unwrap_or(root).to_path_buf();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop while listing manifests"));
    SnipkitError::io(path, source)
}

//! End-to-end build: registry → per-collection snippet indexes.

use std::time::{Duration, Instant};

use serde::Serialize;
use snipkit_registry::{ManifestPattern, load_registry};
use snipkit_shared::{Collection, ContentConfig, Result, SnippetIndex};
use tracing::{info, instrument};

use crate::history::HistorySource;
use crate::reader::SnippetReader;

/// One collection with its parsed snippets.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionIndex {
    pub collection: Collection,
    pub snippets: SnippetIndex,
}

/// Result of [`build_site`].
#[derive(Debug)]
pub struct BuildResult {
    /// Collections in registry order.
    pub collections: Vec<CollectionIndex>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

impl BuildResult {
    pub fn snippet_count(&self) -> usize {
        self.collections.iter().map(|c| c.snippets.len()).sum()
    }
}

/// Progress callback for reporting build status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before a collection's snippets are read.
    fn collection_started(&self, slug: &str, current: usize, total: usize);
    /// Called once a collection has been read.
    fn collection_read(&self, slug: &str, snippets: usize);
    /// Called when the build completes.
    fn done(&self, result: &BuildResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn collection_started(&self, _slug: &str, _current: usize, _total: usize) {}
    fn collection_read(&self, _slug: &str, _snippets: usize) {}
    fn done(&self, _result: &BuildResult) {}
}

/// Load every collection under `content` and read its snippets.
///
/// Collections are read in registry order. The first collection that fails
/// aborts the build.
#[instrument(skip_all, fields(root = %content.root.display()))]
pub async fn build_site<H: HistorySource>(
    content: &ContentConfig,
    reader: &SnippetReader<H>,
    progress: &dyn ProgressReporter,
) -> Result<BuildResult> {
    let start = Instant::now();

    progress.phase("Loading collections");
    let registry = load_registry(&content.manifest_root(), &ManifestPattern::from(content))?;
    let sources = content.sources_root();
    let total = registry.len();

    let mut collections = Vec::with_capacity(total);
    for (i, collection) in registry.into_iter().enumerate() {
        let meta = &collection.meta;
        progress.collection_started(&meta.slug, i + 1, total);

        let dir = sources.join(&meta.dir_name).join(&meta.snippet_path);
        let snippets = reader.read_snippets(&dir, meta).await?;
        progress.collection_read(&meta.slug, snippets.len());

        collections.push(CollectionIndex {
            collection,
            snippets,
        });
    }

    let result = BuildResult {
        collections,
        elapsed: start.elapsed(),
    };

    info!(
        collections = result.collections.len(),
        snippets = result.snippet_count(),
        elapsed_ms = result.elapsed.as_millis() as u64,
        "build complete"
    );
    progress.done(&result);

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use snipkit_shared::SnipkitError;

    use crate::reader::ReaderOptions;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "snipkit-build-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    const SNIPPET: &str = "---\ntitle: X\ntags: foo,bar\n---\nDoes X.\n\n```js\nx();\n```\n\n```js\nx;\n```\n";

    fn write_collection(content: &Path, slug: &str, files: &[&str]) {
        let configs = content.join("configs");
        std::fs::create_dir_all(&configs).unwrap();
        std::fs::write(
            configs.join(format!("{slug}.json")),
            format!(
                r#"{{ "meta": {{ "slug": "{slug}", "dirName": "{slug}", "snippetPath": "snippets",
                    "language": {{ "short": "js", "long": "JavaScript" }} }} }}"#
            ),
        )
        .unwrap();

        let dir = content.join("sources").join(slug).join("snippets");
        std::fs::create_dir_all(&dir).unwrap();
        for file in files {
            std::fs::write(dir.join(file), SNIPPET).unwrap();
        }
    }

    fn content_config(root: &Path) -> ContentConfig {
        ContentConfig {
            root: root.to_path_buf(),
            ..ContentConfig::default()
        }
    }

    fn reader() -> SnippetReader {
        SnippetReader::new(ReaderOptions {
            history: false,
            ..ReaderOptions::default()
        })
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl ProgressReporter for RecordingProgress {
        fn phase(&self, name: &str) {
            self.events.lock().unwrap().push(format!("phase:{name}"));
        }
        fn collection_started(&self, slug: &str, current: usize, total: usize) {
            self.events.lock().unwrap().push(format!("start:{slug}:{current}/{total}"));
        }
        fn collection_read(&self, slug: &str, snippets: usize) {
            self.events.lock().unwrap().push(format!("read:{slug}:{snippets}"));
        }
        fn done(&self, result: &BuildResult) {
            self.events.lock().unwrap().push(format!("done:{}", result.snippet_count()));
        }
    }

    #[tokio::test]
    async fn builds_collections_in_registry_order() {
        let tmp = temp_dir();
        write_collection(&tmp, "js", &["a.md", "b.md"]);
        write_collection(&tmp, "css", &["c.md"]);

        let progress = RecordingProgress::default();
        let result = build_site(&content_config(&tmp), &reader(), &progress)
            .await
            .unwrap();

        let slugs: Vec<_> = result
            .collections
            .iter()
            .map(|c| c.collection.meta.slug.as_str())
            .collect();
        assert_eq!(slugs, vec!["css", "js"]);
        assert_eq!(result.snippet_count(), 3);
        assert_eq!(result.collections[1].snippets["a.md"].id, "js/snippets/a");

        let events = progress.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                "phase:Loading collections",
                "start:css:1/2",
                "read:css:1",
                "start:js:2/2",
                "read:js:2",
                "done:3",
            ]
        );

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn empty_content_root_builds_nothing() {
        let tmp = temp_dir();
        let result = build_site(&content_config(&tmp), &reader(), &SilentProgress)
            .await
            .unwrap();
        assert!(result.collections.is_empty());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn missing_snippet_directory_aborts() {
        let tmp = temp_dir();
        write_collection(&tmp, "js", &["a.md"]);
        std::fs::write(
            tmp.join("configs").join("ghost.json"),
            r#"{ "meta": { "slug": "ghost", "dirName": "ghost", "snippetPath": "snippets" } }"#,
        )
        .unwrap();

        let err = build_site(&content_config(&tmp), &reader(), &SilentProgress)
            .await
            .unwrap_err();
        assert!(matches!(err, SnipkitError::Validation { .. }));
        assert!(err.to_string().contains("[ghost]"));

        let _ = std::fs::remove_dir_all(&tmp);
    }
}

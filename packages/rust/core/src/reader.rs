//! Snippet reader.
//!
//! Turns one collection's snippet directory into a [`SnippetIndex`]: every
//! regular file becomes a [`SnippetRecord`] with its header attributes, code
//! blocks, excerpt, expertise, search tokens, rendered and resolved markup,
//! and version-control history.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use snipkit_markdown::{MarkdownRenderer, Render, extract_code_blocks, parse_document, textual_content};
use snipkit_shared::{
    BuildConfig, CollectionConfig, HistoryMeta, HtmlContent, Result, SnipkitError, SnippetIndex,
    SnippetRecord, Tags,
};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument};

use crate::classify::{Classifier, TagClassifier};
use crate::history::{GitCli, HistorySource, fetch_history};
use crate::resolvers::ResolverRegistry;
use crate::search::{SearchTokenizer, Tokenize, search_tokens};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Knobs for a [`SnippetReader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Maximum files parsed at once.
    pub concurrency: usize,
    /// Query version-control history for each file.
    pub history: bool,
    /// Bound on the history queries of a single file.
    pub history_timeout: Duration,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self::from(&BuildConfig::default())
    }
}

impl From<&BuildConfig> for ReaderOptions {
    fn from(build: &BuildConfig) -> Self {
        Self {
            concurrency: build.concurrency.max(1) as usize,
            history: build.history,
            history_timeout: Duration::from_millis(build.history_timeout_ms),
        }
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Reads snippet directories using a fixed set of collaborators.
pub struct SnippetReader<H: HistorySource = GitCli> {
    renderer: Arc<dyn Render>,
    resolvers: Arc<ResolverRegistry>,
    classifier: Arc<dyn Classifier>,
    tokenizer: Arc<dyn Tokenize>,
    history: Arc<H>,
    options: ReaderOptions,
}

impl<H: HistorySource> Clone for SnippetReader<H> {
    fn clone(&self) -> Self {
        Self {
            renderer: Arc::clone(&self.renderer),
            resolvers: Arc::clone(&self.resolvers),
            classifier: Arc::clone(&self.classifier),
            tokenizer: Arc::clone(&self.tokenizer),
            history: Arc::clone(&self.history),
            options: self.options.clone(),
        }
    }
}

impl SnippetReader<GitCli> {
    /// A reader with the built-in collaborators and `git` history.
    pub fn new(options: ReaderOptions) -> Self {
        Self {
            renderer: Arc::new(MarkdownRenderer),
            resolvers: Arc::new(ResolverRegistry::new()),
            classifier: Arc::new(TagClassifier),
            tokenizer: Arc::new(SearchTokenizer),
            history: Arc::new(GitCli::default()),
            options,
        }
    }
}

impl Default for SnippetReader<GitCli> {
    fn default() -> Self {
        Self::new(ReaderOptions::default())
    }
}

impl<H: HistorySource> SnippetReader<H> {
    pub fn with_renderer(mut self, renderer: impl Render + 'static) -> Self {
        self.renderer = Arc::new(renderer);
        self
    }

    pub fn with_resolvers(mut self, resolvers: ResolverRegistry) -> Self {
        self.resolvers = Arc::new(resolvers);
        self
    }

    pub fn with_classifier(mut self, classifier: impl Classifier + 'static) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: impl Tokenize + 'static) -> Self {
        self.tokenizer = Arc::new(tokenizer);
        self
    }

    /// Swap the history source.
    pub fn with_history<S: HistorySource>(self, history: S) -> SnippetReader<S> {
        SnippetReader {
            renderer: self.renderer,
            resolvers: self.resolvers,
            classifier: self.classifier,
            tokenizer: self.tokenizer,
            history: Arc::new(history),
            options: self.options,
        }
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Read every snippet file in `dir` for the collection `config`.
    ///
    /// Files are parsed concurrently, bounded by `options.concurrency`. The
    /// first file that fails aborts the whole collection; its error names the
    /// collection and the file. History failures never fail a file.
    #[instrument(skip_all, fields(collection = %config.slug, dir = %dir.display()))]
    pub async fn read_snippets(&self, dir: &Path, config: &CollectionConfig) -> Result<SnippetIndex> {
        self.resolvers
            .get(config.resolver)
            .map_err(|e| e.in_snippet(&config.slug, "manifest"))?;

        if !dir.is_dir() {
            return Err(SnipkitError::validation(format!(
                "[{}] snippet directory {} does not exist",
                config.slug,
                dir.display()
            )));
        }

        let files = list_snippet_files(dir).await?;
        let config = Arc::new(config.clone());
        let dir = Arc::new(dir.to_path_buf());
        let semaphore = Arc::new(Semaphore::new(self.options.concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for file in files {
            let reader = self.clone();
            let config = Arc::clone(&config);
            let dir = Arc::clone(&dir);
            let sem = Arc::clone(&semaphore);

            tasks.spawn(async move {
                let _permit = sem
                    .acquire_owned()
                    .await
                    .map_err(|e| SnipkitError::validation(format!("reader stopped: {e}")))?;
                let record = reader
                    .read_one(&dir, &file, &config)
                    .await
                    .map_err(|e| e.in_snippet(&config.slug, &file))?;
                Ok::<_, SnipkitError>((file, record))
            });
        }

        let mut index = SnippetIndex::new();
        while let Some(joined) = tasks.join_next().await {
            let (file, record) = joined.map_err(|e| {
                SnipkitError::validation(format!("[{}] snippet task failed: {e}", config.slug))
            })??;
            index.insert(file, record);
        }

        info!(snippets = index.len(), "collection read");
        Ok(index)
    }

    async fn read_one(&self, dir: &Path, file: &str, config: &CollectionConfig) -> Result<SnippetRecord> {
        let path = dir.join(file);
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| SnipkitError::io(&path, e))?;

        let mut record = self.build_record(file, &raw, config)?;
        if self.options.history {
            record.history =
                fetch_history(self.history.as_ref(), dir, file, self.options.history_timeout).await;
        }

        debug!(file, id = %record.id, "snippet parsed");
        Ok(record)
    }

    /// Parse one snippet's text into a record with empty history.
    pub fn build_record(&self, file: &str, raw: &str, config: &CollectionConfig) -> Result<SnippetRecord> {
        let doc = parse_document(raw)?;
        let title = doc.attributes.title;
        let tags = doc.attributes.tags;

        let text = textual_content(&doc.body);
        let code = extract_code_blocks(&doc.body, config)?;
        let html = self.renderer.render(&doc.body)?;
        let extra = self.resolvers.resolve(config.resolver, &html)?;

        let expertise = self.classifier.classify(&tags);
        let terms = [&title, &config.language.short, &config.language.long]
            .into_iter()
            .cloned()
            .chain(self.classifier.strip_expertise(&tags))
            .chain(self.tokenizer.tokenize(&text.short));

        Ok(SnippetRecord {
            id: snippet_id(file, &config.source_dir()),
            search_tokens: search_tokens(terms),
            title,
            tags: Tags::new(tags),
            expertise,
            code,
            text,
            html: HtmlContent { full: html, extra },
            history: HistoryMeta::default(),
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// List the regular files in `dir`, sorted case-insensitively by name.
///
/// The sort is stable, so names equal up to case keep their listing order.
/// Subdirectories are skipped.
pub async fn list_snippet_files(dir: &Path) -> Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| SnipkitError::io(dir, e))?;
    let mut names = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(|e| SnipkitError::io(dir, e))? {
        let path = entry.path();
        let meta = tokio::fs::metadata(&path)
            .await
            .map_err(|e| SnipkitError::io(&path, e))?;
        if !meta.is_file() {
            debug!(path = %path.display(), "skipping non-file entry");
            continue;
        }

        let name = entry.file_name().into_string().map_err(|raw| {
            SnipkitError::validation(format!(
                "snippet file name is not valid UTF-8: {}",
                raw.to_string_lossy()
            ))
        })?;
        names.push(name);
    }

    names.sort_by_key(|n| n.to_lowercase());
    Ok(names)
}

/// `<source_dir>/<filename without extension>`.
pub fn snippet_id(filename: &str, source_dir: &str) -> String {
    let stem = match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => filename,
    };
    format!("{source_dir}/{stem}")
}

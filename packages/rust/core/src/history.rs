//! Version-control history enrichment.
//!
//! Each snippet gets three read-only history queries: when the file was
//! first added, when it was last touched, and how many revisions touched it.
//! The queries run concurrently and share one timeout. Any failure degrades
//! to empty metadata so a missing or slow repository never blocks a build.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::process::Command;
use tracing::{debug, warn};

use snipkit_shared::{HistoryMeta, Result, SnipkitError};

// ---------------------------------------------------------------------------
// Capability
// ---------------------------------------------------------------------------

/// Something that can answer `log`-style history queries for a directory.
pub trait HistorySource: Send + Sync + 'static {
    /// Run a `log` query with `args` inside `dir` and return its stdout.
    fn log(&self, dir: &Path, args: Vec<String>) -> impl Future<Output = Result<String>> + Send;
}

/// History backed by the `git` command-line tool.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl GitCli {
    /// Use a specific git executable.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::with_program("git")
    }
}

impl HistorySource for GitCli {
    async fn log(&self, dir: &Path, args: Vec<String>) -> Result<String> {
        let output = Command::new(&self.program)
            .arg("log")
            .args(&args)
            .current_dir(dir)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                SnipkitError::History(format!(
                    "failed to run `{}`: {e}. Is it installed?",
                    self.program
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SnipkitError::History(format!(
                "`{} log` exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

fn first_seen_args(file: &str) -> Vec<String> {
    ["--diff-filter=A", "--pretty=format:%at", "--", file]
        .map(String::from)
        .to_vec()
}

fn last_updated_args(file: &str) -> Vec<String> {
    ["-n", "1", "--pretty=format:%at", "--", file]
        .map(String::from)
        .to_vec()
}

fn revisions_args(file: &str) -> Vec<String> {
    ["--pretty=format:%H", "--", file].map(String::from).to_vec()
}

/// Fetch the history of `file` inside `dir`.
///
/// Never fails: an unavailable history tool, a directory outside any
/// repository, unparsable output, or hitting `timeout` all yield empty
/// metadata with a warning.
pub async fn fetch_history<H: HistorySource>(
    source: &H,
    dir: &Path,
    file: &str,
    timeout: Duration,
) -> HistoryMeta {
    let queries = async {
        let (added, latest, revisions) = tokio::join!(
            source.log(dir, first_seen_args(file)),
            source.log(dir, last_updated_args(file)),
            source.log(dir, revisions_args(file)),
        );

        Ok::<_, SnipkitError>(HistoryMeta {
            first_seen: parse_timestamps(&added?)?.into_iter().last(),
            last_updated: parse_timestamps(&latest?)?.into_iter().next(),
            update_count: count_lines(&revisions?),
        })
    };

    match tokio::time::timeout(timeout, queries).await {
        Ok(Ok(meta)) => {
            debug!(file, update_count = meta.update_count, "history fetched");
            meta
        }
        Ok(Err(e)) => {
            warn!(file, error = %e, "history unavailable, using empty metadata");
            HistoryMeta::default()
        }
        Err(_) => {
            warn!(
                file,
                timeout_ms = timeout.as_millis() as u64,
                "history queries timed out, using empty metadata"
            );
            HistoryMeta::default()
        }
    }
}

/// Parse one Unix timestamp per non-empty line, newest first as git prints them.
fn parse_timestamps(stdout: &str) -> Result<Vec<DateTime<Utc>>> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|line| {
            line.parse::<i64>()
                .ok()
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .ok_or_else(|| SnipkitError::History(format!("unexpected timestamp `{line}`")))
        })
        .collect()
}

fn count_lines(stdout: &str) -> u32 {
    stdout.lines().filter(|l| !l.trim().is_empty()).count() as u32
}

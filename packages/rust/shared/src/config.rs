//! Application configuration for snipkit.
//!
//! Project config lives at `./snipkit.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SnipkitError};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "snipkit.toml";

// ---------------------------------------------------------------------------
// Config structs (matching snipkit.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where manifests and snippet sources live.
    #[serde(default)]
    pub content: ContentConfig,

    /// Build behavior.
    #[serde(default)]
    pub build: BuildConfig,
}

/// `[content]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Content root directory.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Manifest directory, relative to `root`.
    #[serde(default = "default_manifest_dir")]
    pub manifest_dir: String,

    /// Collection sources directory, relative to `root`.
    #[serde(default = "default_sources_dir")]
    pub sources_dir: String,

    /// Extension a file must carry to count as a manifest.
    #[serde(default = "default_manifest_extension")]
    pub manifest_extension: String,

    /// How deep below `manifest_dir` to look for manifests (1 = direct children).
    #[serde(default = "default_manifest_depth")]
    pub manifest_depth: usize,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            manifest_dir: default_manifest_dir(),
            sources_dir: default_sources_dir(),
            manifest_extension: default_manifest_extension(),
            manifest_depth: default_manifest_depth(),
        }
    }
}

impl ContentConfig {
    /// `<root>/<manifest_dir>`.
    pub fn manifest_root(&self) -> PathBuf {
        self.root.join(&self.manifest_dir)
    }

    /// `<root>/<sources_dir>`.
    pub fn sources_root(&self) -> PathBuf {
        self.root.join(&self.sources_dir)
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("content")
}
fn default_manifest_dir() -> String {
    "configs".into()
}
fn default_sources_dir() -> String {
    "sources".into()
}
fn default_manifest_extension() -> String {
    "json".into()
}
fn default_manifest_depth() -> usize {
    1
}

/// `[build]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Where `snipkit build` writes its JSON indexes.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Maximum snippet files parsed at once within a collection.
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,

    /// Whether to query version-control history for each snippet.
    #[serde(default = "default_true")]
    pub history: bool,

    /// Upper bound in ms on the history queries of a single file.
    #[serde(default = "default_history_timeout")]
    pub history_timeout_ms: u64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            concurrency: default_concurrency(),
            history: true,
            history_timeout_ms: default_history_timeout(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}
fn default_concurrency() -> u32 {
    8
}
fn default_true() -> bool {
    true
}
fn default_history_timeout() -> u64 {
    5000
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the application config.
///
/// An explicit path must exist. Without one, `./snipkit.toml` is used when
/// present and defaults otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }

    let path = Path::new(CONFIG_FILE_NAME);
    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SnipkitError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        SnipkitError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    if config.build.concurrency == 0 {
        return Err(SnipkitError::config(format!(
            "{}: build.concurrency must be at least 1",
            path.display()
        )));
    }

    Ok(config)
}

/// Write a default config file into `dir`. Refuses to overwrite an existing one.
/// Returns the path to the created file.
pub fn init_config(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(SnipkitError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| SnipkitError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SnipkitError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "snipkit-config-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("manifest_dir"));
        assert!(toml_str.contains("history_timeout_ms"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.build.concurrency, 8);
        assert_eq!(parsed.content.manifest_depth, 1);
        assert!(parsed.build.history);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[content]
root = "/srv/content"

[build]
history = false
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.content.manifest_root(), PathBuf::from("/srv/content/configs"));
        assert_eq!(config.content.sources_root(), PathBuf::from("/srv/content/sources"));
        assert!(!config.build.history);
        assert_eq!(config.build.history_timeout_ms, 5000);
    }

    #[test]
    fn zero_concurrency_rejected() {
        let dir = temp_dir();
        let path = dir.join("zero.toml");
        std::fs::write(&path, "[build]\nconcurrency = 0\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("concurrency"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn init_config_writes_loadable_defaults() {
        let dir = temp_dir();

        let path = init_config(&dir).unwrap();
        assert_eq!(path, dir.join(CONFIG_FILE_NAME));

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.content.root, PathBuf::from("content"));
        assert_eq!(config.build.concurrency, 8);
        assert!(config.build.history);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn init_config_refuses_to_overwrite() {
        let dir = temp_dir();
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[build]\nconcurrency = 3\n").unwrap();

        let err = init_config(&dir).unwrap_err();
        assert!(matches!(err, SnipkitError::Config { .. }));
        assert!(err.to_string().contains("already exists"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[build]\nconcurrency = 3\n"
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_explicit_config_is_io_error() {
        let err = load_config(Some(Path::new("/definitely/not/here/snipkit.toml"))).unwrap_err();
        assert!(matches!(err, SnipkitError::Io { .. }));
    }
}

//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use snipkit_core::{BuildResult, ProgressReporter, ReaderOptions, SnippetReader};
use snipkit_registry::{ManifestPattern, load_registry};
use snipkit_shared::{AppConfig, init_config, load_config};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// snipkit: turn snippet collections into render-ready indexes.
#[derive(Parser)]
#[command(
    name = "snipkit",
    version,
    about = "Build render-ready JSON indexes from snippet collections.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Path to a config file (defaults to ./snipkit.toml when present).
    #[arg(short, long, global = true, env = "SNIPKIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Parse every collection and write its snippet index.
    Build {
        /// Content root (overrides `content.root`).
        #[arg(long)]
        root: Option<PathBuf>,

        /// Output directory (overrides `build.output_dir`).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Skip version-control history queries.
        #[arg(long)]
        no_history: bool,

        /// Maximum snippet files parsed at once (overrides `build.concurrency`).
        #[arg(long)]
        concurrency: Option<u32>,
    },

    /// List the collections found under the content root.
    List {
        /// Content root (overrides `content.root`).
        #[arg(long)]
        root: Option<PathBuf>,

        /// Print the collection descriptors as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "snipkit=info",
        1 => "snipkit=debug",
        _ => "snipkit=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Build {
            root,
            out,
            no_history,
            concurrency,
        } => {
            let mut config = load_config(config_path)?;
            apply_build_overrides(&mut config, root, out, no_history, concurrency)?;
            cmd_build(&config).await
        }
        Command::List { root, json } => {
            let mut config = load_config(config_path)?;
            if let Some(root) = root {
                config.content.root = root;
            }
            cmd_list(&config, json)
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

/// Apply `build` flags on top of the loaded config.
fn apply_build_overrides(
    config: &mut AppConfig,
    root: Option<PathBuf>,
    out: Option<PathBuf>,
    no_history: bool,
    concurrency: Option<u32>,
) -> Result<()> {
    if let Some(root) = root {
        config.content.root = root;
    }
    if let Some(out) = out {
        config.build.output_dir = out;
    }
    if no_history {
        config.build.history = false;
    }
    if let Some(n) = concurrency {
        if n == 0 {
            return Err(eyre!("--concurrency must be at least 1"));
        }
        config.build.concurrency = n;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_build(config: &AppConfig) -> Result<()> {
    info!(
        root = %config.content.root.display(),
        out = %config.build.output_dir.display(),
        history = config.build.history,
        "building snippet indexes"
    );

    let reader = SnippetReader::new(ReaderOptions::from(&config.build));
    let reporter = CliProgress::new();

    let result = match snipkit_core::build_site(&config.content, &reader, &reporter).await {
        Ok(result) => result,
        Err(e) => {
            reporter.spinner.abandon();
            return Err(e.into());
        }
    };

    if result.collections.is_empty() {
        return Err(eyre!(
            "no collection manifests found under '{}'",
            config.content.manifest_root().display()
        ));
    }

    let written = snipkit_core::emit(&config.build.output_dir, &result.collections)?;

    println!();
    println!("  Build complete!");
    println!("  Collections: {}", result.collections.len());
    println!("  Snippets:    {}", result.snippet_count());
    println!("  Files:       {}", written.len());
    println!("  Output:      {}", config.build.output_dir.display());
    println!(
        "  Time:        {:.1}s",
        result.elapsed.as_secs_f64()
    );
    println!();

    Ok(())
}

fn cmd_list(config: &AppConfig, json: bool) -> Result<()> {
    let manifest_root = config.content.manifest_root();
    let collections = load_registry(&manifest_root, &ManifestPattern::from(&config.content))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&collections)?);
        return Ok(());
    }

    if collections.is_empty() {
        println!("No collections found under {}", manifest_root.display());
        return Ok(());
    }

    let sources = config.content.sources_root();
    for collection in &collections {
        let meta = &collection.meta;
        let dir = sources.join(&meta.dir_name).join(&meta.snippet_path);
        println!(
            "  {:<16} {:<14} {}{}",
            meta.slug,
            meta.resolver.as_str(),
            display_relative(&dir),
            if dir.is_dir() { "" } else { "  (missing)" }
        );
    }

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let cwd = std::env::current_dir()
        .map_err(|e| eyre!("cannot determine working directory: {e}"))?;
    let path = init_config(&cwd)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config: AppConfig = load_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

fn display_relative(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn collection_started(&self, slug: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Reading [{current}/{total}] {slug}"));
    }

    fn collection_read(&self, slug: &str, snippets: usize) {
        self.spinner
            .println(format!("  {slug}: {snippets} snippets"));
    }

    fn done(&self, _result: &BuildResult) {
        self.spinner.finish_and_clear();
    }
}

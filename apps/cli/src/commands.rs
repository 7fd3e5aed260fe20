//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use pagegen_core::{BuildReport, ProgressReporter, build_page_instructions_with};
use pagegen_shared::{
    CONFIG_FILE_NAME, FRONTMATTER_SCHEMA, PageRules, SiteConfig, init_config, load_config,
    load_config_from, render_sdl,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// pagegen: page and redirect generation for an MDX blog.
#[derive(Parser)]
#[command(
    name = "pagegen",
    version,
    about = "Generate page and redirect instructions from MDX content.",
    long_about = None,
)]
pub(crate) struct Cli {
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
    /// Query content, build page instructions, and write the outputs.
    Build {
        /// Config file (defaults to ./pagegen.toml, then ~/.pagegen/pagegen.toml).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Content directory (overrides the config file).
        #[arg(long)]
        content: Option<PathBuf>,

        /// Output directory (overrides the config file).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print the page and redirect instructions as JSON without writing anything.
    Pages {
        /// Config file (defaults to ./pagegen.toml, then ~/.pagegen/pagegen.toml).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Content directory (overrides the config file).
        #[arg(long)]
        content: Option<PathBuf>,
    },

    /// Print the front-matter schema contract.
    Schema,

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
    /// Write a default pagegen.toml.
    Init {
        /// Where to write it (defaults to ./pagegen.toml).
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show resolved configuration.
    Show {
        /// Config file to resolve instead of the default lookup.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "pagegen=info",
        1 => "pagegen=debug",
        _ => "pagegen=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so `pagegen pages` output stays pipeable.
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
    match cli.command {
        Command::Build {
            config,
            content,
            out,
        } => cmd_build(config.as_deref(), content, out).await,
        Command::Pages { config, content } => cmd_pages(config.as_deref(), content).await,
        Command::Schema => cmd_schema(),
        Command::Config { action } => match action {
            ConfigAction::Init { path } => cmd_config_init(path),
            ConfigAction::Show { config } => cmd_config_show(config.as_deref()),
        },
    }
}

/// Load the config file and apply CLI overrides.
fn resolve_config(
    path: Option<&Path>,
    content: Option<PathBuf>,
    out: Option<PathBuf>,
) -> Result<SiteConfig> {
    let mut config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    if let Some(dir) = content {
        config.content.content_dir = dir;
    }
    if let Some(dir) = out {
        config.output.output_dir = dir;
    }

    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_build(
    config_path: Option<&Path>,
    content: Option<PathBuf>,
    out: Option<PathBuf>,
) -> Result<()> {
    let config = resolve_config(config_path, content, out)?;

    info!(
        content_dir = %config.content.content_dir.display(),
        output_dir = %config.output.output_dir.display(),
        "building site pages"
    );

    let reporter = CliProgress::new()?;
    let report = pagegen_core::build_site(&config, env!("CARGO_PKG_VERSION"), &reporter).await?;

    println!();
    println!("  Build complete!");
    println!("  ID:         {}", report.build_id);
    println!("  Entries:    {}", report.entry_count);
    println!(
        "  Pages:      {} ({} alternate-format)",
        report.page_count, report.alternate_page_count
    );
    println!("  Redirects:  {}", report.redirect_count);
    println!("  Output:     {}", report.output_dir.display());
    println!("  Time:       {:.2}s", report.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_pages(config_path: Option<&Path>, content: Option<PathBuf>) -> Result<()> {
    let config = resolve_config(config_path, content, None)?;

    let entries = pagegen_content::query_entries(&config.content).await?;
    let instructions = build_page_instructions_with(&entries, &PageRules::from(&config));

    println!("{}", serde_json::to_string_pretty(&instructions)?);
    Ok(())
}

fn cmd_schema() -> Result<()> {
    print!("{}", render_sdl(FRONTMATTER_SCHEMA));
    Ok(())
}

fn cmd_config_init(path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
    let written = init_config(&path)?;
    println!("Config initialized at: {}", written.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path, None, None)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Result<Self> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")?.tick_strings(&[
                "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏",
            ]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Ok(Self { spinner })
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn page_registered(&self, path: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Registering [{current}/{total}] {path}"));
    }

    fn done(&self, _report: &BuildReport) {
        self.spinner.finish_and_clear();
    }
}

// A failed build never reaches `done`; clear the spinner before the error report.
impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

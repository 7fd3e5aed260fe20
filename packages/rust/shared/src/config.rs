//! Site configuration for pagegen.
//!
//! Project config lives at `./pagegen.toml`, with `~/.pagegen/pagegen.toml`
//! as a user-level fallback. CLI flags override config file values, which
//! override defaults. Once loaded the config is never mutated.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PagegenError, Result};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "pagegen.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".pagegen";

// ---------------------------------------------------------------------------
// Config structs (matching pagegen.toml schema)
// ---------------------------------------------------------------------------

/// Top-level site config, deserialized from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Where content lives and which files are documents.
    #[serde(default)]
    pub content: ContentConfig,

    /// Page generation rules.
    #[serde(default)]
    pub pages: PagesConfig,

    /// Template component paths per page kind.
    #[serde(default)]
    pub templates: TemplatesConfig,

    /// Build output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[content]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Root directory scanned for documents.
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    /// Leading path segment stripped before deriving slugs.
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// File extensions treated as documents (without the dot).
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Keep documents marked `isDraft: true`.
    #[serde(default = "default_true")]
    pub include_drafts: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            base_path: default_base_path(),
            extensions: default_extensions(),
            include_drafts: true,
        }
    }
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}
fn default_base_path() -> String {
    "pages".into()
}
fn default_extensions() -> Vec<String> {
    vec!["mdx".into(), "md".into()]
}
fn default_true() -> bool {
    true
}

/// When redirect descriptors are emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RedirectPolicy {
    /// One redirect per entry; an absent `redirect_from` renders as `"undefined"`.
    #[default]
    Always,
    /// Only entries that declare `redirect_from` get a redirect.
    WhenPresent,
}

/// `[pages]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagesConfig {
    /// Appended to an entry's slug to form the alternate-format path.
    #[serde(default = "default_alternate_suffix")]
    pub alternate_suffix: String,

    /// Redirect emission policy.
    #[serde(default)]
    pub redirects: RedirectPolicy,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            alternate_suffix: default_alternate_suffix(),
            redirects: RedirectPolicy::default(),
        }
    }
}

fn default_alternate_suffix() -> String {
    "amp/".into()
}

/// `[templates]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplatesConfig {
    /// Component used for canonical pages.
    #[serde(default = "default_canonical_template")]
    pub canonical: String,

    /// Component used for alternate-format pages.
    #[serde(default = "default_alternate_template")]
    pub alternate: String,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            canonical: default_canonical_template(),
            alternate: default_alternate_template(),
        }
    }
}

fn default_canonical_template() -> String {
    "src/templates/blog-post.jsx".into()
}
fn default_alternate_template() -> String {
    "src/templates/blog-post.amp.jsx".into()
}

/// `[output]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the build writes `pages.json`, `redirects.json`, etc. into.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("public/.pagegen")
}

// ---------------------------------------------------------------------------
// Page rules (runtime, derived from config)
// ---------------------------------------------------------------------------

/// Immutable rules the page builder runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRules {
    /// Appended to a slug to form the alternate-format page path.
    pub alternate_suffix: String,
    /// Redirect emission policy.
    pub redirects: RedirectPolicy,
}

impl Default for PageRules {
    fn default() -> Self {
        Self {
            alternate_suffix: default_alternate_suffix(),
            redirects: RedirectPolicy::Always,
        }
    }
}

impl From<&SiteConfig> for PageRules {
    fn from(config: &SiteConfig) -> Self {
        Self {
            alternate_suffix: config.pages.alternate_suffix.clone(),
            redirects: config.pages.redirects,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the user config directory (`~/.pagegen/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PagegenError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the user config file (`~/.pagegen/pagegen.toml`).
pub fn user_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the site config: `./pagegen.toml`, then the user config, then defaults.
pub fn load_config() -> Result<SiteConfig> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return load_config_from(&local);
    }

    let user = user_config_path()?;
    if user.exists() {
        return load_config_from(&user);
    }

    tracing::debug!("no config file found, using defaults");
    Ok(SiteConfig::default())
}

/// Load the site config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<SiteConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PagegenError::io(path, e))?;

    let config: SiteConfig = toml::from_str(&content).map_err(|e| {
        PagegenError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Write a default config file at `path`. Refuses to overwrite an existing file.
pub fn init_config(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Err(PagegenError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| PagegenError::io(parent, e))?;
    }

    let content = toml::to_string_pretty(&SiteConfig::default())
        .map_err(|e| PagegenError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| PagegenError::io(path, e))?;
    tracing::info!(path = %path.display(), "created default config file");

    Ok(path.to_path_buf())
}

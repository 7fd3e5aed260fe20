//! Shared types, error model, schema contract, and configuration for pagegen.
//!
//! This crate is the foundation depended on by all other pagegen crates.
//! It provides:
//! - [`PagegenError`] — the unified error type
//! - Domain types ([`ContentEntry`], [`PageDescriptor`], [`RedirectDescriptor`], [`BuildId`])
//! - The front-matter schema contract ([`FRONTMATTER_SCHEMA`])
//! - Configuration ([`SiteConfig`], [`PageRules`], config loading)

pub mod config;
pub mod error;
pub mod schema;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    CONFIG_FILE_NAME, ContentConfig, OutputConfig, PageRules, PagesConfig, RedirectPolicy,
    SiteConfig, TemplatesConfig, config_dir, init_config, load_config, load_config_from,
    user_config_path,
};
pub use error::{PagegenError, Result};
pub use schema::{FRONTMATTER_SCHEMA, FieldKind, FieldSpec, render_sdl};
pub use types::{
    BuildId, BuildManifest, CURRENT_SCHEMA_VERSION, ContentEntry, Frontmatter, OutputFileMeta,
    PageContext, PageDescriptor, RedirectDescriptor, TemplateKind,
};

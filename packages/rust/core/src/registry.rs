//! Page and redirect registration.
//!
//! [`PageRegistry`] is the seam between the page builder and whatever
//! materializes pages. [`ManifestRegistry`] is the file-backed sink: it
//! resolves template components and writes the build outputs to disk.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use pagegen_shared::{
    BuildId, BuildManifest, CURRENT_SCHEMA_VERSION, OutputFileMeta, PageContext, PageDescriptor,
    PagegenError, RedirectDescriptor, Result, TemplateKind, TemplatesConfig,
};

/// Receives every descriptor a build emits, once each.
pub trait PageRegistry {
    /// Register one page (canonical or alternate-format).
    fn register_page(&mut self, page: &PageDescriptor<'_>) -> Result<()>;
    /// Register one permanent redirect.
    fn register_redirect(&mut self, redirect: &RedirectDescriptor) -> Result<()>;
}

/// A page as written to `pages.json`.
#[derive(Serialize)]
struct RegisteredPage<'p, 'a> {
    path: &'p str,
    component: &'p str,
    kind: TemplateKind,
    context: &'p PageContext<'a>,
}

/// File-backed registry writing `pages.json`, `redirects.json`, `_redirects`
/// and `manifest.json` into the output directory on [`finish`](Self::finish).
#[derive(Debug)]
pub struct ManifestRegistry {
    output_dir: PathBuf,
    templates: TemplatesConfig,
    pages: Vec<serde_json::Value>,
    alternate_pages: usize,
    redirects: Vec<RedirectDescriptor>,
}

impl ManifestRegistry {
    pub fn new(output_dir: impl Into<PathBuf>, templates: TemplatesConfig) -> Self {
        Self {
            output_dir: output_dir.into(),
            templates,
            pages: Vec::new(),
            alternate_pages: 0,
            redirects: Vec::new(),
        }
    }

    /// Component path a page of `kind` is rendered with.
    pub fn component_for(&self, kind: TemplateKind) -> &str {
        match kind {
            TemplateKind::Canonical => &self.templates.canonical,
            TemplateKind::AlternateFormat => &self.templates.alternate,
        }
    }

    /// Number of pages registered so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of redirects registered so far.
    pub fn redirect_count(&self) -> usize {
        self.redirects.len()
    }

    /// Write all outputs and the manifest. Each file is written atomically.
    #[instrument(skip_all, fields(output_dir = %self.output_dir.display()))]
    pub fn finish(self, entry_count: usize, tool_version: &str) -> Result<BuildManifest> {
        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| PagegenError::io(&self.output_dir, e))?;

        let pages_json = to_pretty_json(&self.pages)?;
        let redirects_json = to_pretty_json(&self.redirects)?;
        let netlify = render_netlify_redirects(&self.redirects);

        let files = vec![
            write_atomic(&self.output_dir, "pages.json", &pages_json)?,
            write_atomic(&self.output_dir, "redirects.json", &redirects_json)?,
            write_atomic(&self.output_dir, "_redirects", &netlify)?,
        ];

        let manifest = BuildManifest {
            schema_version: CURRENT_SCHEMA_VERSION,
            id: BuildId::new(),
            tool_version: tool_version.to_string(),
            generated_at: Utc::now(),
            entry_count,
            page_count: self.pages.len(),
            alternate_page_count: self.alternate_pages,
            redirect_count: self.redirects.len(),
            files,
        };

        write_atomic(&self.output_dir, "manifest.json", &to_pretty_json(&manifest)?)?;

        info!(
            build_id = %manifest.id,
            pages = manifest.page_count,
            redirects = manifest.redirect_count,
            "build outputs written"
        );

        Ok(manifest)
    }
}

impl PageRegistry for ManifestRegistry {
    fn register_page(&mut self, page: &PageDescriptor<'_>) -> Result<()> {
        let record = RegisteredPage {
            path: &page.path,
            component: self.component_for(page.template_kind),
            kind: page.template_kind,
            context: &page.context,
        };
        let value = serde_json::to_value(&record).map_err(|e| {
            PagegenError::validation(format!("page {} is not serializable: {e}", page.path))
        })?;

        if page.template_kind == TemplateKind::AlternateFormat {
            self.alternate_pages += 1;
        }
        self.pages.push(value);
        Ok(())
    }

    fn register_redirect(&mut self, redirect: &RedirectDescriptor) -> Result<()> {
        self.redirects.push(redirect.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// One `from to 301!` line per redirect (Netlify `_redirects` format).
fn render_netlify_redirects(redirects: &[RedirectDescriptor]) -> String {
    let mut out = String::new();
    for redirect in redirects {
        let status = if redirect.permanent { "301!" } else { "302" };
        out.push_str(&format!(
            "{}  {}  {status}\n",
            redirect.from_path, redirect.to_path
        ));
    }
    out
}

fn to_pretty_json<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    serde_json::to_string_pretty(data)
        .map_err(|e| PagegenError::validation(format!("JSON serialization failed: {e}")))
}

/// Write to a temp file, then rename over the target.
fn write_atomic(dir: &Path, filename: &str, content: &str) -> Result<OutputFileMeta> {
    let target = dir.join(filename);
    let temp = dir.join(format!(".{filename}.tmp"));

    std::fs::write(&temp, content).map_err(|e| PagegenError::io(&temp, e))?;
    std::fs::rename(&temp, &target).map_err(|e| PagegenError::io(&target, e))?;

    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let sha256 = format!("{:x}", hasher.finalize());

    debug!(file = %filename, size = content.len(), "wrote output file");

    Ok(OutputFileMeta {
        filename: filename.to_string(),
        sha256,
        size_bytes: content.len(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

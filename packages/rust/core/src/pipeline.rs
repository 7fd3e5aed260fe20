//! End-to-end build: content query → page instructions → registration → outputs.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, instrument};

use pagegen_shared::{BuildId, PageRules, Result, SiteConfig};

use crate::pages::{PageInstructions, build_page_instructions_with};
use crate::registry::{ManifestRegistry, PageRegistry};

/// Result of a full site build.
#[derive(Debug)]
pub struct BuildReport {
    /// Identifier written to `manifest.json`.
    pub build_id: BuildId,
    /// Number of content entries consumed.
    pub entry_count: usize,
    /// Number of pages registered (both kinds).
    pub page_count: usize,
    /// Alternate-format pages among `page_count`.
    pub alternate_page_count: usize,
    /// Number of redirects registered.
    pub redirect_count: usize,
    /// Directory the outputs were written to.
    pub output_dir: PathBuf,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting build status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each page is registered.
    fn page_registered(&self, path: &str, current: usize, total: usize);
    /// Called when the build completes.
    fn done(&self, report: &BuildReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn page_registered(&self, _path: &str, _current: usize, _total: usize) {}
    fn done(&self, _report: &BuildReport) {}
}

/// Hand every descriptor to `registry`: pages first, then redirects, each in
/// instruction order.
pub fn register_all(
    instructions: &PageInstructions<'_>,
    registry: &mut dyn PageRegistry,
    progress: &dyn ProgressReporter,
) -> Result<()> {
    let total = instructions.pages.len();
    for (i, page) in instructions.pages.iter().enumerate() {
        registry.register_page(page)?;
        progress.page_registered(&page.path, i + 1, total);
    }

    for redirect in &instructions.redirects {
        registry.register_redirect(redirect)?;
    }

    Ok(())
}

/// Run the full build.
///
/// 1. Query content (once; a failure aborts the build)
/// 2. Build page instructions
/// 3. Register pages and redirects
/// 4. Write outputs and manifest
#[instrument(skip_all, fields(content_dir = %config.content.content_dir.display()))]
pub async fn build_site(
    config: &SiteConfig,
    tool_version: &str,
    progress: &dyn ProgressReporter,
) -> Result<BuildReport> {
    let start = Instant::now();

    progress.phase("Querying content");
    let entries = pagegen_content::query_entries(&config.content).await?;

    progress.phase("Building page instructions");
    let rules = PageRules::from(config);
    let instructions = build_page_instructions_with(&entries, &rules);

    progress.phase("Registering pages");
    let mut registry =
        ManifestRegistry::new(&config.output.output_dir, config.templates.clone());
    register_all(&instructions, &mut registry, progress)?;

    progress.phase("Writing outputs");
    let manifest = registry.finish(entries.len(), tool_version)?;

    let report = BuildReport {
        build_id: manifest.id,
        entry_count: manifest.entry_count,
        page_count: manifest.page_count,
        alternate_page_count: manifest.alternate_page_count,
        redirect_count: manifest.redirect_count,
        output_dir: config.output.output_dir.clone(),
        elapsed: start.elapsed(),
    };

    progress.done(&report);

    info!(
        build_id = %report.build_id,
        entries = report.entry_count,
        pages = report.page_count,
        redirects = report.redirect_count,
        elapsed_ms = report.elapsed.as_millis(),
        "build complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagegen_shared::{
        PageDescriptor, PagegenError, RedirectDescriptor, RedirectPolicy, TemplateKind,
    };

    fn fixture_config(output_dir: PathBuf) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.content.content_dir = PathBuf::from("../../../fixtures/content");
        config.output.output_dir = output_dir;
        config
    }

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("pagegen-pipeline-test-{}", uuid::Uuid::now_v7()))
    }

    /// Records what it is given, in order.
    #[derive(Default)]
    struct RecordingRegistry {
        pages: Vec<(String, TemplateKind)>,
        redirects: Vec<RedirectDescriptor>,
    }

    impl PageRegistry for RecordingRegistry {
        fn register_page(&mut self, page: &PageDescriptor<'_>) -> Result<()> {
            self.pages.push((page.path.clone(), page.template_kind));
            Ok(())
        }

        fn register_redirect(&mut self, redirect: &RedirectDescriptor) -> Result<()> {
            self.redirects.push(redirect.clone());
            Ok(())
        }
    }

    /// Fails on the n-th page.
    struct FailingRegistry {
        fail_at: usize,
        seen: usize,
    }

    impl PageRegistry for FailingRegistry {
        fn register_page(&mut self, page: &PageDescriptor<'_>) -> Result<()> {
            self.seen += 1;
            if self.seen == self.fail_at {
                return Err(PagegenError::validation(format!("rejected {}", page.path)));
            }
            Ok(())
        }

        fn register_redirect(&mut self, _redirect: &RedirectDescriptor) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn fixture_build_registers_every_descriptor() {
        let config = fixture_config(temp_dir());
        let entries = pagegen_content::query_entries(&config.content)
            .await
            .expect("query");
        let instructions = build_page_instructions_with(&entries, &PageRules::from(&config));

        let mut registry = RecordingRegistry::default();
        register_all(&instructions, &mut registry, &SilentProgress).expect("register");

        assert_eq!(
            registry.pages,
            vec![
                ("/blog/hello-world/".to_string(), TemplateKind::Canonical),
                ("/blog/hello-world/amp/".to_string(), TemplateKind::AlternateFormat),
                ("/blog/rust-ownership-part-1/".to_string(), TemplateKind::Canonical),
                ("/blog/rust-ownership-part-1/amp/".to_string(), TemplateKind::AlternateFormat),
                ("/blog/draft-notes/".to_string(), TemplateKind::Canonical),
                ("/blog/draft-notes/amp/".to_string(), TemplateKind::AlternateFormat),
                ("/blog/rust-ownership-part-2/".to_string(), TemplateKind::Canonical),
            ]
        );
        assert_eq!(registry.redirects.len(), 4);
        assert_eq!(registry.redirects[1].from_path, "/posts/ownership-1/");
        assert_eq!(registry.redirects[1].to_path, "/blog/rust-ownership-part-1/");
    }

    #[tokio::test]
    async fn build_site_writes_outputs() {
        let out = temp_dir();
        let mut config = fixture_config(out.clone());
        config.pages.redirects = RedirectPolicy::WhenPresent;

        let report = build_site(&config, "0.1.0-test", &SilentProgress)
            .await
            .expect("build");

        assert_eq!(report.entry_count, 4);
        assert_eq!(report.page_count, 7);
        assert_eq!(report.alternate_page_count, 3);
        assert_eq!(report.redirect_count, 1);
        assert_eq!(report.output_dir, out);

        for file in ["pages.json", "redirects.json", "_redirects", "manifest.json"] {
            assert!(out.join(file).exists(), "missing {file}");
        }
        let netlify = std::fs::read_to_string(out.join("_redirects")).unwrap();
        assert_eq!(netlify, "/posts/ownership-1/  /blog/rust-ownership-part-1/  301!\n");

        let _ = std::fs::remove_dir_all(&out);
    }

    #[tokio::test]
    async fn query_failure_aborts_build() {
        let out = temp_dir();
        let mut config = fixture_config(out.clone());
        config.content.content_dir = PathBuf::from("/nonexistent/pagegen/content");

        let err = build_site(&config, "0.1.0-test", &SilentProgress)
            .await
            .expect_err("missing content");
        assert!(matches!(err, PagegenError::Query(_)));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn registry_error_stops_registration() {
        let config = fixture_config(temp_dir());
        let entries = pagegen_content::query_entries(&config.content)
            .await
            .expect("query");
        let instructions = build_page_instructions_with(&entries, &PageRules::default());

        let mut registry = FailingRegistry { fail_at: 3, seen: 0 };
        let err = register_all(&instructions, &mut registry, &SilentProgress)
            .expect_err("third page rejected");
        assert!(err.to_string().contains("/blog/rust-ownership-part-1/"));
        assert_eq!(registry.seen, 3);
    }
}

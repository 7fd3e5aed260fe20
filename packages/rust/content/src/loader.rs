//! The content query: walk, parse, augment, filter, sort.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use pagegen_shared::{ContentConfig, ContentEntry, PagegenError, Result};

use crate::frontmatter::parse_frontmatter;
use crate::slug::derive_slug;

/// Run the content query once: every document under `content_dir`, with its
/// slug attached, sorted ascending by `datePublished`.
///
/// The sort is stable, so documents published at the same instant keep the
/// sorted-path order of the walk. Any unreadable or invalid document fails
/// the whole query.
#[instrument(skip_all, fields(content_dir = %config.content_dir.display()))]
pub async fn query_entries(config: &ContentConfig) -> Result<Vec<ContentEntry>> {
    let root = &config.content_dir;

    let meta = tokio::fs::metadata(root).await.map_err(|e| {
        PagegenError::Query(format!("content directory {} is not readable: {e}", root.display()))
    })?;
    if !meta.is_dir() {
        return Err(PagegenError::Query(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let documents = collect_documents(root, &config.extensions).await?;
    debug!(documents = documents.len(), "content walk complete");

    let mut entries = Vec::with_capacity(documents.len());
    for path in &documents {
        let entry = read_entry(root, path, &config.base_path).await?;
        if !config.include_drafts && entry.is_draft() {
            debug!(slug = %entry.slug, "skipping draft");
            continue;
        }
        entries.push(entry);
    }

    entries.sort_by(|a, b| {
        a.frontmatter
            .date_published
            .cmp(&b.frontmatter.date_published)
    });

    info!(entries = entries.len(), "content query complete");
    Ok(entries)
}

/// Read one document and attach its slug.
pub async fn read_entry(root: &Path, path: &Path, base_path: &str) -> Result<ContentEntry> {
    let source = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| PagegenError::io(path, e))?;

    let frontmatter = parse_frontmatter(path, &source)?;

    let relative = path.strip_prefix(root).unwrap_or(path);
    let slug = derive_slug(relative, base_path);

    debug!(slug = %slug, title = %frontmatter.title, "read document");

    Ok(ContentEntry {
        slug,
        frontmatter,
        source_path: path.to_path_buf(),
    })
}

/// Collect every file under `root` with a content extension, in sorted order.
async fn collect_documents(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut pending = vec![root.to_path_buf()];
    let mut documents = Vec::new();

    while let Some(dir) = pending.pop() {
        let mut reader = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| PagegenError::io(&dir, e))?;

        while let Some(item) = reader
            .next_entry()
            .await
            .map_err(|e| PagegenError::io(&dir, e))?
        {
            let path = item.path();
            let file_type = item
                .file_type()
                .await
                .map_err(|e| PagegenError::io(&path, e))?;

            if file_type.is_dir() {
                pending.push(path);
            } else if has_content_extension(&path, extensions) {
                documents.push(path);
            }
        }
    }

    documents.sort();
    Ok(documents)
}

fn has_content_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_config() -> ContentConfig {
        ContentConfig {
            content_dir: PathBuf::from("../../../fixtures/content"),
            ..ContentConfig::default()
        }
    }

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "pagegen-content-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[tokio::test]
    async fn fixture_query_is_date_sorted_with_slugs() {
        let entries = query_entries(&fixture_config()).await.expect("query");

        let slugs: Vec<&str> = entries.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(
            slugs,
            vec![
                "/blog/hello-world/",
                "/blog/rust-ownership-part-1/",
                "/blog/draft-notes/",
                "/blog/rust-ownership-part-2/",
            ]
        );

        let part_two = &entries[3];
        assert_eq!(part_two.frontmatter.include_katex, Some(true));
        assert_eq!(part_two.series(), Some("Rust Ownership"));
        assert!(part_two.source_path.ends_with("index.mdx"));
    }

    #[tokio::test]
    async fn drafts_can_be_excluded() {
        let config = ContentConfig {
            include_drafts: false,
            ..fixture_config()
        };
        let entries = query_entries(&config).await.expect("query");
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| !e.is_draft()));
    }

    #[tokio::test]
    async fn extensions_filter_documents() {
        let config = ContentConfig {
            extensions: vec!["md".into()],
            ..fixture_config()
        };
        let entries = query_entries(&config).await.expect("query");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].slug, "/blog/hello-world/");
    }

    #[tokio::test]
    async fn same_day_posts_keep_path_order() {
        let dir = temp_dir();
        let fm = "---\ntitle: T\ndatePublished: 2021-06-01\ndescription: d\n---\n";
        write(&dir, "pages/c.mdx", fm);
        write(&dir, "pages/a.mdx", fm);
        write(&dir, "pages/b/index.mdx", fm);

        let config = ContentConfig {
            content_dir: dir.clone(),
            ..ContentConfig::default()
        };
        let entries = query_entries(&config).await.expect("query");
        let slugs: Vec<&str> = entries.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["/a/", "/b/", "/c/"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn invalid_document_fails_the_query() {
        let dir = temp_dir();
        write(
            &dir,
            "pages/ok.mdx",
            "---\ntitle: T\ndatePublished: 2021-06-01\ndescription: d\n---\n",
        );
        write(&dir, "pages/bad.mdx", "---\ntitle: T\n---\n");

        let config = ContentConfig {
            content_dir: dir.clone(),
            ..ContentConfig::default()
        };
        let err = query_entries(&config).await.expect_err("schema violation");
        match err {
            PagegenError::Schema { path, violations } => {
                assert!(path.ends_with("bad.mdx"));
                assert_eq!(violations.len(), 2);
            }
            other => panic!("expected schema error, got {other:?}"),
        }

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn missing_content_dir_is_a_query_failure() {
        let config = ContentConfig {
            content_dir: PathBuf::from("/nonexistent/pagegen/content"),
            ..ContentConfig::default()
        };
        let err = query_entries(&config).await.expect_err("missing dir");
        assert!(matches!(err, PagegenError::Query(_)));
    }
}

//! Slug derivation from document file paths.

use std::path::{Component, Path};

/// Derive the canonical URL path of a document from its path relative to the
/// content root.
///
/// The `base_path` prefix is stripped when present, the extension is dropped,
/// and an `index` file maps to its directory. The result always has a leading
/// and trailing slash: `pages/blog/hello.mdx` → `/blog/hello/`.
pub fn derive_slug(relative_path: &Path, base_path: &str) -> String {
    let mut segments: Vec<String> = relative_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    let base: Vec<&str> = base_path.split(['/', '\\']).filter(|s| !s.is_empty()).collect();
    let under_base = segments.len() > base.len()
        && segments.iter().zip(&base).all(|(seg, b)| seg.as_str() == *b);
    if !base.is_empty() && under_base {
        segments.drain(..base.len());
    }

    if let Some(file) = segments.pop() {
        let stem = Path::new(&file)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or(file);
        if stem != "index" {
            segments.push(stem);
        }
    }

    if segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}/", segments.join("/"))
}

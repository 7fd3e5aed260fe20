//! Error types for pagegen.
//!
//! Library crates use [`PagegenError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all pagegen operations.
#[derive(Debug, thiserror::Error)]
pub enum PagegenError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Front-matter could not be split, parsed, or a value could not be read.
    #[error("parse error in {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Front-matter violates the declared schema contract.
    #[error("schema error in {path:?}: {}", .violations.join("; "))]
    Schema {
        path: PathBuf,
        violations: Vec<String>,
    },

    /// The content query failed as a whole.
    #[error("content query failed: {0}")]
    Query(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (serialization, invalid output, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PagegenError>;

impl PagegenError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error for the document at `path`.
    pub fn parse(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = PagegenError::config("unknown redirect policy");
        assert_eq!(err.to_string(), "config error: unknown redirect policy");

        let err = PagegenError::Schema {
            path: "pages/a.mdx".into(),
            violations: vec![
                "missing required field `title`".into(),
                "`part` must be Int".into(),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("pages/a.mdx"));
        assert!(msg.contains("missing required field `title`; `part` must be Int"));
    }

    #[test]
    fn parse_error_names_document() {
        let err = PagegenError::parse("pages/broken.mdx", "no front-matter block");
        assert!(err.to_string().contains("broken.mdx"));
        assert!(err.to_string().contains("no front-matter block"));
    }
}

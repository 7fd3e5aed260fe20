//! Page generation core for pagegen.
//!
//! Builds page and redirect instructions from the date-sorted content
//! sequence, hands them to a [`registry::PageRegistry`], and ties the
//! content query and registration together into `build_site`.

pub mod pages;
pub mod pipeline;
pub mod registry;

pub use pages::{PageInstructions, build_page_instructions, build_page_instructions_with};
pub use pipeline::{BuildReport, ProgressReporter, SilentProgress, build_site, register_all};
pub use registry::{ManifestRegistry, PageRegistry};

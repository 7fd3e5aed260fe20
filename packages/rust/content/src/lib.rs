//! Content query: front-matter parsing, slug derivation, and document loading.
//!
//! Turns a directory of MDX/Markdown documents into the date-sorted
//! [`ContentEntry`](pagegen_shared::ContentEntry) sequence the page builder
//! consumes. This is the only asynchronous step of a build.

mod frontmatter;
mod loader;
mod slug;

pub use frontmatter::{parse_frontmatter, split_frontmatter};
pub use loader::{query_entries, read_entry};
pub use slug::derive_slug;

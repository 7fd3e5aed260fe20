//! Page context builder.
//!
//! Turns the date-sorted entry sequence into page and redirect instructions:
//! one canonical page per entry, an alternate-format page unless the entry
//! opted into the primary format, previous/next links, the series cohort,
//! and a permanent redirect.

use serde::Serialize;
use tracing::{debug, instrument};

use pagegen_shared::{
    ContentEntry, PageContext, PageDescriptor, PageRules, RedirectDescriptor, RedirectPolicy,
    TemplateKind,
};

/// `fromPath` rendered for an entry without `redirect_from` under
/// [`RedirectPolicy::Always`].
pub const MISSING_REDIRECT_SOURCE: &str = "undefined";

/// Everything one build registers, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageInstructions<'a> {
    /// Per entry: the canonical page, then the alternate-format page if any.
    pub pages: Vec<PageDescriptor<'a>>,
    /// Per entry, in entry order.
    pub redirects: Vec<RedirectDescriptor>,
}

impl PageInstructions<'_> {
    /// Number of alternate-format pages among `pages`.
    pub fn alternate_count(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| p.template_kind == TemplateKind::AlternateFormat)
            .count()
    }
}

/// Build instructions with the default rules (`amp/` suffix, a redirect per entry).
pub fn build_page_instructions(entries: &[ContentEntry]) -> PageInstructions<'_> {
    build_page_instructions_with(entries, &PageRules::default())
}

/// Build instructions for `entries`, which must already be sorted ascending
/// by publish date. The order is trusted, not checked: adjacency always
/// follows the input sequence.
#[instrument(skip_all, fields(entries = entries.len()))]
pub fn build_page_instructions_with<'a>(
    entries: &'a [ContentEntry],
    rules: &PageRules,
) -> PageInstructions<'a> {
    let mut pages = Vec::with_capacity(entries.len() * 2);
    let mut redirects = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let (previous_entry, next_entry) = neighbours(entries, index);

        let context = PageContext {
            slug: &entry.slug,
            previous_entry,
            next_entry,
            series_cohort: series_cohort(entries, entry),
        };

        if entry.wants_alternate_format() {
            pages.push(PageDescriptor {
                path: entry.slug.clone(),
                template_kind: TemplateKind::Canonical,
                context: context.clone(),
            });
            pages.push(PageDescriptor {
                path: format!("{}{}", entry.slug, rules.alternate_suffix),
                template_kind: TemplateKind::AlternateFormat,
                context,
            });
        } else {
            pages.push(PageDescriptor {
                path: entry.slug.clone(),
                template_kind: TemplateKind::Canonical,
                context,
            });
        }

        if let Some(redirect) = redirect_for(entry, rules.redirects) {
            redirects.push(redirect);
        }
    }

    debug!(
        pages = pages.len(),
        redirects = redirects.len(),
        "page instructions built"
    );

    PageInstructions { pages, redirects }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn neighbours(
    entries: &[ContentEntry],
    index: usize,
) -> (Option<&ContentEntry>, Option<&ContentEntry>) {
    let previous = index.checked_sub(1).and_then(|i| entries.get(i));
    let next = entries.get(index + 1);
    (previous, next)
}

/// All entries sharing `entry`'s series, in sequence order, itself included.
fn series_cohort<'a>(entries: &'a [ContentEntry], entry: &ContentEntry) -> Vec<&'a ContentEntry> {
    match entry.series() {
        Some(series) => entries
            .iter()
            .filter(|other| other.frontmatter.series.as_deref() == Some(series))
            .collect(),
        None => Vec::new(),
    }
}

fn redirect_for(entry: &ContentEntry, policy: RedirectPolicy) -> Option<RedirectDescriptor> {
    let from_path = match (&entry.frontmatter.redirect_from, policy) {
        (Some(from), _) => from.clone(),
        (None, RedirectPolicy::Always) => MISSING_REDIRECT_SOURCE.to_string(),
        (None, RedirectPolicy::WhenPresent) => return None,
    };

    Some(RedirectDescriptor {
        from_path,
        to_path: entry.slug.clone(),
        permanent: true,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

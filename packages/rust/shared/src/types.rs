//! Core domain types for pagegen builds.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current schema version for the build manifest format.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// BuildId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper for build identifiers (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildId(pub Uuid);

impl BuildId {
    /// Generate a new time-sortable build identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for BuildId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BuildId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for BuildId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// Frontmatter / ContentEntry
// ---------------------------------------------------------------------------

/// Typed front-matter of one document, shaped by the schema contract.
///
/// Field names on the wire follow the front-matter keys authors write
/// (`datePublished`, `include_KaTeX`, `redirect_from`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    pub title: String,
    #[serde(rename = "datePublished", with = "flexible_date")]
    pub date_published: DateTime<Utc>,
    #[serde(
        rename = "dateModified",
        default,
        with = "flexible_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_modified: Option<DateTime<Utc>>,
    pub description: String,
    /// Opt-in to the KaTeX-bearing primary format. `Some(true)` suppresses
    /// the alternate-format page; anything else keeps it.
    #[serde(rename = "include_KaTeX", default, skip_serializing_if = "Option::is_none")]
    pub include_katex: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(rename = "isDraft", default, skip_serializing_if = "Option::is_none")]
    pub is_draft: Option<bool>,
    #[serde(rename = "redirect_from", default, skip_serializing_if = "Option::is_none")]
    pub redirect_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// One published document, as returned by the content query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentEntry {
    /// Canonical URL path (e.g. `/blog/hello-world/`), derived from the file path.
    pub slug: String,
    /// Parsed front-matter.
    pub frontmatter: Frontmatter,
    /// File the entry was read from. Diagnostics only, never emitted.
    #[serde(skip)]
    pub source_path: PathBuf,
}

impl ContentEntry {
    /// The series key, if present and non-empty.
    pub fn series(&self) -> Option<&str> {
        self.frontmatter
            .series
            .as_deref()
            .filter(|series| !series.is_empty())
    }

    /// Whether the alternate-format page is produced for this entry.
    ///
    /// Only an explicit `include_KaTeX: true` suppresses it.
    pub fn wants_alternate_format(&self) -> bool {
        self.frontmatter.include_katex != Some(true)
    }

    /// Whether the entry is marked as a draft.
    pub fn is_draft(&self) -> bool {
        self.frontmatter.is_draft == Some(true)
    }
}

// ---------------------------------------------------------------------------
// Page / redirect descriptors
// ---------------------------------------------------------------------------

/// Which template a page is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateKind {
    Canonical,
    AlternateFormat,
}

impl std::fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Canonical => f.write_str("canonical"),
            Self::AlternateFormat => f.write_str("alternate-format"),
        }
    }
}

/// Context handed to a page template.
///
/// Borrows the entries it links to; a build never outlives its entry list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext<'a> {
    pub slug: &'a str,
    pub previous_entry: Option<&'a ContentEntry>,
    pub next_entry: Option<&'a ContentEntry>,
    pub series_cohort: Vec<&'a ContentEntry>,
}

/// An instruction to materialize a routable page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDescriptor<'a> {
    pub path: String,
    pub template_kind: TemplateKind,
    pub context: PageContext<'a>,
}

/// A permanent old-path-to-new-path mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectDescriptor {
    pub from_path: String,
    pub to_path: String,
    pub permanent: bool,
}

// ---------------------------------------------------------------------------
// BuildManifest
// ---------------------------------------------------------------------------

/// The `manifest.json` structure written next to the build outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildManifest {
    /// Schema version for forward compatibility.
    pub schema_version: u32,
    /// Unique identifier for this build.
    pub id: BuildId,
    /// Tool version that produced the build.
    pub tool_version: String,
    /// When the outputs were written.
    pub generated_at: DateTime<Utc>,
    /// Number of content entries consumed.
    pub entry_count: usize,
    /// Number of page descriptors registered (both kinds).
    pub page_count: usize,
    /// Number of alternate-format pages among `page_count`.
    pub alternate_page_count: usize,
    /// Number of redirects registered.
    pub redirect_count: usize,
    /// Checksums of the files written alongside the manifest.
    #[serde(default)]
    pub files: Vec<OutputFileMeta>,
}

/// Metadata for a single output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFileMeta {
    pub filename: String,
    pub sha256: String,
    pub size_bytes: usize,
}

// ---------------------------------------------------------------------------
// Date (de)serialization
// ---------------------------------------------------------------------------

/// Accepts `YYYY-MM-DD` (midnight UTC), RFC 3339, or an ISO 8601 local
/// date-time without offset (read as UTC); writes RFC 3339.
pub mod flexible_date {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Offset-less date-time layouts, tried in order.
    const LOCAL_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];

    /// Parse a front-matter date string.
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Some(naive) = LOCAL_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date `{raw}`")))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => super::serialize(dt, s),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(d)? {
                Some(raw) => super::parse(&raw).map(Some).ok_or_else(|| {
                    serde::de::Error::custom(format!("invalid date `{raw}`"))
                }),
                None => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_frontmatter(title: &str, date: &str) -> Frontmatter {
        Frontmatter {
            title: title.into(),
            date_published: flexible_date::parse(date).expect("valid date"),
            date_modified: None,
            description: "desc".into(),
            include_katex: None,
            series: None,
            part: None,
            tags: vec![],
            is_draft: None,
            redirect_from: None,
            caption: None,
        }
    }

    #[test]
    fn build_id_roundtrip() {
        let id = BuildId::new();
        let parsed: BuildId = id.to_string().parse().expect("parse BuildId");
        assert_eq!(id, parsed);
    }

    #[test]
    fn flexible_date_accepts_both_forms() {
        let day = flexible_date::parse("2020-01-01").expect("date only");
        assert_eq!(day.to_rfc3339(), "2020-01-01T00:00:00+00:00");

        let stamp = flexible_date::parse("2020-01-01T10:30:00+02:00").expect("rfc3339");
        assert_eq!(stamp.to_rfc3339(), "2020-01-01T08:30:00+00:00");

        assert!(flexible_date::parse("January 1st").is_none());
    }

    #[test]
    fn flexible_date_reads_offsetless_times_as_utc() {
        let cases = [
            ("2020-01-01T10:00:00", "2020-01-01T10:00:00+00:00"),
            ("2020-01-01T10:00:00.250", "2020-01-01T10:00:00.250+00:00"),
            ("2020-01-01T10:00", "2020-01-01T10:00:00+00:00"),
            ("2020-01-01 10:00:30", "2020-01-01T10:00:30+00:00"),
            ("2020-01-01 10:00", "2020-01-01T10:00:00+00:00"),
        ];
        for (raw, expected) in cases {
            let parsed = flexible_date::parse(raw).unwrap_or_else(|| panic!("{raw} should parse"));
            assert_eq!(parsed.to_rfc3339(), expected, "{raw}");
        }

        assert!(flexible_date::parse("2020-01-01T25:00").is_none());
    }

    #[test]
    fn frontmatter_uses_authoring_keys() {
        let mut fm = make_frontmatter("Hello", "2021-05-04");
        fm.include_katex = Some(true);
        fm.redirect_from = Some("/old/".into());

        let json = serde_json::to_value(&fm).expect("serialize");
        assert_eq!(json["datePublished"], "2021-05-04T00:00:00+00:00");
        assert_eq!(json["include_KaTeX"], true);
        assert_eq!(json["redirect_from"], "/old/");
        assert!(json.get("series").is_none());
    }

    #[test]
    fn empty_series_is_no_series() {
        let mut entry = ContentEntry {
            slug: "/a/".into(),
            frontmatter: make_frontmatter("A", "2020-01-01"),
            source_path: PathBuf::from("pages/a.mdx"),
        };
        assert_eq!(entry.series(), None);

        entry.frontmatter.series = Some(String::new());
        assert_eq!(entry.series(), None);

        entry.frontmatter.series = Some("rust".into());
        assert_eq!(entry.series(), Some("rust"));
    }

    #[test]
    fn alternate_format_only_suppressed_by_explicit_true() {
        let mut entry = ContentEntry {
            slug: "/a/".into(),
            frontmatter: make_frontmatter("A", "2020-01-01"),
            source_path: PathBuf::new(),
        };
        assert!(entry.wants_alternate_format());
        entry.frontmatter.include_katex = Some(false);
        assert!(entry.wants_alternate_format());
        entry.frontmatter.include_katex = Some(true);
        assert!(!entry.wants_alternate_format());
    }

    #[test]
    fn source_path_is_not_serialized() {
        let entry = ContentEntry {
            slug: "/a/".into(),
            frontmatter: make_frontmatter("A", "2020-01-01"),
            source_path: PathBuf::from("/home/me/site/pages/a.mdx"),
        };
        let json = serde_json::to_string(&entry).expect("serialize");
        assert!(!json.contains("/home/me"));
        assert!(json.contains("\"slug\":\"/a/\""));
    }
}

//! The front-matter schema contract.
//!
//! A static declaration of which front-matter fields exist, their primitive
//! kinds, and which are required. Validation against it lives in
//! `pagegen-content`; this module only describes the shape.

/// Primitive kind of a front-matter field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Date,
    Boolean,
    Int,
    StringList,
}

impl FieldKind {
    /// SDL-style type name (`String`, `[String!]`, ...).
    pub fn type_name(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Date => "Date",
            Self::Boolean => "Boolean",
            Self::Int => "Int",
            Self::StringList => "[String!]",
        }
    }
}

/// One declared front-matter field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn field(name: &'static str, kind: FieldKind, required: bool) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        required,
    }
}

/// Every front-matter field a document may declare.
pub const FRONTMATTER_SCHEMA: &[FieldSpec] = &[
    field("title", FieldKind::String, true),
    field("datePublished", FieldKind::Date, true),
    field("dateModified", FieldKind::Date, false),
    field("description", FieldKind::String, true),
    field("include_KaTeX", FieldKind::Boolean, false),
    field("series", FieldKind::String, false),
    field("part", FieldKind::Int, false),
    field("tags", FieldKind::StringList, false),
    field("isDraft", FieldKind::Boolean, false),
    field("redirect_from", FieldKind::String, false),
    field("caption", FieldKind::String, false),
];

/// Render the contract as SDL-like type definitions.
pub fn render_sdl(schema: &[FieldSpec]) -> String {
    let mut out = String::from("type Frontmatter {\n");
    for spec in schema {
        let bang = if spec.required { "!" } else { "" };
        out.push_str(&format!("  {}: {}{bang}\n", spec.name, spec.kind.type_name()));
    }
    out.push_str("}\n");
    out
}

//! Front-matter splitting, schema validation, and typed parsing.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::{Mapping, Value};

use pagegen_shared::types::flexible_date;
use pagegen_shared::{FRONTMATTER_SCHEMA, FieldKind, FieldSpec, Frontmatter, PagegenError, Result};

/// Matches a `---` fenced block at the very start of a document.
static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A---[ \t]*\r?\n(?:(.*?)\r?\n)?---[ \t]*(?:\r?\n|\z)").expect("fence regex")
});

/// Split a document into its raw front-matter YAML and body.
///
/// Returns `None` when the document does not open with a `---` fence.
pub fn split_frontmatter(source: &str) -> Option<(&str, &str)> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let caps = FENCE_RE.captures(source)?;
    let whole = caps.get(0)?;
    let yaml = caps.get(1).map_or("", |m| m.as_str());
    Some((yaml, &source[whole.end()..]))
}

/// Parse and validate the front-matter of the document at `path`.
pub fn parse_frontmatter(path: &Path, source: &str) -> Result<Frontmatter> {
    let (yaml, _body) = split_frontmatter(source)
        .ok_or_else(|| PagegenError::parse(path, "document has no front-matter block"))?;

    let raw: Value = if yaml.trim().is_empty() {
        Value::Null
    } else {
        serde_yaml::from_str(yaml)
            .map_err(|e| PagegenError::parse(path, format!("invalid YAML: {e}")))?
    };

    let mapping = match raw {
        Value::Mapping(mapping) => mapping,
        Value::Null => Mapping::new(),
        _ => return Err(PagegenError::parse(path, "front-matter is not a mapping")),
    };

    let normalized = normalize(&mapping, FRONTMATTER_SCHEMA).map_err(|violations| {
        PagegenError::Schema {
            path: path.to_path_buf(),
            violations,
        }
    })?;

    serde_yaml::from_value(Value::Mapping(normalized))
        .map_err(|e| PagegenError::parse(path, e.to_string()))
}

// ---------------------------------------------------------------------------
// Schema validation
// ---------------------------------------------------------------------------

/// Check every declared field and coerce values to their declared kind.
///
/// Undeclared keys are dropped. All violations are collected, not just the first.
fn normalize(raw: &Mapping, schema: &[FieldSpec]) -> std::result::Result<Mapping, Vec<String>> {
    let mut out = Mapping::new();
    let mut violations = Vec::new();

    for spec in schema {
        let value = match raw.get(spec.name) {
            None | Some(Value::Null) => {
                if spec.required {
                    violations.push(format!("missing required field `{}`", spec.name));
                }
                continue;
            }
            Some(value) => value,
        };

        match coerce(value, spec.kind) {
            Some(coerced) => {
                out.insert(Value::String(spec.name.to_string()), coerced);
            }
            None => violations.push(format!(
                "`{}` must be {}",
                spec.name,
                spec.kind.type_name()
            )),
        }
    }

    if violations.is_empty() {
        Ok(out)
    } else {
        Err(violations)
    }
}

fn coerce(value: &Value, kind: FieldKind) -> Option<Value> {
    match kind {
        FieldKind::String => scalar_to_string(value).map(Value::String),
        FieldKind::Date => match value {
            Value::String(s) if flexible_date::parse(s).is_some() => Some(value.clone()),
            _ => None,
        },
        FieldKind::Boolean => matches!(value, Value::Bool(_)).then(|| value.clone()),
        FieldKind::Int => match value {
            Value::Number(n) if n.as_i64().is_some() => Some(value.clone()),
            _ => None,
        },
        FieldKind::StringList => match value {
            Value::Sequence(items) => items
                .iter()
                .map(|item| scalar_to_string(item).map(Value::String))
                .collect::<Option<Vec<_>>>()
                .map(Value::Sequence),
            _ => None,
        },
    }
}

/// String fields accept any scalar and read it as its textual form.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

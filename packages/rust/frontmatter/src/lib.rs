//! Front matter parsing and slug formatting for markdown content files.
//!
//! A content file may start with a YAML block fenced by `---` lines. This
//! crate splits that block from the body, converts it into a JSON-compatible
//! mapping, and derives page slugs from content-relative paths.

mod slug;

use docsource_shared::{DocSourceError, Result};
use serde_json::{Map, Number, Value};
use serde_yaml::Value as YamlValue;

pub use slug::{format_develop_docs_slug, format_docs_slug};

/// Parsed front matter keys and values.
pub type FrontMatter = Map<String, Value>;

/// Fence line opening and closing the metadata block.
const DELIMITER: &str = "---";

/// A content file split into metadata and body.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument<'a> {
    /// Front matter mapping; empty when the file has no block.
    pub data: FrontMatter,
    /// Everything after the closing fence.
    pub body: &'a str,
}

/// Split and parse the leading metadata block of `source`.
///
/// Parse errors carry an empty path; callers attach the file path with
/// [`DocSourceError::at_path`].
pub fn parse_document(source: &str) -> Result<ParsedDocument<'_>> {
    match split_front_matter(source) {
        Some((yaml, body)) => Ok(ParsedDocument {
            data: parse_front_matter(yaml)?,
            body,
        }),
        None => Ok(ParsedDocument {
            data: FrontMatter::new(),
            body: source,
        }),
    }
}

/// Return `(yaml, body)` if `source` opens with a `---` fence.
///
/// The block closes at the first later line starting with `---`; the rest of
/// that line is dropped. Without a closing fence the whole remainder is YAML
/// and the body is empty.
pub fn split_front_matter(source: &str) -> Option<(&str, &str)> {
    let text = source.strip_prefix('\u{feff}').unwrap_or(source);

    let (first_line, rest) = match text.split_once('\n') {
        Some((line, rest)) => (line, rest),
        None => (text, ""),
    };
    if first_line.trim_end() != DELIMITER {
        return None;
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.starts_with(DELIMITER) {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    Some((rest, ""))
}

/// Parse YAML front matter into a JSON-compatible mapping.
pub fn parse_front_matter(yaml: &str) -> Result<FrontMatter> {
    let value: YamlValue = serde_yaml::from_str(yaml)
        .map_err(|e| DocSourceError::parse("", format!("invalid front matter: {e}")))?;

    match value {
        YamlValue::Null => Ok(FrontMatter::new()),
        YamlValue::Mapping(mapping) => mapping_to_object(mapping),
        YamlValue::Tagged(tagged) => match tagged.value {
            YamlValue::Mapping(mapping) => mapping_to_object(mapping),
            _ => Err(DocSourceError::parse("", "front matter must be a mapping")),
        },
        _ => Err(DocSourceError::parse("", "front matter must be a mapping")),
    }
}

fn mapping_to_object(mapping: serde_yaml::Mapping) -> Result<FrontMatter> {
    mapping
        .into_iter()
        .map(|(key, value)| Ok((key_to_string(key)?, yaml_to_json(value)?)))
        .collect()
}

fn key_to_string(key: YamlValue) -> Result<String> {
    match key {
        YamlValue::String(s) => Ok(s),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Null => Ok("null".into()),
        _ => Err(DocSourceError::parse("", "front matter keys must be scalars")),
    }
}

fn yaml_to_json(value: YamlValue) -> Result<Value> {
    Ok(match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        YamlValue::String(s) => Value::String(s),
        YamlValue::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        YamlValue::Mapping(mapping) => Value::Object(mapping_to_object(mapping)?),
        YamlValue::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

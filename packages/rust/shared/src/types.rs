//! Core domain types for docsource.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PipelineKind
// ---------------------------------------------------------------------------

/// One of the two independent aggregation flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineKind {
    /// Standard docs under `docs/`.
    #[default]
    Docs,
    /// Developer docs under `develop-docs/`.
    DevelopDocs,
}

impl PipelineKind {
    /// Content folder name, relative to the project root.
    pub fn folder(self) -> &'static str {
        match self {
            Self::Docs => "docs",
            Self::DevelopDocs => "develop-docs",
        }
    }
}

impl std::fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.folder())
    }
}

impl std::str::FromStr for PipelineKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "docs" => Ok(Self::Docs),
            "develop-docs" => Ok(Self::DevelopDocs),
            other => Err(format!(
                "unknown pipeline '{other}' (expected 'docs' or 'develop-docs')"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// FrontMatterRecord
// ---------------------------------------------------------------------------

/// One content file's front matter plus its computed identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontMatterRecord {
    /// Normalized slug derived from the content-root-relative path.
    pub slug: String,
    /// `<folder>/<relative path>` of the originating file.
    #[serde(
        rename = "sourcePath",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source_path: Option<String>,
    /// Every other front matter key, passed through unmodified.
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// SourceMap
// ---------------------------------------------------------------------------

/// Slug → source path mapping served to the link checker.
///
/// A `None` value marks a page with no backing file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceMap(pub BTreeMap<String, Option<String>>);

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `slug`.
    pub fn insert(&mut self, slug: impl Into<String>, source_path: Option<String>) {
        self.0.insert(slug.into(), source_path);
    }

    /// Add slugs that are served without a file. Existing entries win.
    pub fn merge_generated<I, S>(&mut self, slugs: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for slug in slugs {
            self.0.entry(slug.into()).or_insert(None);
        }
    }

    pub fn get(&self, slug: &str) -> Option<&Option<String>> {
        self.0.get(slug)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_kind_parse_and_display() {
        assert_eq!("docs".parse::<PipelineKind>().unwrap(), PipelineKind::Docs);
        assert_eq!(
            "develop-docs".parse::<PipelineKind>().unwrap(),
            PipelineKind::DevelopDocs
        );
        assert!("api".parse::<PipelineKind>().is_err());
        assert_eq!(PipelineKind::DevelopDocs.to_string(), "develop-docs");
        assert_eq!(PipelineKind::Docs.folder(), "docs");
    }

    #[test]
    fn record_flattens_fields() {
        let mut fields = serde_json::Map::new();
        fields.insert("title".into(), serde_json::json!("Python"));
        fields.insert("sidebar_order".into(), serde_json::json!(3));
        let record = FrontMatterRecord {
            slug: "python".into(),
            source_path: Some("docs/platforms/python/index.mdx".into()),
            fields,
        };

        let value = serde_json::to_value(&record).expect("serialize");
        assert_eq!(value["slug"], "python");
        assert_eq!(value["sourcePath"], "docs/platforms/python/index.mdx");
        assert_eq!(value["title"], "Python");
        assert_eq!(value["sidebar_order"], 3);
    }

    #[test]
    fn source_map_serializes_flat_with_nulls() {
        let mut map = SourceMap::new();
        map.insert("python", Some("docs/platforms/python/index.mdx".into()));
        map.insert("api/events", None);

        let json = serde_json::to_string(&map).expect("serialize");
        assert_eq!(
            json,
            r#"{"api/events":null,"python":"docs/platforms/python/index.mdx"}"#
        );
    }

    #[test]
    fn merge_generated_keeps_file_backed_entries() {
        let mut map = SourceMap::new();
        map.insert("python", Some("docs/platforms/python/index.mdx".into()));
        map.merge_generated(["python", "api/releases"]);

        assert_eq!(
            map.get("python"),
            Some(&Some("docs/platforms/python/index.mdx".to_string()))
        );
        assert_eq!(map.get("api/releases"), Some(&None));
        assert_eq!(map.len(), 2);
    }
}

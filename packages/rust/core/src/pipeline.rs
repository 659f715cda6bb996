//! Per-pipeline filtering and slug rules.

use std::path::Path;

use docsource_frontmatter::{format_develop_docs_slug, format_docs_slug};
use docsource_shared::PipelineKind;

/// Extensions treated as content files.
const CONTENT_EXTENSIONS: &[&str] = &["md", "mdx"];

/// Path fragment marking snippets shared between platform pages.
const COMMON_SEGMENT: &str = "/common/";

/// Rules one pipeline applies to its content tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelinePolicy {
    kind: PipelineKind,
    exclude_common: bool,
}

impl PipelinePolicy {
    /// Standard docs: `/common/` snippets excluded, platform-aware slugs.
    pub const DOCS: Self = Self {
        kind: PipelineKind::Docs,
        exclude_common: true,
    };

    /// Developer docs: extension filter only, plain slugs.
    pub const DEVELOP_DOCS: Self = Self {
        kind: PipelineKind::DevelopDocs,
        exclude_common: false,
    };

    pub fn for_kind(kind: PipelineKind) -> Self {
        match kind {
            PipelineKind::Docs => Self::DOCS,
            PipelineKind::DevelopDocs => Self::DEVELOP_DOCS,
        }
    }

    pub fn kind(&self) -> PipelineKind {
        self.kind
    }

    /// Content folder under the project root.
    pub fn folder(&self) -> &'static str {
        self.kind.folder()
    }

    /// Whether a content-relative path should produce a record.
    pub fn accepts(&self, rel_path: &str) -> bool {
        let is_content = Path::new(rel_path)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| CONTENT_EXTENSIONS.contains(&ext));
        if !is_content {
            return false;
        }
        !(self.exclude_common && rel_path.contains(COMMON_SEGMENT))
    }

    pub fn format_slug(&self, rel_path: &str) -> String {
        match self.kind {
            PipelineKind::Docs => format_docs_slug(rel_path),
            PipelineKind::DevelopDocs => format_develop_docs_slug(rel_path),
        }
    }

    /// `<folder>/<relative path>` as reported to clients.
    pub fn source_path(&self, rel_path: &str) -> String {
        format!("{}/{rel_path}", self.folder())
    }
}

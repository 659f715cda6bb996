//! Read one content file and turn its front matter into a record.

use std::path::Path;

use docsource_discovery::ContentSource;
use docsource_frontmatter::parse_document;
use docsource_shared::{FrontMatterRecord, Result};
use tracing::{debug, warn};

use crate::pipeline::PipelinePolicy;

/// Extract the record for `file`, or `None` if the pipeline filters it out.
///
/// A read or parse failure is returned as an error; nothing is retried.
pub async fn extract_record(
    source: &dyn ContentSource,
    policy: PipelinePolicy,
    content_root: &Path,
    file: &Path,
) -> Result<Option<FrontMatterRecord>> {
    let Some(rel) = relative_name(content_root, file) else {
        warn!(file = %file.display(), "file outside content root, skipping");
        return Ok(None);
    };

    if !policy.accepts(&rel) {
        debug!(%rel, "filtered out");
        return Ok(None);
    }

    let text = source.read_to_string(file).await?;
    let doc = parse_document(&text).map_err(|e| e.at_path(file))?;

    let mut fields = doc.data;
    fields.remove("slug");
    fields.remove("sourcePath");

    Ok(Some(FrontMatterRecord {
        slug: policy.format_slug(&rel),
        source_path: Some(policy.source_path(&rel)),
        fields,
    }))
}

/// `/`-separated path of `file` relative to `root`.
pub(crate) fn relative_name(root: &Path, file: &Path) -> Option<String> {
    let rel = file.strip_prefix(root).ok()?;
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

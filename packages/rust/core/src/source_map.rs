//! Slug → source path mapping for the link checker.

use std::sync::Arc;

use docsource_discovery::ContentSource;
use docsource_shared::{AppConfig, FrontMatterRecord, PipelineKind, Result, SourceMap};
use tracing::{debug, instrument};

use crate::cache::FrontMatterCaches;

/// Drop one trailing `/` from a slug.
pub fn normalize_slug(slug: &str) -> &str {
    slug.strip_suffix('/').unwrap_or(slug)
}

/// Fold records into a map keyed by normalized slug.
///
/// Records sharing a slug collapse into one entry; which one wins is
/// unspecified because record order is.
pub fn build_source_map(records: &[FrontMatterRecord]) -> SourceMap {
    let mut map = SourceMap::new();
    for record in records {
        map.insert(normalize_slug(&record.slug), record.source_path.clone());
    }
    map
}

// ---------------------------------------------------------------------------
// SourceMapService
// ---------------------------------------------------------------------------

/// Serves the source map of the active pipeline from its cache.
pub struct SourceMapService {
    caches: FrontMatterCaches,
    active: PipelineKind,
    generated_pages: Vec<String>,
}

impl SourceMapService {
    pub fn new(caches: FrontMatterCaches, active: PipelineKind) -> Self {
        Self {
            caches,
            active,
            generated_pages: Vec::new(),
        }
    }

    /// Build the service described by `config`, reading through `source`.
    pub fn from_config(source: Arc<dyn ContentSource>, config: &AppConfig) -> Self {
        let caches = FrontMatterCaches::new(source, config.content.root.clone())
            .with_concurrency(config.content.concurrency);
        Self::new(caches, config.content.pipeline)
            .with_generated_pages(config.content.generated_pages.clone())
    }

    /// Slugs served with a null source path.
    pub fn with_generated_pages(mut self, pages: Vec<String>) -> Self {
        self.generated_pages = pages;
        self
    }

    pub fn active(&self) -> PipelineKind {
        self.active
    }

    pub fn caches(&self) -> &FrontMatterCaches {
        &self.caches
    }

    /// Current source map. Scans on the first call only.
    #[instrument(skip_all, fields(pipeline = %self.active))]
    pub async fn source_map(&self) -> Result<SourceMap> {
        let records = self.caches.pipeline(self.active).get().await?;
        let mut map = build_source_map(&records);
        map.merge_generated(self.generated_pages.iter().map(|slug| normalize_slug(slug)));
        debug!(entries = map.len(), "built source map");
        Ok(map)
    }
}

//! Bounded concurrent front matter aggregation over one content tree.
//!
//! Every discovered file gets its own task, but at most `concurrency` of
//! them hold a semaphore permit (and therefore a file read) at once.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use docsource_discovery::ContentSource;
use docsource_shared::{DocSourceError, FILE_CONCURRENCY_LIMIT, FrontMatterRecord, Result};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, instrument, warn};

use crate::extract::extract_record;
use crate::pipeline::PipelinePolicy;

/// Scans one pipeline's content folder into front matter records.
pub struct Aggregator {
    source: Arc<dyn ContentSource>,
    policy: PipelinePolicy,
    project_root: PathBuf,
    concurrency: usize,
}

impl Aggregator {
    /// Create an aggregator for `policy`'s folder under `project_root`.
    pub fn new(
        source: Arc<dyn ContentSource>,
        policy: PipelinePolicy,
        project_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source,
            policy,
            project_root: project_root.into(),
            concurrency: FILE_CONCURRENCY_LIMIT,
        }
    }

    /// Override the in-flight read limit (minimum 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn policy(&self) -> PipelinePolicy {
        self.policy
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// `<project root>/<folder>`.
    pub fn content_root(&self) -> PathBuf {
        self.project_root.join(self.policy.folder())
    }

    /// Discover, read, and parse every content file.
    ///
    /// Records come back in completion order. The first failure aborts the
    /// remaining reads and is returned.
    #[instrument(skip_all, fields(pipeline = %self.policy.kind()))]
    pub async fn collect(&self) -> Result<Vec<FrontMatterRecord>> {
        let start = Instant::now();
        let content_root: Arc<Path> = Arc::from(self.content_root());

        let files = self.source.list_files(&content_root).await?;
        info!(
            root = %content_root.display(),
            files = files.len(),
            concurrency = self.concurrency,
            "scanning front matter"
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for file in files {
            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);
            let content_root = Arc::clone(&content_root);
            let policy = self.policy;

            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| DocSourceError::Task(format!("read limiter closed: {e}")))?;
                extract_record(source.as_ref(), policy, &content_root, &file).await
            });
        }

        let mut records = Vec::new();
        let mut skipped = 0usize;

        while let Some(joined) = tasks.join_next().await {
            let outcome = joined
                .map_err(|e| DocSourceError::Task(format!("extraction task failed: {e}")))
                .and_then(|result| result);

            match outcome {
                Ok(Some(record)) => records.push(record),
                Ok(None) => skipped += 1,
                Err(e) => {
                    warn!(error = %e, "front matter scan aborted");
                    return Err(e);
                }
            }
        }

        info!(
            records = records.len(),
            skipped,
            duration_ms = start.elapsed().as_millis(),
            "front matter scan completed"
        );

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemorySource;
    use std::collections::BTreeSet;
    use std::time::Duration;

    fn docs_tree() -> MemorySource {
        MemorySource::new()
            .with_file(
                "/site/docs/platforms/python/index.mdx",
                "---\ntitle: Python\n---\n",
            )
            .with_file(
                "/site/docs/platforms/python/_category_.mdx",
                "---\nsidebar_order: 1\n---\n",
            )
            .with_file(
                "/site/docs/platforms/python/common/setup.mdx",
                "---\ntitle: Setup\n---\n",
            )
            .with_file("/site/docs/guides/foo.md", "# no front matter\n")
            .with_file("/site/docs/README.txt", "not content")
            .with_file("/site/develop-docs/sdk/index.mdx", "---\ntitle: SDK\n---\n")
    }

    fn slugs(records: &[FrontMatterRecord]) -> BTreeSet<String> {
        records.iter().map(|r| r.slug.clone()).collect()
    }

    #[tokio::test]
    async fn collects_docs_records() {
        let source = Arc::new(docs_tree());
        let aggregator = Aggregator::new(source.clone(), PipelinePolicy::DOCS, "/site");

        let records = aggregator.collect().await.unwrap();

        // index.mdx and _category_.mdx both map to "python"
        assert_eq!(records.len(), 3);
        assert_eq!(
            slugs(&records),
            BTreeSet::from(["python".to_string(), "guides/foo".to_string()])
        );
        assert!(records.iter().all(|r| r
            .source_path
            .as_deref()
            .is_some_and(|p| p.starts_with("docs/"))));
        assert_eq!(source.read_calls(), 3);
    }

    #[tokio::test]
    async fn develop_docs_scans_its_own_folder() {
        let source = Arc::new(
            docs_tree()
                .with_file("/site/develop-docs/python/common/setup.mdx", "---\n---\n")
                .with_file("/site/develop-docs/notes.txt", "skip"),
        );
        let aggregator = Aggregator::new(source, PipelinePolicy::DEVELOP_DOCS, "/site");

        let records = aggregator.collect().await.unwrap();
        assert_eq!(
            slugs(&records),
            BTreeSet::from(["sdk".to_string(), "python/common/setup".to_string()])
        );
    }

    #[tokio::test]
    async fn never_exceeds_concurrency_limit() {
        let mut source = MemorySource::new().with_delay(Duration::from_millis(5));
        for i in 0..40 {
            source = source.with_file(format!("/site/docs/page-{i}.mdx"), "---\ntitle: x\n---\n");
        }
        let source = Arc::new(source);
        let aggregator =
            Aggregator::new(source.clone(), PipelinePolicy::DOCS, "/site").with_concurrency(4);

        let records = aggregator.collect().await.unwrap();

        assert_eq!(records.len(), 40);
        assert!(source.max_in_flight() <= 4, "saw {}", source.max_in_flight());
        assert!(source.max_in_flight() > 1);
    }

    #[test]
    fn default_limit_is_twenty() {
        let source = Arc::new(MemorySource::new());
        let aggregator = Aggregator::new(source, PipelinePolicy::DOCS, "/");
        assert_eq!(aggregator.concurrency(), 20);
        assert_eq!(aggregator.with_concurrency(0).concurrency(), 1);
    }

    #[tokio::test]
    async fn parse_failure_aborts_scan() {
        let source = Arc::new(docs_tree().with_file("/site/docs/broken.mdx", "---\ntitle: [\n"));
        let aggregator = Aggregator::new(source, PipelinePolicy::DOCS, "/site");

        let err = aggregator.collect().await.unwrap_err();
        assert!(matches!(err, DocSourceError::Parse { .. }));
    }

    #[tokio::test]
    async fn unclosed_front_matter_still_yields_record() {
        let source = Arc::new(
            MemorySource::new()
                .with_file("/site/docs/guides/foo.md", "---\ntitle: Foo\n---\n")
                .with_file("/site/docs/guides/draft.md", "---\ntitle: Draft\n"),
        );
        let aggregator = Aggregator::new(source, PipelinePolicy::DOCS, "/site");

        let records = aggregator.collect().await.unwrap();
        assert_eq!(records.len(), 2);
        let draft = records.iter().find(|r| r.slug == "guides/draft").unwrap();
        assert_eq!(draft.fields["title"], "Draft");
        assert_eq!(draft.source_path.as_deref(), Some("docs/guides/draft.md"));
    }

    #[tokio::test]
    async fn listing_failure_propagates() {
        let source = Arc::new(docs_tree().failing_once());
        let aggregator = Aggregator::new(source, PipelinePolicy::DOCS, "/site");

        let err = aggregator.collect().await.unwrap_err();
        assert!(matches!(err, DocSourceError::Io { .. }));
    }

    #[tokio::test]
    async fn empty_tree_yields_no_records() {
        let source = Arc::new(MemorySource::new());
        let aggregator = Aggregator::new(source, PipelinePolicy::DOCS, "/site");
        assert_eq!(aggregator.content_root(), PathBuf::from("/site").join("docs"));
        assert!(aggregator.collect().await.unwrap().is_empty());
    }
}

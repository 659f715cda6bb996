//! Process-lifetime memoization of front matter scans.
//!
//! The first [`FrontMatterCache::get`] starts a scan on its own task and
//! stores the pending result. Every later or concurrent caller awaits that
//! same scan. A successful result is kept until the process exits; a failed
//! one is delivered to everyone awaiting it and then evicted, so the next
//! call scans again.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};

use docsource_discovery::ContentSource;
use docsource_shared::{
    DocSourceError, FILE_CONCURRENCY_LIMIT, FrontMatterRecord, PipelineKind, Result,
};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tracing::{debug, warn};

use crate::aggregator::Aggregator;
use crate::pipeline::PipelinePolicy;

/// Records shared by every caller of one pipeline.
pub type Records = Arc<Vec<FrontMatterRecord>>;

type ScanOutcome = std::result::Result<Records, Arc<DocSourceError>>;
type SharedScan = Shared<BoxFuture<'static, ScanOutcome>>;

// ---------------------------------------------------------------------------
// FrontMatterCache
// ---------------------------------------------------------------------------

/// Single-assignment cache around one [`Aggregator`].
pub struct FrontMatterCache {
    aggregator: Arc<Aggregator>,
    slot: Mutex<Option<SharedScan>>,
}

impl FrontMatterCache {
    pub fn new(aggregator: Aggregator) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            slot: Mutex::new(None),
        }
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Return the cached records, scanning on first use.
    pub async fn get(&self) -> Result<Records> {
        let scan = self.current_scan()?;

        match scan.clone().await {
            Ok(records) => Ok(records),
            Err(e) => {
                self.evict(&scan);
                Err(DocSourceError::Shared(e))
            }
        }
    }

    /// Existing scan, or a freshly started one stored in the slot.
    fn current_scan(&self) -> Result<SharedScan> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| DocSourceError::Task("front matter cache lock poisoned".into()))?;

        if let Some(scan) = slot.as_ref() {
            return Ok(scan.clone());
        }

        debug!(pipeline = %self.aggregator.policy().kind(), "starting front matter scan");
        let aggregator = Arc::clone(&self.aggregator);
        let handle = tokio::spawn(async move { aggregator.collect().await });

        let scan = async move {
            match handle.await {
                Ok(Ok(records)) => Ok(Arc::new(records)),
                Ok(Err(e)) => Err(Arc::new(e)),
                Err(e) => Err(Arc::new(DocSourceError::Task(format!(
                    "front matter scan task failed: {e}"
                )))),
            }
        }
        .boxed()
        .shared();

        *slot = Some(scan.clone());
        Ok(scan)
    }

    /// Clear the slot if it still holds the failed scan.
    fn evict(&self, failed: &SharedScan) {
        let Ok(mut slot) = self.slot.lock() else {
            return;
        };
        if slot.as_ref().is_some_and(|current| current.ptr_eq(failed)) {
            warn!(
                pipeline = %self.aggregator.policy().kind(),
                "front matter scan failed, evicted from cache"
            );
            *slot = None;
        }
    }
}

// ---------------------------------------------------------------------------
// FrontMatterCaches
// ---------------------------------------------------------------------------

/// One independent [`FrontMatterCache`] per pipeline, built on first access.
pub struct FrontMatterCaches {
    source: Arc<dyn ContentSource>,
    project_root: PathBuf,
    concurrency: usize,
    docs: OnceLock<FrontMatterCache>,
    develop_docs: OnceLock<FrontMatterCache>,
}

impl FrontMatterCaches {
    pub fn new(source: Arc<dyn ContentSource>, project_root: impl Into<PathBuf>) -> Self {
        Self {
            source,
            project_root: project_root.into(),
            concurrency: FILE_CONCURRENCY_LIMIT,
            docs: OnceLock::new(),
            develop_docs: OnceLock::new(),
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Cache for `kind`.
    pub fn pipeline(&self, kind: PipelineKind) -> &FrontMatterCache {
        let cell = match kind {
            PipelineKind::Docs => &self.docs,
            PipelineKind::DevelopDocs => &self.develop_docs,
        };
        cell.get_or_init(|| {
            let aggregator = Aggregator::new(
                Arc::clone(&self.source),
                PipelinePolicy::for_kind(kind),
                self.project_root.clone(),
            )
            .with_concurrency(self.concurrency);
            FrontMatterCache::new(aggregator)
        })
    }

    /// Standard docs records.
    pub async fn docs(&self) -> Result<Records> {
        self.pipeline(PipelineKind::Docs).get().await
    }

    /// Developer docs records.
    pub async fn develop_docs(&self) -> Result<Records> {
        self.pipeline(PipelineKind::DevelopDocs).get().await
    }
}

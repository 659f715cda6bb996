//! Front matter aggregation and source map building for docsource.
//!
//! This crate ties together discovery, front matter parsing, and the
//! per-pipeline cache into the source map served to the link checker.

pub mod aggregator;
pub mod cache;
pub mod extract;
pub mod pipeline;
pub mod source_map;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregator::Aggregator;
pub use cache::{FrontMatterCache, FrontMatterCaches, Records};
pub use extract::extract_record;
pub use pipeline::PipelinePolicy;
pub use source_map::{SourceMapService, build_source_map, normalize_slug};

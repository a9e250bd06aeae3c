//! Two-level hierarchical chunking for RAG pipelines
//!
//! Documents are split into larger parent chunks that preserve broad
//! context, and each parent into smaller child chunks optimized for
//! semantic retrieval. Splitting prefers natural boundaries (paragraph,
//! then sentence) over arbitrary character cuts and carries a trailing
//! overlap across segment boundaries for continuity.

pub mod assembler;
pub mod builder;
pub mod config;
pub mod error;
pub mod metrics;
pub mod splitter;
pub mod types;

// Re-export main public interfaces
pub use assembler::HierarchyAssembler;
pub use builder::ChunkBuilder;
pub use config::ChunkingConfig;
pub use error::{ChunkingError, Result};
pub use metrics::{ChunkSizeAdvice, ChunkingMetrics, MetricsEstimator, RetrievalAdvice};
pub use splitter::BoundarySplitter;
pub use types::{
    Chunk, ChunkLevel, Hierarchy, SectionDiagnostic, SectionRecord, SkipReason,
    content_fingerprint,
};

/// Assemble the chunk hierarchy for `documents` with `config`.
///
/// Convenience wrapper over [`HierarchyAssembler`]; see
/// [`HierarchyAssembler::assemble`] for the contract.
pub fn assemble(documents: &[(String, String)], config: ChunkingConfig) -> Result<Hierarchy> {
    HierarchyAssembler::new(config).assemble(documents)
}

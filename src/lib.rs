//! RAG-oriented hierarchical document chunking
//!
//! Turns raw text documents into a two-level hierarchy of overlapping
//! chunks: larger parent chunks that preserve broad context and smaller
//! child chunks nested inside each parent, sized for semantic retrieval.
//! Splitting respects paragraph and sentence boundaries and carries a
//! trailing overlap between consecutive segments.
//!
//! ```
//! use rag_chunker::chunking::{ChunkingConfig, assemble};
//!
//! let documents = vec![(
//!     "intro".to_string(),
//!     "Some document text with enough body to pass the minimum. ".repeat(4),
//! )];
//! let hierarchy = assemble(&documents, ChunkingConfig::default())?;
//! assert_eq!(hierarchy.parents().count(), 1);
//! assert_eq!(hierarchy.children().count(), 1);
//! # Ok::<(), rag_chunker::chunking::ChunkingError>(())
//! ```

pub mod chunking;
pub mod export;
pub mod text;

pub use chunking::{
    Chunk, ChunkLevel, ChunkingConfig, ChunkingError, Hierarchy, HierarchyAssembler,
    MetricsEstimator, assemble,
};

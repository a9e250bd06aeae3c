//! Aggregate statistics and capacity recommendations over a finished run
//!
//! Read-only: nothing here feeds back into splitting.

use serde::Serialize;
use tracing::debug;

use super::config::ChunkingConfig;
use super::types::Chunk;

/// Advisory sizing verdict derived from fixed thresholds: fewer than 3
/// chunks per query suggests smaller children, more than 8 suggests
/// larger ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkSizeAdvice {
    SmallerChildren,
    LargerChildren,
    Optimal { chunks_per_query: usize },
}

impl std::fmt::Display for ChunkSizeAdvice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SmallerChildren => {
                write!(f, "Consider smaller child chunks for better context utilization")
            }
            Self::LargerChildren => write!(f, "Consider larger child chunks for efficiency"),
            Self::Optimal { chunks_per_query } => {
                write!(f, "Optimal: ~{chunks_per_query} chunks per query")
            }
        }
    }
}

/// Advisory retrieval-strategy hint based on corpus size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalAdvice {
    /// Large corpus: combine semantic similarity with the parent/child
    /// relationships
    HierarchyAware,
    /// Small corpus: plain top-k retrieval works well
    SimpleTopK,
}

impl std::fmt::Display for RetrievalAdvice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HierarchyAware => write!(
                f,
                "Use semantic similarity + parent-child relationships for retrieval"
            ),
            Self::SimpleTopK => write!(f, "Simple top-k retrieval should work well"),
        }
    }
}

/// Aggregate token and capacity statistics for one chunk hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkingMetrics {
    pub parent_count: usize,
    pub avg_parent_tokens: f64,
    pub child_count: usize,
    pub avg_child_tokens: f64,
    pub avg_child_chars: f64,
    /// How many average-sized child chunks fit the available context
    pub recommended_chunks_per_query: usize,
    /// Share of the model context window those chunks would occupy
    pub context_utilization_ratio: f64,
    pub chunk_size_advice: ChunkSizeAdvice,
    pub retrieval_advice: RetrievalAdvice,
}

/// Pure aggregation over the flat chunk sequence of a run.
#[derive(Debug, Clone)]
pub struct MetricsEstimator {
    config: ChunkingConfig,
}

impl MetricsEstimator {
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    pub fn estimate(&self, chunks: &[Chunk]) -> ChunkingMetrics {
        let parents: Vec<&Chunk> = chunks.iter().filter(|c| c.is_parent()).collect();
        let children: Vec<&Chunk> = chunks.iter().filter(|c| c.is_child()).collect();

        let avg_parent_tokens = mean(parents.iter().map(|c| c.estimated_tokens));
        let avg_child_tokens = mean(children.iter().map(|c| c.estimated_tokens));
        let avg_child_chars = mean(children.iter().map(|c| c.char_count));

        let available = self.config.available_context();
        let recommended_chunks_per_query = if avg_child_chars > 0.0 {
            (available as f64 / avg_child_chars) as usize
        } else {
            0
        };

        // Empty child sets skip the ratio instead of dividing by zero.
        let context_utilization_ratio = if children.is_empty() {
            0.0
        } else {
            recommended_chunks_per_query as f64 * avg_child_tokens * 4.0
                / self.config.model_context_window as f64
        };

        let chunk_size_advice = if recommended_chunks_per_query < 3 {
            ChunkSizeAdvice::SmallerChildren
        } else if recommended_chunks_per_query > 8 {
            ChunkSizeAdvice::LargerChildren
        } else {
            ChunkSizeAdvice::Optimal {
                chunks_per_query: recommended_chunks_per_query,
            }
        };

        let retrieval_advice = if children.len() > 100 {
            RetrievalAdvice::HierarchyAware
        } else {
            RetrievalAdvice::SimpleTopK
        };

        debug!(
            parents = parents.len(),
            children = children.len(),
            recommended_chunks_per_query,
            "estimated chunking metrics"
        );

        ChunkingMetrics {
            parent_count: parents.len(),
            avg_parent_tokens,
            child_count: children.len(),
            avg_child_tokens,
            avg_child_chars,
            recommended_chunks_per_query,
            context_utilization_ratio,
            chunk_size_advice,
            retrieval_advice,
        }
    }
}

fn mean<I: Iterator<Item = usize>>(values: I) -> f64 {
    let mut sum = 0usize;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 { 0.0 } else { sum as f64 / count as f64 }
}

//! Wraps raw segments into identified chunk records

use tracing::debug;

use super::config::ChunkingConfig;
use super::splitter::{BoundarySplitter, char_len};
use super::types::{Chunk, ChunkLevel, content_fingerprint};

/// Builds the parent level directly from a document and the child level
/// from each parent's content.
#[derive(Debug, Clone)]
pub struct ChunkBuilder {
    config: ChunkingConfig,
    splitter: BoundarySplitter,
}

impl ChunkBuilder {
    pub fn new(config: ChunkingConfig) -> Self {
        Self {
            config,
            splitter: BoundarySplitter::new(),
        }
    }

    /// Parent chunks for one document, in index order. Content no longer
    /// than `parent_size` yields exactly one chunk; anything larger goes
    /// through the boundary splitter. Empty content yields nothing.
    pub fn build_parents(&self, section_name: &str, content: &str) -> Vec<Chunk> {
        let segments = self.segments(content, self.config.parent_size);
        debug!(
            section = %section_name,
            parents = segments.len(),
            "built parent segments"
        );
        segments
            .into_iter()
            .enumerate()
            .map(|(i, segment)| {
                let index = i + 1;
                self.chunk(
                    format!("{section_name}_P{index}"),
                    ChunkLevel::Parent,
                    section_name,
                    None,
                    index,
                    segment,
                )
            })
            .collect()
    }

    /// Child chunks for one parent, in index order. Mirrors parent
    /// construction on the parent's content with the child budget.
    pub fn build_children(
        &self,
        section_name: &str,
        parent: &Chunk,
        parent_position: usize,
    ) -> Vec<Chunk> {
        let segments = self.segments(&parent.content, self.config.child_size);
        segments
            .into_iter()
            .enumerate()
            .map(|(i, segment)| {
                let index = i + 1;
                self.chunk(
                    format!("{section_name}_P{parent_position}_C{index}"),
                    ChunkLevel::Child,
                    section_name,
                    Some(parent.id.clone()),
                    index,
                    segment,
                )
            })
            .collect()
    }

    /// Single-segment short-circuit around the splitter.
    fn segments(&self, content: &str, target_size: usize) -> Vec<String> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }
        if char_len(trimmed) <= target_size {
            return vec![trimmed.to_string()];
        }
        self.splitter
            .split(trimmed, target_size, self.config.overlap_size)
    }

    fn chunk(
        &self,
        id: String,
        level: ChunkLevel,
        section_name: &str,
        parent_id: Option<String>,
        index: usize,
        content: String,
    ) -> Chunk {
        let char_count = char_len(&content);
        Chunk {
            id,
            level,
            section_name: section_name.to_string(),
            parent_id,
            index,
            char_count,
            estimated_tokens: char_count / 4,
            // Always this chunk's own content, even for children cut out
            // of a larger parent.
            content_hash: content_fingerprint(&content),
            content,
            global_sequence: 0,
            child_ids: None,
            child_count: None,
        }
    }
}

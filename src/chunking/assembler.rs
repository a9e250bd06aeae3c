//! Orchestrates parent and child construction across a document set

use tracing::{info, warn};

use super::builder::ChunkBuilder;
use super::config::ChunkingConfig;
use super::error::{ChunkingError, Result};
use super::splitter::char_len;
use super::types::{Chunk, Hierarchy, SectionDiagnostic, SectionRecord, SkipReason};

/// Assembles the full two-level hierarchy for an ordered set of
/// documents: parents per document, children per parent, linkage and
/// global sequencing.
///
/// The whole computation is a pure function of its inputs: identical
/// documents and configuration produce byte-for-byte identical output,
/// including every ID, fingerprint and sequence number.
#[derive(Debug, Clone)]
pub struct HierarchyAssembler {
    config: ChunkingConfig,
    builder: ChunkBuilder,
}

impl HierarchyAssembler {
    pub fn new(config: ChunkingConfig) -> Self {
        Self {
            builder: ChunkBuilder::new(config.clone()),
            config,
        }
    }

    /// Assemble chunks for `documents`, an ordered sequence of
    /// `(section_name, content)` pairs.
    ///
    /// An invalid configuration is rejected before any document is
    /// touched. Individual documents never abort the run: empty or
    /// too-short content is skipped and reported in
    /// [`Hierarchy::skipped`].
    pub fn assemble(&self, documents: &[(String, String)]) -> Result<Hierarchy> {
        self.config
            .validate()
            .map_err(ChunkingError::configuration)?;

        let mut flat_chunks: Vec<Chunk> = Vec::new();
        let mut sections: Vec<SectionRecord> = Vec::new();
        let mut skipped: Vec<SectionDiagnostic> = Vec::new();
        let mut sequence: u64 = 0;

        for (section_name, content) in documents {
            let trimmed = content.trim();
            if trimmed.is_empty() {
                warn!(section = %section_name, "skipping empty document");
                skipped.push(SectionDiagnostic {
                    section_name: section_name.clone(),
                    reason: SkipReason::Empty,
                });
                continue;
            }

            let original_length = char_len(trimmed);
            if original_length < self.config.min_chunk_size {
                warn!(
                    section = %section_name,
                    chars = original_length,
                    minimum = self.config.min_chunk_size,
                    "skipping document below minimum size"
                );
                skipped.push(SectionDiagnostic {
                    section_name: section_name.clone(),
                    reason: SkipReason::BelowMinimum {
                        char_count: original_length,
                        minimum: self.config.min_chunk_size,
                    },
                });
                continue;
            }

            let mut parents = self.builder.build_parents(section_name, trimmed);
            let mut section_children: Vec<Chunk> = Vec::new();
            for parent in parents.iter_mut() {
                let children = self
                    .builder
                    .build_children(section_name, parent, parent.index);
                parent.child_ids = Some(children.iter().map(|c| c.id.clone()).collect());
                parent.child_count = Some(children.len());
                section_children.extend(children);
            }

            info!(
                section = %section_name,
                parents = parents.len(),
                children = section_children.len(),
                "assembled section"
            );

            // One counter for the whole run: parents first, then children,
            // never reset between documents.
            for chunk in parents.iter_mut().chain(section_children.iter_mut()) {
                sequence += 1;
                chunk.global_sequence = sequence;
            }

            sections.push(SectionRecord {
                section_name: section_name.clone(),
                original_length,
                parent_ids: parents.iter().map(|c| c.id.clone()).collect(),
                child_ids: section_children.iter().map(|c| c.id.clone()).collect(),
            });
            flat_chunks.extend(parents);
            flat_chunks.extend(section_children);
        }

        Ok(Hierarchy {
            flat_chunks,
            sections,
            skipped,
        })
    }
}

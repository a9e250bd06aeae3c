//! Core data structures for the parent/child chunk hierarchy

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Hierarchy level of a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkLevel {
    /// Larger segment preserving broad context for a document section
    Parent,
    /// Smaller segment nested within a parent, optimized for retrieval
    Child,
}

impl ChunkLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkLevel::Parent => "parent",
            ChunkLevel::Child => "child",
        }
    }
}

impl std::fmt::Display for ChunkLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One persisted chunk of the hierarchy.
///
/// Created once during assembly and never mutated afterwards, with two
/// exceptions: `global_sequence` is assigned when the owning document is
/// folded into the run, and a parent's `child_ids`/`child_count` are
/// populated once its children are known.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chunk {
    /// Hierarchical, human-readable ID: `{section}_P{i}` for parents,
    /// `{section}_P{i}_C{j}` for children. Unique within a run.
    pub id: String,
    pub level: ChunkLevel,
    /// Owning document identifier
    pub section_name: String,
    /// Owning parent's ID, present only on child chunks. A weak
    /// reference: resolution goes through [`Hierarchy::chunk`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// 1-based position among siblings at the same level
    pub index: usize,
    /// Trimmed, non-empty chunk text
    pub content: String,
    pub char_count: usize,
    /// Rough token estimate at 4 characters per token
    pub estimated_tokens: usize,
    /// Fingerprint of this chunk's own content, for change detection
    pub content_hash: String,
    /// Discovery-order sequence number, unique and strictly increasing
    /// across the whole run. Zero until assembly assigns it.
    pub global_sequence: u64,
    /// Ordered IDs of this parent's children (parents only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_count: Option<usize>,
}

impl Chunk {
    pub fn is_parent(&self) -> bool {
        self.level == ChunkLevel::Parent
    }

    pub fn is_child(&self) -> bool {
        self.level == ChunkLevel::Child
    }
}

/// Per-section summary recorded during assembly
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionRecord {
    pub section_name: String,
    /// Character count of the (trimmed) source document
    pub original_length: usize,
    /// IDs of this section's parent chunks, in index order
    pub parent_ids: Vec<String>,
    /// IDs of this section's child chunks, in parent then index order
    pub child_ids: Vec<String>,
}

/// Why a document produced no chunks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Content was empty or whitespace-only after trimming
    Empty,
    /// Content was shorter than the configured minimum
    BelowMinimum { char_count: usize, minimum: usize },
}

/// Per-document diagnostic for a skipped section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionDiagnostic {
    pub section_name: String,
    pub reason: SkipReason,
}

/// Output of one assembly run: the flat chunk sequence in discovery
/// order plus the per-section grouped view and skip diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hierarchy {
    pub flat_chunks: Vec<Chunk>,
    pub sections: Vec<SectionRecord>,
    pub skipped: Vec<SectionDiagnostic>,
}

impl Hierarchy {
    /// Look up a chunk by ID
    pub fn chunk(&self, id: &str) -> Option<&Chunk> {
        self.flat_chunks.iter().find(|c| c.id == id)
    }

    /// Look up a section record by name
    pub fn section(&self, name: &str) -> Option<&SectionRecord> {
        self.sections.iter().find(|s| s.section_name == name)
    }

    /// All parent chunks, in discovery order
    pub fn parents(&self) -> impl Iterator<Item = &Chunk> {
        self.flat_chunks.iter().filter(|c| c.is_parent())
    }

    /// All child chunks, in discovery order
    pub fn children(&self) -> impl Iterator<Item = &Chunk> {
        self.flat_chunks.iter().filter(|c| c.is_child())
    }

    /// Children of one parent, in index order
    pub fn children_of<'a>(&'a self, parent_id: &'a str) -> impl Iterator<Item = &'a Chunk> {
        self.flat_chunks
            .iter()
            .filter(move |c| c.parent_id.as_deref() == Some(parent_id))
    }
}

/// Short fingerprint of chunk content: the first 8 hex characters of its
/// SHA-256 digest. Used for change detection, not cryptographic integrity.
pub fn content_fingerprint(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    let hex = format!("{digest:x}");
    hex[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, level: ChunkLevel, parent_id: Option<&str>) -> Chunk {
        let content = format!("content of {id}");
        Chunk {
            id: id.to_string(),
            level,
            section_name: "sec".to_string(),
            parent_id: parent_id.map(str::to_string),
            index: 1,
            char_count: content.chars().count(),
            estimated_tokens: content.chars().count() / 4,
            content_hash: content_fingerprint(&content),
            content,
            global_sequence: 0,
            child_ids: None,
            child_count: None,
        }
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        assert_eq!(content_fingerprint("hello"), content_fingerprint("hello"));
        assert_ne!(content_fingerprint("hello"), content_fingerprint("hello."));
        assert_eq!(content_fingerprint("hello").len(), 8);
        assert!(
            content_fingerprint("hello")
                .chars()
                .all(|c| c.is_ascii_hexdigit())
        );
    }

    #[test]
    fn test_level_display() {
        assert_eq!(ChunkLevel::Parent.to_string(), "parent");
        assert_eq!(ChunkLevel::Child.to_string(), "child");
    }

    #[test]
    fn test_hierarchy_lookup() {
        let hierarchy = Hierarchy {
            flat_chunks: vec![
                chunk("sec_P1", ChunkLevel::Parent, None),
                chunk("sec_P1_C1", ChunkLevel::Child, Some("sec_P1")),
                chunk("sec_P1_C2", ChunkLevel::Child, Some("sec_P1")),
            ],
            sections: vec![SectionRecord {
                section_name: "sec".to_string(),
                original_length: 42,
                parent_ids: vec!["sec_P1".to_string()],
                child_ids: vec!["sec_P1_C1".to_string(), "sec_P1_C2".to_string()],
            }],
            skipped: Vec::new(),
        };

        assert!(hierarchy.chunk("sec_P1").is_some());
        assert!(hierarchy.chunk("missing").is_none());
        assert_eq!(hierarchy.parents().count(), 1);
        assert_eq!(hierarchy.children().count(), 2);
        assert_eq!(hierarchy.children_of("sec_P1").count(), 2);
        assert_eq!(hierarchy.section("sec").unwrap().original_length, 42);
    }

    #[test]
    fn test_chunk_serialization_skips_absent_fields() {
        let parent = chunk("sec_P1", ChunkLevel::Parent, None);
        let json = serde_json::to_value(&parent).unwrap();
        assert_eq!(json["level"], "parent");
        assert!(json.get("parent_id").is_none());
        assert!(json.get("child_ids").is_none());

        let child = chunk("sec_P1_C1", ChunkLevel::Child, Some("sec_P1"));
        let json = serde_json::to_value(&child).unwrap();
        assert_eq!(json["level"], "child");
        assert_eq!(json["parent_id"], "sec_P1");
    }
}

//! Downstream formatters for assembled hierarchies
//!
//! Pure producers: every function returns a `String` or a
//! `serde_json::Value`. Where the output lands (files, sockets, stdout)
//! is the caller's concern; the core performs no I/O.

use itertools::Itertools;
use serde_json::{Value, json};

use crate::chunking::{Chunk, ChunkingConfig, ChunkingMetrics, Hierarchy};

/// Delimiter-separated export for embedding pipelines and vector stores.
///
/// One chunk per line: `ID|LEVEL|SECTION|PARENT|TOKENS|HASH|CONTENT`,
/// with `|` and newlines escaped inside the content column. Parents use
/// `ROOT` in the parent column.
pub fn to_rag_lines(hierarchy: &Hierarchy) -> String {
    let header = "# RAG-READY CHUNKS\n# Format: ID|LEVEL|SECTION|PARENT|TOKENS|HASH|CONTENT\n";
    let body = hierarchy
        .flat_chunks
        .iter()
        .map(|chunk| {
            let parent = chunk.parent_id.as_deref().unwrap_or("ROOT");
            let safe_content = chunk.content.replace('|', "&#124;").replace('\n', "\\n");
            format!(
                "{}|{}|{}|{}|{}|{}|{}",
                chunk.id,
                chunk.level,
                chunk.section_name,
                parent,
                chunk.estimated_tokens,
                chunk.content_hash,
                safe_content
            )
        })
        .join("\n");
    format!("{header}\n{body}\n")
}

/// Structured JSON export for programmatic use.
pub fn to_structured_json(hierarchy: &Hierarchy, config: &ChunkingConfig) -> Value {
    let sections: Vec<Value> = hierarchy
        .sections
        .iter()
        .map(|record| {
            json!({
                "section_name": record.section_name,
                "original_length": record.original_length,
                "parent_chunks": lookup(hierarchy, &record.parent_ids),
                "child_chunks": lookup(hierarchy, &record.child_ids),
            })
        })
        .collect();

    json!({
        "metadata": {
            "model_context_window": config.model_context_window,
            "target_context_usage": config.target_context_usage,
            "chunk_sizes": {
                "parent": config.parent_size,
                "child": config.child_size,
                "overlap": config.overlap_size,
            },
            "total_sections": hierarchy.sections.len(),
            "total_chunks": hierarchy.flat_chunks.len(),
        },
        "sections": sections,
    })
}

/// Human-readable hierarchical report: sections, their parents, and each
/// parent's children nested underneath.
pub fn to_report(hierarchy: &Hierarchy, config: &ChunkingConfig) -> String {
    let rule = "=".repeat(80);
    let mut out = String::new();
    out.push_str("HIERARCHICAL CHUNKS\n");
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!(
        "Model context window: {} tokens\n",
        config.model_context_window
    ));
    out.push_str(&format!(
        "Target context usage: {:.0}%\n",
        config.target_context_usage * 100.0
    ));
    out.push_str("Structure: section -> parent chunks -> child chunks\n");
    out.push_str(&rule);
    out.push_str("\n\n");

    for record in &hierarchy.sections {
        out.push_str(&format!(
            "# SECTION: {} ({} chars, {} parents, {} children)\n\n",
            record.section_name,
            record.original_length,
            record.parent_ids.len(),
            record.child_ids.len()
        ));

        for parent in hierarchy
            .flat_chunks
            .iter()
            .filter(|c| c.is_parent() && c.section_name == record.section_name)
        {
            out.push_str(&format!(
                "PARENT {} (~{} tokens, {} children, hash {})\n",
                parent.id,
                parent.estimated_tokens,
                parent.child_count.unwrap_or(0),
                parent.content_hash
            ));
            out.push_str(&format!("  {}\n", preview(&parent.content, 200)));

            for child in hierarchy.children_of(&parent.id) {
                out.push_str(&format!(
                    "  CHILD {} (~{} tokens, hash {})\n",
                    child.id, child.estimated_tokens, child.content_hash
                ));
                out.push_str(&format!("    {}\n", child.content.replace('\n', "\n    ")));
            }
            out.push('\n');
        }
        out.push_str(&rule);
        out.push_str("\n\n");
    }

    out
}

/// Metadata and statistics export, embedding the estimator's output and
/// its advisory recommendations.
pub fn to_metadata_json(
    hierarchy: &Hierarchy,
    metrics: &ChunkingMetrics,
    config: &ChunkingConfig,
) -> Value {
    let section_breakdown: Vec<Value> = hierarchy
        .sections
        .iter()
        .map(|record| {
            json!({
                "section_name": record.section_name,
                "original_chars": record.original_length,
                "parent_count": record.parent_ids.len(),
                "child_count": record.child_ids.len(),
            })
        })
        .collect();

    json!({
        "chunking_config": config,
        "chunk_statistics": {
            "total_sections": hierarchy.sections.len(),
            "parent_chunks": metrics.parent_count,
            "child_chunks": metrics.child_count,
            "total_chunks": hierarchy.flat_chunks.len(),
            "avg_parent_tokens": metrics.avg_parent_tokens,
            "avg_child_tokens": metrics.avg_child_tokens,
        },
        "section_breakdown": section_breakdown,
        "context": {
            "available_context": config.available_context(),
            "recommended_chunks_per_query": metrics.recommended_chunks_per_query,
            "context_utilization_ratio": metrics.context_utilization_ratio,
        },
        "recommendations": {
            "chunk_size": metrics.chunk_size_advice.to_string(),
            "retrieval": metrics.retrieval_advice.to_string(),
        },
        "skipped_sections": hierarchy.skipped,
    })
}

fn lookup<'a>(hierarchy: &'a Hierarchy, ids: &[String]) -> Vec<&'a Chunk> {
    ids.iter().filter_map(|id| hierarchy.chunk(id)).collect()
}

/// First `max_chars` characters of `content` on one line, with an
/// ellipsis when truncated.
fn preview(content: &str, max_chars: usize) -> String {
    let flat = content.replace('\n', " ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let cut: String = flat.chars().take(max_chars).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::{ChunkingConfig, HierarchyAssembler, MetricsEstimator};
    use anyhow::Result;
    use itertools::Itertools;

    fn sample_hierarchy() -> Result<Hierarchy> {
        let doc = (0..12)
            .map(|i| format!("Sentence number {i} adds body to the sample document."))
            .join(" ");
        let documents = vec![
            ("alpha".to_string(), doc.clone()),
            ("beta".to_string(), format!("{doc}\n\n{doc}")),
        ];
        Ok(HierarchyAssembler::new(ChunkingConfig::default()).assemble(&documents)?)
    }

    #[test]
    fn test_rag_lines_format() -> Result<()> {
        let hierarchy = sample_hierarchy()?;
        let lines = to_rag_lines(&hierarchy);

        let body: Vec<&str> = lines
            .lines()
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .collect();
        assert_eq!(body.len(), hierarchy.flat_chunks.len());
        for line in &body {
            assert_eq!(line.split('|').count(), 7, "line has 7 columns: {line}");
        }
        // Parents carry ROOT, children their parent's ID.
        assert!(body[0].contains("|parent|"));
        assert!(body[0].contains("|ROOT|"));
        Ok(())
    }

    #[test]
    fn test_rag_lines_escape_content() {
        let mut hierarchy = Hierarchy {
            flat_chunks: Vec::new(),
            sections: Vec::new(),
            skipped: Vec::new(),
        };
        let builder = crate::chunking::ChunkBuilder::new(ChunkingConfig::default());
        let mut parents = builder.build_parents("sec", "left|right\nnext line");
        hierarchy.flat_chunks.append(&mut parents);

        let lines = to_rag_lines(&hierarchy);
        assert!(lines.contains("left&#124;right\\nnext line"));
    }

    #[test]
    fn test_structured_json_shape() -> Result<()> {
        let hierarchy = sample_hierarchy()?;
        let config = ChunkingConfig::default();
        let value = to_structured_json(&hierarchy, &config);

        assert_eq!(value["metadata"]["total_sections"], 2);
        assert_eq!(
            value["metadata"]["total_chunks"],
            hierarchy.flat_chunks.len()
        );
        assert_eq!(value["metadata"]["chunk_sizes"]["parent"], 1200);
        let sections = value["sections"].as_array().unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0]["section_name"], "alpha");
        assert!(
            sections[0]["parent_chunks"]
                .as_array()
                .is_some_and(|p| !p.is_empty())
        );
        Ok(())
    }

    #[test]
    fn test_report_nests_children_under_parents() -> Result<()> {
        let hierarchy = sample_hierarchy()?;
        let report = to_report(&hierarchy, &ChunkingConfig::default());

        for chunk in &hierarchy.flat_chunks {
            assert!(report.contains(&chunk.id), "report mentions {}", chunk.id);
        }
        let parent_pos = report.find("PARENT alpha_P1").unwrap();
        let child_pos = report.find("CHILD alpha_P1_C1").unwrap();
        assert!(parent_pos < child_pos);
        Ok(())
    }

    #[test]
    fn test_metadata_json_recommendations() -> Result<()> {
        let hierarchy = sample_hierarchy()?;
        let config = ChunkingConfig::default();
        let metrics = MetricsEstimator::new(config.clone()).estimate(&hierarchy.flat_chunks);
        let value = to_metadata_json(&hierarchy, &metrics, &config);

        assert_eq!(value["chunk_statistics"]["total_sections"], 2);
        assert_eq!(
            value["context"]["available_context"],
            config.available_context()
        );
        assert!(value["recommendations"]["chunk_size"].is_string());
        assert!(value["recommendations"]["retrieval"].is_string());
        Ok(())
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("short text", 200), "short text");
        let long = "é".repeat(300);
        let p = preview(&long, 200);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), 203);
    }
}

//! Text preparation applied upstream of chunking
//!
//! The chunking core consumes already-normalized text; these helpers are
//! the producing half of that contract. [`normalize`] cleans prose
//! whitespace while byte-preserving fenced code regions, and
//! [`AcronymGlossary`] inlines first-occurrence acronym definitions so
//! retrieval-sized chunks stay self-explanatory.

use once_cell::sync::Lazy;
use regex::Regex;

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```.*?```").unwrap());
static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static NON_IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalize raw document text for chunking: unified line endings,
/// blank-line runs collapsed to one blank line, space/tab runs collapsed
/// to a single space, no trailing spaces before newlines, trimmed ends.
///
/// Fenced code regions (``` ... ```) are byte-preserved: they are stashed
/// before the whitespace cleanup and restored afterwards.
pub fn normalize(text: &str) -> String {
    let mut fences: Vec<String> = Vec::new();
    let stashed = CODE_FENCE.replace_all(text, |caps: &regex::Captures| {
        fences.push(caps[0].to_string());
        format!("<<CODE_BLOCK_{}>>", fences.len() - 1)
    });

    let mut content = stashed.replace("\r\n", "\n");
    content = EXCESS_NEWLINES.replace_all(&content, "\n\n").into_owned();
    content = SPACE_RUNS.replace_all(&content, " ").into_owned();
    content = content.replace(" \n", "\n");

    for (i, fence) in fences.iter().enumerate() {
        content = content.replace(&format!("<<CODE_BLOCK_{i}>>"), fence);
    }

    content.trim().to_string()
}

/// Sanitize a raw document name into the identifier-safe token the chunk
/// ID scheme assumes: punctuation stripped, whitespace collapsed to
/// underscores, lowercased.
pub fn clean_section_name(name: &str) -> String {
    let stripped = NON_IDENT.replace_all(name, "");
    WHITESPACE_RUN
        .replace_all(stripped.trim(), "_")
        .to_lowercase()
}

/// Full preprocessing as a loader would apply it: whitespace
/// normalization followed by first-occurrence acronym annotation.
pub fn preprocess(text: &str, glossary: &AcronymGlossary) -> String {
    glossary.annotate(&normalize(text))
}

/// Inline expansion of domain acronyms: the first standalone occurrence
/// of each known acronym becomes `ACRO (definition)`, later occurrences
/// are left alone. Entries apply in insertion order so annotation is
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct AcronymGlossary {
    entries: Vec<(String, String)>,
}

impl AcronymGlossary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, A, D>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, D)>,
        A: Into<String>,
        D: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(a, d)| (a.into(), d.into()))
                .collect(),
        }
    }

    /// The LTE/telecom glossary the original document corpus ships with.
    pub fn lte() -> Self {
        Self::from_pairs([
            ("UE", "User Equipment (mobile device)"),
            ("MME", "Mobility Management Entity (core network)"),
            ("HSS", "Home Subscriber Server (user database)"),
            ("eNodeB", "Evolved Node B (base station)"),
            ("EPS", "Evolved Packet System (LTE core)"),
            ("PDN", "Packet Data Network (internet)"),
            ("QCI", "QoS Class Identifier (service quality)"),
            ("APN", "Access Point Name (network gateway)"),
            ("IMSI", "International Mobile Subscriber Identity"),
            ("GUTI", "Globally Unique Temporary Identifier"),
            ("VoLTE", "Voice over LTE (voice calls)"),
            ("IMS", "IP Multimedia Subsystem (services)"),
            ("SIP", "Session Initiation Protocol (signaling)"),
            ("RTP", "Real-time Transport Protocol (media)"),
            ("PCRF", "Policy and Charging Rules Function"),
            ("PGW", "Packet Data Network Gateway"),
            ("SGW", "Serving Gateway (data forwarding)"),
            ("TAU", "Tracking Area Update (location)"),
            ("NAS", "Non-Access Stratum (signaling)"),
            ("EUTRA", "Evolved Universal Terrestrial Radio Access"),
            ("IoT", "Internet of Things"),
            ("PCC", "Policy And Charging Control"),
            ("EPC", "Evolved Packet Core"),
            ("RLC", "Radio Link Control"),
            ("UL", "Up Link"),
            ("TFT", "Traffic Flow Template"),
        ])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Expand the first standalone occurrence of each known acronym.
    pub fn annotate(&self, content: &str) -> String {
        let mut out = content.to_string();
        for (acronym, definition) in &self.entries {
            let Ok(re) = Regex::new(&format!(r"\b{}\b", regex::escape(acronym))) else {
                continue;
            };
            if re.is_match(&out) {
                let replacement = format!("{acronym} ({definition})");
                out = re.replace(&out, regex::NoExpand(&replacement)).into_owned();
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        let raw = "Line one.\r\nLine two.\n\n\n\n\nNext   paragraph\twith  runs. \nTrailing.  ";
        let normalized = normalize(raw);
        assert_eq!(
            normalized,
            "Line one.\nLine two.\n\nNext paragraph with runs.\nTrailing."
        );
    }

    #[test]
    fn test_normalize_preserves_code_fences() {
        let fence = "```\nlet  x  =  1;\n\n\n\nlet y = 2;   \n```";
        let raw = format!("Before   the code.\n\n\n{fence}\n\nAfter   the code.");
        let normalized = normalize(&raw);
        assert!(normalized.contains(fence), "code region must stay byte-identical");
        assert!(normalized.starts_with("Before the code."));
        assert!(normalized.ends_with("After the code."));
    }

    #[test]
    fn test_clean_section_name() {
        assert_eq!(clean_section_name("5G Core Overview!"), "5g_core_overview");
        assert_eq!(clean_section_name("  attach   procedure  "), "attach_procedure");
        assert_eq!(clean_section_name("lte-attach_flow.v2"), "lte-attach_flowv2");
    }

    #[test]
    fn test_annotate_first_occurrence_only() {
        let glossary = AcronymGlossary::lte();
        let annotated = glossary.annotate("The UE attaches. The UE then sends a TAU request.");
        assert_eq!(
            annotated,
            "The UE (User Equipment (mobile device)) attaches. \
             The UE then sends a TAU (Tracking Area Update (location)) request."
        );
    }

    #[test]
    fn test_annotate_respects_word_boundaries() {
        let glossary = AcronymGlossary::from_pairs([("UE", "User Equipment")]);
        // "FUEL" contains UE but is not a standalone occurrence.
        assert_eq!(glossary.annotate("FUEL gauge"), "FUEL gauge");
        assert_eq!(glossary.annotate("the UE."), "the UE (User Equipment).");
    }

    #[test]
    fn test_preprocess_composes() {
        let glossary = AcronymGlossary::from_pairs([("NAS", "Non-Access Stratum")]);
        let out = preprocess("NAS   signaling\r\nflows.", &glossary);
        assert_eq!(out, "NAS (Non-Access Stratum) signaling\nflows.");
    }
}

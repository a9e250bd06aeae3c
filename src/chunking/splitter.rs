//! Boundary-aware splitting of one text blob into size-bounded segments
//!
//! Paragraph boundaries are preferred because they are the strongest
//! semantic unit; sentence boundaries are the fallback because they keep
//! grammatical completeness. Character-exact truncation is never
//! performed: the size budget is a target, not a hard ceiling.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

/// Paragraph delimiter: two consecutive newlines.
const PARAGRAPH_DELIMITER: &str = "\n\n";

/// Sentence-ending punctuation followed by whitespace. The `regex` crate
/// has no lookbehind, so splitting keeps the terminator with the
/// preceding fragment instead (see [`split_sentences`]).
static SENTENCE_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").unwrap());

/// Splits one text blob into a sequence of size-bounded segments,
/// honoring paragraph and sentence boundaries and carrying a trailing
/// overlap from each segment into the next.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundarySplitter;

impl BoundarySplitter {
    pub fn new() -> Self {
        Self
    }

    /// Split `text` into ordered, trimmed, non-empty segments of at most
    /// `target_size` characters each, consecutive segments sharing up to
    /// `overlap_size` trailing characters.
    ///
    /// The bound is soft in exactly one case: a single sentence longer
    /// than `target_size` is emitted verbatim rather than cut mid-word.
    /// Segments that start with an overlap carry may also exceed the
    /// target by up to one overlap length.
    pub fn split(&self, text: &str, target_size: usize, overlap_size: usize) -> Vec<String> {
        let mut segments: Vec<String> = Vec::new();
        let mut current = String::new();

        for para in text.split(PARAGRAPH_DELIMITER) {
            if para.trim().is_empty() {
                continue;
            }

            let candidate_len = if current.is_empty() {
                char_len(para)
            } else {
                char_len(&current) + PARAGRAPH_DELIMITER.len() + char_len(para)
            };

            if candidate_len <= target_size {
                if !current.is_empty() {
                    current.push_str(PARAGRAPH_DELIMITER);
                }
                current.push_str(para);
                continue;
            }

            if !current.is_empty() {
                let seed = overlap_seed(&current, overlap_size);
                push_segment(&mut segments, &current);
                current = seed;
            }

            if char_len(para) > target_size {
                // Too long to ever fit whole: fall back to sentences.
                current = self.pack_sentences(para, target_size, overlap_size, current, &mut segments);
            } else if current.is_empty() {
                current = para.to_string();
            } else {
                current.push_str(PARAGRAPH_DELIMITER);
                current.push_str(para);
            }
        }

        if !current.is_empty() {
            push_segment(&mut segments, &current);
        }

        debug!(
            segments = segments.len(),
            target_size, overlap_size, "split text into segments"
        );
        segments
    }

    /// Greedily pack the sentences of an oversized paragraph, emitting a
    /// segment whenever the next sentence would overflow and reseeding
    /// with the trailing `overlap_size` characters. Returns the unfinished
    /// accumulator for the caller to continue with.
    fn pack_sentences(
        &self,
        para: &str,
        target_size: usize,
        overlap_size: usize,
        seed: String,
        segments: &mut Vec<String>,
    ) -> String {
        debug!(
            chars = char_len(para),
            target_size, "paragraph exceeds budget, packing sentences"
        );
        let mut acc = seed;

        for sentence in split_sentences(para) {
            // The +1 accounts for the joining space.
            if char_len(&acc) + 1 + char_len(sentence) <= target_size {
                if !acc.is_empty() {
                    acc.push(' ');
                }
                acc.push_str(sentence);
            } else if !acc.is_empty() {
                push_segment(segments, &acc);
                if overlap_size > 0 {
                    let carry = if char_len(&acc) > overlap_size {
                        char_tail(&acc, overlap_size).to_string()
                    } else {
                        acc.clone()
                    };
                    acc = format!("{carry} {sentence}");
                } else {
                    acc = sentence.to_string();
                }
            } else {
                // A lone sentence above the budget: emit verbatim rather
                // than cutting inside it.
                warn!(
                    chars = char_len(sentence),
                    target_size, "sentence exceeds target size, emitting verbatim"
                );
                push_segment(segments, sentence);
                acc.clear();
            }
        }

        acc
    }
}

/// Trim and append a finished segment, dropping whitespace-only candidates.
fn push_segment(segments: &mut Vec<String>, candidate: &str) {
    let trimmed = candidate.trim();
    if !trimmed.is_empty() {
        segments.push(trimmed.to_string());
    }
}

/// Seed for the segment following `segment`: the last sentence fragment
/// of its trailing `overlap_size` characters, anchoring the next segment
/// at a sentence boundary instead of mid-sentence. Falls back to the raw
/// tail when the tail contains no sentence boundary.
fn overlap_seed(segment: &str, overlap_size: usize) -> String {
    if overlap_size == 0 || char_len(segment) <= overlap_size {
        return String::new();
    }
    let tail = char_tail(segment, overlap_size);
    last_sentence_fragment(tail).to_string()
}

/// Text after the last sentence boundary in `text`, or all of `text`
/// when it contains none. May be empty when `text` ends on a boundary.
fn last_sentence_fragment(text: &str) -> &str {
    match SENTENCE_BOUNDARY.find_iter(text).last() {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

/// Split at sentence-ending punctuation followed by whitespace, keeping
/// the terminator with the preceding fragment and consuming the
/// whitespace. Text without any boundary comes back as a single piece.
pub(crate) fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut last = 0;
    for m in SENTENCE_BOUNDARY.find_iter(text) {
        // The terminator is a single ASCII punctuation byte.
        sentences.push(&text[last..m.start() + 1]);
        last = m.end();
    }
    if last < text.len() {
        sentences.push(&text[last..]);
    }
    sentences
}

/// Character count, not byte count: budgets are in characters so that
/// multi-byte text can never be split inside a code point.
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Last `n` characters of `s`, on a char boundary.
pub(crate) fn char_tail(s: &str, n: usize) -> &str {
    let len = char_len(s);
    if len <= n {
        return s;
    }
    match s.char_indices().nth(len - n) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

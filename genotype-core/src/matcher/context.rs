//! Match records and context extraction

use serde::{Deserialize, Serialize};

use super::algorithms::Hit;

/// Flanking text captured around a match, clipped to the sequence bounds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchContext {
    pub before: String,
    pub after: String,
    /// Zero-based start of `before`
    pub context_start: usize,
    /// Exclusive end of `after`
    pub context_end: usize,
}

/// A single pattern occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Zero-based offset of the first matched byte
    pub position: usize,
    pub length: usize,
    /// Matched text with its original casing
    pub matched: String,
    /// Pattern as supplied to the matcher
    pub pattern: String,
    pub mismatches: usize,
    pub sequence_id: String,
    pub context: MatchContext,
    /// 1.0 for exact matches, `1 - mismatches / length` otherwise
    pub score: f64,
}

impl Match {
    /// Exclusive end offset
    pub fn end(&self) -> usize {
        self.position + self.length
    }

    pub fn is_exact(&self) -> bool {
        self.mismatches == 0
    }
}

/// Similarity score, clamped to [0.0, 1.0]
pub fn match_score(mismatches: usize, length: usize) -> f64 {
    if mismatches == 0 {
        return 1.0;
    }
    if length == 0 {
        return 0.0;
    }
    (1.0 - mismatches as f64 / length as f64).clamp(0.0, 1.0)
}

/// Build a `Match` from a raw hit in `text`.
///
/// `offset` is added to every reported coordinate so hits inside a
/// streaming buffer come out in stream coordinates.
pub(crate) fn build_match(
    text: &[u8],
    hit: Hit,
    pattern: &str,
    sequence_id: &str,
    window: usize,
    offset: usize,
) -> Match {
    let start = hit.position;
    let end = (start + hit.length).min(text.len());
    let context_start = start.saturating_sub(window);
    let context_end = end.saturating_add(window).min(text.len());

    Match {
        position: offset + start,
        length: hit.length,
        matched: String::from_utf8_lossy(&text[start..end]).into_owned(),
        pattern: pattern.to_string(),
        mismatches: hit.mismatches,
        sequence_id: sequence_id.to_string(),
        context: MatchContext {
            before: String::from_utf8_lossy(&text[context_start..start]).into_owned(),
            after: String::from_utf8_lossy(&text[end..context_end]).into_owned(),
            context_start: offset + context_start,
            context_end: offset + context_end,
        },
        score: match_score(hit.mismatches, hit.length),
    }
}

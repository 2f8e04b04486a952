//! Search kernels behind the pattern matcher
//!
//! Each algorithm's tables are built once when the matcher is constructed.
//! Scanning reports every hit, left to right, to a visitor that can stop the
//! scan early.

use std::ops::ControlFlow;

use regex::bytes::{Regex, RegexBuilder};

use super::{MatchError, MatchResult};
use crate::iupac::{bases_compatible, bases_compatible_exact_case};

/// A raw hit: where it starts, how long it is, how many positions differ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Hit {
    pub position: usize,
    pub length: usize,
    pub mismatches: usize,
}

impl Hit {
    fn exact(position: usize, length: usize) -> Self {
        Self {
            position,
            length,
            mismatches: 0,
        }
    }
}

/// Precomputed search state, one variant per algorithm
#[derive(Debug, Clone)]
pub(crate) enum Scanner {
    BoyerMoore { bad_char: Box<[isize; 256]> },
    Kmp { lps: Vec<usize> },
    Fuzzy { max_mismatches: usize },
    Iupac { case_sensitive: bool },
    Regex(Regex),
}

impl Scanner {
    pub fn boyer_moore(pattern: &[u8]) -> Self {
        Scanner::BoyerMoore {
            bad_char: build_bad_char_table(pattern),
        }
    }

    pub fn kmp(pattern: &[u8]) -> Self {
        Scanner::Kmp {
            lps: build_lps(pattern),
        }
    }

    pub fn regex(pattern: &str, case_sensitive: bool) -> MatchResult<Self> {
        RegexBuilder::new(pattern)
            .case_insensitive(!case_sensitive)
            .build()
            .map(Scanner::Regex)
            .map_err(|e| MatchError::InvalidRegex(e.to_string()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Scanner::BoyerMoore { .. } => "boyer-moore",
            Scanner::Kmp { .. } => "kmp",
            Scanner::Fuzzy { .. } => "fuzzy",
            Scanner::Iupac { .. } => "iupac",
            Scanner::Regex(_) => "regex",
        }
    }

    /// Report every hit of `pattern` in `text` to `visit`, in position order.
    pub fn scan<F>(&self, pattern: &[u8], text: &[u8], visit: F)
    where
        F: FnMut(Hit) -> ControlFlow<()>,
    {
        match self {
            Scanner::BoyerMoore { bad_char } => scan_boyer_moore(pattern, bad_char, text, visit),
            Scanner::Kmp { lps } => scan_kmp(pattern, lps, text, visit),
            Scanner::Fuzzy { max_mismatches } => scan_fuzzy(pattern, *max_mismatches, text, visit),
            Scanner::Iupac { case_sensitive } => scan_iupac(pattern, *case_sensitive, text, visit),
            Scanner::Regex(regex) => scan_regex(regex, text, visit),
        }
    }
}

/// Last index of each byte in `pattern[..m-1]`; -1 when absent.
pub(crate) fn build_bad_char_table(pattern: &[u8]) -> Box<[isize; 256]> {
    let mut table = Box::new([-1isize; 256]);
    let last = pattern.len().saturating_sub(1);
    for (i, &byte) in pattern[..last].iter().enumerate() {
        table[byte as usize] = i as isize;
    }
    table
}

/// Longest proper prefix of `pattern[..=i]` that is also its suffix.
pub(crate) fn build_lps(pattern: &[u8]) -> Vec<usize> {
    let mut lps = vec![0usize; pattern.len()];
    let mut len = 0usize;
    let mut i = 1usize;

    while i < pattern.len() {
        if pattern[i] == pattern[len] {
            len += 1;
            lps[i] = len;
            i += 1;
        } else if len > 0 {
            len = lps[len - 1];
        } else {
            lps[i] = 0;
            i += 1;
        }
    }

    lps
}

/// Boyer-Moore with the bad-character rule.
///
/// A full match advances the window by exactly one so overlapping
/// occurrences (tandem repeats) are all reported.
fn scan_boyer_moore<F>(pattern: &[u8], bad_char: &[isize; 256], text: &[u8], mut visit: F)
where
    F: FnMut(Hit) -> ControlFlow<()>,
{
    let (m, n) = (pattern.len(), text.len());
    if m == 0 || m > n {
        return;
    }

    let mut shift = 0usize;
    while shift + m <= n {
        let mut j = m as isize - 1;
        while j >= 0 && pattern[j as usize] == text[shift + j as usize] {
            j -= 1;
        }

        if j < 0 {
            if visit(Hit::exact(shift, m)).is_break() {
                return;
            }
            shift += 1;
        } else {
            let mismatched = text[shift + j as usize];
            let skip = j - bad_char[mismatched as usize];
            shift += skip.max(1) as usize;
        }
    }
}

/// Knuth-Morris-Pratt; resumes from `lps[m-1]` after a match to keep overlaps.
fn scan_kmp<F>(pattern: &[u8], lps: &[usize], text: &[u8], mut visit: F)
where
    F: FnMut(Hit) -> ControlFlow<()>,
{
    let (m, n) = (pattern.len(), text.len());
    if m == 0 || m > n {
        return;
    }

    let (mut i, mut j) = (0usize, 0usize);
    while i < n {
        if text[i] == pattern[j] {
            i += 1;
            j += 1;
            if j == m {
                if visit(Hit::exact(i - m, m)).is_break() {
                    return;
                }
                j = lps[j - 1];
            }
        } else if j > 0 {
            j = lps[j - 1];
        } else {
            i += 1;
        }
    }
}

/// Hamming-distance scan over every alignment offset.
fn scan_fuzzy<F>(pattern: &[u8], max_mismatches: usize, text: &[u8], mut visit: F)
where
    F: FnMut(Hit) -> ControlFlow<()>,
{
    let (m, n) = (pattern.len(), text.len());
    if m == 0 || m > n {
        return;
    }

    'offsets: for offset in 0..=(n - m) {
        let mut mismatches = 0usize;
        for (&t, &p) in text[offset..offset + m].iter().zip(pattern) {
            if t != p {
                mismatches += 1;
                if mismatches > max_mismatches {
                    continue 'offsets;
                }
            }
        }

        let hit = Hit {
            position: offset,
            length: m,
            mismatches,
        };
        if visit(hit).is_break() {
            return;
        }
    }
}

/// Window-by-window ambiguity comparison; every position must be compatible.
///
/// Case-insensitive callers fold both sides beforehand, so only the
/// case-sensitive path needs to compare case here.
fn scan_iupac<F>(pattern: &[u8], case_sensitive: bool, text: &[u8], mut visit: F)
where
    F: FnMut(Hit) -> ControlFlow<()>,
{
    let (m, n) = (pattern.len(), text.len());
    if m == 0 || m > n {
        return;
    }

    for offset in 0..=(n - m) {
        let window = &text[offset..offset + m];
        let compatible = window
            .iter()
            .zip(pattern)
            .all(|(&t, &p)| {
                if case_sensitive {
                    bases_compatible_exact_case(t, p)
                } else {
                    bases_compatible(t, p)
                }
            });

        if compatible && visit(Hit::exact(offset, m)).is_break() {
            return;
        }
    }
}

fn scan_regex<F>(regex: &Regex, text: &[u8], mut visit: F)
where
    F: FnMut(Hit) -> ControlFlow<()>,
{
    for found in regex.find_iter(text) {
        if visit(Hit::exact(found.start(), found.len())).is_break() {
            return;
        }
    }
}

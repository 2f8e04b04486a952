//! Pattern matching engine
//!
//! Exact (Boyer-Moore, KMP), fuzzy (Hamming), IUPAC-aware and regex search
//! over sequence text, plus chunked matching over unbounded streams.

use std::borrow::Cow;
use std::fmt;
use std::ops::ControlFlow;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::iupac::contains_ambiguity;
use crate::types::Searchable;

mod algorithms;
pub mod context;
pub mod stream;


use algorithms::{Hit, Scanner};
pub use context::{match_score, Match, MatchContext};
pub use stream::{StreamMatches, TryStreamMatches, STREAM_SEQUENCE_ID};

/// Search algorithm selected at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    #[default]
    BoyerMoore,
    Kmp,
    Fuzzy,
    Regex,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::BoyerMoore => "boyer-moore",
            Algorithm::Kmp => "kmp",
            Algorithm::Fuzzy => "fuzzy",
            Algorithm::Regex => "regex",
        }
    }

    /// List all supported algorithm names
    pub fn available() -> Vec<&'static str> {
        vec!["boyer-moore", "kmp", "fuzzy", "regex"]
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "boyer-moore" | "boyer_moore" | "bm" => Ok(Algorithm::BoyerMoore),
            "kmp" => Ok(Algorithm::Kmp),
            "fuzzy" => Ok(Algorithm::Fuzzy),
            "regex" => Ok(Algorithm::Regex),
            other => Err(MatchError::InvalidParams(format!(
                "unknown algorithm '{}' (expected one of: {})",
                other,
                Algorithm::available().join(", ")
            ))),
        }
    }
}

/// Options for pattern matching, fixed once the matcher is built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    pub algorithm: Algorithm,
    /// Only used by the fuzzy algorithm
    pub max_mismatches: usize,
    /// Treat ambiguity codes as base sets rather than literals.
    ///
    /// Only takes effect when the pattern itself contains an ambiguity code.
    /// A plain pattern keeps the requested algorithm, so an `N` in the text
    /// is then compared literally and never matches a concrete base.
    pub iupac_aware: bool,
    pub case_sensitive: bool,
    /// Characters of context captured on each side of a match
    pub context_window: usize,
    /// Streaming accumulation threshold; must be at least the pattern length
    pub buffer_size: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::BoyerMoore,
            max_mismatches: 0,
            iupac_aware: false,
            case_sensitive: true,
            context_window: 50,
            buffer_size: 1_000_000,
        }
    }
}

impl MatchOptions {
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_max_mismatches(mut self, max_mismatches: usize) -> Self {
        self.max_mismatches = max_mismatches;
        self
    }

    pub fn with_iupac(mut self, iupac_aware: bool) -> Self {
        self.iupac_aware = iupac_aware;
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_context_window(mut self, context_window: usize) -> Self {
        self.context_window = context_window;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Check the options against a pattern without building any tables
    pub fn validate_for(&self, pattern: &str) -> MatchResult<()> {
        if pattern.is_empty() {
            return Err(MatchError::InvalidPattern("pattern must not be empty".to_string()));
        }
        if self.buffer_size < pattern.len() {
            return Err(MatchError::InvalidParams(format!(
                "buffer_size ({}) must be at least the pattern length ({})",
                self.buffer_size,
                pattern.len()
            )));
        }
        self.validate()
    }

    /// Pattern-independent checks
    pub fn validate(&self) -> MatchResult<()> {
        if self.buffer_size == 0 {
            return Err(MatchError::InvalidParams("buffer_size must be > 0".to_string()));
        }
        if self.iupac_aware && self.algorithm == Algorithm::Regex {
            return Err(MatchError::InvalidParams(
                "IUPAC-aware matching cannot be combined with the regex algorithm".to_string(),
            ));
        }
        Ok(())
    }
}

/// Result type for matching operations
pub type MatchResult<T> = Result<T, MatchError>;

/// Errors that can occur while building or running a matcher
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid regex: {0}")]
    InvalidRegex(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Execution error: {0}")]
    Execution(String),
}

/// Pattern matcher with algorithm tables precomputed at construction
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    pattern: String,
    /// Pattern bytes as compared against text (upper-cased when case-insensitive)
    search_pattern: Vec<u8>,
    options: MatchOptions,
    scanner: Scanner,
}

impl PatternMatcher {
    /// Build a matcher, failing on an empty pattern, bad regex or
    /// inconsistent options.
    pub fn new(pattern: &str, options: MatchOptions) -> MatchResult<Self> {
        options.validate_for(pattern)?;

        let search_pattern = if options.case_sensitive {
            pattern.as_bytes().to_vec()
        } else {
            pattern.as_bytes().to_ascii_uppercase()
        };

        let scanner = match options.algorithm {
            Algorithm::Regex => Scanner::regex(pattern, options.case_sensitive)?,
            _ if options.iupac_aware && contains_ambiguity(&search_pattern) => Scanner::Iupac {
                case_sensitive: options.case_sensitive,
            },
            Algorithm::BoyerMoore => Scanner::boyer_moore(&search_pattern),
            Algorithm::Kmp => Scanner::kmp(&search_pattern),
            Algorithm::Fuzzy => Scanner::Fuzzy {
                max_mismatches: options.max_mismatches,
            },
        };

        log::debug!(
            "Built {} matcher for pattern of length {} (requested {})",
            scanner.name(),
            pattern.len(),
            options.algorithm
        );

        Ok(Self {
            pattern: pattern.to_string(),
            search_pattern,
            options,
            scanner,
        })
    }

    /// Build a matcher with default options (Boyer-Moore, case-sensitive)
    pub fn with_defaults(pattern: &str) -> MatchResult<Self> {
        Self::new(pattern, MatchOptions::default())
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Name of the kernel actually in use; `"iupac"` when ambiguity codes
    /// override the requested algorithm.
    pub fn algorithm_name(&self) -> &'static str {
        self.scanner.name()
    }

    pub(crate) fn pattern_len(&self) -> usize {
        self.search_pattern.len()
    }

    /// Whether the kernel reports overlapping hits; regex iterates
    /// leftmost-first without overlap.
    pub(crate) fn reports_overlaps(&self) -> bool {
        !matches!(self.scanner, Scanner::Regex(_))
    }

    /// Case-folded view of `text` when matching is case-insensitive.
    ///
    /// Regex handles case itself and always sees the original text.
    fn prepare<'t>(&self, text: &'t [u8]) -> Cow<'t, [u8]> {
        if self.options.case_sensitive || matches!(self.scanner, Scanner::Regex(_)) {
            Cow::Borrowed(text)
        } else {
            Cow::Owned(text.to_ascii_uppercase())
        }
    }

    fn scan<F>(&self, text: &[u8], visit: F)
    where
        F: FnMut(Hit) -> ControlFlow<()>,
    {
        let prepared = self.prepare(text);
        self.scanner.scan(&self.search_pattern, &prepared, visit);
    }

    /// Build a `Match` for every hit in `text`, with coordinates shifted by `offset`
    pub(crate) fn for_each_match<F>(&self, text: &[u8], sequence_id: &str, offset: usize, mut emit: F)
    where
        F: FnMut(Match),
    {
        self.scan(text, |hit| {
            emit(self.build(text, hit, sequence_id, offset));
            ControlFlow::Continue(())
        });
    }

    fn build(&self, text: &[u8], hit: Hit, sequence_id: &str, offset: usize) -> Match {
        context::build_match(
            text,
            hit,
            &self.pattern,
            sequence_id,
            self.options.context_window,
            offset,
        )
    }

    /// All matches in one sequence, overlapping occurrences included
    pub fn find_in_sequence<S: Searchable + ?Sized>(&self, sequence: &S) -> Vec<Match> {
        let mut matches = Vec::new();
        self.for_each_match(sequence.residues(), sequence.sequence_id(), 0, |m| matches.push(m));
        matches
    }

    /// First match in the sequence, stopping the scan as soon as it is found
    pub fn find_first<S: Searchable + ?Sized>(&self, sequence: &S) -> Option<Match> {
        let text = sequence.residues();
        let mut first = None;
        self.scan(text, |hit| {
            first = Some(hit);
            ControlFlow::Break(())
        });
        first.map(|hit| self.build(text, hit, sequence.sequence_id(), 0))
    }

    /// Whether the pattern occurs at all
    pub fn test<S: Searchable + ?Sized>(&self, sequence: &S) -> bool {
        let mut found = false;
        self.scan(sequence.residues(), |_| {
            found = true;
            ControlFlow::Break(())
        });
        found
    }

    /// Number of occurrences, without building match records
    pub fn count<S: Searchable + ?Sized>(&self, sequence: &S) -> usize {
        let mut count = 0usize;
        self.scan(sequence.residues(), |_| {
            count += 1;
            ControlFlow::Continue(())
        });
        count
    }

    /// Lazily match every sequence of the input, one sequence at a time
    pub fn find_all<I>(&self, sequences: I) -> FindAll<'_, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: Searchable,
    {
        FindAll {
            matcher: self,
            sequences: sequences.into_iter(),
            current: Vec::new().into_iter(),
        }
    }

    /// Match across a stream of text chunks without holding the whole text
    pub fn stream_matches<I>(&self, chunks: I) -> StreamMatches<'_, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        StreamMatches::new(self, chunks.into_iter())
    }

    /// Like [`stream_matches`](Self::stream_matches) for chunk sources that can fail
    pub fn try_stream_matches<I, C, E>(&self, chunks: I) -> TryStreamMatches<'_, I::IntoIter>
    where
        I: IntoIterator<Item = Result<C, E>>,
        C: AsRef<[u8]>,
        E: fmt::Display,
    {
        TryStreamMatches::new(self, chunks.into_iter())
    }
}

/// Lazy iterator over the matches of a sequence stream.
///
/// Created by [`PatternMatcher::find_all`]. Each input sequence is searched
/// only when the matches of the previous one have been consumed.
pub struct FindAll<'m, I> {
    matcher: &'m PatternMatcher,
    sequences: I,
    current: std::vec::IntoIter<Match>,
}

impl<'m, I> Iterator for FindAll<'m, I>
where
    I: Iterator,
    I::Item: Searchable,
{
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        loop {
            if let Some(m) = self.current.next() {
                return Some(m);
            }
            let sequence = self.sequences.next()?;
            self.current = self.matcher.find_in_sequence(&sequence).into_iter();
        }
    }
}

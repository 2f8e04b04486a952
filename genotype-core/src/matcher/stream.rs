//! Matching across a stream of text chunks
//!
//! Chunks accumulate in a bounded buffer. Whenever the buffer outgrows
//! `buffer_size`, hits starting in its leading `buffer_size - (m - 1)` bytes
//! are emitted and that region is dropped; the last `m - 1` bytes stay
//! behind so a match straddling a chunk boundary is seen whole on the next
//! pass. When the input ends the remainder is searched once more.
//!
//! Regex matches never overlap and may be longer than the retained tail, so
//! for regex each pass resumes after the end of the last emitted match.

use std::collections::VecDeque;
use std::fmt::Display;

use super::{Match, MatchError, MatchResult, PatternMatcher};

/// Sequence id reported for stream matches unless overridden
pub const STREAM_SEQUENCE_ID: &str = "stream";

/// Accumulation buffer shared by the fallible and infallible stream adapters
#[derive(Debug)]
struct ChunkWindow {
    buffer: Vec<u8>,
    global_position: usize,
    /// Stream offset where a non-overlapping scan may resume
    resume_at: usize,
    pending: VecDeque<Match>,
    sequence_id: String,
}

impl ChunkWindow {
    fn new() -> Self {
        Self {
            buffer: Vec::new(),
            global_position: 0,
            resume_at: 0,
            pending: VecDeque::new(),
            sequence_id: STREAM_SEQUENCE_ID.to_string(),
        }
    }

    fn push_chunk(&mut self, matcher: &PatternMatcher, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);

        let buffer_size = matcher.options().buffer_size;
        let retained = matcher.pattern_len() - 1;
        let confirmed = buffer_size - retained;

        while self.buffer.len() > buffer_size {
            let confirmed_end = self.global_position + confirmed;
            self.scan_region(matcher, buffer_size, Some(confirmed_end));

            self.buffer.drain(..confirmed);
            self.global_position += confirmed;
            log::trace!(
                "Slid stream window by {} bytes (global position {}, {} buffered)",
                confirmed,
                self.global_position,
                self.buffer.len()
            );
        }
    }

    fn finish(&mut self, matcher: &PatternMatcher) {
        self.scan_region(matcher, self.buffer.len(), None);

        self.global_position += self.buffer.len();
        self.buffer.clear();
    }

    /// Queue the hits in `buffer[..end]` that start before `confirmed_end`
    /// (stream coordinates), or all of them when `confirmed_end` is `None`.
    fn scan_region(&mut self, matcher: &PatternMatcher, end: usize, confirmed_end: Option<usize>) {
        let overlapping = matcher.reports_overlaps();
        let skip = if overlapping {
            0
        } else {
            self.resume_at.saturating_sub(self.global_position).min(end)
        };

        let offset = self.global_position + skip;
        let region = &self.buffer[skip..end];
        let (sequence_id, pending) = (&self.sequence_id, &mut self.pending);
        let resume_at = &mut self.resume_at;

        matcher.for_each_match(region, sequence_id, offset, |m| {
            if confirmed_end.map_or(true, |limit| m.position < limit) {
                if !overlapping {
                    *resume_at = (*resume_at).max(m.end());
                }
                pending.push_back(m);
            }
        });
    }
}

/// Lazy iterator of matches over an infallible chunk source.
///
/// Created by [`PatternMatcher::stream_matches`].
pub struct StreamMatches<'m, I> {
    matcher: &'m PatternMatcher,
    chunks: I,
    window: ChunkWindow,
    finished: bool,
}

impl<'m, I> StreamMatches<'m, I> {
    pub(crate) fn new(matcher: &'m PatternMatcher, chunks: I) -> Self {
        Self {
            matcher,
            chunks,
            window: ChunkWindow::new(),
            finished: false,
        }
    }

    /// Report matches under this sequence id instead of `"stream"`
    pub fn with_sequence_id(mut self, sequence_id: impl Into<String>) -> Self {
        self.window.sequence_id = sequence_id.into();
        self
    }

    /// Bytes consumed and discarded so far
    pub fn global_position(&self) -> usize {
        self.window.global_position
    }
}

impl<'m, I> Iterator for StreamMatches<'m, I>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
{
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        loop {
            if let Some(m) = self.window.pending.pop_front() {
                return Some(m);
            }
            if self.finished {
                return None;
            }
            match self.chunks.next() {
                Some(chunk) => self.window.push_chunk(self.matcher, chunk.as_ref()),
                None => {
                    self.window.finish(self.matcher);
                    self.finished = true;
                }
            }
        }
    }
}

/// Lazy iterator of matches over a chunk source that can fail.
///
/// The first upstream error is yielded as [`MatchError::Execution`] and ends
/// the stream. Created by [`PatternMatcher::try_stream_matches`].
pub struct TryStreamMatches<'m, I> {
    matcher: &'m PatternMatcher,
    chunks: I,
    window: ChunkWindow,
    finished: bool,
}

impl<'m, I> TryStreamMatches<'m, I> {
    pub(crate) fn new(matcher: &'m PatternMatcher, chunks: I) -> Self {
        Self {
            matcher,
            chunks,
            window: ChunkWindow::new(),
            finished: false,
        }
    }

    pub fn with_sequence_id(mut self, sequence_id: impl Into<String>) -> Self {
        self.window.sequence_id = sequence_id.into();
        self
    }
}

impl<'m, I, C, E> Iterator for TryStreamMatches<'m, I>
where
    I: Iterator<Item = Result<C, E>>,
    C: AsRef<[u8]>,
    E: Display,
{
    type Item = MatchResult<Match>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(m) = self.window.pending.pop_front() {
                return Some(Ok(m));
            }
            if self.finished {
                return None;
            }
            match self.chunks.next() {
                Some(Ok(chunk)) => self.window.push_chunk(self.matcher, chunk.as_ref()),
                Some(Err(e)) => {
                    self.finished = true;
                    self.window.pending.clear();
                    return Some(Err(MatchError::Execution(format!(
                        "chunk source failed at byte {}: {}",
                        self.window.global_position + self.window.buffer.len(),
                        e
                    ))));
                }
                None => {
                    self.window.finish(self.matcher);
                    self.finished = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{Algorithm, MatchOptions};

    fn matcher(pattern: &str, buffer_size: usize) -> PatternMatcher {
        PatternMatcher::new(pattern, MatchOptions::default().with_buffer_size(buffer_size))
            .expect("valid matcher")
    }

    #[test]
    fn test_match_straddling_chunk_boundary() {
        let m = matcher("GATTACA", 8);
        let chunks = ["CCCCGAT", "TACACCCC", "CCCC"];
        let found: Vec<Match> = m.stream_matches(chunks.iter()).collect();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].position, 4);
        assert_eq!(found[0].matched, "GATTACA");
        assert_eq!(found[0].sequence_id, STREAM_SEQUENCE_ID);
    }

    #[test]
    fn test_no_duplicates_in_retained_tail() {
        let m = matcher("AA", 4);
        let text = "AAAAAAAAAA";
        let chunks: Vec<&str> = vec!["AAA", "AAAA", "AAA"];
        let streamed: Vec<usize> = m.stream_matches(chunks).map(|m| m.position).collect();
        let whole: Vec<usize> = m.find_in_sequence(text).iter().map(|m| m.position).collect();
        assert_eq!(streamed, whole);
        assert_eq!(streamed, (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_stream_yields_nothing() {
        let m = matcher("ACGT", 16);
        let chunks: Vec<String> = Vec::new();
        assert_eq!(m.stream_matches(chunks).count(), 0);
    }

    #[test]
    fn test_custom_sequence_id_and_position_tracking() {
        let m = matcher("CG", 4);
        let mut stream = m
            .stream_matches(vec!["ATCGAT", "CGAT"].into_iter())
            .with_sequence_id("chr7");
        let first = stream.next().expect("first match");
        assert_eq!(first.sequence_id, "chr7");
        assert_eq!(first.position, 2);
        let rest: Vec<usize> = stream.map(|m| m.position).collect();
        assert_eq!(rest, vec![6]);
    }

    #[test]
    fn test_try_stream_surfaces_upstream_error() {
        let m = matcher("ACGT", 8);
        let chunks: Vec<Result<&str, String>> = vec![
            Ok("ACGTAC"),
            Err("disk went away".to_string()),
            Ok("ACGT"),
        ];
        let results: Vec<MatchResult<Match>> = m.try_stream_matches(chunks).collect();

        assert_eq!(results.len(), 1);
        match &results[0] {
            Err(MatchError::Execution(message)) => assert!(message.contains("disk went away")),
            other => panic!("expected execution error, got {:?}", other),
        }
    }

    fn spans(matches: &[Match]) -> Vec<(usize, usize)> {
        matches.iter().map(|m| (m.position, m.length)).collect()
    }

    #[test]
    fn test_regex_stream_never_overlaps_emitted_matches() {
        let options = MatchOptions::default()
            .with_algorithm(Algorithm::Regex)
            .with_buffer_size(4);
        let m = PatternMatcher::new("A+", options).expect("valid matcher");
        let text = "AAAAAAAAAA";

        let streamed: Vec<Match> = m.stream_matches(text.as_bytes().chunks(3)).collect();

        assert_eq!(spans(&streamed), vec![(0, 4), (4, 3), (7, 3)]);
        for pair in streamed.windows(2) {
            assert!(pair[1].position >= pair[0].end(), "overlap: {:?}", spans(&streamed));
        }
        for found in &streamed {
            assert_eq!(found.matched, &text[found.position..found.end()]);
        }
    }

    #[test]
    fn test_regex_stream_matches_short_hits_like_whole_text() {
        let options = MatchOptions::default()
            .with_algorithm(Algorithm::Regex)
            .with_buffer_size(6);
        let m = PatternMatcher::new("GA[CT]", options).expect("valid matcher");
        let text = "TTGACTTGATGGGACGATGAC";

        let whole = spans(&m.find_in_sequence(text));
        let streamed: Vec<Match> = m.stream_matches(text.as_bytes().chunks(4)).collect();
        assert_eq!(spans(&streamed), whole);
    }

    #[test]
    fn test_try_stream_without_errors_matches_whole_text() {
        let options = MatchOptions::default()
            .with_algorithm(Algorithm::Kmp)
            .with_buffer_size(5);
        let m = PatternMatcher::new("ATA", options).expect("valid matcher");
        let chunks: Vec<Result<&str, std::io::Error>> = vec![Ok("ATAT"), Ok("ATAT"), Ok("A")];
        let positions: Vec<usize> = m
            .try_stream_matches(chunks)
            .map(|r| r.map(|m| m.position))
            .collect::<MatchResult<_>>()
            .expect("no upstream errors");
        assert_eq!(positions, vec![0, 2, 4, 6]);
    }
}

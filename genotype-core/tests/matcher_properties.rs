use genotype_core::{Algorithm, Match, MatchOptions, PatternMatcher};
use proptest::prelude::*;

/// Every (possibly overlapping) start where `pattern` occurs within
/// `max_mismatches` substitutions
fn brute_force(text: &str, pattern: &str, max_mismatches: usize) -> Vec<(usize, usize)> {
    let (text, pattern) = (text.as_bytes(), pattern.as_bytes());
    if pattern.len() > text.len() {
        return Vec::new();
    }
    (0..=text.len() - pattern.len())
        .filter_map(|start| {
            let mismatches = text[start..start + pattern.len()]
                .iter()
                .zip(pattern)
                .filter(|(a, b)| a != b)
                .count();
            (mismatches <= max_mismatches).then_some((start, mismatches))
        })
        .collect()
}

fn hits(matches: &[Match]) -> Vec<(usize, usize)> {
    matches.iter().map(|m| (m.position, m.mismatches)).collect()
}

fn exact(algorithm: Algorithm) -> MatchOptions {
    MatchOptions::default().with_algorithm(algorithm)
}

proptest! {
    #[test]
    fn prop_exact_algorithms_agree_with_brute_force(
        text in "[ACGT]{0,200}",
        pattern in "[ACGT]{1,6}"
    ) {
        let expected = brute_force(&text, &pattern, 0);

        for algorithm in [Algorithm::BoyerMoore, Algorithm::Kmp, Algorithm::Fuzzy] {
            let matcher = PatternMatcher::new(&pattern, exact(algorithm)).unwrap();
            prop_assert_eq!(hits(&matcher.find_in_sequence(text.as_str())), expected.clone());
            prop_assert_eq!(matcher.count(text.as_str()), expected.len());
            prop_assert_eq!(matcher.test(text.as_str()), !expected.is_empty());
        }
    }

    #[test]
    fn prop_fuzzy_matches_hamming_neighbourhood(
        text in "[ACGT]{0,120}",
        pattern in "[ACGT]{1,8}",
        max_mismatches in 0usize..3
    ) {
        let options = exact(Algorithm::Fuzzy).with_max_mismatches(max_mismatches);
        let matcher = PatternMatcher::new(&pattern, options).unwrap();
        let found = matcher.find_in_sequence(text.as_str());

        prop_assert_eq!(hits(&found), brute_force(&text, &pattern, max_mismatches));
        for m in &found {
            prop_assert!((0.0..=1.0).contains(&m.score));
            prop_assert_eq!(m.length, pattern.len());
            prop_assert_eq!(m.is_exact(), m.mismatches == 0);
        }
    }

    #[test]
    fn prop_case_insensitive_ignores_soft_masking(
        text in "[ACGT]{0,150}",
        pattern in "[ACGT]{1,5}"
    ) {
        let upper = PatternMatcher::new(&pattern, MatchOptions::default()).unwrap();
        let folded = PatternMatcher::new(
            &pattern.to_ascii_lowercase(),
            MatchOptions::default().with_case_sensitive(false),
        )
        .unwrap();

        let lower_text = text.to_ascii_lowercase();
        prop_assert_eq!(
            hits(&folded.find_in_sequence(lower_text.as_str())),
            hits(&upper.find_in_sequence(text.as_str()))
        );
    }

    #[test]
    fn prop_n_in_pattern_matches_any_base(
        text in "[ACGT]{0,150}",
        prefix in "[ACGT]{0,3}",
        suffix in "[ACGT]{1,3}"
    ) {
        let pattern = format!("{}N{}", prefix, suffix);
        let matcher = PatternMatcher::new(&pattern, MatchOptions::default().with_iupac(true)).unwrap();

        let (t, p) = (text.as_bytes(), pattern.as_bytes());
        let expected: Vec<usize> = if p.len() > t.len() {
            Vec::new()
        } else {
            (0..=t.len() - p.len())
                .filter(|&start| {
                    t[start..start + p.len()]
                        .iter()
                        .zip(p)
                        .all(|(tb, pb)| *pb == b'N' || tb == pb)
                })
                .collect()
        };

        let found: Vec<usize> = matcher
            .find_in_sequence(text.as_str())
            .iter()
            .map(|m| m.position)
            .collect();
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn prop_streaming_equals_whole_text(
        text in "[ACGT]{0,400}",
        pattern in "[ACGT]{1,6}",
        chunk_size in 1usize..64,
        extra_buffer in 0usize..32,
        max_mismatches in 0usize..2
    ) {
        let options = exact(Algorithm::Fuzzy)
            .with_max_mismatches(max_mismatches)
            .with_buffer_size(pattern.len() + extra_buffer);
        let matcher = PatternMatcher::new(&pattern, options).unwrap();

        let whole = hits(&matcher.find_in_sequence(text.as_str()));
        let streamed: Vec<Match> = matcher
            .stream_matches(text.as_bytes().chunks(chunk_size))
            .collect();

        prop_assert_eq!(hits(&streamed), whole);
        for m in &streamed {
            prop_assert_eq!(&m.matched, &text[m.position..m.end()]);
            prop_assert_eq!(m.sequence_id.as_str(), "stream");
        }
    }

    #[test]
    fn prop_regex_streaming_never_reports_a_byte_twice(
        text in "[ACGT]{0,300}",
        chunk_size in 1usize..40,
        buffer_size in 6usize..40
    ) {
        let options = exact(Algorithm::Regex).with_buffer_size(buffer_size);
        let matcher = PatternMatcher::new("A+|GC+", options).unwrap();

        let streamed: Vec<Match> = matcher
            .stream_matches(text.as_bytes().chunks(chunk_size))
            .collect();
        for pair in streamed.windows(2) {
            prop_assert!(pair[1].position >= pair[0].end());
        }
        for m in &streamed {
            prop_assert_eq!(&m.matched, &text[m.position..m.end()]);
        }
    }

    #[test]
    fn prop_exact_streaming_algorithms_agree(
        text in "[ACGT]{0,300}",
        pattern in "[ACGT]{1,5}",
        chunk_size in 1usize..50
    ) {
        let expected: Vec<usize> = brute_force(&text, &pattern, 0).into_iter().map(|(p, _)| p).collect();

        for algorithm in [Algorithm::BoyerMoore, Algorithm::Kmp] {
            let matcher = PatternMatcher::new(
                &pattern,
                exact(algorithm).with_buffer_size(pattern.len() + 7),
            )
            .unwrap();
            let streamed: Vec<usize> = matcher
                .stream_matches(text.as_bytes().chunks(chunk_size))
                .map(|m| m.position)
                .collect();
            prop_assert_eq!(streamed, expected.clone());
        }
    }
}

#[test]
fn test_context_is_clamped_at_sequence_edges() {
    let matcher =
        PatternMatcher::new("AC", MatchOptions::default().with_context_window(100)).unwrap();
    let found = matcher.find_in_sequence("GACT");

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].context.before, "G");
    assert_eq!(found[0].context.after, "T");
    assert_eq!(found[0].context.context_start, 0);
    assert_eq!(found[0].context.context_end, 4);
}

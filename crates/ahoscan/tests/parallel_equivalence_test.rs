// Parallel build and chunked scanning must agree with a naive search
use ahoscan::{validate_automaton, MatchOrder, MatchRecord, Matcher};
use proptest::prelude::*;

const PROPTEST_CASES: u32 = 64;

/// Every (pattern, start, end) found by direct comparison at each offset
fn naive_matches(patterns: &[String], text: &[u8]) -> Vec<MatchRecord> {
    let mut found = Vec::new();
    for (id, pattern) in patterns.iter().enumerate() {
        let pattern = pattern.as_bytes();
        if pattern.len() > text.len() {
            continue;
        }
        for start in 0..=text.len() - pattern.len() {
            if &text[start..start + pattern.len()] == pattern {
                found.push(MatchRecord::new(
                    id as u32,
                    start,
                    start + pattern.len() - 1,
                ));
            }
        }
    }
    found.sort();
    found
}

fn sorted(mut matches: Vec<MatchRecord>) -> Vec<MatchRecord> {
    matches.sort();
    matches
}

fn pattern_set() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[abc]{1,6}", 1..10)
}

fn text() -> impl Strategy<Value = String> {
    "[abc]{0,80}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

    #[test]
    fn chunked_scan_matches_naive_search(patterns in pattern_set(), text in text()) {
        let matcher = Matcher::new(&patterns).unwrap();
        let expected = naive_matches(&patterns, text.as_bytes());

        prop_assert_eq!(sorted(matcher.find_sequential(text.as_bytes()).unwrap()), expected.clone());
        for workers in [1usize, 2, 3, 8] {
            let found = matcher
                .find_all_with(text.as_bytes(), workers, MatchOrder::Discovery)
                .unwrap();
            prop_assert_eq!(sorted(found), expected.clone(), "workers = {}", workers);
        }
    }

    #[test]
    fn by_start_order_is_independent_of_workers(patterns in pattern_set(), text in text()) {
        let matcher = Matcher::new(&patterns).unwrap();
        let baseline = matcher
            .find_all_with(text.as_bytes(), 1, MatchOrder::ByStart)
            .unwrap();
        for workers in [2usize, 3, 8] {
            let found = matcher
                .find_all_with(text.as_bytes(), workers, MatchOrder::ByStart)
                .unwrap();
            prop_assert_eq!(&found, &baseline);
        }
    }

    #[test]
    fn parallel_build_is_identical(patterns in pattern_set()) {
        let sequential = Matcher::new(&patterns).unwrap();
        for workers in [2usize, 4] {
            let parallel = Matcher::builder(&patterns).build_workers(workers).build().unwrap();
            prop_assert_eq!(parallel.automaton(), sequential.automaton());
        }
    }

    #[test]
    fn built_automaton_is_valid(patterns in pattern_set()) {
        let matcher = Matcher::new(&patterns).unwrap();
        let result = validate_automaton(matcher.automaton());
        prop_assert!(result.is_valid(), "errors: {:?}", result.errors);
        prop_assert_eq!(result.stats.orphaned_count, 0);
    }

    #[test]
    fn discovery_order_is_grouped_by_chunk(patterns in pattern_set(), text in text()) {
        let matcher = Matcher::new(&patterns).unwrap();
        let found = matcher
            .find_all_with(text.as_bytes(), 4, MatchOrder::Discovery)
            .unwrap();
        // Within each chunk matches come out by end offset
        let chunk = text.len().div_ceil(4).max(1);
        for pair in found.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (ca, cb) = (a.start / chunk, b.start / chunk);
            prop_assert!(ca <= cb);
            if ca == cb {
                prop_assert!(a.end <= b.end);
            }
        }
    }
}

#[test]
fn test_large_pattern_set_parallel_build() {
    // Enough nodes per level for several build workers
    let mut patterns = Vec::new();
    for a in b'a'..=b'z' {
        for b in b'a'..=b'z' {
            patterns.push(vec![a, b, b'q', a]);
        }
    }
    let sequential = Matcher::new(&patterns).unwrap();
    let parallel = Matcher::builder(&patterns).build_workers(8).build().unwrap();
    assert_eq!(parallel.automaton(), sequential.automaton());

    let text: Vec<u8> = patterns.iter().take(200).flatten().copied().collect();
    let expected = sorted(sequential.find_sequential(&text).unwrap());
    let found = parallel.find_all_with(&text, 8, MatchOrder::Discovery).unwrap();
    assert_eq!(sorted(found), expected);
    assert!(expected.len() >= 200);
}

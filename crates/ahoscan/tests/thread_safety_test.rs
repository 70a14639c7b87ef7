// Thread-safety tests for Matcher
use ahoscan::{ACAutomaton, MatchOrder, Matcher};
use std::sync::Arc;
use std::thread;

#[test]
fn test_matcher_is_send_sync() {
    // Compile-time assertion that Matcher is Send + Sync
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    assert_send::<Matcher>();
    assert_sync::<Matcher>();
    assert_send::<ACAutomaton>();
    assert_sync::<ACAutomaton>();
}

#[test]
fn test_concurrent_scans() {
    let matcher = Arc::new(
        Matcher::builder(["he", "she", "his", "hers"])
            .search_workers(3)
            .order(MatchOrder::ByStart)
            .build()
            .expect("Failed to build matcher"),
    );
    let expected = matcher.find_all(b"ushershishe").unwrap();

    // Each thread runs its own parallel scans on the shared matcher
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let matcher = Arc::clone(&matcher);
            let expected = expected.clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    assert_eq!(matcher.find_all(b"ushershishe").unwrap(), expected);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // 1 baseline scan + 8 threads * 100 scans
    let stats = matcher.stats();
    assert_eq!(stats.scans, 801, "Expected 801 total scans");
    assert_eq!(stats.bytes_scanned, 801 * 11);
    assert_eq!(stats.matches_found, 801 * expected.len() as u64);
}

#[test]
fn test_scoped_sharing_without_arc() {
    let matcher = Matcher::builder(["ab", "bc"]).workers(2).build().unwrap();
    let texts: [&[u8]; 3] = [b"abc", b"cab", b"bcbc"];

    let matcher = &matcher;
    let counts: Vec<usize> = thread::scope(|scope| {
        let handles: Vec<_> = texts
            .iter()
            .map(|&text| scope.spawn(move || matcher.find_all(text).unwrap().len()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(counts, vec![2, 1, 2]);
}

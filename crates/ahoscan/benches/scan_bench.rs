use ahoscan::{MatchOrder, Matcher};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

/// Deterministic lowercase words (xorshift), so runs are comparable
fn words(count: usize, seed: u64) -> Vec<String> {
    let mut state = seed;
    (0..count)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let len = 3 + (state % 6) as usize;
            (0..len)
                .map(|i| (b'a' + ((state >> (i * 5)) % 26) as u8) as char)
                .collect()
        })
        .collect()
}

fn generate_text(patterns: &[String], size: usize) -> Vec<u8> {
    let filler = words(size / 4, 0x5eed);
    let mut text = Vec::with_capacity(size + 16);
    let mut i = 0;
    while text.len() < size {
        if i % 8 == 0 {
            text.extend_from_slice(patterns[i % patterns.len()].as_bytes());
        } else {
            text.extend_from_slice(filler[i % filler.len()].as_bytes());
        }
        i += 1;
    }
    text.truncate(size);
    text
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    let patterns = words(20_000, 0xac);

    for workers in [1, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &w| {
            b.iter(|| {
                black_box(
                    Matcher::builder(&patterns)
                        .build_workers(w)
                        .build()
                        .unwrap(),
                )
            });
        });
    }

    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    let patterns = words(1_000, 0xac);
    let matcher = Matcher::new(&patterns).unwrap();
    let text = generate_text(&patterns, 4 * 1024 * 1024);

    let mut group = c.benchmark_group("scan");
    group.throughput(Throughput::Bytes(text.len() as u64));

    for workers in [1, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &w| {
            b.iter(|| {
                black_box(
                    matcher
                        .find_all_with(&text, w, MatchOrder::Discovery)
                        .unwrap(),
                )
            });
        });
    }

    group.bench_function(BenchmarkId::new("sorted", 4), |b| {
        b.iter(|| {
            black_box(
                matcher
                    .find_all_with(&text, 4, MatchOrder::ByStart)
                    .unwrap(),
            )
        });
    });

    group.finish();
}

criterion_group!(benches, bench_build, bench_scan);
criterion_main!(benches);

//! Benchmarks for rbs
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use rbs::scanner::Needle;

fn benchmark_scanner_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner");

    // 1 MiB of pseudo-random bytes, deterministic across runs
    let mut haystack = vec![0u8; 1 << 20];
    let mut state = 0x9e3779b97f4a7c15u64;
    for byte in haystack.iter_mut() {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        *byte = (state >> 33) as u8;
    }
    group.throughput(Throughput::Bytes(haystack.len() as u64));

    let miss = Needle::new(b"not-in-the-haystack!");
    group.bench_function("miss_20b_needle", |b| {
        b.iter(|| black_box(miss.find(black_box(&haystack))))
    });

    let mut planted = haystack.clone();
    let tail = planted.len() - 64;
    planted[tail..tail + 6].copy_from_slice(b"needle");
    let hit = Needle::new(b"needle");
    group.bench_function("hit_near_end", |b| {
        b.iter(|| black_box(hit.find(black_box(&planted))))
    });

    // Low-entropy haystack punishes single-anchor filtering
    let repeated = vec![b'a'; 1 << 20];
    let sparse = Needle::new(b"aaaaaaab");
    group.bench_function("miss_low_entropy", |b| {
        b.iter(|| black_box(sparse.find(black_box(&repeated))))
    });

    group.finish();
}

fn benchmark_needle_compile(c: &mut Criterion) {
    c.bench_function("needle_compile", |b| {
        b.iter(|| black_box(Needle::new(black_box(b"connection refused"))))
    });
}

fn benchmark_arena_alloc(c: &mut Criterion) {
    use rbs::search::NodeArena;

    c.bench_function("arena_alloc_1k", |b| {
        b.iter_batched(
            NodeArena::new,
            |arena| {
                let parent = arena.alloc(b"parent", None);
                for _ in 0..1000 {
                    black_box(arena.alloc(black_box(b"entry-name.txt"), Some(parent)));
                }
                arena
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    benchmark_scanner_throughput,
    benchmark_needle_compile,
    benchmark_arena_alloc
);
criterion_main!(benches);

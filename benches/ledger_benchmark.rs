/*!
 * Ledger Benchmarks
 *
 * Track/release throughput and snapshot cost under contention
 */

use alloc_ledger::{LeakReporter, Ledger, ResourceId};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::thread;

fn bench_track_release(c: &mut Criterion) {
    let ledger = Ledger::new();
    let mut next = 0u64;

    c.bench_function("track_release", |b| {
        b.iter(|| {
            next = next.wrapping_add(1);
            let id = ResourceId::new(next);
            ledger.track(id, "bench");
            black_box(ledger.release(id));
        });
    });
}

fn bench_enumerate(c: &mut Criterion) {
    let mut group = c.benchmark_group("enumerate");

    for size in [16u64, 1_024, 16_384] {
        let ledger = Ledger::new();
        for i in 0..size {
            ledger.track(ResourceId::new(i), "bench");
        }
        let reporter = LeakReporter::new(ledger.clone());

        group.bench_with_input(BenchmarkId::from_parameter(size), &reporter, |b, reporter| {
            b.iter(|| black_box(reporter.snapshot().total));
        });
    }

    group.finish();
}

fn bench_contended_track(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended_track");

    for threads in [2u64, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                let ledger = Ledger::new();
                let handles: Vec<_> = (0..threads)
                    .map(|t| {
                        let ledger = ledger.clone();
                        thread::spawn(move || {
                            for i in 0..1_000u64 {
                                let id = ResourceId::new(t * 1_000 + i);
                                ledger.track(id, "bench");
                                ledger.release(id);
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_track_release, bench_enumerate, bench_contended_track);
criterion_main!(benches);

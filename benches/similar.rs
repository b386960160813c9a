use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use dawg::dawg::builder::build_sorted;
use dawg::dawg::encoder::encode;
use dawg::dawg::EncodedDawg;
use dawg::metric::Metric;
use dawg::search::similar;

fn sorted_words(n: usize) -> Vec<Vec<u8>> {
    let mut words: Vec<Vec<u8>> = (0..n)
        .map(|i| format!("word{i:08}").into_bytes())
        .collect();
    words.sort();
    words.dedup();
    words
}

fn build_dawg(n: usize) -> EncodedDawg {
    let words = sorted_words(n);
    encode(build_sorted(false, words.into_iter().map(|w| (w, None))).unwrap()).unwrap()
}

fn bench_similar(c: &mut Criterion) {
    let metric = Metric::uniform();
    let mut group = c.benchmark_group("similar");
    for &size in &[1_000usize, 10_000, 100_000] {
        let dawg = build_dawg(size);
        for &budget in &[0.0f64, 1.0, 2.0] {
            group.bench_with_input(
                BenchmarkId::new(format!("dict_size_{size}"), budget),
                &budget,
                |b, &budget| {
                    b.iter(|| {
                        black_box(similar(
                            black_box(&dawg),
                            black_box(b"word0000500X"),
                            black_box(&metric),
                            budget,
                            false,
                            Some(10),
                        ))
                    });
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_similar);
criterion_main!(benches);

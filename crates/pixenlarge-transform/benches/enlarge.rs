//! Packed row enlargement per factor against the per-bit reference

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pixenlarge_transform::{
    ScaleFactor, enlarge_packed_row, enlarge_packed_row_bitwise, packed_buffer_len,
};
use std::hint::black_box;

/// A scanned page width at 300 dpi
const WIDTH: u32 = 2550;

fn packed(c: &mut Criterion) {
    let row: Vec<u8> = (0..WIDTH.div_ceil(8)).map(|_| rand::random::<u8>()).collect();
    let mut g = c.benchmark_group("packed_row");

    for f in [2u32, 3, 4, 5, 7, 16] {
        let Ok(factor) = ScaleFactor::new(f) else {
            continue;
        };
        let Ok(len) = packed_buffer_len(WIDTH, factor) else {
            continue;
        };
        let mut output = vec![0u8; len];

        g.bench_with_input(BenchmarkId::new("tables", f), &factor, |b, &factor| {
            b.iter(|| enlarge_packed_row(black_box(&row), WIDTH, factor, &mut output))
        });
        g.bench_with_input(BenchmarkId::new("bitwise", f), &factor, |b, &factor| {
            b.iter(|| enlarge_packed_row_bitwise(black_box(&row), WIDTH, factor))
        });
    }
    g.finish();
}

criterion_group!(benches, packed);
criterion_main!(benches);

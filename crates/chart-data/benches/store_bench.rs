use chart_data::KeyedValues2D;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, black_box};

fn build_table(rows: usize, columns: usize) -> KeyedValues2D {
    let mut t = KeyedValues2D::new();
    // column-major so every new column backfills all existing rows
    for c in 0..columns {
        for r in 0..rows {
            t.add(&format!("r{r}"), &format!("c{c}"), Some((r * columns + c) as f64), false);
        }
    }
    t
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_build");
    for &(rows, columns) in &[(100usize, 10usize), (1_000, 20), (5_000, 8)] {
        group.bench_with_input(BenchmarkId::from_parameter(format!("r{rows}_c{columns}")), &(rows, columns), |b, &(r, c)| {
            b.iter(|| black_box(build_table(r, c)));
        });
    }
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let t = build_table(2_000, 16);
    c.bench_function("value_by_key_2000x16", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for r in (0..2_000).step_by(7) {
                sum += t.value_by_key(&format!("r{r}"), "c5").unwrap_or(0.0);
            }
            black_box(sum)
        });
    });
}

criterion_group!(benches, bench_build, bench_lookup);
criterion_main!(benches);

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use strand_storage::{NullBitmap, StringColumn};

const ROW_COUNTS: [usize; 3] = [1_000, 10_000, 100_000];

fn null_flags(rows: usize, every: usize) -> Vec<bool> {
    (0..rows).map(|i| i % every == 0).collect()
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("null_map_merge");

    for size in ROW_COUNTS {
        let left = null_flags(size, 3);
        let right = null_flags(size, 7);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("vec_bool", size), &size, |b, _| {
            b.iter(|| {
                let mut acc = left.clone();
                for (dst, src) in acc.iter_mut().zip(right.iter()) {
                    *dst |= *src;
                }
                black_box(acc)
            });
        });

        let packed_left = NullBitmap::from_bools(&left);
        let packed_right = NullBitmap::from_bools(&right);
        group.bench_with_input(BenchmarkId::new("bitmap", size), &size, |b, _| {
            b.iter(|| {
                let mut acc = packed_left.clone();
                acc.merge(&packed_right);
                black_box(acc)
            });
        });
    }

    group.finish();
}

fn bench_string_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("string_column_push");

    for size in ROW_COUNTS {
        let values: Vec<String> = (0..size).map(|i| format!("value number {}", i)).collect();
        let payload: usize = values.iter().map(String::len).sum();
        group.throughput(Throughput::Bytes(payload as u64));

        group.bench_with_input(BenchmarkId::new("grow", size), &size, |b, _| {
            b.iter(|| {
                let mut column = StringColumn::new();
                for value in &values {
                    column.push_value(value.as_bytes());
                }
                black_box(column)
            });
        });

        group.bench_with_input(BenchmarkId::new("reserved", size), &size, |b, _| {
            b.iter(|| {
                let mut column = StringColumn::with_capacity(values.len(), payload);
                for value in &values {
                    column.push_value(value.as_bytes());
                }
                black_box(column)
            });
        });
    }

    group.finish();
}

fn bench_count_null(c: &mut Criterion) {
    let mut group = c.benchmark_group("null_map_count");

    for size in ROW_COUNTS {
        let bitmap = NullBitmap::from_bools(&null_flags(size, 5));
        group.bench_with_input(BenchmarkId::new("count_null", size), &bitmap, |b, bitmap| {
            b.iter(|| black_box(bitmap.count_null()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_merge, bench_string_push, bench_count_null);
criterion_main!(benches);

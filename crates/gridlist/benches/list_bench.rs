use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use gridlist::{BoundedConfig, BoundedList, SimpleList, Table, TableConfig};

const SIZES: &[usize] = &[64, 1024, 16_384];

fn bounded_append_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("bounded_append");

    for &n in SIZES {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("add", n), &n, |b, &n| {
            b.iter(|| {
                let mut list =
                    BoundedList::new(BoundedConfig::new(0, n, |i| i as u64)).unwrap();
                for i in 0..n {
                    list.add(black_box(i as u64)).unwrap();
                }
                black_box(list.len());
            });
        });

        group.bench_with_input(BenchmarkId::new("add_range", n), &n, |b, &n| {
            let items: Vec<u64> = (0..n as u64).collect();
            b.iter(|| {
                let mut list =
                    BoundedList::new(BoundedConfig::new(0, n, |i| i as u64)).unwrap();
                list.add_range(black_box(items.clone())).unwrap();
                black_box(list.len());
            });
        });
    }

    group.finish();
}

fn event_dispatch_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_dispatch");

    for &subscribers in &[0usize, 1, 8, 64] {
        group.bench_with_input(
            BenchmarkId::new("set_with_subscribers", subscribers),
            &subscribers,
            |b, &subscribers| {
                let mut list =
                    BoundedList::with_items(BoundedConfig::new(0, 1024, |i| i as u64), vec![0; 256])
                        .unwrap();
                let subs: Vec<_> = (0..subscribers)
                    .map(|_| list.subscribe_changes(|change| {
                        black_box(change.action);
                    }))
                    .collect();
                let mut i = 0usize;
                b.iter(|| {
                    list.set(i % 256, black_box(i as u64)).unwrap();
                    i += 1;
                });
                drop(subs);
            },
        );
    }

    group.finish();
}

fn collapsed_policy_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("collapsed_policy");

    // Precise path: one element per op.
    group.bench_function("single_set", |b| {
        let mut list = SimpleList::with_items(|_| 0u64, vec![0; 1024]);
        let _sub = list.subscribe_changes(|change| {
            black_box(change.action);
        });
        let mut i = 0usize;
        b.iter(|| {
            list.set(i % 1024, black_box(i as u64)).unwrap();
            i += 1;
        });
    });

    // Collapsing path: batch writes that decay to a bare reset.
    group.bench_function("batch_set_range", |b| {
        let mut list = SimpleList::with_items(|_| 0u64, vec![0; 1024]);
        let _sub = list.subscribe_changes(|change| {
            black_box(change.action);
        });
        let batch: Vec<u64> = (0..64).collect();
        b.iter(|| {
            list.set_range(0, black_box(batch.clone())).unwrap();
        });
    });

    group.finish();
}

fn table_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("table");

    let make = |rows: usize, cols: usize| -> Table<SimpleList<u64>> {
        let values: Vec<Vec<u64>> = (0..rows)
            .map(|r| (0..cols).map(|c| (r * cols + c) as u64).collect())
            .collect();
        let config = TableConfig::new(0, 128, 0, 128, |list| list, |r, c| {
            (r * 31 + c) as u64
        });
        Table::with_values(config, values).unwrap()
    };

    group.bench_function("set_item_64x64", |b| {
        let mut table = make(64, 64);
        let _sub = table.subscribe_row_changes(|event| {
            black_box(event.row);
        });
        let mut i = 0usize;
        b.iter(|| {
            table.set_item(i % 64, (i * 7) % 64, black_box(i as u64)).unwrap();
            i += 1;
        });
    });

    group.bench_function("add_remove_column_64x64", |b| {
        let mut table = make(64, 63);
        let column: Vec<u64> = (0..64).collect();
        b.iter(|| {
            table.add_column(black_box(column.clone())).unwrap();
            table.remove_column(63).unwrap();
        });
    });

    group.bench_function("snapshot_64x64", |b| {
        let table = make(64, 64);
        b.iter(|| {
            black_box(table.to_two_dimensional_array(false));
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bounded_append_bench,
    event_dispatch_bench,
    collapsed_policy_bench,
    table_bench
);
criterion_main!(benches);

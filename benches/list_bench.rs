use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use infiniscroll::KeyedList;

#[derive(Debug, Clone)]
struct Row {
    id: u64,
    thread_end: bool,
}

fn rows(range: std::ops::Range<u64>) -> Vec<Row> {
    range
        .map(|id| Row {
            id,
            thread_end: id % 10 == 9,
        })
        .collect()
}

fn bench_merge(c: &mut Criterion) {
    let incoming = rows(500..1500);

    c.bench_function("merge 1000 into 1000 (half overlap)", |b| {
        b.iter_batched(
            || KeyedList::from(rows(0..1000)),
            |mut list| list.merge(incoming.clone(), |r| r.id),
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_after_group(c: &mut Criterion) {
    c.bench_function("insert_after_group in 1000", |b| {
        b.iter_batched(
            || KeyedList::from(rows(0..1000)),
            |mut list| {
                list.insert_after_group(
                    Row {
                        id: 5000,
                        thread_end: false,
                    },
                    &500,
                    |r| r.id,
                    |r| r.thread_end,
                )
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_update(c: &mut Criterion) {
    c.bench_function("update last of 1000", |b| {
        b.iter_batched(
            || KeyedList::from(rows(0..1000)),
            |mut list| list.update(&999, |r| r.id, |r| Row { thread_end: true, ..r }),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_merge, bench_insert_after_group, bench_update);
criterion_main!(benches);

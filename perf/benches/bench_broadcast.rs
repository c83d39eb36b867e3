use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use sluice_channel::BroadcastQueue;

fn bench_push_no_readers(c: &mut Criterion) {
    let queue = BroadcastQueue::<u64>::new();

    let mut group = c.benchmark_group("broadcast");
    group.throughput(Throughput::Elements(1));

    group.bench_function("push (no readers)", |b| {
        b.iter(|| queue.push(black_box(42)));
    });
}

fn bench_try_pop_data(c: &mut Criterion) {
    let queue = BroadcastQueue::<u64>::new();
    let mut view = queue.view();

    let mut group = c.benchmark_group("broadcast");
    group.throughput(Throughput::Elements(1));

    group.bench_function("try_pop (data)", |b| {
        b.iter_custom(|iters| {
            // Pre-fill
            for i in 0..iters {
                queue.push(i);
            }
            let start = std::time::Instant::now();
            for _ in 0..iters {
                black_box(view.try_pop().ok());
            }
            start.elapsed()
        });
    });
}

fn bench_try_pop_empty(c: &mut Criterion) {
    let queue = BroadcastQueue::<u64>::new();
    let mut view = queue.view();

    let mut group = c.benchmark_group("broadcast");
    group.throughput(Throughput::Elements(1));

    group.bench_function("try_pop (empty)", |b| {
        b.iter(|| black_box(view.try_pop().ok()));
    });
}

fn bench_round_trip(c: &mut Criterion) {
    let queue = BroadcastQueue::<u64>::new();
    let mut view = queue.view();

    let mut group = c.benchmark_group("broadcast");
    group.throughput(Throughput::Elements(1));

    group.bench_function("round_trip", |b| {
        b.iter(|| {
            queue.push(black_box(7));
            black_box(view.try_pop().ok());
        });
    });
}

fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadcast_fan_out");

    for &readers in &[1usize, 4, 16, 64] {
        let queue = BroadcastQueue::<u64>::new();
        let mut views: Vec<_> = (0..readers).map(|_| queue.view()).collect();

        group.throughput(Throughput::Elements(readers as u64));
        group.bench_with_input(BenchmarkId::from_parameter(readers), &readers, |b, _| {
            b.iter(|| {
                queue.push(black_box(7));
                for view in &mut views {
                    black_box(view.try_pop().ok());
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_push_no_readers,
    bench_try_pop_data,
    bench_try_pop_empty,
    bench_round_trip,
    bench_fan_out,
);
criterion_main!(benches);

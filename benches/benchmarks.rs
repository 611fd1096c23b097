use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use syncstore::runtime::Component;
use syncstore::{use_store, Store};

fn store_creation_benchmark(c: &mut Criterion) {
    c.bench_function("store_creation", |b| {
        b.iter(|| {
            let store: Store<i32> = Store::new(black_box(42));
            store
        });
    });
}

fn store_read_benchmark(c: &mut Criterion) {
    let store: Store<i32> = Store::new(42);

    c.bench_function("store_read", |b| {
        b.iter(|| {
            black_box(store.get_value());
        });
    });
}

fn store_update_benchmark(c: &mut Criterion) {
    #[derive(Clone)]
    struct State {
        counter: usize,
        name: String,
    }

    let store = Store::new(State {
        counter: 0,
        name: "test".to_string(),
    });

    c.bench_function("store_update", |b| {
        let mut i = 0;
        b.iter(|| {
            store.update(|state| {
                state.counter = black_box(i);
            });
            i += 1;
        });
        black_box(store.with(|state| state.name.len()));
    });
}

fn store_fanout_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_fanout");

    for listener_count in [1, 10, 100].iter() {
        let store = Store::new(0usize);

        for _ in 0..*listener_count {
            store.subscribe(|| {
                // Empty listener
            });
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(listener_count),
            listener_count,
            |b, _| {
                let mut i = 0;
                b.iter(|| {
                    store.set_value(black_box(i));
                    i += 1;
                });
            },
        );
    }
    group.finish();
}

fn component_flush_benchmark(c: &mut Criterion) {
    let store = Store::new(0usize);
    let component = Component::mount({
        let store = store.clone();
        move || use_store(&store).0
    });

    c.bench_function("component_flush", |b| {
        let mut i = 0;
        b.iter(|| {
            store.set_value(black_box(i));
            component.flush();
            i += 1;
        });
    });
}

criterion_group!(
    benches,
    store_creation_benchmark,
    store_read_benchmark,
    store_update_benchmark,
    store_fanout_benchmark,
    component_flush_benchmark,
);
criterion_main!(benches);

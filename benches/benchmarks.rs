use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use std::sync::Arc;

use statehouse::{Selector, Store, TypedAction};

#[derive(Clone)]
struct State {
    counter: usize,
    name: String,
}

fn reducer(state: Option<Arc<State>>, action: &TypedAction) -> Arc<State> {
    let state = state.unwrap_or_else(|| {
        Arc::new(State {
            counter: 0,
            name: "bench".to_string(),
        })
    });
    match action.kind.as_str() {
        "INC" => Arc::new(State {
            counter: state.counter + 1,
            ..(*state).clone()
        }),
        _ => state,
    }
}

fn store_creation_benchmark(c: &mut Criterion) {
    c.bench_function("store_creation", |b| {
        b.iter(|| black_box(Store::create(reducer).unwrap()));
    });
}

fn store_read_benchmark(c: &mut Criterion) {
    let store = Store::create(reducer).unwrap();

    c.bench_function("store_read", |b| {
        b.iter(|| {
            black_box(store.get_state());
        });
    });
}

fn dispatch_changed_benchmark(c: &mut Criterion) {
    let store = Store::create(reducer).unwrap();
    let action = TypedAction::new("INC");

    c.bench_function("dispatch_changed", |b| {
        b.iter(|| store.dispatch(black_box(action.clone())).unwrap());
    });
}

fn dispatch_unchanged_benchmark(c: &mut Criterion) {
    let store = Store::create(reducer).unwrap();
    store.subscribe(|| {});
    let action = TypedAction::new("UNKNOWN");

    c.bench_function("dispatch_unchanged", |b| {
        b.iter(|| store.dispatch(black_box(action.clone())).unwrap());
    });
}

fn dispatch_listeners_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_listeners");

    for listener_count in [1, 10, 100].iter() {
        let store = Store::create(reducer).unwrap();

        for _ in 0..*listener_count {
            store.subscribe(|| {
                // Empty listener
            });
        }

        let action = TypedAction::new("INC");
        group.bench_with_input(
            BenchmarkId::from_parameter(listener_count),
            listener_count,
            |b, _| {
                b.iter(|| store.dispatch(black_box(action.clone())).unwrap());
            },
        );
    }
    group.finish();
}

fn selector_benchmark(c: &mut Criterion) {
    let store = Store::create(reducer).unwrap();
    let name_len = Selector::new(|state: &State| state.name.len() + state.counter);

    c.bench_function("selector_cached", |b| {
        b.iter(|| black_box(store.select(&name_len)));
    });
}

criterion_group!(
    benches,
    store_creation_benchmark,
    store_read_benchmark,
    dispatch_changed_benchmark,
    dispatch_unchanged_benchmark,
    dispatch_listeners_benchmark,
    selector_benchmark,
);
criterion_main!(benches);

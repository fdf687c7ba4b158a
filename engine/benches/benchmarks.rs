//! Performance benchmarks for roster-engine

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use roster_engine::{
    create_actions, create_getters, create_state, Entity, EntityId, SortOptions, State,
    WrappedEntity,
};
use serde_json::json;

fn user(i: i64) -> Entity {
    Entity::from_json(json!({
        "id": i,
        "name": format!("User {}", i),
        "email": format!("user{}@example.com", i),
        "age": (i * 7) % 90,
    }))
    .unwrap()
}

fn populated(size: i64) -> State {
    let mut state = create_state();
    create_actions(&mut state).create_many((0..size).map(user));
    state
}

fn bench_actions(c: &mut Criterion) {
    let mut group = c.benchmark_group("actions");

    group.bench_function("create_one", |b| {
        let mut state = create_state();
        let mut id = 0i64;

        b.iter(|| {
            id += 1;
            create_actions(&mut state).create_one(black_box(user(id)));
        })
    });

    group.bench_function("update_field", |b| {
        let mut state = populated(1000);
        let target = EntityId::from(500);
        let mut age = 0i64;

        b.iter(|| {
            age += 1;
            create_actions(&mut state).update_field("age", black_box(age), &target);
        })
    });

    group.bench_function("delete_recreate", |b| {
        let mut state = populated(1000);
        let target = EntityId::from(500);

        b.iter(|| {
            let mut actions = create_actions(&mut state);
            actions.delete_one(black_box(&target));
            actions.create_one(user(500));
        })
    });

    group.finish();
}

fn bench_getters(c: &mut Criterion) {
    let mut group = c.benchmark_group("getters");

    group.bench_function("get_one", |b| {
        let state = populated(1000);
        let getters = create_getters(&state);
        let target = EntityId::from(500);

        b.iter(|| getters.get_one(black_box(&target)))
    });

    group.bench_function("get_all_array", |b| {
        let state = populated(1000);
        let getters = create_getters(&state);

        b.iter(|| getters.get_all_array())
    });

    group.bench_function("search", |b| {
        let state = populated(1000);
        let getters = create_getters(&state);

        b.iter(|| getters.search(black_box("user5")))
    });

    group.finish();
}

fn bench_where_sorted(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_where_array");

    for size in [10i64, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("filter_sort", size), size, |b, &size| {
            let state = populated(size);
            let getters = create_getters(&state);
            let adults = |e: &WrappedEntity| e["age"].as_i64().unwrap_or(0) >= 18;
            let options = SortOptions::by_field("age").descending();

            b.iter(|| getters.get_where_array(Some(&adults), black_box(&options)))
        });
    }

    group.finish();
}

fn bench_missing_ids(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_missing_ids");

    for size in [100i64, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("half_missing", size), size, |b, &size| {
            let state = populated(size);
            let getters = create_getters(&state);
            let requested: Vec<EntityId> = (size / 2..size + size / 2).map(EntityId::from).collect();

            b.iter(|| getters.get_missing_ids(black_box(&requested), false))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_actions,
    bench_getters,
    bench_where_sorted,
    bench_missing_ids
);
criterion_main!(benches);

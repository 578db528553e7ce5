use cdn_sim_core::{
    CachePolicy, Coordinate, Engine, Item, RawSimConfig, SimConfig, World,
};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

fn build_engine(num_nodes: usize, num_users: usize, requests_per_user: usize) -> (Engine, Vec<Vec<(cdn_sim_core::ItemTag, u64)>>) {
    let node_coords: Vec<Coordinate> = (0..num_nodes)
        .map(|i| Coordinate::new((i as f64) * 50.0, 500.0))
        .collect();
    let user_coords: Vec<Coordinate> = (0..num_users)
        .map(|i| Coordinate::new((i as f64) * 5.0, 0.0))
        .collect();
    let world = World::new(&node_coords, &user_coords, Coordinate::new(0.0, 2000.0), CachePolicy::Lru, 64).unwrap();

    let config = SimConfig::try_from(RawSimConfig {
        cache_policy: 0,
        cache_size: 64,
        max_concurrent_requests: 500,
        reroute_requests: true,
        reroute_threshold: None,
    })
    .unwrap();

    let mut engine = Engine::new(world, config);
    for i in 0..20 {
        engine.world.origin.publish(Item {
            tag: format!("item-{i}").into(),
            size: 1,
        });
    }

    let workloads: Vec<Vec<(cdn_sim_core::ItemTag, u64)>> = (0..num_users)
        .map(|u| {
            (0..requests_per_user)
                .map(|r| {
                    let item = format!("item-{}", (u + r) % 20);
                    let create_time = (r as u64) * 7;
                    (item.into(), create_time)
                })
                .collect()
        })
        .collect();

    (engine, workloads)
}

fn bench_full_run(c: &mut Criterion) {
    c.bench_function("engine_run_small", |b| {
        b.iter_batched(
            || build_engine(4, 50, 20),
            |(mut engine, workloads)| {
                engine.schedule_workloads(&workloads);
                engine.run();
                black_box(engine.simulator_time());
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_cache_insert_evict(c: &mut Criterion) {
    c.bench_function("cache_insert_evict_lru", |b| {
        b.iter_batched(
            || cdn_sim_core::Cache::new(CachePolicy::Lru, 128),
            |mut cache| {
                for i in 0..1000 {
                    cache.insert(Item {
                        tag: format!("key-{i}").into(),
                        size: 1,
                    });
                }
                black_box(cache.current_weight());
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_full_run, bench_cache_insert_evict);
criterion_main!(benches);

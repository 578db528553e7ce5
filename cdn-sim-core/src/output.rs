//! Aggregate statistics computed once the event queue has drained.

use serde::{Deserialize, Serialize};

use crate::engine::Engine;
use crate::topology::RequestOutcome;
use crate::types::{Coordinate, TimestampMs};

/// Human-readable summary of one completed (or still-pending) request,
/// suitable for direct JSON serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSummary {
    pub id: String,
    pub user: u32,
    pub node: u32,
    pub item_tag: String,
    pub create_time: TimestampMs,
    pub receive_time: Option<TimestampMs>,
    pub cache_hit: bool,
    pub found: bool,
    pub rerouted: bool,
}

/// Aggregate statistics for one run, mirroring the §6 output schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub requests: Vec<RequestSummary>,
    pub user_locations: Vec<Coordinate>,
    pub origin_location: Coordinate,
    pub node_locations: Vec<Coordinate>,
    pub cache_hit_percentage: f64,
    pub total_requests: u64,
    pub average_request_wait_time: f64,
    pub total_wait_time: u64,
    pub min_request_wait_time: Option<u64>,
    pub max_wait_time: u64,
    pub total_time_elapsed: TimestampMs,
    pub max_queue_length: u32,
}

/// Build the final report from a drained engine. Calling this before
/// `Engine::run` has emptied the queue still produces a value, but any
/// request without a `receive_time` is reported with `receive_time: None`.
pub fn summarize(engine: &Engine) -> SimulationOutput {
    let world = &engine.world;

    let mut requests: Vec<RequestSummary> = world
        .requests
        .iter()
        .map(|r| RequestSummary {
            id: r.id.clone(),
            user: r.user.0,
            node: r.node.0,
            item_tag: r.item_tag.to_string(),
            create_time: r.create_time,
            receive_time: r.receive_time,
            cache_hit: r.outcome == RequestOutcome::HitAtNode,
            found: r.fetched_item.is_some(),
            rerouted: r.rerouted,
        })
        .collect();
    requests.sort_by_key(|r| r.create_time);

    let wait_times: Vec<u64> = world
        .requests
        .iter()
        .filter_map(|r| r.receive_time.map(|t| t - r.create_time))
        .collect();

    let total_requests = world.requests.len() as u64;
    let total_wait_time: u64 = wait_times.iter().sum();
    let average_request_wait_time = if wait_times.is_empty() {
        0.0
    } else {
        total_wait_time as f64 / wait_times.len() as f64
    };
    let min_request_wait_time = wait_times.iter().min().copied();
    let max_wait_time = wait_times.iter().max().copied().unwrap_or(0);

    let hit_ratios: Vec<f64> = world.nodes.iter().map(|n| n.stats.hit_ratio()).collect();
    let cache_hit_percentage = if hit_ratios.is_empty() {
        0.0
    } else {
        (hit_ratios.iter().sum::<f64>() / hit_ratios.len() as f64) * 100.0
    };

    let max_queue_length = world.nodes.iter().map(|n| n.stats.max_queue_length).max().unwrap_or(0);

    SimulationOutput {
        requests,
        user_locations: world.users.iter().map(|u| u.coordinate).collect(),
        origin_location: world.origin.coordinate,
        node_locations: world.nodes.iter().map(|n| n.coordinate).collect(),
        cache_hit_percentage,
        total_requests,
        average_request_wait_time,
        total_wait_time,
        min_request_wait_time,
        max_wait_time,
        total_time_elapsed: engine.simulator_time(),
        max_queue_length,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CachePolicy;
    use crate::config::{RawSimConfig, SimConfig};
    use crate::topology::World;
    use crate::types::Item;

    fn engine_with_one_hit_and_one_miss() -> Engine {
        let world = World::new(
            &[Coordinate::new(0.0, 500.0)],
            &[Coordinate::new(0.0, 0.0)],
            Coordinate::new(0.0, 2000.0),
            CachePolicy::Lru,
            7,
        )
        .unwrap();
        let config = SimConfig::try_from(RawSimConfig {
            cache_policy: 0,
            cache_size: 7,
            max_concurrent_requests: 100,
            reroute_requests: false,
            reroute_threshold: None,
        })
        .unwrap();
        let mut engine = Engine::new(world, config);
        engine.world.origin.publish(Item {
            tag: "itemA".into(),
            size: 1,
        });
        engine.schedule_workloads(&[vec![("itemA".into(), 5), ("itemA".into(), 10_000)]]);
        engine.run();
        engine
    }

    #[test]
    fn summary_counts_total_requests_and_sorts_by_create_time() {
        let engine = engine_with_one_hit_and_one_miss();
        let out = summarize(&engine);
        assert_eq!(out.total_requests, 2);
        assert!(out.requests[0].create_time <= out.requests[1].create_time);
    }

    #[test]
    fn summary_reports_nonzero_cache_hit_percentage_after_a_hit() {
        let engine = engine_with_one_hit_and_one_miss();
        let out = summarize(&engine);
        assert!(out.cache_hit_percentage > 0.0);
    }

    #[test]
    fn summary_on_empty_workload_reports_zero_valued_statistics() {
        let world = World::new(
            &[Coordinate::new(0.0, 500.0)],
            &[],
            Coordinate::new(0.0, 2000.0),
            CachePolicy::Lru,
            7,
        )
        .unwrap();
        let config = SimConfig::try_from(RawSimConfig {
            cache_policy: 0,
            cache_size: 7,
            max_concurrent_requests: 100,
            reroute_requests: false,
            reroute_threshold: None,
        })
        .unwrap();
        let mut engine = Engine::new(world, config);
        engine.schedule_workloads(&[]);
        engine.run();
        let out = summarize(&engine);
        assert_eq!(out.total_requests, 0);
        assert_eq!(out.cache_hit_percentage, 0.0);
        assert_eq!(out.average_request_wait_time, 0.0);
        assert_eq!(out.min_request_wait_time, None);
    }
}

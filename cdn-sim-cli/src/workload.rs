//! Reference workload synthesizer.
//!
//! §6 describes this as an external collaborator the core engine is
//! agnostic to: "for each user, 100 sub-users, each with 20 requests ...
//! one item weighted far more heavily than others (popularity skew)." This
//! module is one concrete, seeded implementation of that description, kept
//! out of `cdn-sim-core` so the engine's input surface stays a validated
//! config plus an already-built topology.

use cdn_sim_core::{Coordinate, Item, ItemTag, TimestampMs, Weight};
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Distribution, Zipf};

/// Skew of the Zipf distribution driving item popularity. Higher values
/// concentrate requests more heavily on the lowest-ranked (most popular) item.
const POPULARITY_SKEW: f64 = 1.2;

/// One synthesized sub-user: its coordinate (identical to its parent user's)
/// and its 20-request workload.
pub struct SyntheticUser {
    pub coordinate: Coordinate,
    pub workload: Vec<(ItemTag, TimestampMs)>,
}

/// Synthesize sub-users and their workloads for every input user coordinate,
/// plus the item catalog every workload draws from.
///
/// Item population size is drawn once per top-level user, uniformly from
/// `[2 * cache_size, 5 * cache_size]` (§6); every item in that population has
/// weight 1, and access frequency follows a Zipf distribution so one item
/// dominates.
pub fn synthesize(
    rng: &mut StdRng,
    user_coordinates: &[Coordinate],
    cache_size: u32,
    sub_users_per_user: usize,
    requests_per_sub_user: usize,
    time_horizon_ms: TimestampMs,
) -> (Vec<SyntheticUser>, Vec<Item>) {
    let mut synthetic_users = Vec::with_capacity(user_coordinates.len() * sub_users_per_user);
    let mut catalog = Vec::new();
    let mut catalog_tags = std::collections::HashSet::new();

    for &coordinate in user_coordinates {
        let population_size = rng.gen_range((2 * cache_size)..=(5 * cache_size)).max(1) as u64;
        let zipf = Zipf::new(population_size, POPULARITY_SKEW)
            .expect("population_size is at least 1 by construction");

        for tag_idx in 0..population_size {
            let tag: ItemTag = format!("item-{tag_idx}").into();
            if catalog_tags.insert(tag.clone()) {
                catalog.push(Item { tag, size: 1 as Weight });
            }
        }

        for _ in 0..sub_users_per_user {
            let workload = (0..requests_per_sub_user)
                .map(|_| {
                    let rank = zipf.sample(rng).floor() as u64;
                    let item_idx = rank.saturating_sub(1).min(population_size - 1);
                    let tag: ItemTag = format!("item-{item_idx}").into();
                    let create_time = rng.gen_range(0..=time_horizon_ms);
                    (tag, create_time)
                })
                .collect();
            synthetic_users.push(SyntheticUser { coordinate, workload });
        }
    }

    (synthetic_users, catalog)
}

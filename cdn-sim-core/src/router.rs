//! Node selection: unconditional closest-node assignment, and congestion-aware
//! rerouting for nodes whose request queue has grown past a threshold.

use crate::topology::World;
use crate::types::{Coordinate, NodeId};

/// The node nearest `coordinate`, regardless of load. Used for initial
/// request assignment (see the §9 open-question resolution: the congestion
/// threshold applies only at reroute time, never at cold-start assignment).
pub fn closest_node(world: &World, coordinate: Coordinate) -> NodeId {
    world.nearest_node(coordinate)
}

/// The node nearest `coordinate` whose queue depth is strictly below
/// `threshold`, or `None` if every node is at or past it. Ties broken by
/// ascending `NodeId`.
pub fn closest_non_congested(world: &World, coordinate: Coordinate, threshold: u32) -> Option<NodeId> {
    world
        .nodes
        .iter()
        .filter(|n| (n.queue.len() as u32) < threshold)
        .min_by(|a, b| {
            let da = a.coordinate.distance(&coordinate);
            let db = b.coordinate.distance(&coordinate);
            da.total_cmp(&db).then_with(|| a.id.cmp(&b.id))
        })
        .map(|n| n.id)
}

//! Geometric and identifier primitives shared across the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Milliseconds on the simulator's monotonic logical clock.
pub type TimestampMs = u64;

/// A cache entry's contribution to its cache's capacity budget.
pub type Weight = u32;

/// A 2-D point in kilometers, after any external normalization/scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another coordinate, in kilometers.
    pub fn distance(&self, other: &Coordinate) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One-way propagation latency between two points, approximating two-thirds
/// the speed of light. Distances are in kilometers, the result in milliseconds.
pub fn one_way_latency_ms(a: Coordinate, b: Coordinate) -> TimestampMs {
    (a.distance(&b) / 200_000.0 * 1000.0).floor() as TimestampMs
}

/// Stable identifier for a catalog item. Items are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemTag(pub String);

impl From<String> for ItemTag {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ItemTag {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ItemTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog item. Owned canonically by the origin; caches hold clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub tag: ItemTag,
    pub size: Weight,
}

/// Stable index of a node within the topology, assigned in construction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable index of a user within the topology, assigned in construction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub u32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of a request within `World::requests`. Stable for the lifetime of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestIndex(pub usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric_and_zero_for_identical_points() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(3.0, 4.0);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(a.distance(&b), b.distance(&a));
        assert_eq!(a.distance(&a), 0.0);
    }

    #[test]
    fn latency_matches_two_thirds_speed_of_light_formula() {
        let origin = Coordinate::new(0.0, 0.0);
        let far = Coordinate::new(0.0, 500.0);
        // 500 km / 200_000 * 1000 = 2.5 -> floor = 2ms
        assert_eq!(one_way_latency_ms(origin, far), 2);
    }

    #[test]
    fn latency_floors_fractional_milliseconds() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 2000.0);
        // 2000 / 200_000 * 1000 = 10.0 exactly
        assert_eq!(one_way_latency_ms(a, b), 10);
        let c = Coordinate::new(0.0, 2001.0);
        // 2001 / 200_000 * 1000 = 10.005 -> floor 10
        assert_eq!(one_way_latency_ms(a, c), 10);
    }

    #[test]
    fn item_tag_display_round_trips_string() {
        let tag: ItemTag = "video-42".into();
        assert_eq!(tag.to_string(), "video-42");
    }
}

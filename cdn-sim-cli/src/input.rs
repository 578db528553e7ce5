//! JSON request envelope and coordinate normalization.
//!
//! This mirrors the §6 input schema: raw 0–100 coordinates plus the engine
//! configuration fields. Scaling and schema parsing live here, in the CLI
//! crate, not in `cdn-sim-core` — the core engine's contract starts at an
//! already-built `World` and a validated `SimConfig`.

use anyhow::{bail, Context, Result};
use cdn_sim_core::{CachePolicy, Coordinate, RawSimConfig};
use serde::Deserialize;

/// Raw coordinates are pre-normalized to 0–100 by the producer; the engine
/// operates in kilometers, so every coordinate is scaled by this factor.
const COORDINATE_SCALE: f64 = 400.0;

#[derive(Debug, Deserialize)]
pub struct SimRequest {
    pub coordinates: [f64; 2],
    #[serde(rename = "nodeCoordinates")]
    pub node_coordinates: Vec<[f64; 2]>,
    #[serde(rename = "userCoordinates")]
    pub user_coordinates: Vec<[f64; 2]>,
    #[serde(rename = "cachePolicy")]
    pub cache_policy: i64,
    #[serde(rename = "cacheSize")]
    pub cache_size: i64,
    #[serde(rename = "maxConcurrentRequests")]
    pub max_concurrent_requests: i64,
    #[serde(rename = "rerouteRequests")]
    pub reroute_requests: bool,
    #[serde(rename = "rerouteThreshold", default)]
    pub reroute_threshold: Option<i64>,
}

impl SimRequest {
    pub fn origin_coordinate(&self) -> Coordinate {
        scale(self.coordinates)
    }

    pub fn node_coordinates_km(&self) -> Vec<Coordinate> {
        self.node_coordinates.iter().map(|&c| scale(c)).collect()
    }

    pub fn user_coordinates_km(&self) -> Vec<Coordinate> {
        self.user_coordinates.iter().map(|&c| scale(c)).collect()
    }

    pub fn raw_config(&self) -> RawSimConfig {
        RawSimConfig {
            cache_policy: self.cache_policy,
            cache_size: self.cache_size,
            max_concurrent_requests: self.max_concurrent_requests,
            reroute_requests: self.reroute_requests,
            reroute_threshold: self.reroute_threshold,
        }
    }

    /// Cache policy tag, duplicated from `raw_config` for callers (workload
    /// synthesis) that need it before `SimConfig` validation runs.
    pub fn cache_policy_tag(&self) -> Result<CachePolicy> {
        match self.cache_policy {
            0 => Ok(CachePolicy::Lru),
            1 => Ok(CachePolicy::Fifo),
            2 => Ok(CachePolicy::Lfu),
            other => bail!("cachePolicy must be 0 (LRU), 1 (FIFO), or 2 (LFU), got {other}"),
        }
    }
}

fn scale(raw: [f64; 2]) -> Coordinate {
    Coordinate::new(raw[0] * COORDINATE_SCALE, raw[1] * COORDINATE_SCALE)
}

/// Parse a `SimRequest` from a JSON document read from `path`, or from stdin
/// when `path` is `None`.
pub fn read_request(path: Option<&std::path::Path>) -> Result<SimRequest> {
    let text = match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
        }
        None => {
            use std::io::Read;
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading simulation request from stdin")?;
            buf
        }
    };
    serde_json::from_str(&text).context("parsing simulation request JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_multiplies_by_four_hundred() {
        let c = scale([1.0, 2.5]);
        assert_eq!(c.x, 400.0);
        assert_eq!(c.y, 1000.0);
    }

    #[test]
    fn parses_minimal_request() {
        let json = r#"{
            "coordinates": [50.0, 50.0],
            "nodeCoordinates": [[10.0, 10.0]],
            "userCoordinates": [[0.0, 0.0]],
            "cachePolicy": 0,
            "cacheSize": 64,
            "maxConcurrentRequests": 100,
            "rerouteRequests": false
        }"#;
        let req: SimRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.node_coordinates.len(), 1);
        assert!(req.reroute_threshold.is_none());
    }

    #[test]
    fn unknown_cache_policy_tag_is_rejected_before_validation() {
        let json = r#"{
            "coordinates": [0.0, 0.0],
            "nodeCoordinates": [[0.0, 0.0]],
            "userCoordinates": [],
            "cachePolicy": 9,
            "cacheSize": 1,
            "maxConcurrentRequests": 1,
            "rerouteRequests": false
        }"#;
        let req: SimRequest = serde_json::from_str(json).unwrap();
        assert!(req.cache_policy_tag().is_err());
    }
}

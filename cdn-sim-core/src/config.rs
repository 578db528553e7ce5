//! Validated engine configuration.
//!
//! `SimConfig` is the engine's entire input surface beyond a pre-built
//! `World`: a single immutable value constructed once (see §9's "no
//! process-wide state" design note) and threaded through every handler
//! by reference.

use serde::{Deserialize, Serialize};

use crate::cache::CachePolicy;
use crate::error::{Error, Result};

/// Wire-shaped mirror of the JSON input fields relevant to engine
/// configuration (`cachePolicy`, `cacheSize`, `maxConcurrentRequests`,
/// `rerouteRequests`, and the optional `rerouteThreshold` extension).
/// Coordinates and the origin/node/user layout are not part of this type;
/// they are assembled into a `World` by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSimConfig {
    pub cache_policy: i64,
    pub cache_size: i64,
    pub max_concurrent_requests: i64,
    pub reroute_requests: bool,
    #[serde(default)]
    pub reroute_threshold: Option<i64>,
}

/// Validated, immutable configuration threaded through the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    pub cache_policy: CachePolicy,
    pub cache_size: u32,
    /// `floor(1000 / max_concurrent_requests)` milliseconds between services
    /// at a single node.
    pub service_gap_ms: u64,
    pub reroute_requests: bool,
    /// In-flight requests a node may carry before it is considered saturated.
    /// Defaults to `max_concurrent_requests` when the caller omits it.
    pub reroute_threshold: u32,
}

impl TryFrom<RawSimConfig> for SimConfig {
    type Error = Error;

    fn try_from(raw: RawSimConfig) -> Result<Self> {
        if raw.cache_size <= 0 {
            return Err(Error::NonPositiveCacheSize(raw.cache_size));
        }
        if raw.max_concurrent_requests <= 0 {
            return Err(Error::NonPositiveServiceRate(raw.max_concurrent_requests));
        }
        let cache_policy = match raw.cache_policy {
            0 => CachePolicy::Lru,
            1 => CachePolicy::Fifo,
            2 => CachePolicy::Lfu,
            other => return Err(Error::UnknownCachePolicy(other)),
        };
        let reroute_threshold = match raw.reroute_threshold {
            Some(t) if t <= 0 => return Err(Error::NonPositiveRerouteThreshold(t)),
            Some(t) => t as u32,
            None => raw.max_concurrent_requests as u32,
        };
        let service_gap_ms = 1000 / raw.max_concurrent_requests as u64;

        Ok(Self {
            cache_policy,
            cache_size: raw.cache_size as u32,
            service_gap_ms,
            reroute_requests: raw.reroute_requests,
            reroute_threshold,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawSimConfig {
        RawSimConfig {
            cache_policy: 0,
            cache_size: 10,
            max_concurrent_requests: 100,
            reroute_requests: false,
            reroute_threshold: None,
        }
    }

    #[test]
    fn service_gap_derives_from_max_concurrent_requests() {
        let cfg = SimConfig::try_from(raw()).unwrap();
        assert_eq!(cfg.service_gap_ms, 10);
    }

    #[test]
    fn reroute_threshold_defaults_to_max_concurrent_requests() {
        let cfg = SimConfig::try_from(raw()).unwrap();
        assert_eq!(cfg.reroute_threshold, 100);
    }

    #[test]
    fn explicit_reroute_threshold_overrides_default() {
        let mut r = raw();
        r.reroute_threshold = Some(40);
        let cfg = SimConfig::try_from(r).unwrap();
        assert_eq!(cfg.reroute_threshold, 40);
    }

    #[test]
    fn non_positive_cache_size_is_rejected() {
        let mut r = raw();
        r.cache_size = 0;
        assert_eq!(
            SimConfig::try_from(r).unwrap_err(),
            Error::NonPositiveCacheSize(0)
        );
    }

    #[test]
    fn non_positive_service_rate_is_rejected() {
        let mut r = raw();
        r.max_concurrent_requests = -1;
        assert_eq!(
            SimConfig::try_from(r).unwrap_err(),
            Error::NonPositiveServiceRate(-1)
        );
    }

    #[test]
    fn unknown_cache_policy_is_rejected() {
        let mut r = raw();
        r.cache_policy = 9;
        assert_eq!(SimConfig::try_from(r).unwrap_err(), Error::UnknownCachePolicy(9));
    }

    #[test]
    fn non_positive_reroute_threshold_is_rejected() {
        let mut r = raw();
        r.reroute_threshold = Some(0);
        assert_eq!(
            SimConfig::try_from(r).unwrap_err(),
            Error::NonPositiveRerouteThreshold(0)
        );
    }
}

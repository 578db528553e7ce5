//! Error taxonomy for configuration and topology validation.
//!
//! The engine itself never fails at run time: a missing origin item or an
//! empty workload are modeled as ordinary outcomes (see `Request::item` and
//! `SimulationOutput`), not as `Result::Err`. Every variant here is raised
//! before the event loop starts, while validating the caller's input.

use thiserror::Error;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("cacheSize must be a positive integer, got {0}")]
    NonPositiveCacheSize(i64),

    #[error("maxConcurrentRequests must be a positive integer, got {0}")]
    NonPositiveServiceRate(i64),

    #[error("cachePolicy must be 0 (LRU), 1 (FIFO), or 2 (LFU), got {0}")]
    UnknownCachePolicy(i64),

    #[error("rerouteThreshold must be a positive integer when present, got {0}")]
    NonPositiveRerouteThreshold(i64),

    #[error("topology must contain at least one node")]
    EmptyTopology,
}

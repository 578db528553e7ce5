#![forbid(unsafe_code)]

//! Discrete-event simulation engine for a content-delivery network.
//!
//! Given a topology of users, edge nodes, and one origin, plus per-user
//! workloads of item requests, this crate drives a single-threaded,
//! logical-clock event loop through the full request lifecycle — user to
//! node, node to origin on a miss, origin back to node, node back to user —
//! and reports per-request timing and per-node cache statistics.
//!
//! This crate owns the engine only. Coordinate scaling, workload synthesis,
//! and JSON request/response framing are reference concerns handled by the
//! companion CLI binary; this crate's contract is "a validated `SimConfig`
//! plus an already-built `World`."

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod output;
pub mod router;
pub mod topology;
pub mod types;

pub use cache::{Cache, CachePolicy};
pub use config::{RawSimConfig, SimConfig};
pub use engine::Engine;
pub use error::{Error, Result};
pub use output::{summarize, RequestSummary, SimulationOutput};
pub use topology::{Node, Origin, Request, RequestOutcome, User, World};
pub use types::{Coordinate, Item, ItemTag, NodeId, TimestampMs, UserId, Weight};

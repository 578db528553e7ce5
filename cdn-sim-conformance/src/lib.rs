#![forbid(unsafe_code)]

//! Conformance suite for the CDN simulation engine.
//!
//! This crate holds no runtime code of its own — it exists so the
//! property-based tests under `tests/` have their own crate boundary,
//! separate from the unit tests colocated with `cdn-sim-core`'s modules.

//! # ackpool-memory
//!
//! Memory management for the `ackpool` workspace.
//!
//! Provides a generational slot pool: records are rented by index, every rent
//! bumps the slot's version, and every access must present the version it was
//! handed. Pools are plain single-owner values; thread affinity is left to the
//! caller (the core crate keeps one pool per thread).
#![warn(missing_docs)]

pub mod pool;
pub mod stats;

pub use pool::{Recycle, SlotError, SlotPool, SlotToken};
pub use stats::PoolStats;

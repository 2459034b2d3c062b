//! Persistence for usage counters

pub mod stats;

pub use stats::{CounterStore, FileCounterStore, MemoryCounterStore};

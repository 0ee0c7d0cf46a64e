//! Distributed bitonic sorting engine.
//!
//! Sorts a sequence of integers partitioned row-wise across a power-of-two
//! group of workers, one row per worker. When every worker's call returns,
//! reading the rows in rank order yields one globally ascending sequence.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐ per step ┌──────────────────┐ chunks ┌───────────────┐
//! │    Stage      │─────────>│  Merge-Exchange  │───────>│    Chunked    │
//! │   Scheduler   │          │      Engine      │<───────│   Transport   │
//! └───────────────┘          └──────────────────┘        └───────────────┘
//!         │ per stage
//!         ▼
//! ┌───────────────┐
//! │  Elbow Merge  │  linear-time local re-ordering
//! └───────────────┘
//! ```
//!
//! The scheduler walks the log2(P) stages of the bitonic network. Each step
//! exchanges the full row with one hypercube partner in bounded-size chunks,
//! overlapping transfer with the elementwise compare-exchange; each stage ends
//! with the O(n) elbow rotation merge that restores monotonic order locally.

pub mod chunks;
pub mod elbow;
pub mod exchange;
pub mod local;
pub mod schedule;

pub use chunks::chunk_spans;
pub use elbow::elbow_merge;
pub use exchange::merge_exchange;
pub use local::{compare_exchange, sort_row, Direction};
pub use schedule::{bitonic_sort, SortOptions, DEFAULT_CHUNK_DIVISOR};

#![deny(unsafe_code)]
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args
)]

//! # rowsort - Distributed Bitonic Row Sorter
//!
//! Sorts a large sequence of integers partitioned row-wise across a
//! power-of-two group of cooperating workers, one row per worker. When the
//! collective sort returns, reading the rows in worker-rank order yields one
//! globally ascending sequence.
//!
//! ## Overview
//!
//! - **[`sort`]** - the bitonic engine: stage scheduler, chunked pairwise
//!   merge-exchange, and the linear-time elbow rotation merge
//! - **[`transport`]** - the abstract communication capability (tagged
//!   point-to-point messaging, barrier, reductions) plus a channel-backed
//!   in-process implementation
//! - **[`validate`]** - post-sort local and cross-worker order checks
//! - **[`rows`]** - row generation and rendering helpers
//! - **[`logging`]** - formatting helpers and operation timers
//!
//! ## Quick Start
//!
//! ```
//! use rowsort_lib::sort::{bitonic_sort, SortOptions};
//! use rowsort_lib::transport::{ThreadGroup, Transport};
//! use rowsort_lib::validate::validate_global_order;
//!
//! # fn main() -> rowsort_lib::errors::Result<()> {
//! let inputs = vec![vec![5, 1, 9, 3], vec![2, 8, 4, 7]];
//! let rows = ThreadGroup::run(2, |mut transport| {
//!     let mut row = inputs[transport.rank()].clone();
//!     bitonic_sort(&mut transport, &mut row, &SortOptions::default())?;
//!     let outcome = validate_global_order(&mut transport, &row)?;
//!     assert_ne!(outcome, Some(false));
//!     Ok(row)
//! })?;
//! assert_eq!(rows, vec![vec![1, 2, 3, 4], vec![5, 7, 8, 9]]);
//! # Ok(())
//! # }
//! ```
//!
//! The engine itself is generic over the [`transport::Transport`] trait; the
//! bundled [`transport::ThreadGroup`] runs the whole group in one process with
//! channel-backed messaging, which is what the CLI and the tests use.

pub mod errors;
pub mod logging;
pub mod rows;
pub mod sort;
pub mod transport;
pub mod validate;

pub use errors::{Result, RowsortError};
pub use sort::{bitonic_sort, Direction, SortOptions};
pub use transport::{ThreadGroup, Transport, Value};
pub use validate::validate_global_order;

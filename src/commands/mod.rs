//! CLI command implementations for rowsort.
//!
//! Each submodule implements one command:
//!
//! - [`sort`] - generate random rows, sort them collectively, and validate
//!   the global order

pub mod command;
pub mod sort;

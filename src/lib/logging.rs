//! Logging utilities for formatted output.
//!
//! Formatting helpers plus an [`OperationTimer`] for consistent operation
//! summaries across the CLI.

use std::time::{Duration, Instant};

/// Formats a count with thousands separators.
///
/// # Examples
///
/// ```
/// use rowsort_lib::logging::format_count;
///
/// assert_eq!(format_count(999), "999");
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
#[must_use]
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Formats a duration in human-readable form.
///
/// # Examples
///
/// ```
/// use rowsort_lib::logging::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_secs(45)), "45s");
/// assert_eq!(format_duration(Duration::from_secs(135)), "2m 15s");
/// assert_eq!(format_duration(Duration::from_millis(250)), "0.250s");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 1 {
        format!("{:.3}s", duration.as_secs_f64())
    } else if secs < 60 {
        format!("{secs}s")
    } else {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        if remaining_secs == 0 { format!("{mins}m") } else { format!("{mins}m {remaining_secs}s") }
    }
}

/// Operation timing and summary helper.
///
/// # Examples
///
/// ```no_run
/// use rowsort_lib::logging::OperationTimer;
///
/// let timer = OperationTimer::new("Sorting rows");
///
/// // ... do work ...
///
/// timer.log_completion(1 << 20); // Log with element count
/// ```
pub struct OperationTimer {
    operation: String,
    start_time: Instant,
}

impl OperationTimer {
    /// Creates a new operation timer and logs the start.
    #[must_use]
    pub fn new(operation: &str) -> Self {
        log::info!("{operation} ...");
        Self { operation: operation.to_string(), start_time: Instant::now() }
    }

    /// Logs the completion with the number of elements processed.
    pub fn log_completion(&self, elements: u64) {
        log::info!(
            "{} completed: {} elements in {}",
            self.operation,
            format_count(elements),
            format_duration(self.start_time.elapsed())
        );
    }
}

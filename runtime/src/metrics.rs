//! Metric names and descriptions for the Store.
//!
//! The Store records through the [`metrics`] facade. Nothing is exported
//! unless the application installs a recorder; without one every call is a
//! no-op.
//!
//! # Example
//!
//! ```rust
//! use unistate_runtime::metrics::{describe_metrics, DISPATCH_TOTAL};
//!
//! // Register descriptions once, after installing a recorder.
//! describe_metrics();
//! assert_eq!(DISPATCH_TOTAL, "store.dispatch.total");
//! ```

use metrics::{describe_counter, describe_gauge, describe_histogram, Unit};

// Re-export metrics macros for use in other modules
pub use metrics::{counter, gauge, histogram};

/// Committed transitions
pub const DISPATCH_TOTAL: &str = "store.dispatch.total";

/// Transitions the reducer refused (state left unchanged)
pub const DISPATCH_REJECTED: &str = "store.dispatch.rejected";

/// Actions deferred because a notification pass was in progress
pub const DISPATCH_QUEUED: &str = "store.dispatch.queued";

/// Listener invocations that panicked
pub const LISTENER_FAILURES: &str = "store.listener.failures";

/// Currently registered listeners
pub const LISTENERS_ACTIVE: &str = "store.listeners.active";

/// Time spent inside the reducer
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";

/// Register descriptions for every Store metric.
///
/// Call after installing a recorder so exporters can show help text.
pub fn describe_metrics() {
    describe_counter!(DISPATCH_TOTAL, "Total number of committed transitions");
    describe_counter!(
        DISPATCH_REJECTED,
        "Transitions rejected by the reducer; state was left unchanged"
    );
    describe_counter!(
        DISPATCH_QUEUED,
        "Actions dispatched during a notification pass and queued for later"
    );
    describe_counter!(LISTENER_FAILURES, "Listener invocations that panicked");
    describe_gauge!(LISTENERS_ACTIVE, "Number of registered listeners");
    describe_histogram!(
        REDUCER_DURATION,
        Unit::Seconds,
        "Time spent computing the next state"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_without_recorder_is_noop() {
        describe_metrics();
        counter!(DISPATCH_TOTAL).increment(1);
    }

    #[test]
    fn test_metric_names_share_prefix() {
        for name in [
            DISPATCH_TOTAL,
            DISPATCH_REJECTED,
            DISPATCH_QUEUED,
            LISTENER_FAILURES,
            LISTENERS_ACTIVE,
            REDUCER_DURATION,
        ] {
            assert!(name.starts_with("store."), "{name}");
        }
    }
}

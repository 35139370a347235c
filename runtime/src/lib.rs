//! # Unistate Runtime
//!
//! Runtime implementation for the unistate state container.
//!
//! This crate provides the [`Store`]: the single owner of a state value,
//! which applies a [`Reducer`](unistate_core::Reducer) synchronously on every
//! dispatch and then notifies subscribed listeners.
//!
//! ## Core Components
//!
//! - **Store**: Owns state, runs transitions, fans out notifications
//! - **Subscription**: Revocable registration of a listener
//! - **StoreConfig**: Queue bound and panic isolation settings
//!
//! ## Example
//!
//! ```
//! use unistate_core::{from_fn, Action};
//! use unistate_runtime::Store;
//!
//! struct Add(i64);
//!
//! impl Action for Add {
//!     fn kind(&self) -> &'static str {
//!         "ADD"
//!     }
//! }
//!
//! let store = Store::new(from_fn(0_i64, |count: &i64, add: &Add| Some(count + add.0)));
//!
//! let subscription = store.subscribe(|| {});
//! store.dispatch(Add(5))?;
//! assert_eq!(*store.state(), 5);
//!
//! subscription.unsubscribe();
//! # Ok::<(), unistate_runtime::StoreError>(())
//! ```

/// Metric names and descriptions
pub mod metrics;

/// The Store
pub mod store;

/// Listener registrations and unsubscribe handles
pub mod subscription;

/// Error types for the Store runtime
pub mod error {
    use crate::subscription::SubscriptionId;
    use thiserror::Error;
    use unistate_core::ReduceError;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// The reducer refused the dispatched action
        ///
        /// The state is unchanged and no listener was notified.
        #[error("Transition for action `{action}` failed: {source}")]
        Transition {
            /// Kind of the action that failed
            action: &'static str,
            /// Reducer error
            source: ReduceError,
        },

        /// A dispatch issued during a notification pass found the queue full
        ///
        /// The action was dropped without being reduced.
        #[error("Action queue is full ({capacity} pending)")]
        QueueFull {
            /// Configured queue bound
            capacity: usize,
        },

        /// The dispatched action was committed, but something after it failed
        ///
        /// Either listeners panicked during notification, or actions queued
        /// by listeners were rejected by the reducer.
        #[error(
            "State committed, but {} listener(s) and {} queued action(s) failed",
            .0.listener_failures.len(),
            .0.queued_failures.len()
        )]
        Notification(NotificationReport),
    }

    /// A listener that panicked while being notified
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ListenerFailure {
        /// Registration that failed
        pub subscription: SubscriptionId,
        /// Panic payload, if it was a string
        pub message: String,
    }

    /// An action queued during a notification pass that the reducer rejected
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct QueuedFailure {
        /// Kind of the rejected action
        pub action: &'static str,
        /// Reducer error
        pub source: ReduceError,
    }

    /// Everything that went wrong after a dispatch committed
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct NotificationReport {
        /// Listener panics, in the order they happened
        pub listener_failures: Vec<ListenerFailure>,
        /// Rejected queued actions, in queue order
        pub queued_failures: Vec<QueuedFailure>,
    }

    impl NotificationReport {
        /// Whether nothing failed
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.listener_failures.is_empty() && self.queued_failures.is_empty()
        }

        /// `Ok(())` when empty, otherwise [`StoreError::Notification`]
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::Notification`] carrying `self` if any failure
        /// was recorded.
        pub fn into_result(self) -> Result<(), StoreError> {
            if self.is_empty() {
                Ok(())
            } else {
                Err(StoreError::Notification(self))
            }
        }
    }
}

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use unistate_runtime::StoreConfig;
///
/// let config = StoreConfig::default()
///     .with_max_queued_actions(16)
///     .with_catch_listener_panics(false);
///
/// assert_eq!(config.max_queued_actions, 16);
/// assert!(config.catch_reducer_panics);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Maximum number of actions queued by listeners during one dispatch
    pub max_queued_actions: usize,
    /// Isolate listener panics and report them instead of unwinding
    ///
    /// When `false`, a listener panic aborts the dispatch and discards the
    /// actions other listeners queued during it.
    pub catch_listener_panics: bool,
    /// Report reducer panics as [`ReduceError::Panicked`](unistate_core::ReduceError::Panicked)
    ///
    /// When `false`, a reducer panic aborts the dispatch and discards any
    /// queued actions.
    pub catch_reducer_panics: bool,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(
        max_queued_actions: usize,
        catch_listener_panics: bool,
        catch_reducer_panics: bool,
    ) -> Self {
        Self {
            max_queued_actions,
            catch_listener_panics,
            catch_reducer_panics,
        }
    }

    /// Set the queue bound for re-entrant dispatches
    #[must_use]
    pub const fn with_max_queued_actions(mut self, max: usize) -> Self {
        self.max_queued_actions = max;
        self
    }

    /// Choose whether listener panics are isolated
    ///
    /// Turning isolation off means a panicking listener drops every action
    /// queued during that dispatch, although each nested `dispatch` call
    /// already returned `Ok(())`.
    #[must_use]
    pub const fn with_catch_listener_panics(mut self, catch: bool) -> Self {
        self.catch_listener_panics = catch;
        self
    }

    /// Choose whether reducer panics become transition errors
    ///
    /// Turning this off means a panicking reducer drops every action still
    /// queued in that dispatch.
    #[must_use]
    pub const fn with_catch_reducer_panics(mut self, catch: bool) -> Self {
        self.catch_reducer_panics = catch;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_queued_actions: 1024,
            catch_listener_panics: true,
            catch_reducer_panics: true,
        }
    }
}

pub use error::{ListenerFailure, NotificationReport, QueuedFailure, StoreError};
pub use store::Store;
pub use subscription::{Listener, Subscription, SubscriptionId};

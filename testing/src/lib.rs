//! # Unistate Testing
//!
//! Testing utilities and helpers for the unistate state container.
//!
//! This crate provides:
//! - Listener mocks that count or record notifications
//! - A Given-When-Then builder for reducers
//! - Property-based testing utilities
//! - Tracing setup for tests
//!
//! ## Example
//!
//! ```ignore
//! use unistate_testing::CallCounter;
//! use unistate_runtime::Store;
//!
//! #[test]
//! fn test_listener_called_once() {
//!     let store = Store::new(AppReducer);
//!     let counter = CallCounter::new();
//!     let _subscription = store.subscribe(counter.listener());
//!
//!     store.dispatch(AppAction::Toggle).unwrap();
//!
//!     assert_eq!(counter.count(), 1);
//! }
//! ```


/// Mock listeners
///
/// Listeners that observe a store on behalf of a test.
pub mod mocks {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex, Weak};
    use unistate_core::{Action, Reducer};
    use unistate_runtime::{Store, Subscription};

    /// Counts how many times its listener was called
    ///
    /// # Example
    ///
    /// ```
    /// use unistate_testing::mocks::CallCounter;
    ///
    /// let counter = CallCounter::new();
    /// let listener = counter.listener();
    /// listener();
    /// listener();
    /// assert_eq!(counter.count(), 2);
    /// ```
    #[derive(Debug, Clone, Default)]
    pub struct CallCounter {
        calls: Arc<AtomicUsize>,
    }

    impl CallCounter {
        /// Create a counter at zero
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// A listener closure that increments this counter
        #[must_use]
        pub fn listener(&self) -> impl Fn() + Send + Sync + 'static {
            let calls = Arc::clone(&self.calls);
            move || {
                calls.fetch_add(1, Ordering::SeqCst);
            }
        }

        /// Calls so far
        #[must_use]
        pub fn count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    /// Records a copy of the store state at every notification
    ///
    /// The recorder holds the store weakly, so attaching it does not keep
    /// the store alive.
    pub struct StateRecorder<S> {
        seen: Arc<Mutex<Vec<S>>>,
    }

    impl<S> StateRecorder<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        /// Subscribe a recorder to `store`
        pub fn attach<R>(store: &Arc<Store<R>>) -> (Self, Subscription)
        where
            R: Reducer<State = S> + Send + Sync + 'static,
            R::Action: Action + Send + 'static,
        {
            let seen = Arc::new(Mutex::new(Vec::new()));
            let sink = Arc::clone(&seen);
            let weak: Weak<Store<R>> = Arc::downgrade(store);

            let subscription = store.subscribe(move || {
                if let Some(store) = weak.upgrade() {
                    let state = store.state();
                    if let Ok(mut seen) = sink.lock() {
                        seen.push(S::clone(&state));
                    }
                }
            });

            (Self { seen }, subscription)
        }

        /// States recorded so far, oldest first
        #[must_use]
        pub fn states(&self) -> Vec<S> {
            self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
        }

        /// Number of notifications recorded
        #[must_use]
        pub fn len(&self) -> usize {
            self.seen.lock().map(|seen| seen.len()).unwrap_or_default()
        }

        /// Whether nothing has been recorded yet
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }
}

/// Property-based testing utilities
///
/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::collection::vec;
    use proptest::strategy::Strategy;
    use std::fmt::Debug;
    use unistate_core::{Action, ReduceError, Reducer, replay};
    use unistate_runtime::{Store, StoreError};

    /// Sequences of up to `max_len` actions drawn from `action`
    pub fn action_sequence<S>(action: S, max_len: usize) -> impl Strategy<Value = Vec<S::Value>>
    where
        S: Strategy,
    {
        vec(action, 0..=max_len)
    }

    /// Dispatch `actions` into a fresh store and compare with [`replay`]
    ///
    /// Rejected actions are skipped on both sides, since a rejected dispatch
    /// commits nothing. Returns the store's final state.
    ///
    /// # Errors
    ///
    /// Returns a description of the first divergence, suitable for
    /// `prop_assert!` style reporting.
    pub fn check_replay<R, F>(make_reducer: F, actions: Vec<R::Action>) -> Result<R::State, String>
    where
        F: Fn() -> R,
        R: Reducer,
        R::State: Clone + PartialEq + Debug + Send + Sync + 'static,
        R::Action: Action + Clone + Send + 'static,
    {
        let store = Store::new(make_reducer());
        let model = make_reducer();
        let mut accepted = Vec::with_capacity(actions.len());

        for action in actions {
            match store.dispatch(action.clone()) {
                Ok(()) => accepted.push(action),
                Err(StoreError::Transition { .. }) => {},
                Err(other) => return Err(format!("unexpected store error: {other}")),
            }
        }

        let expected = replay(&model, None, &accepted).map_err(|error: ReduceError| {
            format!("replay rejected an action the store accepted: {error}")
        })?;
        let actual = R::State::clone(&store.state());

        if actual == expected {
            Ok(actual)
        } else {
            Err(format!("store state {actual:?} != replayed state {expected:?}"))
        }
    }
}

/// Install a test tracing subscriber honoring `RUST_LOG`
///
/// Safe to call from many tests; only the first call installs anything.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{CallCounter, StateRecorder};
pub use properties::{action_sequence, check_replay};
pub use reducer_test::ReducerTest;

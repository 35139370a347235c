//! # Unistate Core
//!
//! Core traits and types for the unistate state container.
//!
//! This crate provides the fundamental abstractions for unidirectional state
//! management: actions describe intent, a pure reducer computes the next
//! state, and a store (in `unistate-runtime`) owns the result.
//!
//! ## Core Concepts
//!
//! - **State**: Immutable application state, replaced wholesale on every transition
//! - **Action**: Tagged description of an intended state change
//! - **Reducer**: Pure function `(State, Action) → State`
//!
//! ## Architecture Principles
//!
//! - Unidirectional Data Flow
//! - Pure, deterministic transitions (no hidden I/O, no in-place mutation)
//! - Errors as values: a rejected transition never partially applies
//!
//! ## Example
//!
//! ```
//! use unistate_core::{Action, ReduceError, Reducer};
//!
//! #[derive(Clone, Debug, PartialEq, Eq)]
//! struct CounterState {
//!     count: i64,
//! }
//!
//! enum CounterAction {
//!     Increment,
//!     Reset,
//! }
//!
//! impl Action for CounterAction {
//!     fn kind(&self) -> &'static str {
//!         match self {
//!             Self::Increment => "INCREMENT",
//!             Self::Reset => "RESET",
//!         }
//!     }
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!
//!     fn initial_state(&self) -> CounterState {
//!         CounterState { count: 0 }
//!     }
//!
//!     fn reduce(
//!         &self,
//!         state: &CounterState,
//!         action: &CounterAction,
//!     ) -> Result<CounterState, ReduceError> {
//!         Ok(match action {
//!             CounterAction::Increment => CounterState { count: state.count + 1 },
//!             CounterAction::Reset => CounterState { count: 0 },
//!         })
//!     }
//! }
//!
//! let next = CounterReducer.reduce_from(None, &CounterAction::Increment);
//! assert_eq!(next, Ok(CounterState { count: 1 }));
//! ```

/// Closure-backed reducers
pub mod fn_reducer;

/// Folding a reducer over a sequence of actions
pub mod replay;

/// Action module - Tagged inputs to a reducer
///
/// Actions are plain values. In Rust they are usually enums, which makes
/// discriminator collisions a compile error instead of a runtime hazard.
pub mod action {
    /// Common behavior for actions
    ///
    /// The only requirement is a stable discriminator, used for logging and
    /// metrics labels. Two different variants must never report the same kind.
    ///
    /// # Example
    ///
    /// ```
    /// use unistate_core::Action;
    ///
    /// enum LightAction {
    ///     Toggle,
    /// }
    ///
    /// impl Action for LightAction {
    ///     fn kind(&self) -> &'static str {
    ///         "TOGGLE"
    ///     }
    /// }
    ///
    /// assert_eq!(LightAction::Toggle.kind(), "TOGGLE");
    /// ```
    pub trait Action {
        /// The discriminator of this action
        fn kind(&self) -> &'static str;
    }
}

/// Error module - Failures a transition can report
pub mod error {
    use thiserror::Error;

    /// Errors a reducer can return instead of a next state
    ///
    /// A reducer returning any of these leaves the store's state untouched.
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum ReduceError {
        /// The reducer refused the action
        #[error("Transition rejected: {reason}")]
        Rejected {
            /// Human readable reason
            reason: String,
        },

        /// The reducer produced no next state
        ///
        /// Returned by closure reducers whose function yields `None`.
        #[error("Transition produced no state")]
        NoState,

        /// The reducer panicked while computing the next state
        #[error("Transition panicked: {message}")]
        Panicked {
            /// Panic payload, if it was a string
            message: String,
        },
    }

    impl ReduceError {
        /// Build a [`ReduceError::Rejected`] from any displayable reason
        #[must_use]
        pub fn rejected(reason: impl Into<String>) -> Self {
            Self::Rejected {
                reason: reason.into(),
            }
        }
    }
}

/// Reducer module - The core trait for state transitions
///
/// Reducers are pure functions: `(State, Action) → State`.
///
/// They never mutate their input, never read anything outside their
/// parameters, and always return an equal result for equal inputs.
pub mod reducer {
    use super::error::ReduceError;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer produces
    /// - `Action`: The action type this reducer processes
    ///
    /// # Initial State
    ///
    /// The reducer owns its default. [`Reducer::reduce_from`] substitutes
    /// [`Reducer::initial_state`] when no prior state exists, which is how a
    /// store bootstraps itself when no explicit initial state is given.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The value used when there is no prior state
        fn initial_state(&self) -> Self::State;

        /// Compute the next state
        ///
        /// Unchanged fields may be shared with `state`, but `state` itself
        /// must be left as it was.
        ///
        /// # Errors
        ///
        /// Returns [`ReduceError`] when the action cannot be applied. The
        /// caller must then keep `state` as the current value.
        fn reduce(
            &self,
            state: &Self::State,
            action: &Self::Action,
        ) -> Result<Self::State, ReduceError>;

        /// Compute the next state, substituting the initial state when absent
        ///
        /// # Errors
        ///
        /// Propagates any [`ReduceError`] from [`Reducer::reduce`].
        fn reduce_from(
            &self,
            state: Option<&Self::State>,
            action: &Self::Action,
        ) -> Result<Self::State, ReduceError> {
            match state {
                Some(state) => self.reduce(state, action),
                None => self.reduce(&self.initial_state(), action),
            }
        }
    }
}

// Re-export commonly used types
pub use action::Action;
pub use error::ReduceError;
pub use fn_reducer::{FnReducer, from_fn};
pub use reducer::Reducer;
pub use replay::replay;

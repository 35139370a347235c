//! Closure-backed reducers
//!
//! [`FnReducer`] turns a plain function into a [`Reducer`], for small stores
//! and tests where declaring a reducer type is more ceremony than it is worth.
//!
//! The function returns `Option<State>`: `None` means "no next state" and is
//! reported as [`ReduceError::NoState`], so a store never commits a missing
//! value.
//!
//! # Example
//!
//! ```
//! use unistate_core::{from_fn, ReduceError, Reducer};
//!
//! let reducer = from_fn(0_i64, |count: &i64, delta: &i64| count.checked_add(*delta));
//!
//! assert_eq!(reducer.reduce(&1, &2), Ok(3));
//! assert_eq!(reducer.reduce(&i64::MAX, &1), Err(ReduceError::NoState));
//! ```

use crate::{error::ReduceError, reducer::Reducer};
use std::fmt;
use std::marker::PhantomData;

/// A [`Reducer`] backed by a function and a fixed initial state
pub struct FnReducer<S, A, F> {
    initial: S,
    transition: F,
    _action: PhantomData<fn(&A)>,
}

impl<S, A, F> FnReducer<S, A, F>
where
    F: Fn(&S, &A) -> Option<S>,
{
    /// Create a reducer from an initial state and a transition function
    #[must_use]
    pub const fn new(initial: S, transition: F) -> Self {
        Self {
            initial,
            transition,
            _action: PhantomData,
        }
    }
}

impl<S, A, F> Reducer for FnReducer<S, A, F>
where
    S: Clone,
    F: Fn(&S, &A) -> Option<S>,
{
    type State = S;
    type Action = A;

    fn initial_state(&self) -> S {
        self.initial.clone()
    }

    fn reduce(&self, state: &S, action: &A) -> Result<S, ReduceError> {
        (self.transition)(state, action).ok_or(ReduceError::NoState)
    }
}

impl<S: fmt::Debug, A, F> fmt::Debug for FnReducer<S, A, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnReducer")
            .field("initial", &self.initial)
            .finish_non_exhaustive()
    }
}

/// Shorthand for [`FnReducer::new`]
#[must_use]
pub const fn from_fn<S, A, F>(initial: S, transition: F) -> FnReducer<S, A, F>
where
    F: Fn(&S, &A) -> Option<S>,
{
    FnReducer::new(initial, transition)
}

//! # Toggle Counter
//!
//! A toggle and a counter driven by a unistate [`Store`](unistate_runtime::Store).
//!
//! This example showcases:
//! - Pure reducer producing a fresh state per transition
//! - Action constructors as the only way the UI builds actions
//! - A render listener re-reading state after every commit
//!
//! ## Architecture
//!
//! The application state is a flat record:
//! - `toggle`: whether the toggle element is active
//! - `counter`: the number shown by the counter element
//!
//! The UI layer (here: a terminal loop in `main.rs`) never touches state
//! directly. It subscribes a render function once, then dispatches actions
//! built by [`toggle`], [`increase`], [`decrease`] and [`decrease_by`].
//!
//! ## Example
//!
//! ```
//! use toggle_counter::{decrease, increase, toggle, AppReducer, AppState};
//! use unistate_runtime::Store;
//!
//! let store = Store::new(AppReducer);
//! store.dispatch(toggle())?;
//! store.dispatch(increase(3))?;
//! store.dispatch(decrease())?;
//!
//! assert_eq!(*store.state(), AppState { toggle: true, counter: 2 });
//! # Ok::<(), unistate_runtime::StoreError>(())
//! ```

use serde::{Deserialize, Serialize};
use unistate_core::{Action, ReduceError, Reducer};

pub mod command;
pub mod config;
pub mod view;

/// Application state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    /// Whether the toggle is active
    pub toggle: bool,
    /// Current counter value
    pub counter: i64,
}

/// Application actions
///
/// Serialized as `{"kind": "...", ...payload}`. An unknown `kind`
/// deserializes to [`AppAction::Noop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppAction {
    /// Flip the toggle
    Toggle,
    /// Add `difference` to the counter
    Increase {
        /// Amount to add
        difference: i64,
    },
    /// Subtract `difference` from the counter
    Decrease {
        /// Amount to subtract (1 when omitted)
        #[serde(default = "default_difference")]
        difference: i64,
    },
    /// Leaves the state as it is
    #[serde(other)]
    Noop,
}

const fn default_difference() -> i64 {
    1
}

impl Action for AppAction {
    fn kind(&self) -> &'static str {
        match self {
            Self::Toggle => "TOGGLE",
            Self::Increase { .. } => "INCREASE",
            Self::Decrease { .. } => "DECREASE",
            Self::Noop => "NOOP",
        }
    }
}

/// Build a [`AppAction::Toggle`]
#[must_use]
pub const fn toggle() -> AppAction {
    AppAction::Toggle
}

/// Build a [`AppAction::Increase`] by `difference`
#[must_use]
pub const fn increase(difference: i64) -> AppAction {
    AppAction::Increase { difference }
}

/// Build a [`AppAction::Decrease`] by one
#[must_use]
pub const fn decrease() -> AppAction {
    decrease_by(default_difference())
}

/// Build a [`AppAction::Decrease`] by `difference`
#[must_use]
pub const fn decrease_by(difference: i64) -> AppAction {
    AppAction::Decrease { difference }
}

/// Application reducer
///
/// Starts from `{ toggle: false, counter: 0 }`. A counter change that would
/// overflow `i64` is rejected, leaving the state untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppReducer;

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;

    fn initial_state(&self) -> AppState {
        AppState::default()
    }

    fn reduce(&self, state: &AppState, action: &AppAction) -> Result<AppState, ReduceError> {
        match *action {
            AppAction::Toggle => Ok(AppState {
                toggle: !state.toggle,
                ..*state
            }),
            AppAction::Increase { difference } => state
                .counter
                .checked_add(difference)
                .map(|counter| AppState { counter, ..*state })
                .ok_or_else(|| ReduceError::rejected("counter overflow")),
            AppAction::Decrease { difference } => state
                .counter
                .checked_sub(difference)
                .map(|counter| AppState { counter, ..*state })
                .ok_or_else(|| ReduceError::rejected("counter underflow")),
            AppAction::Noop => Ok(*state),
        }
    }
}

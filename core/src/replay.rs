//! Folding a reducer over a sequence of actions
//!
//! A store's current state is, by construction, the left fold of its reducer
//! over every committed action. [`replay`] computes that fold directly, which
//! makes it the reference model for store tests.

use crate::{error::ReduceError, reducer::Reducer};
use std::borrow::Borrow;

/// Fold `reducer` over `actions`, starting from `initial`
///
/// When `initial` is `None` the fold starts from [`Reducer::initial_state`].
/// An empty sequence yields the starting state itself.
///
/// # Errors
///
/// Stops at the first action the reducer rejects and returns its error.
///
/// # Example
///
/// ```
/// use unistate_core::{from_fn, replay};
///
/// let sum = from_fn(0_i32, |s: &i32, a: &i32| Some(s + a));
/// assert_eq!(replay(&sum, None, [1, 2, 3]), Ok(6));
/// assert_eq!(replay(&sum, Some(10), Vec::<i32>::new()), Ok(10));
/// ```
pub fn replay<R, I>(
    reducer: &R,
    initial: Option<R::State>,
    actions: I,
) -> Result<R::State, ReduceError>
where
    R: Reducer,
    I: IntoIterator,
    I::Item: Borrow<R::Action>,
{
    let start = initial.unwrap_or_else(|| reducer.initial_state());
    actions
        .into_iter()
        .try_fold(start, |state, action| reducer.reduce(&state, action.borrow()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::from_fn;
    use proptest::prelude::*;

    fn checked_sum() -> impl Reducer<State = i64, Action = i64> {
        from_fn(0_i64, |s: &i64, a: &i64| s.checked_add(*a))
    }

    #[test]
    fn test_replay_stops_at_first_error() {
        let reducer = checked_sum();
        let result = replay(&reducer, Some(i64::MAX - 1), [1, 1, -5]);
        assert_eq!(result, Err(ReduceError::NoState));
    }

    #[test]
    fn test_replay_accepts_borrowed_actions() {
        let reducer = checked_sum();
        let actions = vec![4, 5];
        assert_eq!(replay(&reducer, None, &actions), Ok(9));
        assert_eq!(actions.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_replay_of_concatenation_is_sequential(
            first in proptest::collection::vec(-1000_i64..1000, 0..20),
            second in proptest::collection::vec(-1000_i64..1000, 0..20),
        ) {
            let reducer = checked_sum();
            let midway = replay(&reducer, None, &first);
            prop_assert!(midway.is_ok());
            let midway = midway.unwrap_or_default();

            let whole: Vec<i64> = first.iter().chain(second.iter()).copied().collect();
            prop_assert_eq!(
                replay(&reducer, None, &whole),
                replay(&reducer, Some(midway), &second)
            );
        }
    }
}

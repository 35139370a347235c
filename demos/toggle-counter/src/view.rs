//! What the toggle and counter elements display

use crate::AppState;
use std::fmt;

/// CSS class of the toggle element while active
pub const ACTIVE_CLASS: &str = "active";

/// What the two UI elements show for a given state
///
/// ```
/// use toggle_counter::{view::View, AppState};
///
/// let view = View::of(&AppState { toggle: true, counter: 2 });
/// assert_eq!(view.toggle_class, "active");
/// assert_eq!(view.counter_text, "2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Class list of the toggle element, empty while inactive
    pub toggle_class: &'static str,
    /// Text content of the counter element
    pub counter_text: String,
}

impl View {
    /// Derive the view from state
    #[must_use]
    pub fn of(state: &AppState) -> Self {
        Self {
            toggle_class: if state.toggle { ACTIVE_CLASS } else { "" },
            counter_text: state.counter.to_string(),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.toggle_class.is_empty() { "[ ]" } else { "[x]" };
        write!(
            f,
            "toggle {mark} class=\"{}\" | counter {}",
            self.toggle_class, self.counter_text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_view() {
        let view = View::of(&AppState::default());
        assert_eq!(view.toggle_class, "");
        assert_eq!(view.counter_text, "0");
    }

    #[test]
    fn test_active_view() {
        let view = View::of(&AppState { toggle: true, counter: -7 });
        assert_eq!(view.toggle_class, ACTIVE_CLASS);
        assert_eq!(view.counter_text, "-7");
    }

    #[test]
    fn test_display() {
        let view = View::of(&AppState { toggle: true, counter: 3 });
        assert_eq!(view.to_string(), "toggle [x] class=\"active\" | counter 3");
        let view = View::of(&AppState::default());
        assert_eq!(view.to_string(), "toggle [ ] class=\"\" | counter 0");
    }
}

//! Terminal input, one command per line.
//!
//! Accepted forms:
//!
//! | input | command |
//! |---|---|
//! | `toggle`, `t` | dispatch `TOGGLE` |
//! | `+`, `+ N`, `increase [N]` | dispatch `INCREASE` (configured step when `N` is omitted) |
//! | `-`, `- N`, `decrease [N]` | dispatch `DECREASE` (1 when `N` is omitted) |
//! | `{"kind": ...}` | dispatch the JSON action as is |
//! | `state`, `s` | print the current state |
//! | `quit`, `q`, `exit` | stop |
//!
//! Blank lines and lines starting with `#` are ignored.

use crate::{AppAction, decrease, decrease_by, increase, toggle};
use thiserror::Error;

/// A parsed line of input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Dispatch an action
    Dispatch(AppAction),
    /// Print the current state
    Show,
    /// Stop reading input
    Quit,
}

/// Errors produced while parsing a line
#[derive(Error, Debug)]
pub enum CommandError {
    /// The first word is not a known command
    #[error("Unknown command `{0}` (try: toggle, + N, - N, state, quit)")]
    Unknown(String),

    /// The amount is not an integer
    #[error("Invalid amount `{0}`: expected an integer")]
    InvalidAmount(String),

    /// The line looked like JSON but is not a valid action
    #[error("Invalid JSON action: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse one line of input
///
/// Returns `Ok(None)` for blank lines and comments.
///
/// # Errors
///
/// Returns [`CommandError`] when the line is not a recognizable command.
///
/// # Example
///
/// ```
/// use toggle_counter::command::{parse_line, Command};
/// use toggle_counter::increase;
///
/// let command = parse_line("+ 3", 1).ok().flatten();
/// assert_eq!(command, Some(Command::Dispatch(increase(3))));
/// ```
pub fn parse_line(line: &str, step: i64) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    if line.starts_with('{') {
        let action: AppAction = serde_json::from_str(line)?;
        return Ok(Some(Command::Dispatch(action)));
    }

    let (word, rest) = split_word(line);
    let amount = parse_amount(rest)?;

    let command = match word.to_ascii_lowercase().as_str() {
        "toggle" | "t" => Command::Dispatch(toggle()),
        "+" | "increase" | "inc" => Command::Dispatch(increase(amount.unwrap_or(step))),
        "-" | "decrease" | "dec" => Command::Dispatch(amount.map_or_else(decrease, decrease_by)),
        "state" | "s" => Command::Show,
        "quit" | "q" | "exit" => Command::Quit,
        _ => return Err(CommandError::Unknown(word.to_string())),
    };
    Ok(Some(command))
}

/// Split `+3` as well as `+ 3` and `increase 3`.
fn split_word(line: &str) -> (&str, &str) {
    if let Some(rest) = line.strip_prefix(['+', '-']) {
        return (&line[..1], rest.trim());
    }
    match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    }
}

fn parse_amount(rest: &str) -> Result<Option<i64>, CommandError> {
    if rest.is_empty() {
        return Ok(None);
    }
    rest.parse()
        .map(Some)
        .map_err(|_| CommandError::InvalidAmount(rest.to_string()))
}

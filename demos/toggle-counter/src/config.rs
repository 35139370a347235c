//! Settings read from the environment

use std::env;
use unistate_runtime::StoreConfig;

/// Settings for the toggle counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Amount added by a bare `+`
    pub step: i64,
    /// Bound on actions dispatched from inside listeners
    pub max_queued_actions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            step: 1,
            max_queued_actions: StoreConfig::default().max_queued_actions,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// - `TOGGLE_COUNTER_STEP` (default 1)
    /// - `TOGGLE_COUNTER_MAX_QUEUED` (default 1024)
    ///
    /// Unset or unparsable values fall back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            step: lookup("TOGGLE_COUNTER_STEP")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.step),
            max_queued_actions: lookup("TOGGLE_COUNTER_MAX_QUEUED")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_queued_actions),
        }
    }

    /// Store settings derived from this configuration
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::default().with_max_queued_actions(self.max_queued_actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(Config::from_lookup(lookup(&[])), Config::default());
        assert_eq!(Config::default().step, 1);
        assert_eq!(Config::default().max_queued_actions, 1024);
    }

    #[test]
    fn test_reads_values() {
        let config = Config::from_lookup(lookup(&[
            ("TOGGLE_COUNTER_STEP", "5"),
            ("TOGGLE_COUNTER_MAX_QUEUED", "8"),
        ]));
        assert_eq!(config.step, 5);
        assert_eq!(config.max_queued_actions, 8);
        assert_eq!(config.store_config().max_queued_actions, 8);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("TOGGLE_COUNTER_STEP", "five"),
            ("TOGGLE_COUNTER_MAX_QUEUED", "-1"),
        ]));
        assert_eq!(config, Config::default());
    }
}

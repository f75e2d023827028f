use serde::{Deserialize, Serialize};
use std::fmt;

/// Persisted run mode of the bot.
///
/// `dry_run` makes commands describe their side effect instead of performing
/// it. `paused` makes the dispatcher refuse everything except the
/// always-allowed triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunState {
    pub dry_run: bool,
    pub paused: bool,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            dry_run: true,
            paused: false,
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{dry-run: {}, paused: {}}}", self.dry_run, self.paused)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_dry_run() {
        let state = RunState::default();
        assert!(state.dry_run);
        assert!(!state.paused);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let state: RunState = serde_json::from_str(r#"{"paused": true}"#).unwrap();
        assert_eq!(state, RunState { dry_run: true, paused: true });
    }

    #[test]
    fn test_display() {
        let state = RunState { dry_run: false, paused: true };
        assert_eq!(state.to_string(), "{dry-run: false, paused: true}");
    }
}

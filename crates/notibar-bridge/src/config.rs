use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of the region element used when no configuration overrides it.
pub const DEFAULT_REGION_ID: &str = "notification";

/// Controls what happens to a pending hide when the region is shown again
/// before that hide has fired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HidePolicy {
    /// A new message cancels the previous hide, so the region always stays
    /// visible for the full delay after the most recent message. Default value.
    #[default]
    #[serde(alias = "restart")]
    RestartTimer,
    /// Every message keeps its own hide timer. An earlier timer may hide a
    /// later message before that message's own delay has elapsed.
    #[serde(alias = "independent")]
    IndependentTimers,
}

/// Returned when a string does not name a known [`HidePolicy`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown hide policy `{0}`, expected `restart` or `independent`")]
pub struct ParseHidePolicyError(String);

impl FromStr for HidePolicy {
    type Err = ParseHidePolicyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "restart" | "restart-timer" => Ok(Self::RestartTimer),
            "independent" | "independent-timers" => Ok(Self::IndependentTimers),
            _ => Err(ParseHidePolicyError(value.to_string())),
        }
    }
}

impl std::fmt::Display for HidePolicy {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HidePolicy::RestartTimer => formatter.write_str("restart"),
            HidePolicy::IndependentTimers => formatter.write_str("independent"),
        }
    }
}

/// Global application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Identifier of the document element that displays notifications.
    pub region_id: String,
    /// Overlap behavior for consecutive messages.
    pub hide_policy: HidePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region_id: DEFAULT_REGION_ID.to_string(),
            hide_policy: HidePolicy::default(),
        }
    }
}

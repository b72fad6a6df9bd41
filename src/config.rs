//! Runtime configuration
//!
//! Engine thresholds are fixed constants. Only host-facing knobs live here:
//! the coach's simulated thinking delay and the food lookup's matching
//! limits. Values come from defaults, optionally overridden by environment.

use crate::error::ForgeError;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Default simulated thinking delay for coach replies (ms)
pub const DEFAULT_THINKING_DELAY_MS: u64 = 800;
/// Default classifier confidence a food match must exceed
pub const DEFAULT_FOOD_MIN_CONFIDENCE: f32 = 0.2;
/// Default number of classifier observations scanned for a food match
pub const DEFAULT_FOOD_CANDIDATES: usize = 10;

pub const ENV_THINKING_DELAY_MS: &str = "FORGE_THINKING_DELAY_MS";
pub const ENV_FOOD_MIN_CONFIDENCE: &str = "FORGE_FOOD_MIN_CONFIDENCE";
pub const ENV_FOOD_CANDIDATES: &str = "FORGE_FOOD_CANDIDATES";

#[derive(Debug, Clone, PartialEq)]
pub struct ForgeConfig {
    /// Delay applied before a coach reply resolves
    pub thinking_delay: Duration,
    /// Minimum classifier confidence for a food match (exclusive)
    pub food_min_confidence: f32,
    /// How many classifier observations to scan
    pub food_candidate_limit: usize,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            thinking_delay: Duration::from_millis(DEFAULT_THINKING_DELAY_MS),
            food_min_confidence: DEFAULT_FOOD_MIN_CONFIDENCE,
            food_candidate_limit: DEFAULT_FOOD_CANDIDATES,
        }
    }
}

impl ForgeConfig {
    /// Load from process environment
    pub fn from_env() -> Result<Self, ForgeError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ForgeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ms) = parse_var::<u64, _>(&lookup, ENV_THINKING_DELAY_MS)? {
            config.thinking_delay = Duration::from_millis(ms);
        }

        if let Some(confidence) = parse_var::<f32, _>(&lookup, ENV_FOOD_MIN_CONFIDENCE)? {
            if !(0.0..=1.0).contains(&confidence) {
                return Err(ForgeError::InvalidConfig {
                    key: ENV_FOOD_MIN_CONFIDENCE.to_string(),
                    reason: format!("{confidence} is outside 0-1"),
                });
            }
            config.food_min_confidence = confidence;
        }

        if let Some(limit) = parse_var::<usize, _>(&lookup, ENV_FOOD_CANDIDATES)? {
            if limit == 0 {
                return Err(ForgeError::InvalidConfig {
                    key: ENV_FOOD_CANDIDATES.to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
            config.food_candidate_limit = limit;
        }

        debug!(?config, "loaded configuration");
        Ok(config)
    }

    pub fn with_thinking_delay(mut self, delay: Duration) -> Self {
        self.thinking_delay = delay;
        self
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ForgeError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ForgeError::InvalidConfig {
                key: key.to_string(),
                reason: e.to_string(),
            }),
    }
}

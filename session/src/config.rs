//! Timer configuration loaded from TOML.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default period of the walk cadence.
pub const DEFAULT_WALK_PERIOD_MS: u64 = 50;

/// Default period of the projectile cadence.
pub const DEFAULT_PROJECTILE_PERIOD_MS: u64 = 20;

/// Cadence settings of a battle session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Milliseconds between movement ticks.
    pub walk_period_ms: u64,
    /// Milliseconds between projectile ticks.
    pub projectile_period_ms: u64,
    /// Multiplier applied to both periods for debug slow motion.
    pub slow_motion_factor: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            walk_period_ms: DEFAULT_WALK_PERIOD_MS,
            projectile_period_ms: DEFAULT_PROJECTILE_PERIOD_MS,
            slow_motion_factor: 1,
        }
    }
}

impl SessionConfig {
    /// Parses and validates a TOML document; missing keys take defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would stall or spin the timers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.walk_period_ms == 0 {
            return Err(ConfigError::ZeroPeriod { timer: "walk" });
        }
        if self.projectile_period_ms == 0 {
            return Err(ConfigError::ZeroPeriod {
                timer: "projectile",
            });
        }
        if self.slow_motion_factor == 0 {
            return Err(ConfigError::ZeroSlowMotion);
        }
        Ok(())
    }

    /// Effective walk period after slow motion.
    #[must_use]
    pub fn walk_period(&self) -> Duration {
        scaled(self.walk_period_ms, self.slow_motion_factor)
    }

    /// Effective projectile period after slow motion.
    #[must_use]
    pub fn projectile_period(&self) -> Duration {
        scaled(self.projectile_period_ms, self.slow_motion_factor)
    }
}

fn scaled(period_ms: u64, factor: u32) -> Duration {
    Duration::from_millis(period_ms.saturating_mul(u64::from(factor)))
}

/// Errors raised while loading a [`SessionConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid TOML or has unexpected fields.
    #[error("invalid session config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A timer period of zero was requested.
    #[error("{timer} period must be positive")]
    ZeroPeriod {
        /// Name of the offending timer.
        timer: &'static str,
    },
    /// A slow-motion factor of zero was requested.
    #[error("slow motion factor must be positive")]
    ZeroSlowMotion,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let config = SessionConfig::from_toml_str("slow_motion_factor = 3").expect("valid");
        assert_eq!(config.walk_period_ms, DEFAULT_WALK_PERIOD_MS);
        assert_eq!(config.walk_period(), Duration::from_millis(150));
        assert_eq!(config.projectile_period(), Duration::from_millis(60));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = SessionConfig::from_toml_str("walk_speed = 3").expect_err("unknown key");
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_periods_are_rejected() {
        let error = SessionConfig::from_toml_str("walk_period_ms = 0").expect_err("zero");
        assert!(matches!(error, ConfigError::ZeroPeriod { timer: "walk" }));
        let error = SessionConfig::from_toml_str("slow_motion_factor = 0").expect_err("zero");
        assert!(matches!(error, ConfigError::ZeroSlowMotion));
    }
}

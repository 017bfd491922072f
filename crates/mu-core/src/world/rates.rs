//! Process-wide reward tunables
//!
//! Read once at start-up and shared read-only by every monster.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Reward multipliers applied on monster death
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerRates {
    /// Multiplier applied to experience credited to each contributor
    pub experience: f32,
    /// Multiplier applied to currency dropped on the ground
    pub zen: f32,
    /// Chance, in percent, that a contributor's kill produces a ground drop
    pub drop_rate: u32,
}

impl Default for ServerRates {
    fn default() -> Self {
        Self {
            experience: 1.0,
            zen: 1.0,
            drop_rate: 10,
        }
    }
}

impl ServerRates {
    /// Load rates from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse rates from a JSON document; missing fields keep their defaults
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let rates: Self = serde_json::from_str(contents)?;
        rates.validate()?;
        Ok(rates)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.experience.is_finite() || self.experience < 0.0 {
            return Err(ConfigError::invalid(
                "experience",
                format!("must be a finite non-negative multiplier, got {}", self.experience),
            ));
        }
        if !self.zen.is_finite() || self.zen < 0.0 {
            return Err(ConfigError::invalid(
                "zen",
                format!("must be a finite non-negative multiplier, got {}", self.zen),
            ));
        }
        if self.drop_rate > 100 {
            return Err(ConfigError::invalid(
                "drop_rate",
                format!("is a percentage, got {}", self.drop_rate),
            ));
        }
        Ok(())
    }
}

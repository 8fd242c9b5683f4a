//! Arena configuration file.
//!
//! ```toml
//! base_chart = "standard"   # or "empty"
//!
//! [weights]
//! attack = 2.5
//! speed = 1.0
//!
//! [[matchup]]
//! attacker = "fire"
//! defender = "grass"
//! multiplier = 2.0
//! ```
//!
//! Every section is optional. Weight keys accept the same names and aliases
//! as [`WeightConfig::set`].

use creature_core::{EffectivenessTable, Matchup, WeightConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::error::ConfigError;

pub const STANDARD_CHART: &str = "standard";
pub const EMPTY_CHART: &str = "empty";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArenaConfig {
    /// Chart the matchup overrides are applied to (default: standard)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_chart: Option<String>,
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
    #[serde(default, rename = "matchup")]
    pub matchups: Vec<Matchup>,
}

impl ArenaConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        debug!(
            path = %path.display(),
            weights = config.weights.len(),
            matchups = config.matchups.len(),
            "arena config loaded"
        );
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Write every weight override into `config`.
    ///
    /// # Errors
    /// `Invalid` on the first bad key or value; `config` is left unchanged.
    pub fn apply_weights(&self, config: &mut WeightConfig) -> Result<(), ConfigError> {
        config.set_many(self.weights.iter().map(|(k, v)| (k.as_str(), *v)))?;
        Ok(())
    }

    /// Base chart with the matchup overrides applied in file order.
    pub fn effectiveness_table(&self) -> Result<EffectivenessTable, ConfigError> {
        let mut table = match self.base_chart.as_deref() {
            None | Some(STANDARD_CHART) => EffectivenessTable::standard(),
            Some(EMPTY_CHART) => EffectivenessTable::new(),
            Some(other) => return Err(ConfigError::UnknownChart(other.to_string())),
        };
        for m in &self.matchups {
            table.insert(&m.attacker, &m.defender, m.multiplier)?;
        }
        Ok(table)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;

//! Error taxonomy for the creature model and battle resolution.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArenaError {
    /// Construction input was absent or out of range. Fatal for that entity only.
    #[error("malformed entity data: {0}")]
    MalformedEntityData(String),

    /// A weight write was rejected; the configuration is unchanged.
    #[error("invalid weight {value} for '{key}'")]
    InvalidWeight { key: String, value: f64 },

    #[error("invalid multiplier {value} for {attacker} -> {defender}")]
    InvalidMultiplier {
        attacker: String,
        defender: String,
        value: f64,
    },

    #[error("score computation failed for {entity}: {reason}")]
    ScoreComputationFailed { entity: String, reason: String },
}

impl ArenaError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        ArenaError::MalformedEntityData(msg.into())
    }
}

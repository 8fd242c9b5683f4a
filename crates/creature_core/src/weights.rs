//! Per-stat weight coefficients used by the battle score.
//!
//! [`WeightConfig`] is the mutable store that callers adjust between runs.
//! Battles never read it directly: a run takes a [`Weights`] snapshot once and
//! uses that value for every battle, so later writes cannot leak into a run
//! that is already underway. [`SharedWeights`] offers the same copy-on-read
//! discipline for callers that edit weights from another thread.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::ArenaError;
use crate::types::Stat;

/// Immutable weight snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    values: BTreeMap<Stat, f64>,
}

impl Weights {
    /// Weight for `stat`, or `None` if the snapshot does not score it.
    pub fn get(&self, stat: Stat) -> Option<f64> {
        self.values.get(&stat).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stat, f64)> + '_ {
        self.values.iter().map(|(stat, weight)| (*stat, *weight))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            values: Stat::ALL
                .iter()
                .map(|stat| (*stat, stat.default_weight()))
                .collect(),
        }
    }
}

/// Mutable weight store.
///
/// Only the six canonical stats are accepted (aliases such as `offense` are
/// resolved to their stat). Unknown keys are rejected rather than stored so a
/// typo in a config file cannot silently fall out of the score.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightConfig {
    current: Weights,
}

impl WeightConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current weights.
    pub fn get(&self) -> Weights {
        self.current.clone()
    }

    /// Set the weight for `key`.
    ///
    /// # Errors
    /// `InvalidWeight` when the key names no stat or the value is not a
    /// positive finite number. The configuration is left untouched.
    pub fn set(&mut self, key: &str, value: f64) -> Result<(), ArenaError> {
        let invalid = || ArenaError::InvalidWeight {
            key: key.to_string(),
            value,
        };
        let stat: Stat = key.parse().map_err(|_| invalid())?;
        if !value.is_finite() || value <= 0.0 {
            return Err(invalid());
        }
        self.current.values.insert(stat, value);
        tracing::debug!(stat = %stat, weight = value, "weight updated");
        Ok(())
    }

    /// Apply several writes; either all succeed or none are applied.
    pub fn set_many<'a, I>(&mut self, entries: I) -> Result<(), ArenaError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut staged = self.clone();
        for (key, value) in entries {
            staged.set(key, value)?;
        }
        *self = staged;
        Ok(())
    }

    /// Restore the default weights.
    pub fn reset(&mut self) {
        self.current = Weights::default();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stat, f64)> + '_ {
        self.current.iter()
    }
}

/// A [`WeightConfig`] shared between threads.
#[derive(Debug, Clone, Default)]
pub struct SharedWeights {
    inner: Arc<RwLock<WeightConfig>>,
}

impl SharedWeights {
    pub fn new(config: WeightConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Copy the current weights out from under the lock.
    pub fn snapshot(&self) -> Weights {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get()
    }

    pub fn set(&self, key: &str, value: f64) -> Result<(), ArenaError> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set(key, value)
    }
}

#[cfg(test)]
#[path = "weights_tests.rs"]
mod weights_tests;

//! Creature records and the weighted battle score.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::ArenaError;
use crate::types::{attribute_label, Stat};
use crate::weights::Weights;

/// Unvalidated creature data as handed over by an entity provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEntityRecord {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub attributes: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub visual_ref: Option<String>,
}

/// One tournament contestant.
///
/// Fields are private and fixed at construction. Tags keep their input order;
/// the effectiveness relation multiplies over every tag pair, so the order
/// only matters for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEntityRecord")]
pub struct Entity {
    id: u32,
    name: String,
    tags: Vec<String>,
    attributes: BTreeMap<String, f64>,
    visual_ref: Option<String>,
}

impl Entity {
    /// Build a validated entity.
    ///
    /// # Errors
    /// `MalformedEntityData` if the name is blank, a tag is blank or repeated,
    /// or an attribute value is negative or not finite.
    pub fn new(
        id: u32,
        name: impl Into<String>,
        tags: Vec<String>,
        attributes: BTreeMap<String, f64>,
        visual_ref: Option<String>,
    ) -> Result<Self, ArenaError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ArenaError::malformed(format!("entity {id} has an empty name")));
        }

        let mut seen: Vec<&str> = Vec::with_capacity(tags.len());
        for tag in &tags {
            if tag.trim().is_empty() {
                return Err(ArenaError::malformed(format!("{name}: empty tag")));
            }
            if seen.contains(&tag.as_str()) {
                return Err(ArenaError::malformed(format!("{name}: duplicate tag '{tag}'")));
            }
            seen.push(tag);
        }

        for (key, value) in &attributes {
            if !value.is_finite() || *value < 0.0 {
                return Err(ArenaError::malformed(format!(
                    "{name}: attribute '{key}' has invalid value {value}"
                )));
            }
        }

        Ok(Self {
            id,
            name,
            tags,
            attributes,
            visual_ref: visual_ref.filter(|r| !r.trim().is_empty()),
        })
    }

    /// Validate a provider record. Identity and attribute map are required.
    pub fn from_record(record: RawEntityRecord) -> Result<Self, ArenaError> {
        let id = record
            .id
            .ok_or_else(|| ArenaError::malformed("record has no id"))?;
        let name = record
            .name
            .ok_or_else(|| ArenaError::malformed(format!("record {id} has no name")))?;
        let attributes = record
            .attributes
            .ok_or_else(|| ArenaError::malformed(format!("record {id} has no attributes")))?;
        Self::new(id, name, record.tags, attributes, record.visual_ref)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn attributes(&self) -> &BTreeMap<String, f64> {
        &self.attributes
    }

    /// Value of a canonical stat; 0 when the data source omitted it.
    pub fn stat(&self, stat: Stat) -> f64 {
        self.attributes.get(stat.key()).copied().unwrap_or(0.0)
    }

    pub fn visual_ref(&self) -> Option<&str> {
        self.visual_ref.as_deref()
    }

    /// Weighted sum of the stats present in `weights`.
    ///
    /// Missing attributes contribute 0. Attributes that `weights` does not
    /// mention are ignored.
    ///
    /// # Errors
    /// `ScoreComputationFailed` if the sum is not finite.
    pub fn battle_score(&self, weights: &Weights) -> Result<f64, ArenaError> {
        let score: f64 = weights
            .iter()
            .map(|(stat, weight)| self.stat(stat) * weight)
            .sum();
        if score.is_finite() {
            Ok(score)
        } else {
            Err(ArenaError::ScoreComputationFailed {
                entity: self.name.clone(),
                reason: format!("weighted sum overflowed to {score}"),
            })
        }
    }
}

impl TryFrom<RawEntityRecord> for Entity {
    type Error = ArenaError;

    fn try_from(record: RawEntityRecord) -> Result<Self, Self::Error> {
        Self::from_record(record)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (#{})", self.name, self.id)?;
        writeln!(f, "  Types: {}", self.tags.join(", "))?;
        let stats = self
            .attributes
            .iter()
            .map(|(key, value)| format!("{}: {}", attribute_label(key), value))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "  Stats: {stats}")
    }
}

#[cfg(test)]
#[path = "entity_tests.rs"]
mod entity_tests;

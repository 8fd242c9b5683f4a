//! Type-effectiveness relation.
//!
//! A sparse table from `(attacking tag, defending tag)` to a positive
//! multiplier. Pairs that are not listed are neutral (1.0). The table is not
//! required to be symmetric.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ArenaError;

pub const NEUTRAL: f64 = 1.0;
pub const SUPER_EFFECTIVE: f64 = 2.0;
pub const NOT_VERY_EFFECTIVE: f64 = 0.5;
/// Matchups that are immunities in the source game. Kept above zero so every
/// multiplier stays strictly positive.
pub const IMMUNE: f64 = 0.25;

/// One listed matchup. Also the on-disk shape used by arena config files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub attacker: String,
    pub defender: String,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectivenessTable {
    /// attacker -> defender -> multiplier
    rows: HashMap<String, HashMap<String, f64>>,
}

impl EffectivenessTable {
    /// A table with no entries: every matchup is neutral.
    pub fn new() -> Self {
        Self::default()
    }

    /// The 18-type creature chart.
    pub fn standard() -> Self {
        let mut table = Self::new();
        for (attacker, strong, weak, immune) in STANDARD_CHART {
            let row = table.rows.entry(attacker.to_string()).or_default();
            for defender in *strong {
                row.insert(defender.to_string(), SUPER_EFFECTIVE);
            }
            for defender in *weak {
                row.insert(defender.to_string(), NOT_VERY_EFFECTIVE);
            }
            for defender in *immune {
                row.insert(defender.to_string(), IMMUNE);
            }
        }
        table
    }

    /// Add or replace one matchup.
    ///
    /// # Errors
    /// `InvalidMultiplier` unless `multiplier` is positive and finite.
    pub fn insert(
        &mut self,
        attacker: &str,
        defender: &str,
        multiplier: f64,
    ) -> Result<(), ArenaError> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(ArenaError::InvalidMultiplier {
                attacker: attacker.to_string(),
                defender: defender.to_string(),
                value: multiplier,
            });
        }
        self.rows
            .entry(attacker.to_string())
            .or_default()
            .insert(defender.to_string(), multiplier);
        Ok(())
    }

    pub fn with_matchup(
        mut self,
        attacker: &str,
        defender: &str,
        multiplier: f64,
    ) -> Result<Self, ArenaError> {
        self.insert(attacker, defender, multiplier)?;
        Ok(self)
    }

    /// Multiplier for a single pair, neutral when unlisted.
    pub fn lookup(&self, attacker: &str, defender: &str) -> f64 {
        self.rows
            .get(attacker)
            .and_then(|row| row.get(defender))
            .copied()
            .unwrap_or(NEUTRAL)
    }

    /// Product of `lookup(a, d)` over the full cross product of the two tag
    /// lists. Two dual-tagged sides contribute four factors.
    pub fn effectiveness<A, D>(&self, attacker_tags: &[A], defender_tags: &[D]) -> f64
    where
        A: AsRef<str>,
        D: AsRef<str>,
    {
        attacker_tags
            .iter()
            .flat_map(|a| {
                defender_tags
                    .iter()
                    .map(move |d| self.lookup(a.as_ref(), d.as_ref()))
            })
            .product()
    }

    /// All listed matchups, sorted by attacker then defender.
    pub fn matchups(&self) -> Vec<Matchup> {
        let mut out: Vec<Matchup> = self
            .rows
            .iter()
            .flat_map(|(attacker, row)| {
                row.iter().map(move |(defender, multiplier)| Matchup {
                    attacker: attacker.clone(),
                    defender: defender.clone(),
                    multiplier: *multiplier,
                })
            })
            .collect();
        out.sort_by(|a, b| (&a.attacker, &a.defender).cmp(&(&b.attacker, &b.defender)));
        out
    }

    pub fn len(&self) -> usize {
        self.rows.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

type ChartRow = (
    &'static str,
    &'static [&'static str],
    &'static [&'static str],
    &'static [&'static str],
);

/// attacker, super effective against, not very effective against, immune defenders
const STANDARD_CHART: &[ChartRow] = &[
    ("normal", &[], &["rock", "steel"], &["ghost"]),
    (
        "fire",
        &["grass", "ice", "bug", "steel"],
        &["fire", "water", "rock", "dragon"],
        &[],
    ),
    (
        "water",
        &["fire", "ground", "rock"],
        &["water", "grass", "dragon"],
        &[],
    ),
    (
        "electric",
        &["water", "flying"],
        &["electric", "grass", "dragon"],
        &["ground"],
    ),
    (
        "grass",
        &["water", "ground", "rock"],
        &["fire", "grass", "poison", "flying", "bug", "dragon", "steel"],
        &[],
    ),
    (
        "ice",
        &["grass", "ground", "flying", "dragon"],
        &["fire", "water", "ice", "steel"],
        &[],
    ),
    (
        "fighting",
        &["normal", "ice", "rock", "dark", "steel"],
        &["poison", "flying", "psychic", "bug", "fairy"],
        &["ghost"],
    ),
    (
        "poison",
        &["grass", "fairy"],
        &["poison", "ground", "rock", "ghost"],
        &["steel"],
    ),
    (
        "ground",
        &["fire", "electric", "poison", "rock", "steel"],
        &["grass", "bug"],
        &["flying"],
    ),
    (
        "flying",
        &["grass", "fighting", "bug"],
        &["electric", "rock", "steel"],
        &[],
    ),
    ("psychic", &["fighting", "poison"], &["psychic", "steel"], &["dark"]),
    (
        "bug",
        &["grass", "psychic", "dark"],
        &["fire", "fighting", "poison", "flying", "ghost", "steel", "fairy"],
        &[],
    ),
    (
        "rock",
        &["fire", "ice", "flying", "bug"],
        &["fighting", "ground", "steel"],
        &[],
    ),
    ("ghost", &["psychic", "ghost"], &["dark"], &["normal"]),
    ("dragon", &["dragon"], &["steel"], &["fairy"]),
    ("dark", &["psychic", "ghost"], &["fighting", "dark", "fairy"], &[]),
    (
        "steel",
        &["ice", "rock", "fairy"],
        &["fire", "water", "electric", "steel"],
        &[],
    ),
    (
        "fairy",
        &["fighting", "dragon", "dark"],
        &["fire", "poison", "steel"],
        &[],
    ),
];

/// Every tag the standard chart knows about.
pub const STANDARD_TAGS: [&str; 18] = [
    "normal", "fire", "water", "electric", "grass", "ice", "fighting", "poison", "ground",
    "flying", "psychic", "bug", "rock", "ghost", "dragon", "dark", "steel", "fairy",
];

#[cfg(test)]
#[path = "effectiveness_tests.rs"]
mod effectiveness_tests;

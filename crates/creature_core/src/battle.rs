//! Battle resolution between two creatures.
//!
//! Each side's adjusted score is
//! `base * effectiveness * roll * crit`, where `base` is the weighted battle
//! score, `effectiveness` comes from the side's tags against the opponent's,
//! `roll` is uniform on `[ROLL_MIN, ROLL_MAX]` and `crit` is
//! `CRIT_MULTIPLIER` with probability `CRIT_CHANCE`. Rolls and crits are drawn
//! independently for each side.
//!
//! The random source is consumed in a fixed order: attacker roll, attacker
//! crit, defender roll, defender crit, and a final coin flip only when the two
//! adjusted scores are exactly equal.

use serde::{Deserialize, Serialize};

use crate::effectiveness::{EffectivenessTable, NEUTRAL};
use crate::entity::Entity;
use crate::error::ArenaError;
use crate::rng::RandomSource;
use crate::weights::Weights;

pub const ROLL_MIN: f64 = 0.85;
pub const ROLL_MAX: f64 = 1.0;
pub const CRIT_CHANCE: f64 = 0.10;
pub const CRIT_MULTIPLIER: f64 = 1.5;
/// Probability that the attacker takes an exact tie.
pub const TIE_BREAK_CHANCE: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Attacker,
    Defender,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Attacker => Side::Defender,
            Side::Defender => Side::Attacker,
        }
    }
}

/// Every intermediate quantity for one side of a battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideTrace {
    pub id: u32,
    pub name: String,
    pub base_score: f64,
    pub effectiveness: f64,
    pub roll: f64,
    pub critical: bool,
    pub crit_multiplier: f64,
    pub adjusted: f64,
}

impl SideTrace {
    fn neutral(entity: &Entity, base_score: f64) -> Self {
        Self {
            id: entity.id(),
            name: entity.name().to_string(),
            base_score,
            effectiveness: NEUTRAL,
            roll: 1.0,
            critical: false,
            crit_multiplier: 1.0,
            adjusted: base_score,
        }
    }
}

/// The record of one resolved contest, or of a bye.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleOutcome {
    pub attacker: SideTrace,
    /// `None` marks a bye: the attacker advanced without a battle.
    pub defender: Option<SideTrace>,
    pub winner: Side,
    /// Whether the adjusted scores were equal and a coin flip decided.
    pub tie_break: bool,
}

impl BattleOutcome {
    /// Bye record for an unpaired entity. All modifiers are neutral and the
    /// entity wins.
    pub fn bye(entity: &Entity, weights: &Weights) -> Result<Self, ArenaError> {
        let base = entity.battle_score(weights)?;
        Ok(Self {
            attacker: SideTrace::neutral(entity, base),
            defender: None,
            winner: Side::Attacker,
            tie_break: false,
        })
    }

    pub fn is_bye(&self) -> bool {
        self.defender.is_none()
    }

    pub fn side(&self, side: Side) -> Option<&SideTrace> {
        match side {
            Side::Attacker => Some(&self.attacker),
            Side::Defender => self.defender.as_ref(),
        }
    }

    pub fn winner_trace(&self) -> &SideTrace {
        match self.winner {
            Side::Attacker => &self.attacker,
            Side::Defender => self.defender.as_ref().unwrap_or(&self.attacker),
        }
    }

    pub fn loser_trace(&self) -> Option<&SideTrace> {
        self.side(self.winner.other())
    }
}

/// Resolve one battle.
///
/// # Errors
/// `ScoreComputationFailed` if either side's battle score cannot be computed.
/// No winner is produced in that case.
pub fn resolve<R>(
    attacker: &Entity,
    defender: &Entity,
    weights: &Weights,
    table: &EffectivenessTable,
    rng: &mut R,
) -> Result<BattleOutcome, ArenaError>
where
    R: RandomSource + ?Sized,
{
    let attacker_base = attacker.battle_score(weights)?;
    let defender_base = defender.battle_score(weights)?;

    let attacker_trace = roll_side(attacker, attacker_base, defender, table, rng);
    let defender_trace = roll_side(defender, defender_base, attacker, table, rng);

    for trace in [&attacker_trace, &defender_trace] {
        if !trace.adjusted.is_finite() {
            return Err(ArenaError::ScoreComputationFailed {
                entity: trace.name.clone(),
                reason: format!("adjusted score overflowed to {}", trace.adjusted),
            });
        }
    }

    let (winner, tie_break) = if attacker_trace.adjusted > defender_trace.adjusted {
        (Side::Attacker, false)
    } else if defender_trace.adjusted > attacker_trace.adjusted {
        (Side::Defender, false)
    } else if rng.bernoulli(TIE_BREAK_CHANCE) {
        (Side::Attacker, true)
    } else {
        (Side::Defender, true)
    };

    Ok(BattleOutcome {
        attacker: attacker_trace,
        defender: Some(defender_trace),
        winner,
        tie_break,
    })
}

fn roll_side<R>(
    entity: &Entity,
    base_score: f64,
    opponent: &Entity,
    table: &EffectivenessTable,
    rng: &mut R,
) -> SideTrace
where
    R: RandomSource + ?Sized,
{
    let effectiveness = table.effectiveness(entity.tags(), opponent.tags());
    let roll = rng.uniform(ROLL_MIN, ROLL_MAX);
    let critical = rng.bernoulli(CRIT_CHANCE);
    let crit_multiplier = if critical { CRIT_MULTIPLIER } else { 1.0 };

    SideTrace {
        id: entity.id(),
        name: entity.name().to_string(),
        base_score,
        effectiveness,
        roll,
        critical,
        crit_multiplier,
        adjusted: base_score * effectiveness * roll * crit_multiplier,
    }
}

#[cfg(test)]
#[path = "battle_tests.rs"]
mod battle_tests;

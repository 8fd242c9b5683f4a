//! Tournament trace storage and reporting

use creature_core::{BattleOutcome, Entity, Side, SideTrace, Weights};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::TraceError;

/// A roster entry as seen by trace consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub slot: usize,
    pub id: u32,
    pub name: String,
    pub tags: Vec<String>,
    pub visual_ref: Option<String>,
}

/// One battle (or bye) inside a round, tied back to roster slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bout {
    /// Index of the pair within its round
    pub pair: usize,
    pub attacker_slot: usize,
    /// `None` for a bye
    pub defender_slot: Option<usize>,
    pub outcome: BattleOutcome,
}

impl Bout {
    pub fn is_bye(&self) -> bool {
        self.outcome.is_bye()
    }

    /// Roster slot of the entity that advanced.
    pub fn winner_slot(&self) -> usize {
        match (self.outcome.winner, self.defender_slot) {
            (Side::Defender, Some(slot)) => slot,
            _ => self.attacker_slot,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// 1-based round number
    pub round: u32,
    pub bouts: Vec<Bout>,
}

impl RoundRecord {
    /// Slots that advance to the next round, in bracket order.
    pub fn advancing_slots(&self) -> Vec<usize> {
        self.bouts.iter().map(Bout::winner_slot).collect()
    }

    pub fn byes(&self) -> impl Iterator<Item = &Bout> {
        self.bouts.iter().filter(|b| b.is_bye())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionRef {
    pub slot: usize,
    pub id: u32,
    pub name: String,
}

/// Complete record of one tournament run.
///
/// Grown one round at a time by the bracket and sealed with a champion when a
/// single entity remains. Traces attached to aborted or cancelled runs are
/// never sealed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentTrace {
    participants: Vec<Participant>,
    /// Weight snapshot every battle in the run used
    weights: Weights,
    rounds: Vec<RoundRecord>,
    champion: Option<ChampionRef>,
}

impl TournamentTrace {
    pub fn new(roster: &[Entity], weights: &Weights) -> Self {
        let participants = roster
            .iter()
            .enumerate()
            .map(|(slot, entity)| Participant {
                slot,
                id: entity.id(),
                name: entity.name().to_string(),
                tags: entity.tags().to_vec(),
                visual_ref: entity.visual_ref().map(str::to_string),
            })
            .collect();
        Self {
            participants,
            weights: weights.clone(),
            rounds: Vec::new(),
            champion: None,
        }
    }

    pub(crate) fn push_round(&mut self, round: RoundRecord) {
        self.rounds.push(round);
    }

    pub(crate) fn seal(&mut self, slot: usize) {
        if let Some(p) = self.participants.get(slot) {
            self.champion = Some(ChampionRef {
                slot,
                id: p.id,
                name: p.name.clone(),
            });
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }

    pub fn champion(&self) -> Option<&ChampionRef> {
        self.champion.as_ref()
    }

    /// Whether the run finished with a champion.
    pub fn is_complete(&self) -> bool {
        self.champion.is_some()
    }

    /// Number of resolved battles, byes excluded.
    pub fn battle_count(&self) -> usize {
        self.rounds
            .iter()
            .flat_map(|r| r.bouts.iter())
            .filter(|b| !b.is_bye())
            .count()
    }

    pub fn bye_count(&self) -> usize {
        self.rounds.iter().map(|r| r.byes().count()).sum()
    }

    /// Save trace to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), TraceError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| TraceError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load trace from a JSON file
    pub fn load(path: &Path) -> Result<Self, TraceError> {
        let contents = std::fs::read_to_string(path).map_err(|source| TraceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Generate a text report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();
        report.push_str("=== Tournament ===\n\n");
        report.push_str(&format!(
            "Participants ({}): {}\n",
            self.participants.len(),
            self.participants
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
        report.push_str(&format!(
            "Weights: {}\n",
            self.weights
                .iter()
                .map(|(stat, w)| format!("{stat}={w}"))
                .collect::<Vec<_>>()
                .join(", ")
        ));

        for round in &self.rounds {
            report.push_str(&format!("\n--- Round {} ---\n", round.round));
            for bout in &round.bouts {
                report.push_str(&format_bout(&bout.outcome));
                report.push('\n');
            }
        }

        report.push('\n');
        match &self.champion {
            Some(champion) => {
                report.push_str(&format!("Champion: {} (#{})\n", champion.name, champion.id));
            }
            None => report.push_str("No champion (run did not complete)\n"),
        }
        report
    }

    /// Print report to stdout
    pub fn print_report(&self) {
        println!("{}", self.generate_report());
    }
}

fn format_side(side: &SideTrace) -> String {
    let mut s = format!("{} ({:.1}", side.name, side.adjusted);
    if side.effectiveness != 1.0 {
        s.push_str(&format!(", x{}", side.effectiveness));
    }
    if side.critical {
        s.push_str(", crit");
    }
    s.push(')');
    s
}

fn format_bout(outcome: &BattleOutcome) -> String {
    match &outcome.defender {
        None => format!("{:<40} -> {} advances (bye)", outcome.attacker.name, outcome.attacker.name),
        Some(defender) => {
            let matchup = format!("{} vs {}", format_side(&outcome.attacker), format_side(defender));
            let tie = if outcome.tie_break { " (tie, coin flip)" } else { "" };
            format!("{:<40} -> {}{}", matchup, outcome.winner_trace().name, tie)
        }
    }
}

#[cfg(test)]
#[path = "trace_tests.rs"]
mod trace_tests;

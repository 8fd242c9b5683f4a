//! Single-elimination bracket.
//!
//! Entities are paired by position in the current round: (0, 1), (2, 3), ...
//! Winners keep their pair order in the next round and an odd entity out gets
//! a bye. The roster order is used as given; shuffling is the caller's call.

use creature_core::{resolve, BattleOutcome, EffectivenessTable, Entity, RandomSource, Weights};
use tracing::{debug, info, warn};

use crate::control::RunControl;
use crate::error::TournamentError;
use crate::trace::{Bout, RoundRecord, TournamentTrace};

/// Where a bracket is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketState {
    /// No round played yet.
    Seeded,
    /// `round` is the next round to play; earlier rounds are in the trace.
    RoundInProgress { round: u32 },
    /// One entity remains and the trace is sealed.
    Complete,
    /// A battle failed; no further rounds will be played.
    Aborted,
}

/// The result of a completed run.
#[derive(Debug, Clone)]
pub struct TournamentOutcome {
    pub champion: Entity,
    /// Index of the champion in the seeded roster
    pub champion_slot: usize,
    pub trace: TournamentTrace,
}

/// A bracket over a fixed roster and a fixed weight snapshot.
#[derive(Debug)]
pub struct Bracket<'r> {
    roster: &'r [Entity],
    weights: Weights,
    /// Roster slots still in the tournament, in bracket order
    alive: Vec<usize>,
    state: BracketState,
    trace: TournamentTrace,
}

impl<'r> Bracket<'r> {
    /// Seed a bracket. The weights are copied here and used for every battle.
    ///
    /// A single-entity roster is complete immediately with no rounds.
    pub fn seed(roster: &'r [Entity], weights: &Weights) -> Result<Self, TournamentError> {
        if roster.is_empty() {
            return Err(TournamentError::EmptyRoster);
        }

        let mut bracket = Self {
            roster,
            weights: weights.clone(),
            alive: (0..roster.len()).collect(),
            state: BracketState::Seeded,
            trace: TournamentTrace::new(roster, weights),
        };
        if roster.len() == 1 {
            bracket.trace.seal(0);
            bracket.state = BracketState::Complete;
        }
        Ok(bracket)
    }

    pub fn state(&self) -> BracketState {
        self.state
    }

    /// Roster slots still alive, in bracket order.
    pub fn alive(&self) -> &[usize] {
        &self.alive
    }

    pub fn trace(&self) -> &TournamentTrace {
        &self.trace
    }

    pub fn completed_rounds(&self) -> u32 {
        self.trace.rounds().len() as u32
    }

    /// Play the next round.
    ///
    /// Returns `Ok(None)` once the bracket is complete or aborted.
    ///
    /// # Errors
    /// `Aborted` if any battle in the round fails. The bracket keeps the
    /// rounds completed before the failure and refuses to play further.
    pub fn play_round<R>(
        &mut self,
        table: &EffectivenessTable,
        rng: &mut R,
    ) -> Result<Option<&RoundRecord>, TournamentError>
    where
        R: RandomSource + ?Sized,
    {
        let round = match self.state {
            BracketState::Seeded => 1,
            BracketState::RoundInProgress { round } => round,
            BracketState::Complete | BracketState::Aborted => return Ok(None),
        };
        info!(round, entrants = self.alive.len(), "round started");

        let mut bouts = Vec::with_capacity(self.alive.len().div_ceil(2));
        for (pair, slots) in self.alive.chunks(2).enumerate() {
            let attacker_slot = slots[0];
            let defender_slot = slots.get(1).copied();
            let attacker = &self.roster[attacker_slot];

            let outcome = match defender_slot {
                Some(slot) => resolve(attacker, &self.roster[slot], &self.weights, table, rng),
                None => BattleOutcome::bye(attacker, &self.weights),
            };

            let outcome = match outcome {
                Ok(outcome) => outcome,
                Err(source) => {
                    warn!(round, pair, error = %source, "battle failed, aborting tournament");
                    self.state = BracketState::Aborted;
                    return Err(TournamentError::Aborted {
                        round,
                        pair,
                        source,
                        partial: Box::new(self.trace.clone()),
                    });
                }
            };

            let bout = Bout {
                pair,
                attacker_slot,
                defender_slot,
                outcome,
            };
            debug!(
                round,
                pair,
                attacker = %bout.outcome.attacker.name,
                defender = bout.outcome.defender.as_ref().map(|d| d.name.as_str()).unwrap_or("<bye>"),
                winner = %bout.outcome.winner_trace().name,
                tie_break = bout.outcome.tie_break,
                "bout resolved"
            );
            bouts.push(bout);
        }

        let record = RoundRecord { round, bouts };
        self.alive = record.advancing_slots();
        self.trace.push_round(record);

        if let [champion] = self.alive[..] {
            self.trace.seal(champion);
            self.state = BracketState::Complete;
            info!(
                rounds = round,
                champion = %self.roster[champion].name(),
                "tournament complete"
            );
        } else {
            self.state = BracketState::RoundInProgress { round: round + 1 };
        }
        Ok(self.trace.rounds().last())
    }

    /// Convert a complete bracket into its outcome, or hand it back unchanged.
    pub fn into_outcome(self) -> Result<TournamentOutcome, Self> {
        match self.trace.champion().map(|c| c.slot) {
            Some(slot) if self.state == BracketState::Complete => Ok(TournamentOutcome {
                champion: self.roster[slot].clone(),
                champion_slot: slot,
                trace: self.trace,
            }),
            _ => Err(self),
        }
    }
}

/// Runs whole tournaments against one effectiveness table.
pub struct TournamentRunner<'t> {
    table: &'t EffectivenessTable,
    control: Option<RunControl>,
}

impl<'t> TournamentRunner<'t> {
    pub fn new(table: &'t EffectivenessTable) -> Self {
        Self {
            table,
            control: None,
        }
    }

    /// Check `control` before every round.
    pub fn with_control(mut self, control: RunControl) -> Self {
        self.control = Some(control);
        self
    }

    /// Run a tournament to completion.
    ///
    /// `weights` is a snapshot: the whole run uses these values.
    ///
    /// # Errors
    /// * `EmptyRoster` if `roster` is empty
    /// * `Aborted` if a battle fails
    /// * `Cancelled` if the run control stops the run between rounds
    pub fn run<R>(
        &self,
        roster: &[Entity],
        weights: &Weights,
        rng: &mut R,
    ) -> Result<TournamentOutcome, TournamentError>
    where
        R: RandomSource + ?Sized,
    {
        let mut bracket = Bracket::seed(roster, weights)?;
        info!(entrants = roster.len(), "tournament seeded");
        if let Some(control) = &self.control {
            control.start();
        }

        loop {
            bracket = match bracket.into_outcome() {
                Ok(outcome) => return Ok(outcome),
                Err(pending) => pending,
            };

            if let Some(control) = &self.control {
                if control.check() {
                    let completed_rounds = bracket.completed_rounds();
                    warn!(completed_rounds, "tournament cancelled");
                    return Err(TournamentError::Cancelled {
                        completed_rounds,
                        partial: Box::new(bracket.trace().clone()),
                    });
                }
            }

            bracket.play_round(self.table, rng)?;
        }
    }
}

/// Quick utility to run a single tournament without run control.
pub fn run_tournament<R>(
    roster: &[Entity],
    weights: &Weights,
    table: &EffectivenessTable,
    rng: &mut R,
) -> Result<TournamentOutcome, TournamentError>
where
    R: RandomSource + ?Sized,
{
    TournamentRunner::new(table).run(roster, weights, rng)
}

/// Number of rounds a roster of `entrants` needs: `ceil(log2(entrants))`.
pub fn expected_rounds(entrants: usize) -> u32 {
    if entrants <= 1 {
        0
    } else {
        usize::BITS - (entrants - 1).leading_zeros()
    }
}

#[cfg(test)]
#[path = "bracket_tests.rs"]
mod bracket_tests;

use super::*;
use creature_core::{ArenaError, ScriptedRandom, Side, WeightConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use std::time::Duration;

fn fighter(id: u32, tags: &[&str], stats: &[(&str, f64)]) -> Entity {
    let attributes: BTreeMap<String, f64> =
        stats.iter().map(|(k, v)| (k.to_string(), *v)).collect();
    Entity::new(
        id,
        format!("Fighter{id}"),
        tags.iter().map(|t| t.to_string()).collect(),
        attributes,
        None,
    )
    .unwrap()
}

/// Untagged roster where entity `i` has attack `strengths[i]`.
fn roster(strengths: &[f64]) -> Vec<Entity> {
    strengths
        .iter()
        .enumerate()
        .map(|(i, s)| fighter(i as u32 + 1, &[], &[("attack", *s)]))
        .collect()
}

fn weights() -> Weights {
    WeightConfig::new().get()
}

/// A random source that requests a stop on its first draw.
struct StopOnFirstDraw {
    control: RunControl,
    inner: ScriptedRandom,
}

impl RandomSource for StopOnFirstDraw {
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        self.control.stop();
        self.inner.uniform(lo, hi)
    }

    fn bernoulli(&mut self, p: f64) -> bool {
        self.inner.bernoulli(p)
    }
}

#[test]
fn test_empty_roster_is_rejected() {
    let table = EffectivenessTable::new();
    let err = run_tournament(&[], &weights(), &table, &mut ScriptedRandom::new()).unwrap_err();
    assert!(matches!(err, TournamentError::EmptyRoster));
    assert!(err.partial_trace().is_none());
}

#[test]
fn test_single_entrant_is_champion_without_rounds() {
    let roster = roster(&[10.0]);
    let table = EffectivenessTable::new();
    let mut rng = ScriptedRandom::new();
    let outcome = run_tournament(&roster, &weights(), &table, &mut rng).unwrap();

    assert_eq!(outcome.champion, roster[0]);
    assert_eq!(outcome.champion_slot, 0);
    assert!(outcome.trace.rounds().is_empty());
    assert!(outcome.trace.is_complete());
    assert_eq!(rng.uniform_calls(), 0);
}

#[test]
fn test_strongest_wins_eight_entrants() {
    let roster = roster(&[10.0, 30.0, 20.0, 80.0, 50.0, 40.0, 70.0, 60.0]);
    let table = EffectivenessTable::new();
    let outcome = run_tournament(&roster, &weights(), &table, &mut ScriptedRandom::new()).unwrap();

    assert_eq!(outcome.champion_slot, 3);
    assert_eq!(outcome.champion.name(), "Fighter4");

    let rounds = outcome.trace.rounds();
    assert_eq!(rounds.len(), 3);
    assert_eq!(
        rounds.iter().map(|r| r.bouts.len()).collect::<Vec<_>>(),
        vec![4, 2, 1]
    );
    assert_eq!(rounds[0].advancing_slots(), vec![1, 3, 4, 6]);
    assert_eq!(rounds[1].advancing_slots(), vec![3, 6]);
    assert_eq!(outcome.trace.battle_count(), 7);
    assert_eq!(outcome.trace.bye_count(), 0);
    assert_eq!(outcome.trace.champion().unwrap().slot, 3);
}

#[test]
fn test_pairs_follow_previous_round_order() {
    let roster = roster(&[1.0, 9.0, 8.0, 2.0, 3.0, 7.0]);
    let table = EffectivenessTable::new();
    let outcome = run_tournament(&roster, &weights(), &table, &mut ScriptedRandom::new()).unwrap();

    let round2 = &outcome.trace.rounds()[1];
    assert_eq!(round2.bouts[0].attacker_slot, 1);
    assert_eq!(round2.bouts[0].defender_slot, Some(2));
    assert_eq!(round2.bouts[1].attacker_slot, 5);
    assert!(round2.bouts[1].is_bye());
}

#[test]
fn test_three_entrants_produce_one_bye_in_round_one() {
    let roster = roster(&[10.0, 5.0, 7.0]);
    let table = EffectivenessTable::new();
    let outcome = run_tournament(&roster, &weights(), &table, &mut ScriptedRandom::new()).unwrap();

    let rounds = outcome.trace.rounds();
    assert_eq!(rounds.len(), 2);

    let byes: Vec<_> = rounds[0].byes().collect();
    assert_eq!(byes.len(), 1);
    let bye = byes[0];
    assert_eq!(bye.attacker_slot, 2);
    assert_eq!(bye.defender_slot, None);
    assert_eq!(bye.winner_slot(), 2);
    assert_eq!(bye.outcome.winner, Side::Attacker);
    assert_eq!(bye.outcome.attacker.effectiveness, 1.0);
    assert_eq!(bye.outcome.attacker.roll, 1.0);
    assert_eq!(bye.outcome.attacker.crit_multiplier, 1.0);
    assert!(!bye.outcome.attacker.critical);

    assert_eq!(rounds[1].bouts.len(), 1);
    assert!(!rounds[1].bouts[0].is_bye());
    assert_eq!(outcome.champion_slot, 0);
}

#[test]
fn test_five_entrants_round_sizes() {
    let roster = roster(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let table = EffectivenessTable::new();
    let outcome = run_tournament(&roster, &weights(), &table, &mut ScriptedRandom::new()).unwrap();

    let rounds = outcome.trace.rounds();
    assert_eq!(rounds.len() as u32, expected_rounds(5));
    // 5 -> 3 -> 2 -> 1
    assert_eq!(
        rounds.iter().map(|r| r.bouts.len()).collect::<Vec<_>>(),
        vec![3, 2, 1]
    );
    assert_eq!(outcome.trace.bye_count(), 2);
    assert_eq!(outcome.champion_slot, 4);
}

#[test]
fn test_exact_tie_in_bracket_uses_coin_flip() {
    let roster = roster(&[10.0, 10.0]);
    let table = EffectivenessTable::new();
    // attacker crit, defender crit, coin -> defender
    let mut rng = ScriptedRandom::new().with_flips([false, false, false]);
    let outcome = run_tournament(&roster, &weights(), &table, &mut rng).unwrap();

    assert!(outcome.trace.rounds()[0].bouts[0].outcome.tie_break);
    assert_eq!(outcome.champion_slot, 1);
}

#[test]
fn test_duplicate_entities_are_tracked_by_slot() {
    let twin = fighter(42, &[], &[("attack", 10.0)]);
    let roster = vec![twin.clone(), twin.clone()];
    let table = EffectivenessTable::new();
    let mut rng = ScriptedRandom::new().with_flips([false, false, true]);
    let outcome = run_tournament(&roster, &weights(), &table, &mut rng).unwrap();
    assert_eq!(outcome.champion_slot, 0);
    assert_eq!(outcome.trace.participants().len(), 2);
}

#[test]
fn test_effectiveness_decides_bracket() {
    let roster = vec![
        fighter(4, &["fire"], &[("attack", 30.0)]),
        fighter(7, &["water"], &[("attack", 20.0)]),
    ];
    let table = EffectivenessTable::standard();
    let outcome = run_tournament(&roster, &weights(), &table, &mut ScriptedRandom::new()).unwrap();
    assert_eq!(outcome.champion.id(), 7);
}

#[test]
fn test_score_failure_aborts_without_champion() {
    let mut roster = roster(&[10.0, 20.0, 30.0, 40.0]);
    roster[3] = fighter(99, &[], &[("attack", f64::MAX)]);
    let table = EffectivenessTable::new();

    let err = run_tournament(&roster, &weights(), &table, &mut ScriptedRandom::new()).unwrap_err();
    match err {
        TournamentError::Aborted {
            round,
            pair,
            source,
            partial,
        } => {
            assert_eq!(round, 1);
            assert_eq!(pair, 1);
            assert!(matches!(source, ArenaError::ScoreComputationFailed { .. }));
            assert!(partial.rounds().is_empty());
            assert!(partial.champion().is_none());
        }
        other => panic!("expected Aborted, got {other:?}"),
    }
}

#[test]
fn test_abort_in_later_round_keeps_completed_rounds() {
    // "Big" only overflows when its tag multiplier applies, which happens in
    // the final against "Tagged".
    let big = fighter(1, &["a"], &[("hp", f64::MAX / 2.0)]);
    let roster = vec![
        big,
        fighter(2, &[], &[("hp", 1.0)]),
        fighter(3, &["b"], &[("hp", 50.0)]),
        fighter(4, &[], &[("hp", 1.0)]),
    ];
    let table = EffectivenessTable::new().with_matchup("a", "b", 4.0).unwrap();

    let err = run_tournament(&roster, &weights(), &table, &mut ScriptedRandom::new()).unwrap_err();
    let partial = err.partial_trace().unwrap();
    assert_eq!(partial.rounds().len(), 1);
    assert!(!partial.is_complete());
    assert!(matches!(err, TournamentError::Aborted { round: 2, pair: 0, .. }));
}

#[test]
fn test_expired_budget_cancels_before_first_round() {
    let roster = roster(&[1.0, 2.0, 3.0, 4.0]);
    let table = EffectivenessTable::new();
    let runner = TournamentRunner::new(&table).with_control(RunControl::new(Some(Duration::ZERO)));

    let err = runner
        .run(&roster, &weights(), &mut ScriptedRandom::new())
        .unwrap_err();
    match err {
        TournamentError::Cancelled {
            completed_rounds,
            partial,
        } => {
            assert_eq!(completed_rounds, 0);
            assert!(partial.champion().is_none());
        }
        other => panic!("expected Cancelled, got {other:?}"),
    }
}

#[test]
fn test_stop_before_run_cancels_first_round() {
    let roster = roster(&[1.0, 2.0, 3.0, 4.0]);
    let table = EffectivenessTable::new();
    let control = RunControl::new(None);
    control.stop();
    let runner = TournamentRunner::new(&table).with_control(control.clone());

    let err = runner
        .run(&roster, &weights(), &mut ScriptedRandom::new())
        .unwrap_err();
    match err {
        TournamentError::Cancelled {
            completed_rounds,
            partial,
        } => {
            assert_eq!(completed_rounds, 0);
            assert!(partial.rounds().is_empty());
        }
        other => panic!("expected Cancelled, got {other:?}"),
    }
    assert!(control.is_stopped());
}

#[test]
fn test_stop_mid_round_takes_effect_between_rounds() {
    let roster = roster(&[1.0, 2.0, 3.0, 4.0]);
    let table = EffectivenessTable::new();
    let control = RunControl::new(None);
    let runner = TournamentRunner::new(&table).with_control(control.clone());
    let mut rng = StopOnFirstDraw {
        control,
        inner: ScriptedRandom::new(),
    };

    let err = runner.run(&roster, &weights(), &mut rng).unwrap_err();
    match err {
        TournamentError::Cancelled {
            completed_rounds,
            partial,
        } => {
            assert_eq!(completed_rounds, 1);
            assert_eq!(partial.rounds()[0].bouts.len(), 2);
        }
        other => panic!("expected Cancelled, got {other:?}"),
    }
}

#[test]
fn test_bracket_state_machine() {
    let roster = roster(&[1.0, 2.0, 3.0]);
    let table = EffectivenessTable::new();
    let mut rng = ScriptedRandom::new();
    let mut bracket = Bracket::seed(&roster, &weights()).unwrap();
    assert_eq!(bracket.state(), BracketState::Seeded);
    assert_eq!(bracket.alive(), &[0, 1, 2]);

    let first = bracket.play_round(&table, &mut rng).unwrap().unwrap();
    assert_eq!(first.round, 1);
    assert_eq!(bracket.state(), BracketState::RoundInProgress { round: 2 });
    assert_eq!(bracket.alive(), &[1, 2]);

    bracket.play_round(&table, &mut rng).unwrap();
    assert_eq!(bracket.state(), BracketState::Complete);
    assert!(bracket.play_round(&table, &mut rng).unwrap().is_none());

    let outcome = bracket.into_outcome().unwrap();
    assert_eq!(outcome.champion_slot, 2);
}

#[test]
fn test_incomplete_bracket_is_handed_back() {
    let roster = roster(&[1.0, 2.0]);
    let bracket = Bracket::seed(&roster, &weights()).unwrap();
    let bracket = bracket.into_outcome().unwrap_err();
    assert_eq!(bracket.state(), BracketState::Seeded);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let roster = roster(&[50.0, 52.0, 49.0, 51.0, 48.0, 53.0, 47.0]);
    let table = EffectivenessTable::standard();
    let a = run_tournament(&roster, &weights(), &table, &mut ChaCha8Rng::seed_from_u64(2024)).unwrap();
    let b = run_tournament(&roster, &weights(), &table, &mut ChaCha8Rng::seed_from_u64(2024)).unwrap();
    assert_eq!(a.trace, b.trace);
    assert_eq!(a.champion_slot, b.champion_slot);
}

#[test]
fn test_trace_records_weight_snapshot() {
    let mut config = WeightConfig::new();
    config.set("speed", 5.0).unwrap();
    let snapshot = config.get();
    let roster = roster(&[1.0, 2.0]);
    let table = EffectivenessTable::new();

    let outcome = run_tournament(&roster, &snapshot, &table, &mut ScriptedRandom::new()).unwrap();
    config.set("speed", 1.0).unwrap();
    assert_eq!(outcome.trace.weights(), &snapshot);
}

#[test]
fn test_expected_rounds() {
    assert_eq!(expected_rounds(0), 0);
    assert_eq!(expected_rounds(1), 0);
    assert_eq!(expected_rounds(2), 1);
    assert_eq!(expected_rounds(3), 2);
    assert_eq!(expected_rounds(4), 2);
    assert_eq!(expected_rounds(5), 3);
    assert_eq!(expected_rounds(16), 4);
    assert_eq!(expected_rounds(17), 5);
}

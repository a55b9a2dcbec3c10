use super::*;
use proptest::prelude::*;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rbb_core::*;
use rbb_gameplay::*;
use std::collections::BTreeSet;

fn roster(n: usize) -> Vec<ID<Contestant>> {
    (0..n).map(|_| ID::default()).collect()
}

/// Play match `id` to its end with random round outcomes. Free throws,
/// if reached, go to side 0.
fn finish(stage: &mut impl Stage, id: MatchId, rng: &mut SmallRng) -> Result<(), StageError> {
    let mut now = 0;
    let mut throws = 0;
    while stage.find(id).is_some_and(|m| !m.has_ended()) {
        now += 100_000;
        let in_throws = stage.find(id).is_some_and(|m| m.free_throws().is_some());
        stage.apply(id, Command::Start, now, rng)?;
        if in_throws {
            let command = match throws % 2 {
                0 => Command::IncrementScore { side: 0 },
                _ => Command::IncrementFoul { side: 1 },
            };
            stage.apply(id, command, now + 1, rng)?;
            throws += 1;
        } else {
            let outcome = match rng.random_range(0..3) {
                0 => Some(0),
                1 => Some(1),
                _ => None,
            };
            if let Some(side) = outcome {
                stage.apply(id, Command::IncrementScore { side }, now + 1, rng)?;
            }
            stage.apply(id, Command::EndRound, now + 2, rng)?;
        }
        stage.apply(id, Command::Confirm, now + 3, rng)?;
    }
    Ok(())
}

/// Play every generated match until the stage ends or stalls.
fn drive(stage: &mut impl Stage, rng: &mut SmallRng) -> Result<(), StageError> {
    loop {
        let open = stage
            .matches()
            .iter()
            .filter(|m| !m.has_ended())
            .map(Match::id)
            .collect::<Vec<_>>();
        if open.is_empty() {
            return Ok(());
        }
        for id in open {
            finish(stage, id, rng)?;
        }
    }
}

fn run_swiss(n: usize, rounds: usize, seed: u64) -> (SwissStage, Result<(), StageError>) {
    let ref mut rng = SmallRng::seed_from_u64(seed);
    let mut swiss = SwissStage::new(roster(n), rounds);
    let result = swiss.proceed(rng).and_then(|_| drive(&mut swiss, rng));
    (swiss, result)
}

fn assert_no_rematch(swiss: &SwissStage) {
    let mut seen = BTreeSet::new();
    for game in swiss.matches() {
        let [a, b] = game.contestants();
        assert_ne!(a, b);
        assert!(seen.insert((a.min(b), a.max(b))), "rematch in {}", game.id());
    }
}

fn assert_fair_byes(swiss: &SwissStage) {
    let distinct = swiss.byes().iter().collect::<BTreeSet<_>>();
    assert_eq!(distinct.len(), swiss.byes().len());
}

#[test]
fn scenario_five_contestants_four_rounds() {
    for seed in [11, 12, 13] {
        let (swiss, result) = run_swiss(5, 4, seed);
        result.unwrap();
        assert!(swiss.has_ended());
        assert_eq!(swiss.stalled(), None);
        assert_eq!(swiss.byes().len(), 4);
        assert_eq!(swiss.matches().len(), 8);
        assert_fair_byes(&swiss);
        assert_no_rematch(&swiss);
    }
}

#[test]
fn full_round_robins_complete() {
    for (n, rounds) in [(6, 5), (7, 7), (8, 7)] {
        for seed in 0..8 {
            let (swiss, result) = run_swiss(n, rounds, seed);
            result.unwrap();
            assert!(swiss.has_ended(), "{} contestants, seed {}", n, seed);
            assert_eq!(swiss.matches().len(), rounds * (n / 2));
            assert_no_rematch(&swiss);
            assert_fair_byes(&swiss);
        }
    }
}

#[test]
fn too_many_rounds_stall_after_the_last_pairable_round() {
    let (swiss, result) = run_swiss(6, 6, 3);
    result.unwrap();
    assert!(!swiss.has_ended());
    assert!(swiss.stalled().is_some());
    assert_eq!(swiss.matches().len(), 15);
    assert_no_rematch(&swiss);
}

#[test]
fn scenario_eight_seed_bracket() {
    let ref mut rng = SmallRng::seed_from_u64(8);
    let seeds = roster(8);
    let ref mut stage = EliminationStage::new(seeds.clone(), &SideBook::default());
    stage.proceed(rng).unwrap();
    drive(stage, rng).unwrap();
    assert!(stage.has_ended());
    assert!(stage.no_loss().is_empty());
    assert!(stage.one_loss().is_empty());
    assert_eq!(stage.eliminated().len(), 7);
    let ranking = stage.final_ranking().into_iter().collect::<BTreeSet<_>>();
    assert_eq!(ranking, seeds.into_iter().collect());
}

#[test]
fn swiss_stage_runs_to_end() {
    let (swiss, result) = run_swiss(8, 3, 21);
    result.unwrap();
    assert!(swiss.has_ended());
    assert_eq!(swiss.matches().len(), 12);
    let ids = swiss.matches().iter().map(Match::id).collect::<Vec<_>>();
    assert_eq!(ids, (1..=12).collect::<Vec<_>>());
    let standings = swiss.standings().unwrap();
    let total = standings.iter().map(|s| s.score).sum::<Points>();
    assert_eq!(total, 12 * POINTS_TOTAL);
}

/// Sweep both main rounds of match `id` for `side`.
fn sweep(stage: &mut impl Stage, id: MatchId, side: Side, rng: &mut SmallRng) {
    for round in 0..2 {
        let now = round * 100_000;
        stage.apply(id, Command::Start, now, rng).unwrap();
        stage
            .apply(id, Command::IncrementScore { side }, now + 1, rng)
            .unwrap();
        stage.apply(id, Command::EndRound, now + 2, rng).unwrap();
        stage.apply(id, Command::Confirm, now + 3, rng).unwrap();
    }
}

#[test]
fn second_round_pairs_by_standings() {
    let ref mut rng = SmallRng::seed_from_u64(4);
    let ids = roster(4);
    let ref mut swiss = SwissStage::new(ids.clone(), 2);
    swiss.proceed(rng).unwrap();
    sweep(swiss, 1, 0, rng);
    sweep(swiss, 2, 0, rng);
    // winners 0 and 2 meet, and their match is listed last
    let second = swiss.matches()[2..]
        .iter()
        .map(Match::contestants)
        .collect::<Vec<_>>();
    assert_eq!(second, vec![[ids[1], ids[3]], [ids[0], ids[2]]]);
    assert_eq!(swiss.score(ids[0]), Ok(POINTS_SWEEP));
    assert_eq!(swiss.tiebreak(ids[1]), Ok(POINTS_SWEEP));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// No pairing repeats across rounds and no contestant gets two byes.
    #[test]
    fn swiss_never_rematches(n in 4usize..=16, rounds in 1usize..=3, seed in any::<u64>()) {
        let (swiss, result) = run_swiss(n, rounds, seed);
        assert_no_rematch(&swiss);
        assert_fair_byes(&swiss);
        prop_assert!(result.is_ok());
        prop_assert!(swiss.has_ended());
        prop_assert_eq!(swiss.matches().len(), rounds * (n / 2));
    }

    /// Odd fields playing every round they can give everyone one bye.
    #[test]
    fn swiss_byes_are_fair(half in 2usize..=4, seed in any::<u64>()) {
        let n = 2 * half + 1;
        let (swiss, result) = run_swiss(n, n, seed);
        prop_assert!(result.is_ok());
        prop_assert!(swiss.has_ended());
        assert_fair_byes(&swiss);
        assert_no_rematch(&swiss);
        prop_assert_eq!(swiss.byes().len(), n);
    }

    /// Every outcome a tie-allowed match can reach has a scoring row.
    #[test]
    fn swiss_outcomes_are_scored(seed in any::<u64>()) {
        let (swiss, _) = run_swiss(2, 1, seed);
        let game = &swiss.matches()[0];
        prop_assert!(game.has_ended());
        let points = award(&game.status()).unwrap().unwrap();
        prop_assert_eq!(points[0] + points[1], POINTS_TOTAL);
    }

    /// Brackets end with one champion and everyone else out on their
    /// second loss.
    #[test]
    fn elimination_terminates(n in 2usize..=16, seed in any::<u64>()) {
        let ref mut rng = SmallRng::seed_from_u64(seed);
        let seeds = roster(n);
        let ref mut stage = EliminationStage::new(seeds.clone(), &SideBook::default());
        stage.proceed(rng).unwrap();
        drive(stage, rng).unwrap();
        prop_assert!(stage.has_ended());
        prop_assert!(stage.matches().len() <= 2 * n);
        prop_assert!(stage.no_loss().is_empty());
        prop_assert!(stage.one_loss().is_empty());
        prop_assert_eq!(stage.eliminated().len(), n - 1);
        let champion = stage.champion().unwrap();
        prop_assert!(stage.losses(champion) <= 1);
        for out in stage.eliminated() {
            prop_assert_eq!(stage.losses(*out), 2);
        }
    }
}

use super::*;
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rbb_core::*;

/// Play one round to the given valid scores, end it, and confirm it.
fn play(game: &mut Match, scores: (usize, usize), now: Millis, rng: &mut SmallRng) {
    game.apply(Command::Start, now, rng).unwrap();
    for _ in 0..scores.0 {
        game.apply(Command::IncrementScore { side: 0 }, now + 1, rng).unwrap();
    }
    for _ in 0..scores.1 {
        game.apply(Command::IncrementScore { side: 1 }, now + 2, rng).unwrap();
    }
    game.apply(Command::EndRound, now + 3, rng).unwrap();
    game.apply(Command::Confirm, now + 4, rng).unwrap();
}

fn winner_of(scores: (usize, usize)) -> Option<Side> {
    match scores.0.cmp(&scores.1) {
        std::cmp::Ordering::Greater => Some(0),
        std::cmp::Ordering::Less => Some(1),
        std::cmp::Ordering::Equal => None,
    }
}

/// Side that reaches two round wins within the first three rounds.
fn best_of_three(rounds: &[(usize, usize)]) -> Option<Side> {
    let mut wins = [0; 2];
    for side in rounds.iter().take(3).filter_map(|r| winner_of(*r)) {
        wins[side] += 1;
        if wins[side] == 2 {
            return Some(side);
        }
    }
    None
}

#[test]
fn scenario_two_one_split() {
    let ref mut rng = SmallRng::seed_from_u64(1);
    let ref mut game = Match::new(
        1,
        [ID::default(), ID::default()],
        [Basket::Blue, Basket::Magenta],
        false,
        rng,
    );
    play(game, (5, 3), 0, rng);
    play(game, (2, 5), 100_000, rng);
    play(game, (4, 1), 200_000, rng);
    let status = game.status();
    assert_eq!(status.result, Outcome::Won);
    assert_eq!(status.winner, Some(0));
    assert_eq!(status.round_win_count, 2);
    assert_eq!(status.round_loss_count, 1);
    assert_eq!(status.round_tie_count, 0);
}

#[test]
fn events_follow_round_lifecycle() {
    let ref mut rng = SmallRng::seed_from_u64(2);
    let ref mut game = Match::new(
        9,
        [ID::default(), ID::default()],
        [Basket::Magenta, Basket::Blue],
        true,
        rng,
    );
    game.drain();
    play(game, (1, 0), 0, rng);
    assert_eq!(
        game.drain(),
        vec![
            MatchEvent::RoundStarted,
            MatchEvent::ScoreChanged,
            MatchEvent::RoundStopped,
            MatchEvent::RoundEnded,
            MatchEvent::RoundConfirmedChanged,
            MatchEvent::RoundAdded,
        ]
    );
}

proptest! {
    /// Two round wins within the first three rounds decide the match
    /// without extra rounds or free throws.
    #[test]
    fn best_of_three_is_decisive(
        rounds in proptest::collection::vec((0usize..4, 0usize..4), 3),
        is_tie_allowed in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let expected = best_of_three(&rounds);
        prop_assume!(expected.is_some());
        let ref mut rng = SmallRng::seed_from_u64(seed);
        let ref mut game = Match::new(
            1,
            [ID::default(), ID::default()],
            [Basket::Blue, Basket::Magenta],
            is_tie_allowed,
            rng,
        );
        for (i, scores) in rounds.iter().enumerate() {
            if game.has_ended() {
                break;
            }
            play(game, *scores, i as Millis * 100_000, rng);
        }
        let status = game.status();
        prop_assert!(game.has_ended());
        prop_assert_eq!(status.result, Outcome::Won);
        prop_assert_eq!(status.winner, expected);
        prop_assert_eq!(status.round_win_count, 2);
        prop_assert!(game.free_throws().is_none());
        prop_assert!(game.rounds().len() <= MAIN_ROUNDS);
    }

    /// Every match terminates when rounds keep being played and confirmed.
    #[test]
    fn matches_always_terminate(
        rounds in proptest::collection::vec((0usize..3, 0usize..3), 6),
        throws in proptest::collection::vec(any::<bool>(), 40),
        seed in any::<u64>(),
    ) {
        let ref mut rng = SmallRng::seed_from_u64(seed);
        let ref mut game = Match::new(
            1,
            [ID::default(), ID::default()],
            [Basket::Blue, Basket::Magenta],
            false,
            rng,
        );
        for (i, scores) in rounds.iter().enumerate() {
            if game.has_ended() {
                break;
            }
            play(game, *scores, i as Millis * 100_000, rng);
        }
        let mut now = 1_000_000;
        let mut throws = throws.into_iter();
        let mut shooter = 0;
        while !game.has_ended() {
            prop_assert!(game.free_throws().is_some());
            game.apply(Command::Start, now, rng).unwrap();
            // once the random throws run out, side 0 always makes and side 1 always misses
            let made = throws.next().unwrap_or(shooter == 0);
            let command = match made {
                true => Command::IncrementScore { side: shooter },
                false => Command::IncrementFoul { side: shooter },
            };
            game.apply(command, now + 10, rng).unwrap();
            game.apply(Command::Confirm, now + 20, rng).unwrap();
            shooter = 1 - shooter;
            now += 1_000;
        }
        prop_assert!(game.status().is_decided());
    }
}

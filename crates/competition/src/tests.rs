use super::*;
use rbb_core::*;
use rbb_gameplay::*;
use rbb_tournament::*;

fn roster(competition: &mut Competition, n: usize) -> Vec<ID<Contestant>> {
    (0..n)
        .map(|i| competition.add_contestant(format!("Robot {}", i)).unwrap())
        .collect()
}

/// Side 0 wins every round of match `id` until it ends.
fn sweep(competition: &mut Competition, id: MatchId, clock: &mut Millis) {
    while competition.find(id).is_some_and(|m| !m.has_ended()) {
        *clock += 100_000;
        let now = *clock;
        competition.apply(id, Command::Start, now).unwrap();
        competition
            .apply(id, Command::IncrementScore { side: 0 }, now + 1)
            .unwrap();
        competition.apply(id, Command::EndRound, now + 2).unwrap();
        competition.apply(id, Command::Confirm, now + 3).unwrap();
    }
}

/// Play every open match, oldest first, until none are left.
fn play_out(competition: &mut Competition) {
    let mut clock = 0;
    loop {
        let next = competition.matches().find(|m| !m.has_ended()).map(Match::id);
        let Some(id) = next else {
            break;
        };
        sweep(competition, id, &mut clock);
    }
}

fn config(swiss: bool, rounds: usize, elimination: bool) -> TournamentConfig {
    TournamentConfig {
        swiss_enabled: swiss,
        number_of_swiss_rounds: rounds,
        elimination_enabled: elimination,
    }
}

#[test]
fn roster_freezes_once_started() {
    let ref mut competition = Competition::seeded("cup", 1);
    let ids = roster(competition, 4);
    competition.remove_contestant(ids[3]).unwrap();
    assert_eq!(competition.contestants().len(), 3);
    competition.start_tournament(config(false, 0, true)).unwrap();
    assert_eq!(
        competition.add_contestant("late"),
        Err(CompetitionError::AlreadyStarted)
    );
    assert_eq!(
        competition.remove_contestant(ids[0]),
        Err(CompetitionError::AlreadyStarted)
    );
    assert_eq!(
        competition.start_tournament(config(false, 0, true)),
        Err(CompetitionError::AlreadyStarted)
    );
}

#[test]
fn empty_config_is_rejected() {
    let ref mut competition = Competition::seeded("cup", 2);
    roster(competition, 4);
    assert_eq!(
        competition.start_tournament(config(false, 3, false)),
        Err(CompetitionError::NotConfigured)
    );
    assert!(competition.config().is_none());
}

#[test]
fn oversized_swiss_is_rejected() {
    let ref mut competition = Competition::seeded("cup", 15);
    roster(competition, 4);
    assert_eq!(
        competition.start_tournament(config(true, 501, false)),
        Err(CompetitionError::TooManyMatches(1002))
    );
    assert!(competition.config().is_none());
    competition.start_tournament(config(true, 500, false)).unwrap();
    assert_eq!(competition.swiss().map(|s| s.matches().len()), Some(2));
}

#[test]
fn swiss_feeds_elimination() {
    let ref mut competition = Competition::seeded("cup", 3);
    roster(competition, 6);
    competition.start_tournament(config(true, 2, true)).unwrap();
    assert_eq!(competition.swiss().map(|s| s.matches().len()), Some(3));
    assert!(competition.elimination().is_none());
    play_out(competition);
    let swiss = competition.swiss().unwrap();
    assert!(swiss.has_ended());
    assert_eq!(swiss.matches().len(), 6);
    let bracket = competition.elimination().unwrap();
    assert!(bracket.has_ended());
    assert!(bracket.seeds().len() >= ELIMINATION_SEED_CUT);
    assert_eq!(bracket.eliminated().len(), bracket.seeds().len() - 1);
    assert!(bracket.champion().is_some());
    assert!(
        bracket
            .matches()
            .iter()
            .all(|m| m.id() > ELIMINATION_ID_OFFSET && m.id() <= EXHIBITION_ID_OFFSET)
    );
}

#[test]
fn stalled_swiss_is_surfaced_and_restored() {
    let ref mut competition = Competition::seeded("cup", 16);
    roster(competition, 4);
    competition.start_tournament(config(true, 4, true)).unwrap();
    competition.drain();
    play_out(competition);
    let events = competition.drain();
    assert!(events.contains(&CompetitionEvent::Stalled));
    let swiss = competition.swiss().unwrap();
    assert_eq!(swiss.matches().len(), 6);
    assert!(!swiss.has_ended());
    assert!(swiss.stalled().is_some());
    assert!(competition.elimination().is_none());
    let record = competition.record();
    let matches = competition.matches().cloned().collect::<Vec<_>>();
    let restored = Competition::restore(record.clone(), matches, Some(2)).unwrap();
    assert_eq!(restored.swiss().and_then(SwissStage::stalled), swiss.stalled());
    assert_eq!(restored.record(), record);
}

#[test]
fn elimination_only_seeds_whole_roster() {
    let ref mut competition = Competition::seeded("cup", 4);
    let ids = roster(competition, 5);
    competition.start_tournament(config(false, 0, true)).unwrap();
    assert!(competition.swiss().is_none());
    let mut seeds = competition.elimination().unwrap().seeds().to_vec();
    seeds.sort();
    let mut expected = ids.clone();
    expected.sort();
    assert_eq!(seeds, expected);
    play_out(competition);
    assert!(competition.elimination().unwrap().has_ended());
}

#[test]
fn exhibition_rejects_bad_pairs() {
    let ref mut competition = Competition::seeded("cup", 5);
    let ids = roster(competition, 2);
    let stranger = ID::default();
    assert_eq!(
        competition.create_game([ids[0], stranger]),
        Err(CompetitionError::UnknownContestant(stranger))
    );
    assert_eq!(
        competition.create_game([ids[1], ids[1]]),
        Err(CompetitionError::SelfMatch(ids[1]))
    );
}

#[test]
fn one_live_match_at_a_time() {
    let ref mut competition = Competition::seeded("cup", 6);
    let ids = roster(competition, 4);
    let first = competition.create_game([ids[0], ids[1]]).unwrap();
    let second = competition.create_game([ids[2], ids[3]]).unwrap();
    assert_eq!(first, EXHIBITION_ID_OFFSET + 1);
    assert_eq!(second, EXHIBITION_ID_OFFSET + 2);
    assert_eq!(competition.active().map(Match::id), Some(first));
    assert_eq!(
        competition.set_active(second),
        Err(CompetitionError::ActiveConflict(first))
    );
    assert_eq!(
        competition.apply(second, Command::Start, 0),
        Err(CompetitionError::ActiveConflict(first))
    );
    assert_eq!(
        competition.apply(77, Command::Start, 0),
        Err(CompetitionError::UnknownMatch(77))
    );
    let mut clock = 0;
    sweep(competition, first, &mut clock);
    // the ended match no longer blocks
    competition.apply(second, Command::Start, clock).unwrap();
    assert_eq!(competition.active().map(Match::id), Some(second));
}

#[test]
fn ended_match_accepts_only_corrections() {
    let ref mut competition = Competition::seeded("cup", 7);
    let ids = roster(competition, 2);
    let id = competition.create_game([ids[0], ids[1]]).unwrap();
    let mut clock = 0;
    sweep(competition, id, &mut clock);
    assert_eq!(
        competition.apply(id, Command::Start, clock),
        Err(CompetitionError::MatchEnded(id))
    );
    let correction = Command::SetScoreValidity {
        round: Some(0),
        side: 0,
        index: 0,
        is_valid: false,
    };
    competition.apply(id, correction, clock).unwrap();
    assert!(competition.find(id).unwrap().has_ended());
}

#[test]
fn corrections_reach_ended_matches_while_another_is_live() {
    let ref mut competition = Competition::seeded("cup", 13);
    let ids = roster(competition, 4);
    let first = competition.create_game([ids[0], ids[1]]).unwrap();
    let mut clock = 0;
    sweep(competition, first, &mut clock);
    let second = competition.create_game([ids[2], ids[3]]).unwrap();
    competition.apply(second, Command::Start, clock).unwrap();
    assert_eq!(competition.active().map(Match::id), Some(second));
    let correction = Command::SetScoreValidity {
        round: Some(0),
        side: 0,
        index: 0,
        is_valid: false,
    };
    competition.apply(first, correction, clock + 1).unwrap();
    let mark = competition.find(first).unwrap().rounds()[0].scores()[0][0];
    assert!(!mark.is_valid);
    assert_eq!(competition.active().map(Match::id), Some(second));
    assert!(competition.find(first).unwrap().has_ended());
}

#[test]
fn corrections_leave_the_active_match_alone() {
    let ref mut competition = Competition::seeded("cup", 14);
    let ids = roster(competition, 4);
    let first = competition.create_game([ids[0], ids[1]]).unwrap();
    let mut clock = 0;
    sweep(competition, first, &mut clock);
    let second = competition.create_game([ids[2], ids[3]]).unwrap();
    assert_eq!(competition.active().map(Match::id), Some(second));
    let correction = Command::SetFoulValidity {
        round: Some(0),
        side: 1,
        index: 0,
        is_valid: false,
    };
    // side 1 never fouled
    assert!(competition.apply(first, correction, clock).is_err());
    assert_eq!(competition.active().map(Match::id), Some(second));
}

#[test]
fn apply_active_needs_an_active_match() {
    let ref mut competition = Competition::seeded("cup", 8);
    assert_eq!(
        competition.apply_active(Command::Start, 0),
        Err(CompetitionError::NoActiveMatch)
    );
}

#[test]
fn events_are_relayed() {
    let ref mut competition = Competition::seeded("cup", 9);
    let ids = roster(competition, 2);
    assert!(competition.drain().contains(&CompetitionEvent::Changed));
    let id = competition.create_game([ids[0], ids[1]]).unwrap();
    let events = competition.drain();
    assert!(events.contains(&CompetitionEvent::Changed));
    assert!(events.contains(&CompetitionEvent::ActiveSet { id }));
    competition.apply_active(Command::Start, 1_000).unwrap();
    assert_eq!(
        competition.drain(),
        vec![CompetitionEvent::MatchChanged {
            id,
            kind: MatchEvent::RoundStarted,
        }]
    );
}

#[test]
fn tick_ends_round_at_time_limit() {
    let ref mut competition = Competition::seeded("cup", 10);
    let ids = roster(competition, 2);
    let id = competition.create_game([ids[0], ids[1]]).unwrap();
    competition.apply_active(Command::Start, 0).unwrap();
    competition.drain();
    competition.tick(MAIN_ROUND_LENGTH - 1).unwrap();
    assert!(competition.drain().is_empty());
    competition.tick(MAIN_ROUND_LENGTH).unwrap();
    let events = competition.drain();
    assert!(events.contains(&CompetitionEvent::MatchChanged {
        id,
        kind: MatchEvent::RoundEnded,
    }));
}

#[test]
fn record_restore_is_a_fixed_point() {
    let ref mut competition = Competition::seeded("cup", 11);
    let ids = roster(competition, 6);
    competition.start_tournament(config(true, 2, true)).unwrap();
    let mut clock = 0;
    let first = competition.matches().next().map(Match::id).unwrap();
    sweep(competition, first, &mut clock);
    competition.create_game([ids[0], ids[1]]).unwrap();
    let record = competition.record();
    let matches = competition.matches().cloned().collect::<Vec<_>>();
    let restored = Competition::restore(record.clone(), matches, Some(1)).unwrap();
    assert_eq!(restored.record(), record);
    assert_eq!(restored.matches().count(), competition.matches().count());
    let json = serde_json::to_string(&record).unwrap();
    let back = serde_json::from_str::<CompetitionRecord>(&json).unwrap();
    assert_eq!(back, record);
}

#[test]
fn restore_rejects_missing_matches() {
    let ref mut competition = Competition::seeded("cup", 12);
    roster(competition, 4);
    competition.start_tournament(config(true, 1, false)).unwrap();
    let record = competition.record();
    assert!(matches!(
        Competition::restore(record, Vec::new(), None),
        Err(CompetitionError::Stage(StageError::UnknownMatch(_)))
    ));
}

use super::*;
use rand::Rng;
use rand::seq::SliceRandom;
use rbb_core::*;
use rbb_gameplay::*;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Swiss-system stage: a fixed number of rounds in which every
/// contestant meets a similarly-ranked opponent they have not played.
///
/// A round is generated only once every match of the previous round has
/// ended, and is drawn so that the rounds still to come can be paired.
/// Scores and tiebreaks are derived from match outcomes on demand and
/// never stored. A round that cannot be drawn stalls the stage.
#[derive(Debug, Clone)]
pub struct SwissStage {
    contestants: Vec<ID<Contestant>>,
    round_count: usize,
    matches: Vec<Match>,
    byes: Vec<ID<Contestant>>,
    starting_baskets: SideBook,
    has_ended: bool,
    stalled: Option<String>,
    outbox: Vec<StageEvent>,
}

impl SwissStage {
    pub fn new(contestants: Vec<ID<Contestant>>, round_count: usize) -> Self {
        Self {
            starting_baskets: SideBook::new(&contestants),
            contestants,
            round_count,
            matches: Vec::new(),
            byes: Vec::new(),
            has_ended: false,
            stalled: None,
            outbox: Vec::new(),
        }
    }
    pub fn contestants(&self) -> &[ID<Contestant>] {
        &self.contestants
    }
    pub fn round_count(&self) -> usize {
        self.round_count
    }
    pub fn byes(&self) -> &[ID<Contestant>] {
        &self.byes
    }
    pub fn starting_baskets(&self) -> &SideBook {
        &self.starting_baskets
    }
    /// Why the next round could not be drawn, once the stage is stuck.
    pub fn stalled(&self) -> Option<&str> {
        self.stalled.as_deref()
    }
    pub fn has_bye(&self, id: ID<Contestant>) -> bool {
        self.byes.contains(&id)
    }
    pub fn has_played(&self, a: ID<Contestant>, b: ID<Contestant>) -> bool {
        self.matches.iter().any(|m| m.involves(a) && m.involves(b))
    }
    fn matches_per_round(&self) -> usize {
        self.contestants.len() / 2
    }
    /// Number of rounds generated so far.
    pub fn current_round(&self) -> usize {
        match self.matches_per_round() {
            0 => 0,
            per => self.matches.len().div_ceil(per),
        }
    }
}

impl SwissStage {
    /// Scores of every contestant, including bye credits.
    pub fn scores(&self) -> Result<BTreeMap<ID<Contestant>, Points>, StageError> {
        let mut scores = self
            .contestants
            .iter()
            .map(|c| (*c, if self.has_bye(*c) { POINTS_BYE } else { 0 }))
            .collect::<BTreeMap<_, _>>();
        for game in self.matches.iter() {
            if let Some(award) = award(&game.status())? {
                for (id, points) in game.contestants().into_iter().zip(award) {
                    *scores.entry(id).or_default() += points;
                }
            }
        }
        Ok(scores)
    }
    /// Sum of each contestant's opponents' scores over decided matches.
    pub fn tiebreaks(
        &self,
        scores: &BTreeMap<ID<Contestant>, Points>,
    ) -> BTreeMap<ID<Contestant>, Points> {
        let mut tiebreaks = self
            .contestants
            .iter()
            .map(|c| (*c, 0))
            .collect::<BTreeMap<_, Points>>();
        for game in self.matches.iter().filter(|m| m.status().is_decided()) {
            let [a, b] = game.contestants();
            *tiebreaks.entry(a).or_default() += scores.get(&b).copied().unwrap_or_default();
            *tiebreaks.entry(b).or_default() += scores.get(&a).copied().unwrap_or_default();
        }
        tiebreaks
    }
    pub fn score(&self, id: ID<Contestant>) -> Result<Points, StageError> {
        Ok(self.scores()?.get(&id).copied().unwrap_or_default())
    }
    pub fn tiebreak(&self, id: ID<Contestant>) -> Result<Points, StageError> {
        let scores = self.scores()?;
        Ok(self.tiebreaks(&scores).get(&id).copied().unwrap_or_default())
    }
    /// Standings of the whole roster.
    pub fn standings(&self) -> Result<Vec<Standing>, StageError> {
        self.standings_of(&self.contestants)
    }
    /// Standings ranked within `field` only.
    pub fn standings_of(&self, field: &[ID<Contestant>]) -> Result<Vec<Standing>, StageError> {
        let scores = self.scores()?;
        let tiebreaks = self.tiebreaks(&scores);
        Ok(rank(
            field
                .iter()
                .map(|c| {
                    (
                        *c,
                        scores.get(c).copied().unwrap_or_default(),
                        tiebreaks.get(c).copied().unwrap_or_default(),
                    )
                })
                .collect(),
        ))
    }
}

impl SwissStage {
    /// Generate the next round once the current one is over, or end the
    /// stage once every round has been played. A stalled stage stays put.
    pub fn proceed(&mut self, rng: &mut impl Rng) -> Result<(), StageError> {
        if self.stalled.is_some() || self.matches.iter().any(|m| !m.has_ended()) {
            return Ok(());
        }
        if self.matches.len() >= self.round_count * self.matches_per_round() {
            if !self.has_ended {
                log::info!("[swiss] all {} rounds played", self.round_count);
                self.has_ended = true;
                self.outbox.push(StageEvent::Ended);
            }
            return Ok(());
        }
        if let Err(e) = self.create_round(rng) {
            log::error!(
                "[swiss] round {} not created, stage stalled: {}",
                self.current_round() + 1,
                e
            );
            self.stalled = Some(e.to_string());
            self.outbox.push(StageEvent::Stalled);
        }
        Ok(())
    }

    fn create_round(&mut self, rng: &mut impl Rng) -> Result<(), StageError> {
        let wanted = self.round_count.saturating_sub(self.current_round() + 1);
        let ranked = self
            .standings()?
            .into_iter()
            .map(|s| s.contestant)
            .collect::<Vec<_>>();
        let ref mut lookahead = Lookahead::new(
            &ranked,
            |a, b| self.has_played(a, b),
            |c| self.has_bye(c),
        );
        let remaining = lookahead.horizon(wanted);
        if remaining < wanted {
            log::warn!(
                "[swiss] only {} of the last {} rounds can be paired",
                remaining + 1,
                wanted + 1
            );
        }
        let (bye, pairs) = match self.contestants.len() % 2 {
            0 => self.draw(lookahead, remaining)?,
            _ => self.draw_with_bye(lookahead, remaining, rng)?,
        };
        log::debug!("[swiss] lookahead took {} steps", lookahead.steps());
        if let Some(bye) = bye {
            log::info!("[swiss] bye for {}", bye);
            self.byes.push(bye);
        }
        for pair in pairs {
            let id = self.matches.len() as MatchId + 1;
            let baskets = self.starting_baskets.assign(pair, rng);
            self.starting_baskets.record(pair, baskets);
            let mut game = Match::new(id, pair, baskets, true, rng);
            game.drain();
            log::debug!("[swiss] match {} {} vs {}", id, pair[0], pair[1]);
            self.matches.push(game);
        }
        self.outbox.push(StageEvent::Changed);
        Ok(())
    }

    /// Pair the whole field, keeping the last `remaining` rounds pairable
    /// when the preferred pairing would not.
    fn draw(&self, lookahead: &mut Lookahead, remaining: usize) -> Result<Draw, StageError> {
        let preferred = (None, self.pair_field(&self.contestants)?);
        if lookahead.allows(&preferred, remaining) {
            return Ok(preferred);
        }
        Ok(lookahead.search(remaining).unwrap_or(preferred))
    }

    /// Try bye-eligible contestants in random order until the rest of the
    /// field can be paired without dooming a later round.
    fn draw_with_bye(
        &self,
        lookahead: &mut Lookahead,
        remaining: usize,
        rng: &mut impl Rng,
    ) -> Result<Draw, StageError> {
        let mut eligible = self
            .contestants
            .iter()
            .copied()
            .filter(|c| !self.has_bye(*c))
            .collect::<Vec<_>>();
        eligible.shuffle(rng);
        let mut fallback = None;
        let mut failure = StageError::ByesExhausted;
        for candidate in eligible {
            let field = self
                .contestants
                .iter()
                .copied()
                .filter(|c| *c != candidate)
                .collect::<Vec<_>>();
            match self.pair_field(&field) {
                Ok(pairs) => {
                    let draw = (Some(candidate), pairs);
                    if lookahead.allows(&draw, remaining) {
                        return Ok(draw);
                    }
                    fallback.get_or_insert(draw);
                }
                Err(e) => failure = e,
            }
        }
        lookahead.search(remaining).or(fallback).ok_or(failure)
    }

    /// Roster order in the first round, standings afterwards.
    fn pair_field(&self, field: &[ID<Contestant>]) -> Result<Vec<[ID<Contestant>; 2]>, StageError> {
        match self.matches.is_empty() {
            true => Ok(field.chunks_exact(2).map(|c| [c[0], c[1]]).collect()),
            false => pairing::pair(&self.standings_of(field)?, |a, b| self.has_played(a, b)),
        }
    }
}

impl Stage for SwissStage {
    fn matches(&self) -> &[Match] {
        &self.matches
    }
    fn matches_mut(&mut self) -> &mut [Match] {
        &mut self.matches
    }
    fn outbox(&mut self) -> &mut Vec<StageEvent> {
        &mut self.outbox
    }
    fn has_ended(&self) -> bool {
        self.has_ended
    }
    fn settle(&mut self, _: MatchId, rng: &mut impl Rng) -> Result<(), StageError> {
        self.proceed(rng)
    }
}

/// Stored form of a [`SwissStage`]; matches are stored separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwissRecord {
    pub contestants: Vec<ID<Contestant>>,
    pub round_count: usize,
    pub match_ids: Vec<MatchId>,
    pub byes: Vec<ID<Contestant>>,
    pub starting_baskets: SideBook,
    pub has_ended: bool,
    #[serde(default)]
    pub stalled: Option<String>,
}

impl SwissStage {
    pub fn record(&self) -> SwissRecord {
        SwissRecord {
            contestants: self.contestants.clone(),
            round_count: self.round_count,
            match_ids: self.matches.iter().map(Match::id).collect(),
            byes: self.byes.clone(),
            starting_baskets: self.starting_baskets.clone(),
            has_ended: self.has_ended,
            stalled: self.stalled.clone(),
        }
    }
    pub fn restore(
        record: SwissRecord,
        matches: Vec<Match>,
        rng: &mut impl Rng,
    ) -> Result<Self, StageError> {
        let mut matches = reorder(&record.match_ids, matches)?;
        for game in matches.iter_mut() {
            game.resume(rng);
            game.drain();
        }
        Ok(Self {
            contestants: record.contestants,
            round_count: record.round_count,
            matches,
            byes: record.byes,
            starting_baskets: record.starting_baskets,
            has_ended: record.has_ended,
            stalled: record.stalled,
            outbox: Vec::new(),
        })
    }
}

/// Broadcast snapshot of a [`SwissStage`].
#[derive(Debug, Clone, Serialize)]
pub struct SwissView {
    pub round_count: usize,
    pub current_round: usize,
    pub match_ids: Vec<MatchId>,
    pub byes: Vec<ID<Contestant>>,
    pub standings: Vec<Standing>,
    pub has_ended: bool,
    pub stalled: Option<String>,
}

impl SwissStage {
    pub fn summary(&self) -> SwissView {
        SwissView {
            round_count: self.round_count,
            current_round: self.current_round(),
            match_ids: self.matches.iter().map(Match::id).collect(),
            byes: self.byes.clone(),
            standings: self
                .standings()
                .inspect_err(|e| log::warn!("[swiss] standings unavailable: {}", e))
                .unwrap_or_default(),
            has_ended: self.has_ended,
            stalled: self.stalled.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn field(n: usize) -> Vec<ID<Contestant>> {
        (0..n).map(|_| ID::default()).collect()
    }
    fn sweep(swiss: &mut SwissStage, id: MatchId, rng: &mut SmallRng) {
        for round in 0..2 {
            let now = round * 100_000;
            swiss.apply(id, Command::Start, now, rng).unwrap();
            swiss
                .apply(id, Command::IncrementScore { side: 0 }, now + 1, rng)
                .unwrap();
            swiss.apply(id, Command::EndRound, now + 2, rng).unwrap();
            swiss.apply(id, Command::Confirm, now + 3, rng).unwrap();
        }
    }

    #[test]
    fn first_round_pairs_roster_order() {
        let ref mut rng = SmallRng::seed_from_u64(0);
        let ids = field(4);
        let ref mut swiss = SwissStage::new(ids.clone(), 3);
        swiss.proceed(rng).unwrap();
        let pairs = swiss.matches().iter().map(Match::contestants).collect::<Vec<_>>();
        assert_eq!(pairs, vec![[ids[0], ids[1]], [ids[2], ids[3]]]);
        assert_eq!(swiss.matches()[0].id(), 1);
        assert_eq!(swiss.matches()[1].id(), 2);
        assert!(swiss.matches().iter().all(Match::is_tie_allowed));
        assert_eq!(swiss.drain(), vec![StageEvent::Changed]);
    }
    #[test]
    fn proceed_waits_for_round() {
        let ref mut rng = SmallRng::seed_from_u64(0);
        let ref mut swiss = SwissStage::new(field(4), 3);
        swiss.proceed(rng).unwrap();
        swiss.proceed(rng).unwrap();
        assert_eq!(swiss.matches().len(), 2);
    }
    #[test]
    fn empty_stage_ends_immediately() {
        let ref mut rng = SmallRng::seed_from_u64(0);
        let ref mut swiss = SwissStage::new(field(1), 3);
        swiss.proceed(rng).unwrap();
        assert!(swiss.has_ended());
        assert!(swiss.matches().is_empty());
        assert_eq!(swiss.drain(), vec![StageEvent::Ended]);
    }
    #[test]
    fn bye_scores_full_credit() {
        let ref mut rng = SmallRng::seed_from_u64(3);
        let ref mut swiss = SwissStage::new(field(3), 2);
        swiss.proceed(rng).unwrap();
        assert_eq!(swiss.byes().len(), 1);
        let bye = swiss.byes()[0];
        assert_eq!(swiss.score(bye), Ok(POINTS_BYE));
        assert_eq!(swiss.standings().unwrap()[0].contestant, bye);
    }
    #[test]
    fn record_roundtrip() {
        let ref mut rng = SmallRng::seed_from_u64(5);
        let ref mut swiss = SwissStage::new(field(5), 4);
        swiss.proceed(rng).unwrap();
        let record = swiss.record();
        let restored = SwissStage::restore(record.clone(), swiss.matches().to_vec(), rng).unwrap();
        assert_eq!(restored.record(), record);
    }
    #[test]
    fn impossible_round_stalls_the_stage() {
        // four contestants run out of new opponents after three rounds
        let ref mut rng = SmallRng::seed_from_u64(2);
        let ref mut swiss = SwissStage::new(field(4), 4);
        swiss.proceed(rng).unwrap();
        for _ in 0..3 {
            let open = swiss.matches().iter().filter(|m| !m.has_ended()).map(Match::id);
            for id in open.collect::<Vec<_>>() {
                sweep(swiss, id, rng);
            }
        }
        assert_eq!(swiss.matches().len(), 6);
        assert!(swiss.matches().iter().all(Match::has_ended));
        assert!(!swiss.has_ended());
        assert!(swiss.stalled().is_some());
        let events = swiss.drain();
        assert_eq!(events.iter().filter(|e| **e == StageEvent::Stalled).count(), 1);
        assert!(!events.contains(&StageEvent::Ended));
        swiss.proceed(rng).unwrap();
        assert!(swiss.drain().is_empty());
        let record = swiss.record();
        assert!(record.stalled.is_some());
        let restored = SwissStage::restore(record.clone(), swiss.matches().to_vec(), rng).unwrap();
        assert_eq!(restored.stalled(), swiss.stalled());
        assert!(restored.summary().stalled.is_some());
        assert_eq!(restored.record(), record);
    }
    #[test]
    fn restore_requires_every_match() {
        let ref mut rng = SmallRng::seed_from_u64(5);
        let ref mut swiss = SwissStage::new(field(4), 4);
        swiss.proceed(rng).unwrap();
        let record = swiss.record();
        let partial = swiss.matches()[..1].to_vec();
        assert_eq!(
            SwissStage::restore(record, partial, rng).err(),
            Some(StageError::UnknownMatch(2))
        );
    }
}

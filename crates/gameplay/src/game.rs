use super::*;
use rand::Rng;
use rbb_core::*;
use serde::Deserialize;
use serde::Serialize;

/// A head-to-head match between two contestants.
///
/// States advance `rounds 1..=6 → free throws → ended`. A new round (or
/// the free-throw series) is only created once the previous unit is
/// ended and confirmed, so a referee can correct a round before it
/// counts. Round and free-throw events are relayed into the match outbox
/// as [`MatchEvent`]s.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    id: MatchId,
    contestants: [ID<Contestant>; 2],
    starting_baskets: [Basket; 2],
    is_tie_allowed: bool,
    has_ended: bool,
    rounds: Vec<Round>,
    free_throws: Option<FreeThrows>,
    ball_placement: Vec<Ball>,
    #[serde(skip)]
    outbox: Vec<MatchEvent>,
}

impl Match {
    /// Create a match and open its first round.
    pub fn new(
        id: MatchId,
        contestants: [ID<Contestant>; 2],
        starting_baskets: [Basket; 2],
        is_tie_allowed: bool,
        rng: &mut impl Rng,
    ) -> Self {
        let mut game = Self {
            id,
            contestants,
            starting_baskets,
            is_tie_allowed,
            has_ended: false,
            rounds: Vec::new(),
            free_throws: None,
            ball_placement: ball_placement(rng),
            outbox: Vec::new(),
        };
        game.proceed(rng);
        game
    }
    pub fn id(&self) -> MatchId {
        self.id
    }
    pub fn contestants(&self) -> [ID<Contestant>; 2] {
        self.contestants
    }
    pub fn starting_baskets(&self) -> [Basket; 2] {
        self.starting_baskets
    }
    pub fn is_tie_allowed(&self) -> bool {
        self.is_tie_allowed
    }
    pub fn has_ended(&self) -> bool {
        self.has_ended
    }
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }
    pub fn free_throws(&self) -> Option<&FreeThrows> {
        self.free_throws.as_ref()
    }
    pub fn ball_placement(&self) -> &[Ball] {
        &self.ball_placement
    }
    pub fn current_round(&self) -> Option<&Round> {
        self.rounds.last()
    }
    pub fn side_of(&self, id: ID<Contestant>) -> Option<Side> {
        self.contestants.iter().position(|c| *c == id)
    }
    pub fn opponent(&self, id: ID<Contestant>) -> Option<ID<Contestant>> {
        self.side_of(id).map(|side| self.contestants[1 - side])
    }
    pub fn involves(&self, id: ID<Contestant>) -> bool {
        self.side_of(id).is_some()
    }
    pub fn winner(&self) -> Option<ID<Contestant>> {
        self.status().winner.map(|side| self.contestants[side])
    }
    pub fn loser(&self) -> Option<ID<Contestant>> {
        self.status().loser().map(|side| self.contestants[side])
    }
    /// True while a round clock or free-throw attempt is running.
    pub fn is_running(&self) -> bool {
        match self.free_throws {
            Some(ref series) => series.is_running(),
            None => self.rounds.last().is_some_and(Round::is_running),
        }
    }
    /// Sides still allowed on the field.
    ///
    /// During free throws only the shooter plays. Within a live round a
    /// side with too many valid fouls sits out until the round ends.
    pub fn in_game_sides(&self) -> Vec<Side> {
        if let Some(ref series) = self.free_throws {
            return vec![series.shooter()];
        }
        match self.rounds.last().filter(|r| !r.has_ended()) {
            None => vec![0, 1],
            Some(round) => {
                let fouls = round.valid_fouls();
                (0..2).filter(|s| fouls[*s] < OUT_OF_ROUND_FOUL_COUNT).collect()
            }
        }
    }
    /// Basket assignment of the unit currently being played.
    pub fn baskets_now(&self) -> [Basket; 2] {
        match (self.free_throws.as_ref(), self.rounds.last()) {
            (Some(series), _) => series.baskets(),
            (None, Some(round)) => round.baskets(),
            (None, None) => self.starting_baskets,
        }
    }
    pub fn drain(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.outbox)
    }
}

impl Match {
    /// Result computed from rounds that are ended and confirmed.
    ///
    /// - best of three main rounds: first side to two round wins
    /// - otherwise a strict lead after three rounds
    /// - otherwise a tie, if ties are allowed
    /// - otherwise the first decisive extra round
    /// - otherwise the free-throw series
    pub fn status(&self) -> Status {
        let settled = self
            .rounds
            .iter()
            .filter(|r| r.is_settled())
            .map(Round::winner)
            .collect::<Vec<_>>();
        if settled.len() < 2 {
            return Status::unknown();
        }
        let mut tally = Tally::default();
        for winner in settled.iter().take(MAIN_ROUNDS) {
            tally.add(*winner);
            if let Some(side) = *winner {
                if tally.wins[side] == ROUND_WINS_NEEDED {
                    return Status::won(side, tally);
                }
            }
        }
        if settled.len() < MAIN_ROUNDS {
            return Status::unknown();
        }
        if let Some(leader) = tally.leader() {
            return Status::won(leader, tally);
        }
        if self.is_tie_allowed {
            return Status::tied(tally);
        }
        if let Some(side) = settled.iter().skip(MAIN_ROUNDS).flatten().next() {
            return Status::won(*side, tally);
        }
        match self.free_throws.as_ref().and_then(FreeThrows::winner) {
            Some(side) => Status::won(side, tally),
            None => Status::unknown(),
        }
    }
}

impl Match {
    /// Route a command to the current round or free-throw series.
    pub fn apply(
        &mut self,
        command: Command,
        now: Millis,
        rng: &mut impl Rng,
    ) -> Result<(), MatchError> {
        if self.has_ended && !command.is_correction() {
            return Err(MatchError::Ended(self.id));
        }
        log::debug!("[match {}] {}", self.id, command);
        let result = match command {
            Command::Start => self.start(now),
            Command::Stop => self.stop(now),
            Command::StartStop if self.is_running() => self.stop(now),
            Command::StartStop => self.start(now),
            Command::EndRound => self.end_round(now),
            Command::IncrementScore { side } => self.increment_score(side, now),
            Command::IncrementBasket { basket } => self.increment_basket(basket, now),
            Command::IncrementFoul { side } => self.increment_foul(side, now),
            Command::Confirm => self.confirm(rng),
            Command::Unconfirm => self.unconfirm(),
            Command::SetScoreValidity {
                round,
                side,
                index,
                is_valid,
            } => self
                .round_at(round)
                .and_then(|r| r.set_score_validity(side, index, is_valid)),
            Command::SetFoulValidity {
                round,
                side,
                index,
                is_valid,
            } => self
                .round_at(round)
                .and_then(|r| r.set_foul_validity(side, index, is_valid)),
        };
        self.relay();
        result
    }
    /// Poll round and attempt time limits.
    pub fn tick(&mut self, now: Millis) {
        match self.free_throws {
            Some(ref mut series) => series.tick(now),
            None => {
                if let Some(round) = self.rounds.last_mut() {
                    round.tick(now);
                }
            }
        }
        self.relay();
    }
    /// Re-derive pending transitions after the match is rebuilt from
    /// a stored document.
    pub fn resume(&mut self, rng: &mut impl Rng) {
        self.proceed(rng);
    }
    fn start(&mut self, now: Millis) -> Result<(), MatchError> {
        match self.free_throws {
            Some(ref mut series) => series.start(now),
            None => self.last_round()?.start(now),
        }
        Ok(())
    }
    fn stop(&mut self, now: Millis) -> Result<(), MatchError> {
        if self.free_throws.is_none() {
            self.last_round()?.stop(now);
        }
        Ok(())
    }
    fn end_round(&mut self, now: Millis) -> Result<(), MatchError> {
        if self.free_throws.is_none() {
            self.last_round()?.end(now);
        }
        Ok(())
    }
    fn increment_score(&mut self, side: Side, now: Millis) -> Result<(), MatchError> {
        match self.free_throws {
            Some(ref mut series) => series.stop(now, true).then_some(()).ok_or(MatchError::Idle),
            None => self.last_round()?.increment_score(side, now),
        }
    }
    fn increment_basket(&mut self, basket: Basket, now: Millis) -> Result<(), MatchError> {
        match self.free_throws {
            Some(ref mut series) => series.stop(now, true).then_some(()).ok_or(MatchError::Idle),
            None => self.last_round()?.increment_score_at(basket, now),
        }
    }
    fn increment_foul(&mut self, side: Side, now: Millis) -> Result<(), MatchError> {
        match self.free_throws {
            Some(ref mut series) => series.stop(now, false).then_some(()).ok_or(MatchError::Idle),
            None => self.last_round()?.increment_foul(side, now),
        }
    }
    fn confirm(&mut self, rng: &mut impl Rng) -> Result<(), MatchError> {
        match self.free_throws {
            Some(ref mut series) => series.confirm(),
            None => self.last_round()?.confirm(),
        }
        self.relay();
        self.proceed(rng);
        Ok(())
    }
    fn unconfirm(&mut self) -> Result<(), MatchError> {
        match self.free_throws {
            Some(ref mut series) => series.unconfirm(),
            None => self.last_round()?.unconfirm(),
        }
        Ok(())
    }
    /// End the match if decided, otherwise open the next unit once the
    /// previous one is settled.
    fn proceed(&mut self, rng: &mut impl Rng) {
        if self.has_ended {
            return;
        }
        if self.status().is_decided() {
            self.has_ended = true;
            self.outbox.push(MatchEvent::Ended);
            log::info!("[match {}] ended ({:?})", self.id, self.status().result);
            return;
        }
        if self.free_throws.is_some() {
            return;
        }
        if self.rounds.last().is_none_or(Round::is_settled) {
            match self.rounds.len() < MAX_ROUNDS {
                true => self.add_round(),
                false => self.add_free_throws(rng),
            }
        }
    }
    fn add_round(&mut self) {
        let index = self.rounds.len();
        let length = match index < MAIN_ROUNDS {
            true => MAIN_ROUND_LENGTH,
            false => EXTRA_ROUND_LENGTH,
        };
        let baskets = match index % 2 {
            0 => self.starting_baskets,
            _ => [self.starting_baskets[1], self.starting_baskets[0]],
        };
        self.rounds.push(Round::new(length, baskets));
        self.outbox.push(MatchEvent::RoundAdded);
        log::debug!("[match {}] round {} added", self.id, index + 1);
    }
    fn add_free_throws(&mut self, rng: &mut impl Rng) {
        let basket = Basket::random(rng);
        self.free_throws = Some(FreeThrows::new(
            basket,
            FREE_THROW_MIN_ROUNDS,
            FREE_THROW_ATTEMPT_LENGTH,
        ));
        self.outbox.push(MatchEvent::FreeThrowsAdded);
        log::info!("[match {}] free throws at {} basket", self.id, basket);
    }
    fn relay(&mut self) {
        for round in self.rounds.iter_mut() {
            self.outbox.extend(round.drain().into_iter().map(MatchEvent::from));
        }
        if let Some(ref mut series) = self.free_throws {
            self.outbox.extend(series.drain().into_iter().map(MatchEvent::from));
        }
    }
    fn last_round(&mut self) -> Result<&mut Round, MatchError> {
        self.rounds.last_mut().ok_or(MatchError::Idle)
    }
    fn round_at(&mut self, index: Option<usize>) -> Result<&mut Round, MatchError> {
        match index {
            None => self.last_round(),
            Some(i) => self.rounds.get_mut(i).ok_or(MatchError::UnknownRound(i)),
        }
    }
}

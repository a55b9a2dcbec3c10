use super::*;
use rbb_core::Millis;
use rbb_core::Side;
use serde::Deserialize;
use serde::Serialize;

/// A single timed scoring period between the two sides of a match.
///
/// The clock is a list of [`Run`]s so it can be paused and resumed.
/// Scores and fouls are append-only; referees correct them by flipping
/// validity. Once a round is ended and confirmed, only validity edits
/// are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    runs: Vec<Run>,
    scores: [Vec<Mark>; 2],
    fouls: [Vec<Mark>; 2],
    baskets: [Basket; 2],
    time_limit: Millis,
    has_ended: bool,
    is_confirmed: bool,
    #[serde(skip)]
    outbox: Vec<RoundEvent>,
}

impl Round {
    pub fn new(time_limit: Millis, baskets: [Basket; 2]) -> Self {
        Self {
            runs: Vec::new(),
            scores: [Vec::new(), Vec::new()],
            fouls: [Vec::new(), Vec::new()],
            baskets,
            time_limit,
            has_ended: false,
            is_confirmed: false,
            outbox: Vec::new(),
        }
    }
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }
    pub fn scores(&self) -> &[Vec<Mark>; 2] {
        &self.scores
    }
    pub fn fouls(&self) -> &[Vec<Mark>; 2] {
        &self.fouls
    }
    pub fn baskets(&self) -> [Basket; 2] {
        self.baskets
    }
    pub fn time_limit(&self) -> Millis {
        self.time_limit
    }
    pub fn has_ended(&self) -> bool {
        self.has_ended
    }
    pub fn is_confirmed(&self) -> bool {
        self.is_confirmed
    }
    /// Ended and confirmed: the round counts toward the match result.
    pub fn is_settled(&self) -> bool {
        self.has_ended && self.is_confirmed
    }
    pub fn is_running(&self) -> bool {
        self.runs.last().is_some_and(Run::is_open)
    }
    /// Accumulated clock time over every run, the open one measured to `now`.
    pub fn runtime(&self, now: Millis) -> Millis {
        self.runs.iter().map(|r| r.elapsed(now)).sum()
    }
    pub fn remaining(&self, now: Millis) -> Millis {
        (self.time_limit - self.runtime(now)).max(0)
    }
    pub fn valid_scores(&self) -> [usize; 2] {
        [count_valid(&self.scores[0]), count_valid(&self.scores[1])]
    }
    pub fn valid_fouls(&self) -> [usize; 2] {
        [count_valid(&self.fouls[0]), count_valid(&self.fouls[1])]
    }
    /// Round winner by valid scores. `None` until settled, and on a tie.
    pub fn winner(&self) -> Option<Side> {
        if !self.is_settled() {
            return None;
        }
        let [a, b] = self.valid_scores();
        match a.cmp(&b) {
            std::cmp::Ordering::Greater => Some(0),
            std::cmp::Ordering::Less => Some(1),
            std::cmp::Ordering::Equal => None,
        }
    }
    /// Side scoring into `basket` this round.
    pub fn side_of(&self, basket: Basket) -> Option<Side> {
        self.baskets.iter().position(|b| *b == basket)
    }
    /// Take all events emitted since the last drain.
    pub fn drain(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.outbox)
    }
}

impl Round {
    /// Open a new run unless the round has ended or a run is already open.
    pub fn start(&mut self, now: Millis) {
        if self.has_ended || self.is_running() {
            return;
        }
        self.runs.push(Run::open(now));
        self.outbox.push(RoundEvent::Started);
    }
    pub fn stop(&mut self, now: Millis) {
        if let Some(run) = self.runs.last_mut().filter(|r| r.is_open()) {
            run.end = Some(now.max(run.start));
            self.outbox.push(RoundEvent::Stopped);
        }
    }
    /// Idempotent: a second call changes nothing and emits nothing.
    pub fn end(&mut self, now: Millis) {
        if self.has_ended {
            return;
        }
        self.stop(now);
        self.has_ended = true;
        self.outbox.push(RoundEvent::Ended);
    }
    /// Poll the time limit. The closing run is clamped so the recorded
    /// runtime never exceeds the limit, however late the poll arrives.
    pub fn tick(&mut self, now: Millis) {
        if self.has_ended || !self.is_running() {
            return;
        }
        let remaining = self.remaining(now);
        if remaining > 0 {
            return;
        }
        let closed = self.runs[..self.runs.len() - 1]
            .iter()
            .map(|r| r.elapsed(now))
            .sum::<Millis>();
        let deadline = self
            .runs
            .last()
            .map(|r| r.start + (self.time_limit - closed).max(0))
            .unwrap_or(now);
        log::debug!("[round] time limit reached");
        self.end(deadline.min(now));
    }
    pub fn increment_score(&mut self, side: Side, now: Millis) -> Result<(), MatchError> {
        self.writable(side)?;
        self.scores[side].push(Mark::at(now));
        self.outbox.push(RoundEvent::ScoreChanged);
        Ok(())
    }
    /// Record a score reported by a basket counter.
    pub fn increment_score_at(&mut self, basket: Basket, now: Millis) -> Result<(), MatchError> {
        let side = self.side_of(basket).ok_or(MatchError::Idle)?;
        self.increment_score(side, now)
    }
    pub fn increment_foul(&mut self, side: Side, now: Millis) -> Result<(), MatchError> {
        self.writable(side)?;
        self.fouls[side].push(Mark::at(now));
        self.outbox.push(RoundEvent::FoulsChanged);
        Ok(())
    }
    pub fn confirm(&mut self) {
        self.set_confirmed(true);
    }
    pub fn unconfirm(&mut self) {
        self.set_confirmed(false);
    }
    pub fn set_score_validity(
        &mut self,
        side: Side,
        index: usize,
        is_valid: bool,
    ) -> Result<(), MatchError> {
        let mark = Self::entry(&mut self.scores, side, index)?;
        if mark.is_valid != is_valid {
            mark.is_valid = is_valid;
            self.outbox.push(RoundEvent::ScoreValidityChanged);
        }
        Ok(())
    }
    pub fn set_foul_validity(
        &mut self,
        side: Side,
        index: usize,
        is_valid: bool,
    ) -> Result<(), MatchError> {
        let mark = Self::entry(&mut self.fouls, side, index)?;
        if mark.is_valid != is_valid {
            mark.is_valid = is_valid;
            self.outbox.push(RoundEvent::FoulValidityChanged);
        }
        Ok(())
    }
    fn set_confirmed(&mut self, value: bool) {
        if self.has_ended && self.is_confirmed != value {
            self.is_confirmed = value;
            self.outbox.push(RoundEvent::ConfirmedChanged);
        }
    }
    fn writable(&self, side: Side) -> Result<(), MatchError> {
        if side > 1 {
            Err(MatchError::InvalidSide(side))
        } else if self.is_settled() {
            Err(MatchError::Locked)
        } else {
            Ok(())
        }
    }
    fn entry(marks: &mut [Vec<Mark>; 2], side: Side, index: usize) -> Result<&mut Mark, MatchError> {
        marks
            .get_mut(side)
            .ok_or(MatchError::InvalidSide(side))?
            .get_mut(index)
            .ok_or(MatchError::UnknownEntry { side, index })
    }
}

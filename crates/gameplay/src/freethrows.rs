use super::*;
use rbb_core::Millis;
use rbb_core::Side;
use serde::Deserialize;
use serde::Serialize;

/// Sudden-death tiebreak after six undecided rounds.
///
/// Each free-throw round is a pair of attempts, side 0 shooting first,
/// both at the same basket. An attempt must be ended and confirmed
/// before the next one may start.
///
/// Resolution: during the `min_rounds` guaranteed rounds, a lead larger
/// than the guaranteed rounds still to play wins outright. After that,
/// the first round that breaks the tie wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeThrows {
    basket: Basket,
    min_rounds: usize,
    time_limit: Millis,
    rounds: Vec<Vec<Attempt>>,
    has_ended: bool,
    #[serde(skip)]
    outbox: Vec<ThrowEvent>,
}

impl FreeThrows {
    pub fn new(basket: Basket, min_rounds: usize, time_limit: Millis) -> Self {
        Self {
            basket,
            min_rounds,
            time_limit,
            rounds: Vec::new(),
            has_ended: false,
            outbox: Vec::new(),
        }
    }
    pub fn basket(&self) -> Basket {
        self.basket
    }
    /// Both sides shoot at the same basket.
    pub fn baskets(&self) -> [Basket; 2] {
        [self.basket, self.basket]
    }
    pub fn min_rounds(&self) -> usize {
        self.min_rounds
    }
    pub fn time_limit(&self) -> Millis {
        self.time_limit
    }
    pub fn rounds(&self) -> &[Vec<Attempt>] {
        &self.rounds
    }
    pub fn has_ended(&self) -> bool {
        self.has_ended
    }
    pub fn is_running(&self) -> bool {
        self.last().is_some_and(Attempt::is_open)
    }
    /// Side currently (or most recently) shooting.
    pub fn shooter(&self) -> Side {
        self.last().map(|a| a.side).unwrap_or(0)
    }
    /// Made attempts per side, confirmed or not.
    pub fn scores(&self) -> [usize; 2] {
        let mut scores = [0; 2];
        for attempt in self.rounds.iter().flatten().filter(|a| a.did_score) {
            scores[attempt.side] += 1;
        }
        scores
    }
    /// Winner of the series, if decided by settled rounds.
    pub fn winner(&self) -> Option<Side> {
        let mut wins = [0usize; 2];
        let settled = self
            .rounds
            .iter()
            .take_while(|r| r.len() == 2 && r.iter().all(Attempt::is_settled));
        for (played, round) in settled.enumerate() {
            match (round[0].did_score, round[1].did_score) {
                (true, false) => wins[0] += 1,
                (false, true) => wins[1] += 1,
                _ => {}
            }
            let guaranteed = self.min_rounds.saturating_sub(played + 1);
            let lead = wins[0].abs_diff(wins[1]);
            if lead > guaranteed {
                return Some(if wins[0] > wins[1] { 0 } else { 1 });
            }
        }
        None
    }
    pub fn drain(&mut self) -> Vec<ThrowEvent> {
        std::mem::take(&mut self.outbox)
    }
    fn last(&self) -> Option<&Attempt> {
        self.rounds.last().and_then(|r| r.last())
    }
    fn last_mut(&mut self) -> Option<&mut Attempt> {
        self.rounds.last_mut().and_then(|r| r.last_mut())
    }
}

impl FreeThrows {
    /// Open the next attempt once the previous one is ended and confirmed.
    pub fn start(&mut self, now: Millis) {
        if self.has_ended {
            return;
        }
        if self.last().is_some_and(|a| !a.is_settled()) {
            return;
        }
        let side = match self.rounds.last() {
            Some(round) if round.len() < 2 => round.len(),
            _ => 0,
        };
        if side == 0 {
            self.rounds.push(Vec::with_capacity(2));
        }
        if let Some(round) = self.rounds.last_mut() {
            round.push(Attempt::open(side, now));
            self.outbox.push(ThrowEvent::AttemptStarted);
        }
    }
    /// Close the open attempt. Returns false when no attempt was open.
    pub fn stop(&mut self, now: Millis, did_score: bool) -> bool {
        match self.last_mut().filter(|a| a.is_open()) {
            Some(attempt) => {
                attempt.end = Some(now.max(attempt.start));
                attempt.did_score = did_score;
                self.outbox.push(ThrowEvent::AttemptEnded);
                true
            }
            None => false,
        }
    }
    /// An attempt left open past the time limit is a miss.
    pub fn tick(&mut self, now: Millis) {
        let limit = self.time_limit;
        if let Some(start) = self.last().filter(|a| a.is_open()).map(|a| a.start) {
            if now - start >= limit {
                log::debug!("[free throws] attempt timed out");
                self.stop(start + limit, false);
            }
        }
    }
    pub fn confirm(&mut self) {
        if self.has_ended {
            return;
        }
        match self.last_mut() {
            Some(attempt) if !attempt.is_open() && !attempt.is_confirmed => {
                attempt.is_confirmed = true;
                self.outbox.push(ThrowEvent::ConfirmedChanged);
            }
            _ => return,
        }
        if self.winner().is_some() {
            self.has_ended = true;
            self.outbox.push(ThrowEvent::Ended);
        }
    }
    pub fn unconfirm(&mut self) {
        if self.has_ended {
            return;
        }
        if let Some(attempt) = self.last_mut().filter(|a| a.is_settled()) {
            attempt.is_confirmed = false;
            self.outbox.push(ThrowEvent::ConfirmedChanged);
        }
    }
}

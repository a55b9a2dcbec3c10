use super::*;
use rbb_core::*;
use serde::Serialize;

/// Broadcast snapshot of a match, with clock readings taken at `now`.
#[derive(Debug, Clone, Serialize)]
pub struct MatchView {
    pub id: MatchId,
    pub contestants: [ID<Contestant>; 2],
    pub starting_baskets: [Basket; 2],
    pub is_tie_allowed: bool,
    pub has_ended: bool,
    pub is_running: bool,
    pub rounds: Vec<RoundView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_throws: Option<FreeThrowsView>,
    pub status: Status,
    pub ball_placement: Vec<Ball>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundView {
    pub scores: [Vec<Mark>; 2],
    pub fouls: [Vec<Mark>; 2],
    pub baskets: [Basket; 2],
    pub has_ended: bool,
    pub is_confirmed: bool,
    pub duration: Millis,
    pub time_limit: Millis,
    pub winner: Option<Side>,
    pub runs: Vec<Run>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FreeThrowsView {
    pub has_ended: bool,
    pub basket: Basket,
    pub scores: [usize; 2],
    pub time_limit: Millis,
    pub rounds: Vec<Vec<Attempt>>,
    pub winner: Option<Side>,
}

impl Match {
    pub fn summary(&self, now: Millis) -> MatchView {
        MatchView {
            id: self.id(),
            contestants: self.contestants(),
            starting_baskets: self.starting_baskets(),
            is_tie_allowed: self.is_tie_allowed(),
            has_ended: self.has_ended(),
            is_running: self.is_running(),
            rounds: self.rounds().iter().map(|r| r.summary(now)).collect(),
            free_throws: self.free_throws().map(FreeThrows::summary),
            status: self.status(),
            ball_placement: self.ball_placement().to_vec(),
        }
    }
}

impl Round {
    pub fn summary(&self, now: Millis) -> RoundView {
        RoundView {
            scores: self.scores().clone(),
            fouls: self.fouls().clone(),
            baskets: self.baskets(),
            has_ended: self.has_ended(),
            is_confirmed: self.is_confirmed(),
            duration: self.runtime(now).min(self.time_limit()),
            time_limit: self.time_limit(),
            winner: self.winner(),
            runs: self.runs().to_vec(),
        }
    }
}

impl FreeThrows {
    pub fn summary(&self) -> FreeThrowsView {
        FreeThrowsView {
            has_ended: self.has_ended(),
            basket: self.basket(),
            scores: self.scores(),
            time_limit: self.time_limit(),
            rounds: self.rounds().to_vec(),
            winner: self.winner(),
        }
    }
}

use rbb_core::Side;
use serde::Deserialize;
use serde::Serialize;

/// Match result category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    #[default]
    Unknown,
    Tied,
    Won,
}

/// Result of a match with the round tallies that produced it.
///
/// Tallies cover the three main rounds only and are read from the
/// winner's perspective; a tie reports side 0's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Status {
    pub result: Outcome,
    pub winner: Option<Side>,
    pub round_win_count: usize,
    pub round_loss_count: usize,
    pub round_tie_count: usize,
}

impl Status {
    pub fn unknown() -> Self {
        Self::default()
    }
    pub fn tied(tally: Tally) -> Self {
        Self {
            result: Outcome::Tied,
            winner: None,
            round_win_count: tally.wins[0],
            round_loss_count: tally.wins[1],
            round_tie_count: tally.ties,
        }
    }
    pub fn won(side: Side, tally: Tally) -> Self {
        Self {
            result: Outcome::Won,
            winner: Some(side),
            round_win_count: tally.wins[side],
            round_loss_count: tally.wins[1 - side],
            round_tie_count: tally.ties,
        }
    }
    pub fn is_decided(&self) -> bool {
        self.result != Outcome::Unknown
    }
    pub fn loser(&self) -> Option<Side> {
        self.winner.map(|w| 1 - w)
    }
    /// (wins, losses, ties) from the winner's perspective.
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.round_win_count,
            self.round_loss_count,
            self.round_tie_count,
        )
    }
}

/// Running round tally over settled rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    pub wins: [usize; 2],
    pub ties: usize,
}

impl Tally {
    pub fn add(&mut self, winner: Option<Side>) {
        match winner {
            Some(side) => self.wins[side] += 1,
            None => self.ties += 1,
        }
    }
    pub fn leader(&self) -> Option<Side> {
        match self.wins[0].cmp(&self.wins[1]) {
            std::cmp::Ordering::Greater => Some(0),
            std::cmp::Ordering::Less => Some(1),
            std::cmp::Ordering::Equal => None,
        }
    }
}

use super::*;
use rbb_core::Side;

/// A referee, basket-counter, or operator action on one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    /// Start when stopped, stop when running.
    StartStop,
    EndRound,
    IncrementScore {
        side: Side,
    },
    /// A basket counter reporting a made shot.
    IncrementBasket {
        basket: Basket,
    },
    IncrementFoul {
        side: Side,
    },
    Confirm,
    Unconfirm,
    SetScoreValidity {
        round: Option<usize>,
        side: Side,
        index: usize,
        is_valid: bool,
    },
    SetFoulValidity {
        round: Option<usize>,
        side: Side,
        index: usize,
        is_valid: bool,
    },
}

impl Command {
    /// Referee corrections are accepted after a match has ended.
    pub fn is_correction(&self) -> bool {
        matches!(
            self,
            Self::SetScoreValidity { .. } | Self::SetFoulValidity { .. }
        )
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Stop => write!(f, "stop"),
            Self::StartStop => write!(f, "start_stop"),
            Self::EndRound => write!(f, "end_round"),
            Self::IncrementScore { side } => write!(f, "increment_score S{}", side),
            Self::IncrementBasket { basket } => write!(f, "increment_basket {}", basket),
            Self::IncrementFoul { side } => write!(f, "increment_fouls S{}", side),
            Self::Confirm => write!(f, "confirm"),
            Self::Unconfirm => write!(f, "unconfirm"),
            Self::SetScoreValidity {
                side,
                index,
                is_valid,
                ..
            } => write!(f, "set_score_validity S{}#{}={}", side, index, is_valid),
            Self::SetFoulValidity {
                side,
                index,
                is_valid,
                ..
            } => write!(f, "set_foul_validity S{}#{}={}", side, index, is_valid),
        }
    }
}

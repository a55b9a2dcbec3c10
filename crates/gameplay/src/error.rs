use rbb_core::MatchId;
use rbb_core::Side;

/// Errors raised when a command cannot be applied to a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// The match has already been decided.
    Ended(MatchId),
    /// Side index outside `0..2`.
    InvalidSide(Side),
    /// No round exists at this index.
    UnknownRound(usize),
    /// No score or foul exists at this index for this side.
    UnknownEntry { side: Side, index: usize },
    /// The round is ended and confirmed; only validity edits remain.
    Locked,
    /// The match has neither a round nor a free-throw series to act on.
    Idle,
}

impl std::fmt::Display for MatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ended(id) => write!(f, "match {} has ended", id),
            Self::InvalidSide(side) => write!(f, "invalid side: {}", side),
            Self::UnknownRound(index) => write!(f, "no round at index {}", index),
            Self::UnknownEntry { side, index } => {
                write!(f, "no entry at index {} for side {}", index, side)
            }
            Self::Locked => write!(f, "round is ended and confirmed"),
            Self::Idle => write!(f, "nothing to act on"),
        }
    }
}

impl std::error::Error for MatchError {}

use rbb_core::MatchId;
use rbb_gameplay::MatchError;

/// Errors raised by tournament stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    /// The remaining field cannot be split into unplayed pairs.
    Pairing(String),
    /// An odd field needs a bye but every contestant already had one.
    ByesExhausted,
    /// A decided match whose round tallies match no scoring row.
    Unscored {
        wins: usize,
        losses: usize,
        ties: usize,
    },
    UnknownMatch(MatchId),
    Match(MatchError),
}

impl std::fmt::Display for StageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pairing(reason) => write!(f, "pairing failed: {}", reason),
            Self::ByesExhausted => write!(f, "no contestant is eligible for a bye"),
            Self::Unscored { wins, losses, ties } => write!(
                f,
                "unscored outcome: {} wins, {} losses, {} ties",
                wins, losses, ties
            ),
            Self::UnknownMatch(id) => write!(f, "unknown match {}", id),
            Self::Match(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for StageError {}

impl From<MatchError> for StageError {
    fn from(e: MatchError) -> Self {
        Self::Match(e)
    }
}

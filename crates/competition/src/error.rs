use rbb_core::ID;
use rbb_core::MatchId;
use rbb_gameplay::Contestant;
use rbb_tournament::StageError;

/// Rejections from the competition layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompetitionError {
    UnknownMatch(MatchId),
    MatchEnded(MatchId),
    /// Another unended match is active.
    ActiveConflict(MatchId),
    NoActiveMatch,
    UnknownContestant(ID<Contestant>),
    /// A contestant cannot be paired against itself.
    SelfMatch(ID<Contestant>),
    /// The roster and configuration are frozen once a tournament starts.
    AlreadyStarted,
    /// The configuration enables no stage.
    NotConfigured,
    /// A stage would need more match ids than its range holds.
    TooManyMatches(usize),
    Stage(StageError),
}

impl std::fmt::Display for CompetitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownMatch(id) => write!(f, "match {} not found", id),
            Self::MatchEnded(id) => write!(f, "match {} has ended", id),
            Self::ActiveConflict(id) => write!(f, "match {} is already active", id),
            Self::NoActiveMatch => write!(f, "no active match"),
            Self::UnknownContestant(id) => write!(f, "contestant {} not found", id),
            Self::SelfMatch(id) => write!(f, "contestant {} cannot play itself", id),
            Self::AlreadyStarted => write!(f, "tournament already started"),
            Self::NotConfigured => write!(f, "tournament configuration enables no stage"),
            Self::TooManyMatches(n) => write!(f, "a stage of {} matches exceeds its id range", n),
            Self::Stage(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CompetitionError {}

impl From<StageError> for CompetitionError {
    fn from(e: StageError) -> Self {
        Self::Stage(e)
    }
}

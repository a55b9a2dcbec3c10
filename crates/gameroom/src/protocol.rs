use rbb_competition::*;
use rbb_core::*;
use rbb_gameplay::*;
use serde::Deserialize;

/// Errors that can occur while reading client requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    Malformed(String),
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(s) => write!(f, "malformed request: {}", s),
        }
    }
}

impl std::error::Error for ProtocolError {}

/// A client request: `{ "method": <name>, "params": {...} }`.
///
/// Match commands without a `match_id` go to the active match.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "snake_case")]
pub enum Request {
    CreateGame {
        contestant_ids: [ID<Contestant>; 2],
    },
    SetActive {
        match_id: MatchId,
    },
    StartGame {
        #[serde(default)]
        match_id: Option<MatchId>,
    },
    StopGame {
        #[serde(default)]
        match_id: Option<MatchId>,
    },
    StartStop,
    EndRound {
        #[serde(default)]
        match_id: Option<MatchId>,
    },
    IncrementScore {
        #[serde(default)]
        match_id: Option<MatchId>,
        side: Side,
    },
    IncrementBasket {
        basket: Basket,
    },
    IncrementFouls {
        #[serde(default)]
        match_id: Option<MatchId>,
        side: Side,
    },
    ConfirmGame {
        #[serde(default)]
        match_id: Option<MatchId>,
    },
    UnconfirmGame {
        #[serde(default)]
        match_id: Option<MatchId>,
    },
    SetScoreValidity {
        #[serde(default)]
        match_id: Option<MatchId>,
        side: Side,
        index: usize,
        is_valid: bool,
        #[serde(default)]
        round: Option<usize>,
    },
    SetFoulValidity {
        #[serde(default)]
        match_id: Option<MatchId>,
        side: Side,
        index: usize,
        is_valid: bool,
        #[serde(default)]
        round: Option<usize>,
    },
    AddContestant {
        name: String,
    },
    RemoveContestant {
        id: ID<Contestant>,
    },
    StartTournament(TournamentConfig),
    GetActiveGameState,
}

impl Request {
    /// Parse one line of client input.
    pub fn decode(line: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(line).map_err(|e| ProtocolError::Malformed(format!("{}: {}", e, line)))
    }
    /// The match command this request carries, with its target match
    /// if one was named.
    pub fn command(&self) -> Option<(Option<MatchId>, Command)> {
        match *self {
            Self::StartGame { match_id } => Some((match_id, Command::Start)),
            Self::StopGame { match_id } => Some((match_id, Command::Stop)),
            Self::StartStop => Some((None, Command::StartStop)),
            Self::EndRound { match_id } => Some((match_id, Command::EndRound)),
            Self::IncrementScore { match_id, side } => {
                Some((match_id, Command::IncrementScore { side }))
            }
            Self::IncrementBasket { basket } => Some((None, Command::IncrementBasket { basket })),
            Self::IncrementFouls { match_id, side } => {
                Some((match_id, Command::IncrementFoul { side }))
            }
            Self::ConfirmGame { match_id } => Some((match_id, Command::Confirm)),
            Self::UnconfirmGame { match_id } => Some((match_id, Command::Unconfirm)),
            Self::SetScoreValidity {
                match_id,
                side,
                index,
                is_valid,
                round,
            } => Some((
                match_id,
                Command::SetScoreValidity {
                    round,
                    side,
                    index,
                    is_valid,
                },
            )),
            Self::SetFoulValidity {
                match_id,
                side,
                index,
                is_valid,
                round,
            } => Some((
                match_id,
                Command::SetFoulValidity {
                    round,
                    side,
                    index,
                    is_valid,
                },
            )),
            _ => None,
        }
    }
}

use rbb_competition::*;
use rbb_core::*;
use rbb_gameplay::*;
use serde::Serialize;

/// Whether the robots should be playing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Start,
    Stop,
}

/// Messages sent from the arena to its clients, one JSON object per
/// message: `{ "event": <name>, "params": <payload> }`.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event", content = "params", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Full snapshot of the active match, or null when there is none.
    GameState(Option<MatchView>),
    /// Something happened in a match.
    GameStateChange {
        #[serde(rename = "type")]
        kind: MatchEvent,
        id: MatchId,
    },
    /// Start or stop the robots on the field.
    Robots {
        signal: Signal,
        targets: Vec<ID<Contestant>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        baskets: Option<[Basket; 2]>,
    },
    /// Reply to a robot asking about the active match.
    ActiveGameState(Option<RobotsView>),
    /// Full competition snapshot, sent after changes settle.
    CompetitionSummary(Box<CompetitionView>),
}

impl ServerMessage {
    pub fn game_state(competition: &Competition, now: Millis) -> Self {
        Self::GameState(competition.active().map(|m| m.summary(now)))
    }
    pub fn change(id: MatchId, kind: MatchEvent) -> Self {
        Self::GameStateChange { kind, id }
    }
    pub fn start(view: RobotsView) -> Self {
        Self::Robots {
            signal: Signal::Start,
            targets: view.targets,
            baskets: Some(view.baskets),
        }
    }
    pub fn stop(view: RobotsView) -> Self {
        Self::Robots {
            signal: Signal::Stop,
            targets: view.targets,
            baskets: None,
        }
    }
    pub fn summary(competition: &Competition, now: Millis) -> Self {
        Self::CompetitionSummary(Box::new(competition.summary(now)))
    }
    pub fn name(&self) -> &'static str {
        match self {
            Self::GameState(_) => "game_state",
            Self::GameStateChange { .. } => "game_state_change",
            Self::Robots { .. } => "robots",
            Self::ActiveGameState(_) => "active_game_state",
            Self::CompetitionSummary(_) => "competition_summary",
        }
    }
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

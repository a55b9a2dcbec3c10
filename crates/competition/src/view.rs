use super::*;
use rbb_core::*;
use rbb_gameplay::*;
use rbb_tournament::*;
use serde::Serialize;

/// What the robots need to know about the active match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RobotsView {
    pub is_running: bool,
    /// Contestants still allowed on the field.
    pub targets: Vec<ID<Contestant>>,
    /// Basket each side attacks in the current unit of play.
    pub baskets: [Basket; 2],
}

/// One line of a competition's results table.
#[derive(Debug, Clone, Serialize)]
pub struct MatchBrief {
    pub id: MatchId,
    pub contestants: [ID<Contestant>; 2],
    pub has_ended: bool,
    pub status: Status,
}

/// Broadcast snapshot of a whole [`Competition`].
#[derive(Debug, Clone, Serialize)]
pub struct CompetitionView {
    pub id: ID<Competition>,
    pub name: String,
    pub contestants: Vec<Contestant>,
    pub config: Option<TournamentConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swiss: Option<SwissView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elimination: Option<EliminationView>,
    pub matches: Vec<MatchBrief>,
    pub active: Option<MatchView>,
}

impl From<&Match> for MatchBrief {
    fn from(game: &Match) -> Self {
        Self {
            id: game.id(),
            contestants: game.contestants(),
            has_ended: game.has_ended(),
            status: game.status(),
        }
    }
}

impl Competition {
    /// Robot-facing view of the active match, if any.
    pub fn robots_view(&self) -> Option<RobotsView> {
        let game = self.active()?;
        let contestants = game.contestants();
        Some(RobotsView {
            is_running: game.is_running(),
            targets: game
                .in_game_sides()
                .into_iter()
                .map(|side| contestants[side])
                .collect(),
            baskets: game.baskets_now(),
        })
    }
    pub fn summary(&self, now: Millis) -> CompetitionView {
        CompetitionView {
            id: self.id(),
            name: self.name().to_string(),
            contestants: self.contestants().to_vec(),
            config: self.config(),
            swiss: self.swiss().map(SwissStage::summary),
            elimination: self.elimination().map(EliminationStage::summary),
            matches: self.matches().map(MatchBrief::from).collect(),
            active: self.active().map(|m| m.summary(now)),
        }
    }
}

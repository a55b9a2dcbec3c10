use serde::Deserialize;
use serde::Serialize;

/// Which stages a tournament runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub swiss_enabled: bool,
    pub number_of_swiss_rounds: usize,
    pub elimination_enabled: bool,
}

impl TournamentConfig {
    pub fn is_empty(&self) -> bool {
        !self.swiss_enabled && !self.elimination_enabled
    }
}

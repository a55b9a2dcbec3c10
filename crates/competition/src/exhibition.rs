use rand::Rng;
use rbb_core::*;
use rbb_gameplay::*;
use rbb_tournament::*;
use serde::Deserialize;
use serde::Serialize;

/// Matches created on demand outside the tournament stages.
///
/// Exhibition matches never tie and never feed a bracket, so an ended
/// match needs no follow-up.
#[derive(Debug, Clone, Default)]
pub struct Exhibition {
    matches: Vec<Match>,
    starting_baskets: SideBook,
    outbox: Vec<StageEvent>,
}

impl Exhibition {
    pub fn create(&mut self, pair: [ID<Contestant>; 2], rng: &mut impl Rng) -> MatchId {
        let id = EXHIBITION_ID_OFFSET + self.matches.len() as MatchId + 1;
        let baskets = self.starting_baskets.assign(pair, rng);
        self.starting_baskets.record(pair, baskets);
        let mut game = Match::new(id, pair, baskets, false, rng);
        game.drain();
        self.matches.push(game);
        self.outbox.push(StageEvent::Changed);
        id
    }
}

impl Stage for Exhibition {
    fn matches(&self) -> &[Match] {
        &self.matches
    }
    fn matches_mut(&mut self) -> &mut [Match] {
        &mut self.matches
    }
    fn outbox(&mut self) -> &mut Vec<StageEvent> {
        &mut self.outbox
    }
    fn has_ended(&self) -> bool {
        false
    }
    fn settle(&mut self, _: MatchId, _: &mut impl Rng) -> Result<(), StageError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExhibitionRecord {
    pub match_ids: Vec<MatchId>,
    pub starting_baskets: SideBook,
}

impl Exhibition {
    pub fn record(&self) -> ExhibitionRecord {
        ExhibitionRecord {
            match_ids: self.matches.iter().map(Match::id).collect(),
            starting_baskets: self.starting_baskets.clone(),
        }
    }
    pub fn restore(
        record: ExhibitionRecord,
        matches: Vec<Match>,
        rng: &mut impl Rng,
    ) -> Result<Self, StageError> {
        let mut matches = reorder(&record.match_ids, matches)?;
        for game in matches.iter_mut() {
            game.resume(rng);
            game.drain();
        }
        Ok(Self {
            matches,
            starting_baskets: record.starting_baskets,
            outbox: Vec::new(),
        })
    }
}

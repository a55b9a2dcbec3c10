use super::*;
use rand::Rng;
use rbb_core::*;
use rbb_gameplay::*;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::VecDeque;

/// Which part of the bracket a match belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bracket {
    NoLoss,
    OneLoss,
    /// Last unbeaten contestant against the last one-loss survivor.
    FirstFinal,
    /// Rematch after the unbeaten finalist lost the first final.
    SecondFinal,
}

/// Double-elimination bracket.
///
/// Contestants start in the no-loss queue. A loss moves them to the
/// one-loss queue, a second loss eliminates them. The longer queue
/// plays next, ties favoring the no-loss queue. When one unbeaten and
/// one single-loss contestant remain they meet in the first final, and
/// a second final is played if the unbeaten side loses.
#[derive(Debug, Clone)]
pub struct EliminationStage {
    seeds: Vec<ID<Contestant>>,
    matches: Vec<Match>,
    brackets: BTreeMap<MatchId, Bracket>,
    no_loss: VecDeque<ID<Contestant>>,
    one_loss: VecDeque<ID<Contestant>>,
    eliminated: Vec<ID<Contestant>>,
    champion: Option<ID<Contestant>>,
    starting_baskets: SideBook,
    has_ended: bool,
    outbox: Vec<StageEvent>,
}

impl EliminationStage {
    /// Seed the bracket in order, inheriting basket-side history.
    pub fn new(seeds: Vec<ID<Contestant>>, history: &SideBook) -> Self {
        Self {
            starting_baskets: history.inherit(&seeds),
            no_loss: seeds.iter().copied().collect(),
            seeds,
            matches: Vec::new(),
            brackets: BTreeMap::new(),
            one_loss: VecDeque::new(),
            eliminated: Vec::new(),
            champion: None,
            has_ended: false,
            outbox: Vec::new(),
        }
    }
    pub fn seeds(&self) -> &[ID<Contestant>] {
        &self.seeds
    }
    pub fn bracket(&self, id: MatchId) -> Option<Bracket> {
        self.brackets.get(&id).copied()
    }
    pub fn no_loss(&self) -> &VecDeque<ID<Contestant>> {
        &self.no_loss
    }
    pub fn one_loss(&self) -> &VecDeque<ID<Contestant>> {
        &self.one_loss
    }
    /// In elimination order.
    pub fn eliminated(&self) -> &[ID<Contestant>] {
        &self.eliminated
    }
    pub fn champion(&self) -> Option<ID<Contestant>> {
        self.champion
    }
    pub fn runner_up(&self) -> Option<ID<Contestant>> {
        self.champion.and(self.eliminated.last().copied())
    }
    /// Champion first, then the eliminated, last out first.
    pub fn final_ranking(&self) -> Vec<ID<Contestant>> {
        self.champion
            .into_iter()
            .chain(self.eliminated.iter().rev().copied())
            .collect()
    }
    /// Matches lost by `id` so far.
    pub fn losses(&self, id: ID<Contestant>) -> usize {
        self.matches
            .iter()
            .filter(|m| m.loser() == Some(id))
            .count()
    }
}

impl EliminationStage {
    /// Create the next bracket match unless one is still being played.
    pub fn proceed(&mut self, rng: &mut impl Rng) -> Result<(), StageError> {
        if self.has_ended {
            return Ok(());
        }
        if self.matches.last().is_some_and(|m| !m.has_ended()) {
            return Ok(());
        }
        if self.no_loss.len() + self.one_loss.len() < 2 {
            let last = self.no_loss.pop_front().or_else(|| self.one_loss.pop_front());
            self.finish(last);
            return Ok(());
        }
        let (pair, bracket) = match (self.no_loss.len(), self.one_loss.len()) {
            (1, 1) => (
                [self.no_loss.pop_front(), self.one_loss.pop_front()],
                Bracket::FirstFinal,
            ),
            (0, 2) => (
                [self.one_loss.pop_front(), self.one_loss.pop_front()],
                Bracket::SecondFinal,
            ),
            (no, one) if one > no => (
                [self.one_loss.pop_front(), self.one_loss.pop_front()],
                Bracket::OneLoss,
            ),
            _ => (
                [self.no_loss.pop_front(), self.no_loss.pop_front()],
                Bracket::NoLoss,
            ),
        };
        let [Some(a), Some(b)] = pair else {
            return Ok(());
        };
        self.create(a, b, bracket, rng);
        Ok(())
    }

    fn create(
        &mut self,
        a: ID<Contestant>,
        b: ID<Contestant>,
        bracket: Bracket,
        rng: &mut impl Rng,
    ) {
        let id = ELIMINATION_ID_OFFSET + self.matches.len() as MatchId + 1;
        let pair = [a, b];
        let baskets = self.starting_baskets.assign(pair, rng);
        self.starting_baskets.record(pair, baskets);
        let mut game = Match::new(id, pair, baskets, false, rng);
        game.drain();
        log::info!("[elimination] {:?} match {} {} vs {}", bracket, id, a, b);
        self.matches.push(game);
        self.brackets.insert(id, bracket);
        self.outbox.push(StageEvent::Changed);
    }

    fn finish(&mut self, champion: Option<ID<Contestant>>) {
        log::info!(
            "[elimination] ended, champion {}",
            champion.map(|c| c.to_string()).unwrap_or_default()
        );
        self.champion = champion;
        self.has_ended = true;
        self.outbox.push(StageEvent::Changed);
        self.outbox.push(StageEvent::Ended);
    }
}

impl Stage for EliminationStage {
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
        self.has_ended
    }
    /// Move the winner and loser of an ended match along the bracket.
    fn settle(&mut self, id: MatchId, rng: &mut impl Rng) -> Result<(), StageError> {
        let game = self.find(id).ok_or(StageError::UnknownMatch(id))?;
        let bracket = self.bracket(id).ok_or(StageError::UnknownMatch(id))?;
        let (Some(winner), Some(loser)) = (game.winner(), game.loser()) else {
            return Ok(());
        };
        let unbeaten = game.contestants()[0];
        match bracket {
            Bracket::FirstFinal if winner == unbeaten => {
                self.eliminated.push(loser);
                self.finish(Some(winner));
                Ok(())
            }
            Bracket::FirstFinal => {
                self.one_loss.push_back(unbeaten);
                self.one_loss.push_back(winner);
                self.proceed(rng)
            }
            Bracket::SecondFinal => {
                self.eliminated.push(loser);
                self.finish(Some(winner));
                Ok(())
            }
            Bracket::NoLoss => {
                self.no_loss.push_back(winner);
                self.one_loss.push_back(loser);
                self.proceed(rng)
            }
            Bracket::OneLoss => {
                self.one_loss.push_back(winner);
                self.eliminated.push(loser);
                self.proceed(rng)
            }
        }
    }
}

/// Stored form of an [`EliminationStage`]; matches are stored separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EliminationRecord {
    pub seeds: Vec<ID<Contestant>>,
    pub match_ids: Vec<MatchId>,
    pub brackets: BTreeMap<MatchId, Bracket>,
    pub no_loss: VecDeque<ID<Contestant>>,
    pub one_loss: VecDeque<ID<Contestant>>,
    pub eliminated: Vec<ID<Contestant>>,
    pub champion: Option<ID<Contestant>>,
    pub starting_baskets: SideBook,
    pub has_ended: bool,
}

impl EliminationStage {
    pub fn record(&self) -> EliminationRecord {
        EliminationRecord {
            seeds: self.seeds.clone(),
            match_ids: self.matches.iter().map(Match::id).collect(),
            brackets: self.brackets.clone(),
            no_loss: self.no_loss.clone(),
            one_loss: self.one_loss.clone(),
            eliminated: self.eliminated.clone(),
            champion: self.champion,
            starting_baskets: self.starting_baskets.clone(),
            has_ended: self.has_ended,
        }
    }
    pub fn restore(
        record: EliminationRecord,
        matches: Vec<Match>,
        rng: &mut impl Rng,
    ) -> Result<Self, StageError> {
        let mut matches = reorder(&record.match_ids, matches)?;
        for game in matches.iter_mut() {
            game.resume(rng);
            game.drain();
        }
        Ok(Self {
            seeds: record.seeds,
            matches,
            brackets: record.brackets,
            no_loss: record.no_loss,
            one_loss: record.one_loss,
            eliminated: record.eliminated,
            champion: record.champion,
            starting_baskets: record.starting_baskets,
            has_ended: record.has_ended,
            outbox: Vec::new(),
        })
    }
}

/// Broadcast snapshot of an [`EliminationStage`].
#[derive(Debug, Clone, Serialize)]
pub struct EliminationView {
    pub seeds: Vec<ID<Contestant>>,
    pub brackets: BTreeMap<MatchId, Bracket>,
    pub no_loss: Vec<ID<Contestant>>,
    pub one_loss: Vec<ID<Contestant>>,
    pub eliminated: Vec<ID<Contestant>>,
    pub champion: Option<ID<Contestant>>,
    pub final_ranking: Vec<ID<Contestant>>,
    pub has_ended: bool,
}

impl EliminationStage {
    pub fn summary(&self) -> EliminationView {
        EliminationView {
            seeds: self.seeds.clone(),
            brackets: self.brackets.clone(),
            no_loss: self.no_loss.iter().copied().collect(),
            one_loss: self.one_loss.iter().copied().collect(),
            eliminated: self.eliminated.clone(),
            champion: self.champion,
            final_ranking: self.final_ranking(),
            has_ended: self.has_ended,
        }
    }
}

use super::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rbb_core::*;
use rbb_gameplay::*;
use rbb_tournament::*;
use std::collections::BTreeMap;

/// One competition: a roster, its tournament stages, exhibition
/// matches, and the single active match.
///
/// All mutation goes through `&mut self`, one call at a time. Stage and
/// match events are relayed into the outbox as [`CompetitionEvent`]s for
/// the owner to broadcast and persist.
#[derive(Debug)]
pub struct Competition {
    id: ID<Competition>,
    name: String,
    contestants: Vec<Contestant>,
    config: Option<TournamentConfig>,
    swiss: Option<SwissStage>,
    elimination: Option<EliminationStage>,
    exhibition: Exhibition,
    active: Option<MatchId>,
    rng: SmallRng,
    outbox: Vec<CompetitionEvent>,
}

impl Unique for Competition {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

impl Competition {
    /// Fresh competition drawing randomness from OS entropy.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_rng(name, SmallRng::from_os_rng())
    }
    /// Fresh competition with a reproducible random source.
    pub fn seeded(name: impl Into<String>, seed: u64) -> Self {
        Self::with_rng(name, SmallRng::seed_from_u64(seed))
    }
    fn with_rng(name: impl Into<String>, rng: SmallRng) -> Self {
        Self {
            id: ID::default(),
            name: name.into(),
            contestants: Vec::new(),
            config: None,
            swiss: None,
            elimination: None,
            exhibition: Exhibition::default(),
            active: None,
            rng,
            outbox: Vec::new(),
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn contestants(&self) -> &[Contestant] {
        &self.contestants
    }
    pub fn contestant(&self, id: ID<Contestant>) -> Option<&Contestant> {
        self.contestants.iter().find(|c| c.id() == id)
    }
    pub fn config(&self) -> Option<TournamentConfig> {
        self.config
    }
    pub fn swiss(&self) -> Option<&SwissStage> {
        self.swiss.as_ref()
    }
    pub fn elimination(&self) -> Option<&EliminationStage> {
        self.elimination.as_ref()
    }
    pub fn exhibition(&self) -> &Exhibition {
        &self.exhibition
    }
    /// Every match across stages, in creation order per stage.
    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.swiss
            .iter()
            .flat_map(|s| s.matches())
            .chain(self.elimination.iter().flat_map(|s| s.matches()))
            .chain(self.exhibition.matches())
    }
    pub fn find(&self, id: MatchId) -> Option<&Match> {
        self.matches().find(|m| m.id() == id)
    }
    pub fn active(&self) -> Option<&Match> {
        self.active.and_then(|id| self.find(id))
    }
    pub fn drain(&mut self) -> Vec<CompetitionEvent> {
        std::mem::take(&mut self.outbox)
    }
    /// The active match, if it is still being played.
    fn live(&self) -> Option<MatchId> {
        self.active().filter(|m| !m.has_ended()).map(Match::id)
    }
    fn is_started(&self) -> bool {
        self.config.is_some()
    }
}

impl Competition {
    pub fn add_contestant(
        &mut self,
        name: impl Into<String>,
    ) -> Result<ID<Contestant>, CompetitionError> {
        if self.is_started() {
            return Err(CompetitionError::AlreadyStarted);
        }
        let contestant = Contestant::new(name);
        let id = contestant.id();
        log::info!("[competition] add contestant {} ({})", contestant, id);
        self.contestants.push(contestant);
        self.outbox.push(CompetitionEvent::Changed);
        Ok(id)
    }
    pub fn remove_contestant(&mut self, id: ID<Contestant>) -> Result<(), CompetitionError> {
        if self.is_started() {
            return Err(CompetitionError::AlreadyStarted);
        }
        let index = self
            .contestants
            .iter()
            .position(|c| c.id() == id)
            .ok_or(CompetitionError::UnknownContestant(id))?;
        log::info!("[competition] remove contestant {}", self.contestants[index]);
        self.contestants.remove(index);
        self.outbox.push(CompetitionEvent::Changed);
        Ok(())
    }
    pub fn start_tournament(&mut self, config: TournamentConfig) -> Result<(), CompetitionError> {
        if self.is_started() {
            return Err(CompetitionError::AlreadyStarted);
        }
        if config.is_empty() {
            return Err(CompetitionError::NotConfigured);
        }
        let swiss = match config.swiss_enabled {
            true => config.number_of_swiss_rounds * (self.contestants.len() / 2),
            false => 0,
        };
        let elimination = match config.elimination_enabled {
            true => 2 * self.contestants.len(),
            false => 0,
        };
        let range = (EXHIBITION_ID_OFFSET - ELIMINATION_ID_OFFSET) as usize;
        if let Some(n) = [swiss, elimination].into_iter().find(|n| *n > range) {
            return Err(CompetitionError::TooManyMatches(n));
        }
        log::info!("[competition] start tournament {:?}", config);
        self.config = Some(config);
        self.outbox.push(CompetitionEvent::Changed);
        self.proceed()
    }

    /// Create stages whose prerequisites are met, then advance the stage
    /// currently in play. A no-op before a tournament is configured.
    pub fn proceed(&mut self) -> Result<(), CompetitionError> {
        let Some(config) = self.config else {
            return Ok(());
        };
        if config.swiss_enabled && self.swiss.is_none() {
            let mut field = self.contestants.iter().map(Contestant::id).collect::<Vec<_>>();
            field.shuffle(&mut self.rng);
            log::info!("[competition] swiss stage with {} contestants", field.len());
            self.swiss = Some(SwissStage::new(field, config.number_of_swiss_rounds));
            self.outbox.push(CompetitionEvent::Changed);
        }
        if config.elimination_enabled && self.elimination.is_none() {
            let stage = match self.swiss {
                Some(ref swiss) if swiss.has_ended() => Some(EliminationStage::new(
                    seed(&swiss.standings()?, &mut self.rng),
                    swiss.starting_baskets(),
                )),
                Some(_) => None,
                None => {
                    let mut field = self.contestants.iter().map(Contestant::id).collect::<Vec<_>>();
                    field.shuffle(&mut self.rng);
                    Some(EliminationStage::new(field, &SideBook::default()))
                }
            };
            if let Some(stage) = stage {
                log::info!("[competition] elimination stage with {} seeds", stage.seeds().len());
                self.elimination = Some(stage);
                self.outbox.push(CompetitionEvent::Changed);
            }
        }
        let result = match (self.swiss.as_mut(), self.elimination.as_mut()) {
            (Some(swiss), _) if !swiss.has_ended() => swiss.proceed(&mut self.rng),
            (_, Some(bracket)) if !bracket.has_ended() => bracket.proceed(&mut self.rng),
            _ => Ok(()),
        };
        self.relay()?;
        result.map_err(CompetitionError::from)
    }

    /// Lift stage events into the outbox; a stage ending may unlock the
    /// next one.
    fn relay(&mut self) -> Result<(), CompetitionError> {
        let mut events = Vec::new();
        if let Some(ref mut swiss) = self.swiss {
            events.extend(swiss.drain());
        }
        if let Some(ref mut bracket) = self.elimination {
            events.extend(bracket.drain());
        }
        events.extend(self.exhibition.drain());
        let mut ended = false;
        for event in events {
            match event {
                StageEvent::Changed => self.outbox.push(CompetitionEvent::Changed),
                StageEvent::Ended => {
                    ended = true;
                    self.outbox.push(CompetitionEvent::Changed);
                }
                StageEvent::Stalled => self.outbox.push(CompetitionEvent::Stalled),
                StageEvent::Match(id, kind) => {
                    self.outbox.push(CompetitionEvent::MatchChanged { id, kind });
                }
            }
        }
        match ended {
            true => self.proceed(),
            false => Ok(()),
        }
    }
}

impl Competition {
    /// Create an exhibition match; it becomes active unless another match
    /// is being played.
    pub fn create_game(&mut self, pair: [ID<Contestant>; 2]) -> Result<MatchId, CompetitionError> {
        for id in pair {
            if self.contestant(id).is_none() {
                return Err(CompetitionError::UnknownContestant(id));
            }
        }
        if pair[0] == pair[1] {
            return Err(CompetitionError::SelfMatch(pair[0]));
        }
        let id = self.exhibition.create(pair, &mut self.rng);
        log::info!("[competition] exhibition match {}", id);
        self.relay()?;
        if self.live().is_none() {
            self.set_active(id)?;
        }
        Ok(id)
    }
    /// Make `id` the active match. Rejected while a different match is
    /// active and unended.
    pub fn set_active(&mut self, id: MatchId) -> Result<(), CompetitionError> {
        if let Some(live) = self.live().filter(|live| *live != id) {
            log::warn!("[competition] match {} rejected, match {} is active", id, live);
            return Err(CompetitionError::ActiveConflict(live));
        }
        if self.find(id).is_none() {
            log::warn!("[competition] match {} not found", id);
            return Err(CompetitionError::UnknownMatch(id));
        }
        log::info!("[competition] match {} active", id);
        self.active = Some(id);
        self.outbox.push(CompetitionEvent::ActiveSet { id });
        Ok(())
    }
    /// Route a command to match `id`, activating it if nothing else is
    /// being played. Corrections go straight through and never move the
    /// active match.
    pub fn apply(
        &mut self,
        id: MatchId,
        command: Command,
        now: Millis,
    ) -> Result<(), CompetitionError> {
        let game = self.find(id).ok_or_else(|| {
            log::warn!("[competition] {} for unknown match {}", command, id);
            CompetitionError::UnknownMatch(id)
        })?;
        if game.has_ended() && !command.is_correction() {
            log::warn!("[competition] {} for ended match {}", command, id);
            return Err(CompetitionError::MatchEnded(id));
        }
        if !command.is_correction() && self.active != Some(id) {
            self.set_active(id)?;
        }
        let rng = &mut self.rng;
        let result = if self.swiss.as_ref().is_some_and(|s| s.contains(id)) {
            self.swiss.as_mut().map(|s| s.apply(id, command, now, rng))
        } else if self.elimination.as_ref().is_some_and(|s| s.contains(id)) {
            self.elimination.as_mut().map(|s| s.apply(id, command, now, rng))
        } else {
            Some(self.exhibition.apply(id, command, now, rng))
        }
        .unwrap_or(Err(StageError::UnknownMatch(id)));
        self.relay()?;
        result
            .inspect_err(|e| log::warn!("[competition] {} on match {}: {}", command, id, e))
            .map_err(CompetitionError::from)
    }
    /// Route a command to the active match.
    pub fn apply_active(&mut self, command: Command, now: Millis) -> Result<(), CompetitionError> {
        let id = self.active.ok_or_else(|| {
            log::warn!("[competition] {} with no active match", command);
            CompetitionError::NoActiveMatch
        })?;
        self.apply(id, command, now)
    }
    /// Poll the active match's clocks.
    pub fn tick(&mut self, now: Millis) -> Result<(), CompetitionError> {
        let Some(id) = self.live() else {
            return Ok(());
        };
        let result = if self.swiss.as_ref().is_some_and(|s| s.contains(id)) {
            self.swiss.as_mut().map(|s| s.tick(id, now))
        } else if self.elimination.as_ref().is_some_and(|s| s.contains(id)) {
            self.elimination.as_mut().map(|s| s.tick(id, now))
        } else {
            Some(self.exhibition.tick(id, now))
        }
        .unwrap_or(Err(StageError::UnknownMatch(id)));
        self.relay()?;
        result.map_err(CompetitionError::from)
    }
}

/// Stored form of a [`Competition`]; matches are stored separately.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompetitionRecord {
    pub id: ID<Competition>,
    pub name: String,
    pub contestants: Vec<Contestant>,
    pub config: Option<TournamentConfig>,
    pub swiss: Option<SwissRecord>,
    pub elimination: Option<EliminationRecord>,
    #[serde(default)]
    pub exhibition: ExhibitionRecord,
    #[serde(default)]
    pub active: Option<MatchId>,
}

impl Competition {
    pub fn record(&self) -> CompetitionRecord {
        CompetitionRecord {
            id: self.id,
            name: self.name.clone(),
            contestants: self.contestants.clone(),
            config: self.config,
            swiss: self.swiss.as_ref().map(SwissStage::record),
            elimination: self.elimination.as_ref().map(EliminationStage::record),
            exhibition: self.exhibition.record(),
            active: self.active,
        }
    }
    /// Rebuild from a record and its stored matches. The random source
    /// is not stored; pass a seed to make the restored competition
    /// reproducible.
    pub fn restore(
        record: CompetitionRecord,
        matches: Vec<Match>,
        seed: Option<u64>,
    ) -> Result<Self, CompetitionError> {
        let mut rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let mut stored = matches
            .into_iter()
            .map(|m| (m.id(), m))
            .collect::<BTreeMap<_, _>>();
        let mut take = |ids: &[MatchId]| {
            ids.iter()
                .filter_map(|id| stored.remove(id))
                .collect::<Vec<_>>()
        };
        let swiss = record
            .swiss
            .map(|r| {
                let matches = take(r.match_ids.as_slice());
                SwissStage::restore(r, matches, &mut rng)
            })
            .transpose()?;
        let elimination = record
            .elimination
            .map(|r| {
                let matches = take(r.match_ids.as_slice());
                EliminationStage::restore(r, matches, &mut rng)
            })
            .transpose()?;
        let matches = take(record.exhibition.match_ids.as_slice());
        let exhibition = Exhibition::restore(record.exhibition, matches, &mut rng)?;
        for id in stored.keys() {
            log::warn!("[competition] stored match {} belongs to no stage", id);
        }
        let competition = Self {
            id: record.id,
            name: record.name,
            contestants: record.contestants,
            config: record.config,
            swiss,
            elimination,
            exhibition,
            active: record.active,
            rng,
            outbox: Vec::new(),
        };
        log::info!(
            "[competition] restored {} with {} matches",
            competition.name,
            competition.matches().count()
        );
        Ok(competition)
    }
}

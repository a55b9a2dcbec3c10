use super::*;
use rand::Rng;
use rbb_core::*;
use rbb_gameplay::*;

/// A collection of matches that reacts when one of them ends.
///
/// Implementors own their matches; the provided methods route commands
/// and clock ticks to the right match and relay its events.
pub trait Stage {
    fn matches(&self) -> &[Match];
    fn matches_mut(&mut self) -> &mut [Match];
    fn outbox(&mut self) -> &mut Vec<StageEvent>;
    fn has_ended(&self) -> bool;
    /// React to match `id` having just ended.
    fn settle(&mut self, id: MatchId, rng: &mut impl Rng) -> Result<(), StageError>;

    fn find(&self, id: MatchId) -> Option<&Match> {
        self.matches().iter().find(|m| m.id() == id)
    }
    fn contains(&self, id: MatchId) -> bool {
        self.find(id).is_some()
    }
    /// Apply a command to match `id`.
    fn apply(
        &mut self,
        id: MatchId,
        command: Command,
        now: Millis,
        rng: &mut impl Rng,
    ) -> Result<(), StageError> {
        let game = self
            .matches_mut()
            .iter_mut()
            .find(|m| m.id() == id)
            .ok_or(StageError::UnknownMatch(id))?;
        let result = game.apply(command, now, rng);
        let events = game.drain();
        let ended = events.contains(&MatchEvent::Ended);
        self.outbox()
            .extend(events.into_iter().map(|e| StageEvent::Match(id, e)));
        result?;
        match ended {
            true => self.settle(id, rng),
            false => Ok(()),
        }
    }
    /// Poll the time limits of match `id`.
    fn tick(&mut self, id: MatchId, now: Millis) -> Result<(), StageError> {
        let game = self
            .matches_mut()
            .iter_mut()
            .find(|m| m.id() == id)
            .ok_or(StageError::UnknownMatch(id))?;
        game.tick(now);
        let events = game.drain();
        self.outbox()
            .extend(events.into_iter().map(|e| StageEvent::Match(id, e)));
        Ok(())
    }
    fn drain(&mut self) -> Vec<StageEvent> {
        std::mem::take(self.outbox())
    }
}

/// Order stored matches by `ids`, failing on any gap.
pub fn reorder(ids: &[MatchId], matches: Vec<Match>) -> Result<Vec<Match>, StageError> {
    let mut matches = matches
        .into_iter()
        .map(|m| (m.id(), m))
        .collect::<std::collections::BTreeMap<_, _>>();
    ids.iter()
        .map(|id| matches.remove(id).ok_or(StageError::UnknownMatch(*id)))
        .collect()
}

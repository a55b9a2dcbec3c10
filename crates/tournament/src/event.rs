use rbb_core::MatchId;
use rbb_gameplay::MatchEvent;

/// Notifications drained from a tournament stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEvent {
    /// Matches, queues, or standings changed.
    Changed,
    /// The stage is complete.
    Ended,
    /// The next round cannot be drawn.
    Stalled,
    /// Relayed from one of the stage's matches.
    Match(MatchId, MatchEvent),
}

use rbb_core::MatchId;
use rbb_gameplay::MatchEvent;

/// Notifications drained from a [`crate::Competition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompetitionEvent {
    /// Roster, configuration, or stage state changed.
    Changed,
    /// The Swiss stage cannot draw its next round.
    Stalled,
    /// Something happened inside match `id`.
    MatchChanged { id: MatchId, kind: MatchEvent },
    /// Match `id` became the active match.
    ActiveSet { id: MatchId },
}

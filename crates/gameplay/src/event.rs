use serde::Serialize;

/// State changes emitted by a [`crate::Round`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEvent {
    Started,
    Stopped,
    Ended,
    ScoreChanged,
    FoulsChanged,
    ConfirmedChanged,
    ScoreValidityChanged,
    FoulValidityChanged,
}

/// State changes emitted by a [`crate::FreeThrows`] series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrowEvent {
    AttemptStarted,
    AttemptEnded,
    ConfirmedChanged,
    Ended,
}

/// State changes emitted by a [`crate::Match`].
///
/// Round and free-throw events are lifted into this enum by the match,
/// so a subscriber only ever listens to one stream per match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchEvent {
    RoundAdded,
    RoundStarted,
    RoundStopped,
    RoundEnded,
    ScoreChanged,
    FoulsChanged,
    RoundConfirmedChanged,
    RoundScoreValidityChanged,
    RoundFoulValidityChanged,
    FreeThrowsAdded,
    FreeThrowAttemptStarted,
    FreeThrowAttemptEnded,
    FreeThrowConfirmedChanged,
    FreeThrowsEnded,
    Ended,
}

impl MatchEvent {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RoundAdded => "round_added",
            Self::RoundStarted => "round_started",
            Self::RoundStopped => "round_stopped",
            Self::RoundEnded => "round_ended",
            Self::ScoreChanged => "score_changed",
            Self::FoulsChanged => "fouls_changed",
            Self::RoundConfirmedChanged => "round_confirmed_changed",
            Self::RoundScoreValidityChanged => "round_score_validity_changed",
            Self::RoundFoulValidityChanged => "round_foul_validity_changed",
            Self::FreeThrowsAdded => "free_throws_added",
            Self::FreeThrowAttemptStarted => "free_throw_attempt_started",
            Self::FreeThrowAttemptEnded => "free_throw_attempt_ended",
            Self::FreeThrowConfirmedChanged => "free_throw_confirmed_changed",
            Self::FreeThrowsEnded => "free_throws_ended",
            Self::Ended => "ended",
        }
    }
    /// True if the event opens a clock that must be polled for timeout.
    pub fn starts_clock(&self) -> bool {
        matches!(self, Self::RoundStarted | Self::FreeThrowAttemptStarted)
    }
    /// True if the event closes a clock.
    pub fn stops_clock(&self) -> bool {
        matches!(
            self,
            Self::RoundStopped | Self::RoundEnded | Self::FreeThrowAttemptEnded | Self::Ended
        )
    }
}

impl From<RoundEvent> for MatchEvent {
    fn from(event: RoundEvent) -> Self {
        match event {
            RoundEvent::Started => Self::RoundStarted,
            RoundEvent::Stopped => Self::RoundStopped,
            RoundEvent::Ended => Self::RoundEnded,
            RoundEvent::ScoreChanged => Self::ScoreChanged,
            RoundEvent::FoulsChanged => Self::FoulsChanged,
            RoundEvent::ConfirmedChanged => Self::RoundConfirmedChanged,
            RoundEvent::ScoreValidityChanged => Self::RoundScoreValidityChanged,
            RoundEvent::FoulValidityChanged => Self::RoundFoulValidityChanged,
        }
    }
}

impl From<ThrowEvent> for MatchEvent {
    fn from(event: ThrowEvent) -> Self {
        match event {
            ThrowEvent::AttemptStarted => Self::FreeThrowAttemptStarted,
            ThrowEvent::AttemptEnded => Self::FreeThrowAttemptEnded,
            ThrowEvent::ConfirmedChanged => Self::FreeThrowConfirmedChanged,
            ThrowEvent::Ended => Self::FreeThrowsEnded,
        }
    }
}

impl std::fmt::Display for MatchEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn serde_name_matches_wire_name() {
        for event in [
            MatchEvent::RoundConfirmedChanged,
            MatchEvent::FreeThrowAttemptStarted,
            MatchEvent::Ended,
        ] {
            let json = serde_json::to_string(&event).unwrap();
            assert_eq!(json, format!("\"{}\"", event.name()));
        }
    }
    #[test]
    fn round_events_lift() {
        assert_eq!(MatchEvent::from(RoundEvent::Started), MatchEvent::RoundStarted);
        assert!(MatchEvent::from(RoundEvent::Ended).stops_clock());
        assert!(MatchEvent::from(ThrowEvent::AttemptStarted).starts_clock());
    }
}

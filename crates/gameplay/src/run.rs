use rbb_core::Millis;
use serde::Deserialize;
use serde::Serialize;

/// One uninterrupted stretch of a round's clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub start: Millis,
    pub end: Option<Millis>,
}

impl Run {
    pub fn open(start: Millis) -> Self {
        Self { start, end: None }
    }
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }
    /// Elapsed time, measuring an open run up to `now`.
    pub fn elapsed(&self, now: Millis) -> Millis {
        (self.end.unwrap_or(now) - self.start).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn closed_run_ignores_now() {
        let run = Run {
            start: 1_000,
            end: Some(1_500),
        };
        assert_eq!(run.elapsed(9_999), 500);
    }
    #[test]
    fn open_run_measures_to_now() {
        assert_eq!(Run::open(1_000).elapsed(1_250), 250);
    }
    #[test]
    fn clock_skew_never_goes_negative() {
        assert_eq!(Run::open(1_000).elapsed(900), 0);
    }
}

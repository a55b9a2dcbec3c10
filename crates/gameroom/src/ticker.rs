use rbb_core::*;
use std::time::Duration;
use tokio::time::Interval;
use tokio::time::MissedTickBehavior;

/// Polling clock for the active match's time limits.
///
/// Armed while a round or free-throw attempt is running, so an idle
/// arena never wakes up.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    interval: Option<Interval>,
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }
    pub fn period(&self) -> Duration {
        self.period
    }
    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }
    /// Start ticking; a no-op if already armed.
    pub fn arm(&mut self) {
        if self.interval.is_none() {
            log::debug!("[ticker] armed");
            let mut interval = tokio::time::interval(self.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            self.interval = Some(interval);
        }
    }
    pub fn disarm(&mut self) {
        if self.interval.take().is_some() {
            log::debug!("[ticker] disarmed");
        }
    }
    /// Resolve on the next tick. Never resolves while disarmed.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn ticker_starts_disarmed() {
        let ticker = Ticker::default();
        assert!(!ticker.is_armed());
        assert_eq!(ticker.period(), TICK_INTERVAL);
    }
    #[tokio::test]
    async fn armed_ticker_ticks() {
        let mut ticker = Ticker::new(Duration::from_millis(5));
        ticker.arm();
        assert!(ticker.is_armed());
        for _ in 0..3 {
            tokio::time::timeout(Duration::from_secs(1), ticker.tick())
                .await
                .unwrap();
        }
    }
    #[tokio::test]
    async fn disarmed_ticker_never_ticks() {
        let mut ticker = Ticker::new(Duration::from_millis(5));
        ticker.arm();
        ticker.disarm();
        assert!(!ticker.is_armed());
        let waited = tokio::time::timeout(Duration::from_millis(50), ticker.tick()).await;
        assert!(waited.is_err());
    }
}

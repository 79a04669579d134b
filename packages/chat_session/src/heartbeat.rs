use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// Keep-alive timer owned by one session.
///
/// Starts disarmed. While disarmed, [`HeartbeatTimer::tick`] never resolves,
/// so it can sit in a `select!` for the whole life of the session.
pub(crate) struct HeartbeatTimer {
    period: Duration,
    interval: Option<Interval>,
}

impl HeartbeatTimer {
    pub(crate) fn new(period: Duration) -> Self {
        Self {
            // tokio intervals reject a zero period
            period: period.max(Duration::from_millis(1)),
            interval: None,
        }
    }

    /// Schedule the first beat one period from now.
    pub(crate) fn arm(&mut self) {
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    /// Stop beating. Safe to call any number of times.
    pub(crate) fn cancel(&mut self) {
        self.interval = None;
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    pub(crate) async fn tick(&mut self) {
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

    #[tokio::test(start_paused = true)]
    async fn first_beat_waits_a_full_period() {
        let mut timer = HeartbeatTimer::new(Duration::from_secs(60));
        timer.arm();
        let start = Instant::now();
        timer.tick().await;
        assert_eq!(start.elapsed(), Duration::from_secs(60));
        timer.tick().await;
        assert_eq!(start.elapsed(), Duration::from_secs(120));
    }

    #[tokio::test(start_paused = true)]
    async fn disarmed_timer_never_fires() {
        let mut timer = HeartbeatTimer::new(Duration::from_secs(1));
        let fired = tokio::time::timeout(Duration::from_secs(10), timer.tick()).await;
        assert!(fired.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_is_idempotent() {
        let mut timer = HeartbeatTimer::new(Duration::from_secs(1));
        timer.arm();
        assert!(timer.is_armed());
        timer.cancel();
        timer.cancel();
        assert!(!timer.is_armed());
        let fired = tokio::time::timeout(Duration::from_secs(5), timer.tick()).await;
        assert!(fired.is_err());
    }
}

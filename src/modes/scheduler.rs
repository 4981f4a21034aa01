use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval};

/// Cancellable fixed-period tick source.
///
/// Meant to be polled from one `tokio::select!` loop alongside input events,
/// which keeps ticks and key handling serialized on a single task.
pub struct TickScheduler {
    period: Duration,
    interval: Option<Interval>,
}

impl TickScheduler {
    /// Create a stopped scheduler
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    /// (Re)start ticking, dropping any previous registration.
    ///
    /// The first tick fires immediately. Must be called inside a tokio runtime.
    pub fn start(&mut self) {
        let mut timer = interval(self.period);
        // Late ticks are caught up one by one rather than skipped
        timer.set_missed_tick_behavior(MissedTickBehavior::Burst);
        self.interval = Some(timer);
    }

    pub fn stop(&mut self) {
        self.interval = None;
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// Wait for the next tick; never resolves while stopped
    pub async fn tick(&mut self) -> Instant {
        match self.interval.as_mut() {
            Some(timer) => timer.tick().await,
            None => std::future::pending().await,
        }
    }
}

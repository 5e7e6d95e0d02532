use tokio::time::{Duration, Instant};

/// Recurring auto-advance deadline owned by a carousel.
///
/// There is no spawned task behind this: the event loop sleeps until
/// [`AutoAdvance::deadline`] and then calls [`AutoAdvance::fire`]. Cancelling is
/// clearing the deadline, and dropping the owner drops the timer with it.
#[derive(Debug, Clone)]
pub struct AutoAdvance {
    interval: Duration,
    deadline: Option<Instant>,
}

impl AutoAdvance {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Schedules the next tick a full interval from `now`, discarding any
    /// pending one.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` at most once per elapsed deadline and re-arms for the
    /// following tick.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                let mut next = deadline + self.interval;
                // a late loop does not replay missed ticks
                if next <= now {
                    next = now + self.interval;
                }
                self.deadline = Some(next);
                true
            }
            _ => false,
        }
    }
}

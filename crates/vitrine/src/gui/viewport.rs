use tokio::time::{Duration, Instant};

/// Coalesces bursts of resize events into one, delivered after `delay` of
/// quiet.
#[derive(Debug, Clone)]
pub struct ResizeDebounce {
    delay: Duration,
    pending: Option<(u32, Instant)>,
}

impl ResizeDebounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn push(&mut self, width: u32, now: Instant) {
        self.pending = Some((width, now + self.delay));
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(_, at)| at)
    }

    pub fn take_due(&mut self, now: Instant) -> Option<u32> {
        match self.pending {
            Some((width, at)) if now >= at => {
                self.pending = None;
                Some(width)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_delivers_last_width_once() {
        let start = Instant::now();
        let delay = Duration::from_millis(150);
        let mut debounce = ResizeDebounce::new(delay);

        debounce.push(1300, start);
        debounce.push(900, start + Duration::from_millis(100));
        debounce.push(500, start + Duration::from_millis(200));

        assert_eq!(debounce.take_due(start + Duration::from_millis(300)), None);
        let due = start + Duration::from_millis(350);
        assert_eq!(debounce.deadline(), Some(due));
        assert_eq!(debounce.take_due(due), Some(500));
        assert_eq!(debounce.take_due(due), None);
        assert!(debounce.deadline().is_none());
    }
}

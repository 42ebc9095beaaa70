use std::time::{Duration, Instant};

pub(crate) trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Bounded retry and readiness-wait schedule for the playback controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    /// Delay before each automatic retry; its length is the attempt budget.
    pub(crate) backoff: Vec<Duration>,
    pub(crate) readiness_polls: u32,
    pub(crate) readiness_delay: Duration,
}

impl RetryPolicy {
    pub(crate) fn desktop() -> Self {
        Self {
            backoff: vec![
                Duration::from_millis(500),
                Duration::from_millis(1000),
                Duration::from_millis(2000),
            ],
            readiness_polls: 10,
            readiness_delay: Duration::from_millis(100),
        }
    }

    pub(crate) fn mobile() -> Self {
        Self {
            backoff: vec![
                Duration::from_millis(1000),
                Duration::from_millis(2000),
                Duration::from_millis(4000),
            ],
            readiness_polls: 20,
            readiness_delay: Duration::from_millis(300),
        }
    }

    pub(crate) fn for_profile(mobile: bool) -> Self {
        if mobile { Self::mobile() } else { Self::desktop() }
    }

    pub(crate) fn max_attempts(&self) -> u32 {
        self.backoff.len() as u32
    }

    /// `attempt` is 1-based.
    pub(crate) fn delay_for(&self, attempt: u32) -> Option<Duration> {
        let idx = attempt.checked_sub(1)? as usize;
        self.backoff.get(idx).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerAction {
    RetryPlay { attempt: u32 },
    AutoPlay { poll: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingTimer {
    pub(crate) due: Instant,
    pub(crate) chapter: usize,
    pub(crate) action: TimerAction,
}

#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct ManualClock {
    now: std::rc::Rc<std::cell::Cell<Instant>>,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn new() -> Self {
        Self {
            now: std::rc::Rc::new(std::cell::Cell::new(Instant::now())),
        }
    }

    pub(crate) fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

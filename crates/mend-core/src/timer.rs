//! The restoration timer: a two-state machine over a fixed due time.

use std::time::{Duration, Instant};

/// How an event restores once due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealMode {
    /// Every remaining block in one operation.
    Batch,
    /// At most one block per scheduler poll.
    Incremental,
}

/// Observable timer state at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerState {
    /// The due time has not been reached.
    Waiting,
    /// The due time has passed. In incremental mode this state is re-entered
    /// on every poll until the event's block list empties.
    Due,
}

/// Tracks when an event's restoration begins.
///
/// The due time is computed once at event creation and never moves; polls
/// pass the current instant in, so the timer itself performs no clock reads.
#[derive(Clone, Copy, Debug)]
pub struct HealTimer {
    due_at: Instant,
    mode: HealMode,
}

impl HealTimer {
    /// Creates a timer due `wait` after `now`.
    pub fn new(now: Instant, wait: Duration, mode: HealMode) -> Self {
        Self {
            due_at: now + wait,
            mode,
        }
    }

    /// The instant restoration begins.
    pub fn due_at(&self) -> Instant {
        self.due_at
    }

    /// The restoration mode.
    pub fn mode(&self) -> HealMode {
        self.mode
    }

    /// The timer state as observed at `now`.
    pub fn state(&self, now: Instant) -> TimerState {
        if now >= self.due_at {
            TimerState::Due
        } else {
            TimerState::Waiting
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waiting_before_due() {
        let t0 = Instant::now();
        let timer = HealTimer::new(t0, Duration::from_secs(60), HealMode::Batch);
        assert_eq!(timer.state(t0), TimerState::Waiting);
        assert_eq!(timer.state(t0 + Duration::from_secs(59)), TimerState::Waiting);
    }

    #[test]
    fn test_due_at_and_after_deadline() {
        let t0 = Instant::now();
        let timer = HealTimer::new(t0, Duration::from_secs(60), HealMode::Batch);
        assert_eq!(timer.state(t0 + Duration::from_secs(60)), TimerState::Due);
        assert_eq!(timer.state(t0 + Duration::from_secs(3600)), TimerState::Due);
    }

    #[test]
    fn test_zero_wait_is_immediately_due() {
        let t0 = Instant::now();
        let timer = HealTimer::new(t0, Duration::ZERO, HealMode::Incremental);
        assert_eq!(timer.state(t0), TimerState::Due);
    }

    #[test]
    fn test_due_time_is_fixed() {
        let t0 = Instant::now();
        let timer = HealTimer::new(t0, Duration::from_secs(5), HealMode::Batch);
        assert_eq!(timer.due_at(), t0 + Duration::from_secs(5));
        // Observing the state does not move the deadline.
        let _ = timer.state(t0 + Duration::from_secs(100));
        assert_eq!(timer.due_at(), t0 + Duration::from_secs(5));
    }
}

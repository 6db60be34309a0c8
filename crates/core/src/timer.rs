//! Exam countdown as a plain state machine.
//!
//! The countdown knows nothing about wall-clock time: something else calls
//! [`Countdown::tick`] once per second. That keeps it trivially testable and
//! lets the services layer decide how ticks are scheduled.

/// Remaining time below which the countdown is reported as running low.
pub const LOW_TIME_SECS: u32 = 5 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Submitted,
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    NotStarted,
    Running { remaining: u32 },
    Finished { remaining: u32, reason: FinishReason },
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still running with this many seconds left.
    Running(u32),
    /// This tick used up the last second.
    Expired,
    /// The countdown was not running; nothing changed.
    Idle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    limit: u32,
    state: CountdownState,
}

impl Countdown {
    #[must_use]
    pub fn new(limit_secs: u32) -> Self {
        Self {
            limit: limit_secs,
            state: CountdownState::NotStarted,
        }
    }

    /// Starts (or restarts) the countdown from the full limit.
    pub fn start(&mut self) {
        self.state = CountdownState::Running {
            remaining: self.limit,
        };
    }

    pub fn tick(&mut self) -> TickOutcome {
        let CountdownState::Running { remaining } = self.state else {
            return TickOutcome::Idle;
        };
        let remaining = remaining.saturating_sub(1);
        if remaining == 0 {
            self.state = CountdownState::Finished {
                remaining,
                reason: FinishReason::TimedOut,
            };
            TickOutcome::Expired
        } else {
            self.state = CountdownState::Running { remaining };
            TickOutcome::Running(remaining)
        }
    }

    /// Stops a running countdown on explicit submission.
    ///
    /// Returns false when it was not running.
    pub fn submit(&mut self) -> bool {
        match self.state {
            CountdownState::Running { remaining } => {
                self.state = CountdownState::Finished {
                    remaining,
                    reason: FinishReason::Submitted,
                };
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn state(&self) -> CountdownState {
        self.state
    }

    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        match self.state {
            CountdownState::NotStarted => self.limit,
            CountdownState::Running { remaining } | CountdownState::Finished { remaining, .. } => {
                remaining
            }
        }
    }

    /// Seconds used so far.
    #[must_use]
    pub fn elapsed(&self) -> u32 {
        self.limit.saturating_sub(self.remaining())
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.state, CountdownState::Running { .. })
    }

    #[must_use]
    pub fn finish_reason(&self) -> Option<FinishReason> {
        match self.state {
            CountdownState::Finished { reason, .. } => Some(reason),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_low(&self) -> bool {
        self.is_running() && self.remaining() < LOW_TIME_SECS
    }

    /// Remaining time as `m:ss`.
    #[must_use]
    pub fn display(&self) -> String {
        format_clock(self.remaining())
    }
}

/// Formats seconds as `m:ss`.
#[must_use]
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_run_expires_exactly_once() {
        let mut countdown = Countdown::new(2400);
        countdown.start();

        let mut expired = 0;
        for _ in 0..2400 {
            if countdown.tick() == TickOutcome::Expired {
                expired += 1;
            }
        }
        assert_eq!(expired, 1);
        assert_eq!(countdown.remaining(), 0);
        assert_eq!(countdown.elapsed(), 2400);
        assert_eq!(countdown.finish_reason(), Some(FinishReason::TimedOut));

        assert_eq!(countdown.tick(), TickOutcome::Idle);
        assert_eq!(countdown.remaining(), 0);
    }

    #[test]
    fn ticks_before_start_are_ignored() {
        let mut countdown = Countdown::new(10);
        assert_eq!(countdown.tick(), TickOutcome::Idle);
        assert_eq!(countdown.state(), CountdownState::NotStarted);
        assert_eq!(countdown.remaining(), 10);
    }

    #[test]
    fn submit_freezes_remaining_time() {
        let mut countdown = Countdown::new(60);
        countdown.start();
        countdown.tick();
        countdown.tick();
        assert!(countdown.submit());
        assert_eq!(countdown.elapsed(), 2);
        assert_eq!(countdown.tick(), TickOutcome::Idle);
        assert_eq!(countdown.finish_reason(), Some(FinishReason::Submitted));
        assert!(!countdown.submit());
    }

    #[test]
    fn low_time_and_display() {
        let mut countdown = Countdown::new(LOW_TIME_SECS + 1);
        countdown.start();
        assert!(!countdown.is_low());
        assert_eq!(countdown.display(), "5:01");
        countdown.tick();
        assert!(!countdown.is_low());
        countdown.tick();
        assert!(countdown.is_low());
        assert_eq!(countdown.display(), "4:59");
        assert_eq!(format_clock(2400), "40:00");
        assert_eq!(format_clock(65), "1:05");
    }
}

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

/// Countdown resolution.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// One elapsed period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTick;

/// Background task emitting a [`TimerTick`] every period.
///
/// The task stops when cancelled, when the handle is dropped, or when the
/// receiver goes away.
#[derive(Debug)]
pub struct ExamTimer {
    handle: JoinHandle<()>,
}

impl ExamTimer {
    /// Spawns the ticking task on the current runtime. The first tick comes
    /// one full period after the call.
    #[must_use]
    pub fn spawn(period: Duration) -> (Self, mpsc::Receiver<TimerTick>) {
        let (tx, rx) = mpsc::channel(16);
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if tx.send(TimerTick).await.is_err() {
                    break;
                }
            }
            tracing::debug!("exam timer receiver closed");
        });
        (Self { handle }, rx)
    }

    pub fn cancel(&self) {
        if !self.handle.is_finished() {
            self.handle.abort();
            tracing::debug!("exam timer cancelled");
        }
    }
}

impl Drop for ExamTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let (timer, mut rx) = ExamTimer::spawn(TICK_PERIOD);
        let started = Instant::now();
        for _ in 0..3 {
            assert_eq!(rx.recv().await, Some(TimerTick));
        }
        assert_eq!(started.elapsed(), Duration::from_secs(3));
        timer.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_closes_the_channel() {
        let (timer, mut rx) = ExamTimer::spawn(TICK_PERIOD);
        timer.cancel();
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_ticks() {
        let (timer, mut rx) = ExamTimer::spawn(TICK_PERIOD);
        drop(timer);
        assert_eq!(rx.recv().await, None);
    }
}

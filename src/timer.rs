use std::time::Duration;

const SECOND: Duration = Duration::from_secs(1);

/// Notifications a running countdown produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerNotice {
    Tick(u32),
    Expired,
}

/// Cancellable per-question countdown.
///
/// The timer owns no thread. The event loop feeds it elapsed wall-clock time
/// through [`Timer::advance`] and gets back the notices that time produced, so
/// a cancel is observed before any later tick can be generated.
#[derive(Debug, Default, Clone)]
pub struct Timer {
    remaining: Option<u32>,
    carry: Duration,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a countdown, dropping whatever was running before.
    pub fn start(&mut self, duration_secs: u32) {
        self.remaining = Some(duration_secs);
        self.carry = Duration::ZERO;
    }

    /// Stop the countdown. Cancelling an idle timer does nothing.
    pub fn cancel(&mut self) {
        self.remaining = None;
        self.carry = Duration::ZERO;
    }

    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }

    pub fn seconds_remaining(&self) -> Option<u32> {
        self.remaining
    }

    /// Account for `elapsed` time. One `Tick` per whole second crossed,
    /// then `Expired` once the count hits zero.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<TimerNotice> {
        let mut notices = vec![];
        let Some(mut remaining) = self.remaining else {
            return notices;
        };

        self.carry += elapsed;
        while self.carry >= SECOND && remaining > 0 {
            self.carry -= SECOND;
            remaining -= 1;
            notices.push(TimerNotice::Tick(remaining));
        }

        if remaining == 0 {
            notices.push(TimerNotice::Expired);
            self.cancel();
        } else {
            self.remaining = Some(remaining);
        }

        notices
    }
}

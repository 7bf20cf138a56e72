pub mod manual;
pub mod tokio_timer;

use std::time::Duration;

pub use manual::ManualScheduler;
pub use tokio_timer::TokioScheduler;

/// Identifies one scheduled callback.
///
/// When a timer fires, its handle is delivered back to the widget through
/// `FloatingTab::handle_timer`. Handles are never reused by a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u64 {
        self.0
    }
}

/// One-shot timer facility.
pub trait Scheduler: Send {
    /// Arrange for the returned handle to fire once after `delay`.
    fn schedule_once(&mut self, delay: Duration) -> TimerHandle;

    /// Cancel a pending timer. Unknown or already fired handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}

/// Wall-clock time source, in milliseconds since the Unix epoch.
pub trait Clock: Send {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

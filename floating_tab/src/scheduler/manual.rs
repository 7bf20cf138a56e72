use super::{Clock, Scheduler, TimerHandle};
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

/// Simulated clock and timer queue.
///
/// Nothing fires on its own: time moves only through `advance`, which
/// reports each due handle in deadline order. Clones share the same
/// timeline, so a test can keep one clone while the widget owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

#[derive(Debug, Default)]
struct ManualState {
    epoch_ms: i64,
    elapsed: Duration,
    next_id: u64,
    // keyed by (deadline, id) so equal deadlines fire in creation order
    pending: BTreeMap<(Duration, u64), TimerHandle>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A timeline whose wall clock starts at `epoch_ms`.
    pub fn starting_at(epoch_ms: i64) -> Self {
        let scheduler = Self::default();
        scheduler.lock().epoch_ms = epoch_ms;
        scheduler
    }

    fn lock(&self) -> MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Time elapsed on this timeline.
    pub fn elapsed(&self) -> Duration {
        self.lock().elapsed
    }

    /// Number of timers waiting to fire.
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Time left until the earliest pending timer fires.
    pub fn next_due_in(&self) -> Option<Duration> {
        let state = self.lock();
        state
            .pending
            .keys()
            .next()
            .map(|(deadline, _)| deadline.saturating_sub(state.elapsed))
    }

    /// Move time forward by `by`, firing every timer that falls due.
    ///
    /// `on_fire` runs without the timeline locked, so it may schedule or
    /// cancel timers; new timers due before the end of the window fire in
    /// the same call.
    pub fn advance(&self, by: Duration, mut on_fire: impl FnMut(TimerHandle)) {
        let target = self.elapsed() + by;

        while let Some(handle) = self.pop_due(target) {
            on_fire(handle);
        }

        let mut state = self.lock();
        state.elapsed = state.elapsed.max(target);
    }

    fn pop_due(&self, target: Duration) -> Option<TimerHandle> {
        let mut state = self.lock();
        let (&(deadline, id), _) = state.pending.first_key_value()?;
        if deadline > target {
            return None;
        }

        state.elapsed = state.elapsed.max(deadline);
        state.pending.remove(&(deadline, id))
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_once(&mut self, delay: Duration) -> TimerHandle {
        let mut state = self.lock();
        state.next_id += 1;

        let handle = TimerHandle::new(state.next_id);
        let deadline = state.elapsed + delay;
        state.pending.insert((deadline, handle.id()), handle);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.lock().pending.retain(|_, pending| *pending != handle);
    }
}

impl Clock for ManualScheduler {
    fn now_millis(&self) -> i64 {
        let state = self.lock();
        let elapsed_ms =
            i64::try_from(state.elapsed.as_millis()).unwrap_or(i64::MAX);
        state.epoch_ms.saturating_add(elapsed_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fires_in_deadline_order() {
        let mut scheduler = ManualScheduler::new();
        let late = scheduler.schedule_once(Duration::from_secs(3));
        let early = scheduler.schedule_once(Duration::from_secs(1));

        let mut fired = Vec::new();
        scheduler.advance(Duration::from_secs(5), |h| fired.push(h));

        assert_eq!(fired, vec![early, late]);
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.elapsed(), Duration::from_secs(5));
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.schedule_once(Duration::from_secs(1));

        scheduler.cancel(handle);

        let mut fired = Vec::new();
        scheduler.advance(Duration::from_secs(10), |h| fired.push(h));
        assert!(fired.is_empty());
    }

    #[test]
    fn test_timers_scheduled_while_firing_can_fire_in_same_window() {
        let scheduler = ManualScheduler::new();
        let mut owner = scheduler.clone();
        owner.schedule_once(Duration::from_secs(1));

        let mut fired = Vec::new();
        scheduler.advance(Duration::from_secs(5), |h| {
            fired.push((h, owner.elapsed()));
            if fired.len() < 3 {
                owner.schedule_once(Duration::from_secs(2));
            }
        });

        let at: Vec<Duration> = fired.iter().map(|(_, at)| *at).collect();
        assert_eq!(
            at,
            vec![
                Duration::from_secs(1),
                Duration::from_secs(3),
                Duration::from_secs(5)
            ]
        );
    }

    #[test]
    fn test_clock_follows_timeline() {
        let scheduler = ManualScheduler::starting_at(1_000);

        scheduler.advance(Duration::from_millis(250), |_| {});

        assert_eq!(scheduler.now_millis(), 1_250);
    }

    #[test]
    fn test_next_due_in_reports_remaining_time() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule_once(Duration::from_secs(4));

        scheduler.advance(Duration::from_secs(1), |_| {});

        assert_eq!(scheduler.next_due_in(), Some(Duration::from_secs(3)));
    }
}

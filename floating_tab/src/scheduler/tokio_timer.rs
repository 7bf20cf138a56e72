use super::{Scheduler, TimerHandle};
use crate::error::{Error, Result};
use std::{collections::HashMap, time::Duration};
use tokio::{
    runtime::Handle,
    sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
    task::JoinHandle,
};
use tracing::debug;

/// Timers backed by the tokio runtime.
///
/// Each timer is a task sleeping for its delay and then sending its handle
/// on the channel returned from `new`. Cancelling aborts the task.
pub struct TokioScheduler {
    runtime: Handle,
    fired: UnboundedSender<TimerHandle>,
    next_id: u64,
    tasks: HashMap<TimerHandle, JoinHandle<()>>,
}

impl TokioScheduler {
    /// # Errors
    /// `Error::TimerUnavailable` when called outside a tokio runtime.
    pub fn new() -> Result<(Self, UnboundedReceiver<TimerHandle>)> {
        let runtime = Handle::try_current().map_err(|_| Error::TimerUnavailable)?;
        let (fired, receiver) = unbounded_channel();

        Ok((
            Self {
                runtime,
                fired,
                next_id: 0,
                tasks: HashMap::new(),
            },
            receiver,
        ))
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_once(&mut self, delay: Duration) -> TimerHandle {
        self.tasks.retain(|_, task| !task.is_finished());

        self.next_id += 1;
        let handle = TimerHandle::new(self.next_id);
        let fired = self.fired.clone();

        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // receiver gone means the widget was torn down
            let _ = fired.send(handle);
        });

        debug!("Scheduled timer {} in {:?}", handle.id(), delay);
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
            debug!("Cancelled timer {}", handle.id());
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

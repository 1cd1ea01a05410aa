//! Manually advanced timer queue

use parking_lot::RwLock;
use std::time::Duration;

use crate::host::{DeferredTask, Scheduler};

#[derive(Debug, Default)]
struct Queue {
    now: Duration,
    pending: Vec<(Duration, DeferredTask)>,
}

#[derive(Debug, Default)]
pub struct ManualScheduler {
    queue: RwLock<Queue>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.read().pending.len()
    }

    /// Move time forward and return the tasks that came due, oldest first
    pub fn advance(&self, by: Duration) -> Vec<DeferredTask> {
        let mut queue = self.queue.write();
        queue.now = queue.now.saturating_add(by);
        let now = queue.now;

        let (mut due, pending): (Vec<_>, Vec<_>) =
            queue.pending.drain(..).partition(|(at, _)| *at <= now);
        queue.pending = pending;

        due.sort_by_key(|(at, _)| *at);
        due.into_iter().map(|(_, task)| task).collect()
    }
}

impl Scheduler for ManualScheduler {
    fn defer(&self, delay: Duration, task: DeferredTask) {
        let mut queue = self.queue.write();
        let due = queue.now.saturating_add(delay);
        queue.pending.push((due, task));

        tracing::trace!(?task, ?delay, "Deferred task scheduled");
    }
}

//! One-shot task schedulers for the keyboard's deferred layout pass.
//!
//! - [`TokioScheduler`] sleeps on the Tokio runtime and then runs the task.
//! - [`ManualScheduler`] queues tasks until [`ManualScheduler::run_pending`]
//!   is called, which makes the deferred step deterministic for headless
//!   hosts and tests.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::runtime::Handle;

use crate::application::keyboard::{DeferredTask, Scheduler};

/// Error type for scheduler construction.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("no tokio runtime is running on this thread")]
    NoRuntime,
}

/// Runs each task on the Tokio runtime after its delay.
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Binds to the runtime the caller is running on.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::NoRuntime`] when called outside a runtime.
    pub fn current() -> Result<Self, SchedulerError> {
        Handle::try_current()
            .map(|handle| Self { handle })
            .map_err(|_| SchedulerError::NoRuntime)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_once(&self, delay: Duration, task: DeferredTask) {
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}

/// Holds tasks until they are run explicitly.
#[derive(Default)]
pub struct ManualScheduler {
    pending: Mutex<Vec<(Duration, DeferredTask)>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(Duration, DeferredTask)>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    /// Delay requested by the most recently scheduled task still pending.
    pub fn last_delay(&self) -> Option<Duration> {
        self.lock().last().map(|(delay, _)| *delay)
    }

    /// Runs every pending task in scheduling order and returns how many ran.
    ///
    /// Tasks scheduled while running stay queued for the next call.
    pub fn run_pending(&self) -> usize {
        let tasks = std::mem::take(&mut *self.lock());
        let count = tasks.len();
        for (_, task) in tasks {
            task();
        }
        count
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_once(&self, delay: Duration, task: DeferredTask) {
        self.lock().push((delay, task));
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_manual_scheduler_runs_in_order() {
        let scheduler = ManualScheduler::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        for n in 0..3 {
            let log = Arc::clone(&log);
            scheduler.schedule_once(Duration::from_millis(100), Box::new(move || log.lock().unwrap().push(n)));
        }

        assert_eq!(scheduler.pending(), 3);
        assert_eq!(scheduler.run_pending(), 3);
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_tokio_scheduler_requires_runtime() {
        assert!(matches!(TokioScheduler::current(), Err(SchedulerError::NoRuntime)));
    }

    #[test]
    fn test_tokio_scheduler_binds_inside_a_runtime() {
        tokio_test::block_on(async {
            assert!(TokioScheduler::current().is_ok());
        });
    }

    #[tokio::test]
    async fn test_tokio_scheduler_runs_task_after_delay() {
        // Arrange
        let scheduler = TokioScheduler::current().expect("inside a runtime");
        let runs = Arc::new(AtomicUsize::new(0));
        let r = Arc::clone(&runs);

        // Act
        scheduler.schedule_once(
            Duration::from_millis(20),
            Box::new(move || {
                r.fetch_add(1, Ordering::SeqCst);
            }),
        );

        // Assert: not yet, then exactly once
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }
}

//! # Scheduler
//!
//! A [`Scheduler`] that runs framework tasks on a Tokio runtime.
//!
//! Tasks are plain synchronous closures; each one is driven by its own spawned future
//! that sleeps until the task is due. Keep task bodies short: they run on a runtime
//! worker thread.
//!
//! ## Example
//!
//! ```rust
//! use art_kernel::scheduler::Scheduler;
//! use art_scheduler::TokioScheduler;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), art_kernel::scheduler::SchedulerError> {
//! let scheduler: Arc<dyn Scheduler> = Arc::new(TokioScheduler::current()?);
//! let id = scheduler.run_later(|| println!("later"), Duration::from_secs(5))?;
//! assert!(scheduler.is_queued(id));
//! scheduler.cancel(id)?;
//! # Ok(())
//! # }
//! ```

use art_kernel::scheduler::{RepeatingTask, Scheduler, SchedulerError, Task, TaskId};
use fxhash::FxHashMap;
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace};

// Task states. `SPAWNED` until the future is first polled; `DROPPED` if it was dropped
// without ever being polled (aborted or rejected by a shut-down runtime).
const SPAWNED: u8 = 0;
const QUEUED: u8 = 1;
const RUNNING: u8 = 2;
const DONE: u8 = 3;
const DROPPED: u8 = 4;

#[derive(Debug)]
struct TaskSlot {
    join: JoinHandle<()>,
    state: Arc<AtomicU8>,
}

#[derive(Debug)]
struct SchedulerInner {
    handle: Handle,
    tasks: Mutex<FxHashMap<TaskId, TaskSlot>>,
    next_id: AtomicU64,
}

impl Drop for SchedulerInner {
    fn drop(&mut self) {
        for (_, slot) in self.tasks.get_mut().drain() {
            slot.join.abort();
        }
    }
}

/// Removes a task's slot once its future finishes, panics or is aborted.
///
/// May run on the thread calling `spawn`, so it must not be dropped while the task map
/// is locked.
struct Finish {
    inner: Weak<SchedulerInner>,
    id: TaskId,
    state: Arc<AtomicU8>,
}

impl Drop for Finish {
    fn drop(&mut self) {
        if self
            .state
            .compare_exchange(SPAWNED, DROPPED, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.state.store(DONE, Ordering::Release);
        }
        if let Some(inner) = self.inner.upgrade() {
            inner.tasks.lock().remove(&self.id);
            trace!(task = %self.id, "Task finished");
        }
    }
}

/// [`Scheduler`] over a Tokio [`Handle`].
///
/// Dropping the scheduler cancels every task it still tracks.
pub struct TokioScheduler {
    inner: Arc<SchedulerInner>,
}

impl TokioScheduler {
    #[must_use]
    pub fn new(handle: Handle) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                handle,
                tasks: Mutex::default(),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Binds to the runtime the caller is running on.
    ///
    /// # Errors
    /// [`SchedulerError::Unavailable`] when called outside a Tokio runtime.
    pub fn current() -> Result<Self, SchedulerError> {
        Handle::try_current().map(Self::new).map_err(|e| SchedulerError::Unavailable {
            message: e.to_string().into(),
            context: Some("TokioScheduler::current".into()),
        })
    }

    /// Number of tasks that are queued or running.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.tasks.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.tasks.lock().is_empty()
    }

    fn spawn<F, Fut>(&self, run: F) -> Result<TaskId, SchedulerError>
    where
        F: FnOnce(Arc<AtomicU8>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let id = TaskId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let state = Arc::new(AtomicU8::new(SPAWNED));
        let finish =
            Finish { inner: Arc::downgrade(&self.inner), id, state: Arc::clone(&state) };
        let started = Arc::clone(&state);
        let future = run(Arc::clone(&state));

        let join = self.inner.handle.spawn(async move {
            let _finish = finish;
            let _ = started.compare_exchange(SPAWNED, QUEUED, Ordering::AcqRel, Ordering::Acquire);
            future.await;
        });

        // `Finish` stores its state before taking the lock, so reading it under the lock
        // tells whether the task already finished or was never run.
        let mut tasks = self.inner.tasks.lock();
        match state.load(Ordering::Acquire) {
            DROPPED => {
                return Err(SchedulerError::Unavailable {
                    message: "Runtime is shut down".into(),
                    context: Some(id.to_string().into()),
                });
            }
            DONE => {}
            _ => {
                tasks.insert(id, TaskSlot { join, state });
            }
        }
        Ok(id)
    }

    fn state(&self, id: TaskId) -> Option<u8> {
        self.inner.tasks.lock().get(&id).map(|slot| slot.state.load(Ordering::Acquire))
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, task: Task, delay: Duration) -> Result<TaskId, SchedulerError> {
        let id = self.spawn(move |state| async move {
            tokio::time::sleep(delay).await;
            state.store(RUNNING, Ordering::Release);
            task();
        })?;
        debug!(task = %id, ?delay, "Scheduled task");
        Ok(id)
    }

    fn schedule_repeating(
        &self,
        task: RepeatingTask,
        delay: Duration,
        period: Duration,
    ) -> Result<TaskId, SchedulerError> {
        if period.is_zero() {
            return Err(SchedulerError::InvalidPeriod {
                message: "Repeat period must be greater than zero".into(),
                context: None,
            });
        }

        let id = self.spawn(move |state| async move {
            let mut ticks = tokio::time::interval_at(Instant::now() + delay, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                state.store(RUNNING, Ordering::Release);
                task();
                state.store(QUEUED, Ordering::Release);
            }
        })?;
        debug!(task = %id, ?delay, ?period, "Scheduled repeating task");
        Ok(id)
    }

    fn cancel(&self, id: TaskId) -> Result<(), SchedulerError> {
        let slot = self.inner.tasks.lock().remove(&id).ok_or_else(|| {
            SchedulerError::UnknownTask { message: id.to_string().into(), context: None }
        })?;
        slot.join.abort();
        debug!(task = %id, "Cancelled task");
        Ok(())
    }

    fn cancel_all(&self) {
        let tasks = std::mem::take(&mut *self.inner.tasks.lock());
        let cancelled = tasks.len();
        for (_, slot) in tasks {
            slot.join.abort();
        }
        debug!(cancelled, "Cancelled all tasks");
    }

    fn is_queued(&self, id: TaskId) -> bool {
        matches!(self.state(id), Some(SPAWNED | QUEUED))
    }

    fn is_running(&self, id: TaskId) -> bool {
        self.state(id) == Some(RUNNING)
    }
}

impl fmt::Debug for TokioScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokioScheduler").field("tasks", &self.len()).finish_non_exhaustive()
    }
}

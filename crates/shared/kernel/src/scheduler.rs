//! The optional task-scheduling subsystem.
//!
//! The kernel never runs tasks itself; it only stores whichever [`Scheduler`] the host
//! installs, if any.

use art_error::{error_context, format_context};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::{self, Debug};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("Scheduler unavailable{}: {message}", format_context(.context))]
    Unavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Unknown task{}: {message}", format_context(.context))]
    UnknownTask { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid repeat period{}: {message}", format_context(.context))]
    InvalidPeriod { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

error_context!(
    SchedulerError, SchedulerErrorExt,
    variants: [Unavailable, UnknownTask, InvalidPeriod]
);

/// Handle of a scheduled task, unique per scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

pub type Task = Box<dyn FnOnce() + Send + 'static>;
pub type RepeatingTask = Arc<dyn Fn() + Send + Sync + 'static>;

pub trait Scheduler: Debug + Send + Sync {
    /// Runs `task` once after `delay`.
    ///
    /// # Errors
    /// Implementation specific, e.g. [`SchedulerError::Unavailable`].
    fn schedule(&self, task: Task, delay: Duration) -> Result<TaskId, SchedulerError>;

    /// Runs `task` after `delay`, then every `period`, until cancelled.
    ///
    /// # Errors
    /// [`SchedulerError::InvalidPeriod`] for a zero period; otherwise implementation specific.
    fn schedule_repeating(
        &self,
        task: RepeatingTask,
        delay: Duration,
        period: Duration,
    ) -> Result<TaskId, SchedulerError>;

    /// # Errors
    /// [`SchedulerError::UnknownTask`] if `id` is not (or no longer) scheduled.
    fn cancel(&self, id: TaskId) -> Result<(), SchedulerError>;

    fn cancel_all(&self);

    /// Scheduled and waiting for its next run.
    fn is_queued(&self, id: TaskId) -> bool;

    /// Currently executing.
    fn is_running(&self, id: TaskId) -> bool;
}

impl dyn Scheduler + '_ {
    /// Convenience wrapper boxing a closure for [`Scheduler::schedule`].
    ///
    /// # Errors
    /// Propagates the scheduler's error unchanged.
    pub fn run_later<F>(&self, task: F, delay: Duration) -> Result<TaskId, SchedulerError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.schedule(Box::new(task), delay)
    }

    /// Convenience wrapper for [`Scheduler::schedule_repeating`].
    ///
    /// # Errors
    /// Propagates the scheduler's error unchanged.
    pub fn run_timer<F>(
        &self,
        task: F,
        delay: Duration,
        period: Duration,
    ) -> Result<TaskId, SchedulerError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.schedule_repeating(Arc::new(task), delay, period)
    }
}

//! # Unit of work accepted by an [`ExecutionManager`](crate::ExecutionManager).
//!
//! A [`BoxTask`] is a type-erased, `'static` future with no output: the router
//! and the resolver never collect results from the tasks they submit.
//! [`TaskHandle`] is the cancellable receipt returned by `submit`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio_util::sync::CancellationToken;

/// Boxed future type submitted to an execution manager.
pub type BoxTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Cancellable handle to a submitted task.
///
/// Cancellation is best-effort: an executor honours it for tasks that are still
/// queued or parked at an `.await`; synchronous code already running is not
/// interrupted.
#[derive(Clone, Debug)]
pub struct TaskHandle {
    token: CancellationToken,
    finished: Arc<AtomicBool>,
}

impl TaskHandle {
    /// Creates a handle bound to `token`.
    ///
    /// Executors call [`mark_finished`](Self::mark_finished) once the task has
    /// run to completion or was dropped after cancellation.
    pub fn new(token: CancellationToken) -> Self {
        Self {
            token,
            finished: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Requests cancellation. Safe to call any number of times.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// True once the executor is done with the task (completed or dropped).
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    /// Token observed by the executor for this task.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn mark_finished(&self) {
        self.finished.store(true, Ordering::Release);
    }
}

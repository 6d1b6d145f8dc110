//! # Execution manager: where routed and resolving work actually runs.
//!
//! [`ExecutionManager`] is the collaborator the router and the lifecycle
//! resolver submit their tasks to. [`TokioExecutor`] is the default
//! implementation backed by a tokio runtime handle.
//!
//! ## Architecture
//! ```text
//! submit(task) ──► child token = root.child_token()
//!                  spawn(select! {
//!                      token.cancelled() ─► drop task
//!                      task              ─► run to completion (panics caught)
//!                  })
//!                  └─► TaskHandle { token, finished }
//!
//! shutdown() ──► root.cancel() ─► every child token cancelled
//! ```
//!
//! ## Rules
//! - A task cancelled before it is first polled never runs.
//! - Cancellation of a running task takes effect at its next `.await`.
//! - Tasks are independent: no ordering between submissions.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::core::panic_message;

use crate::tasks::task::{BoxTask, TaskHandle};

/// Task-execution facility consumed by the router and the resolver.
pub trait ExecutionManager: Send + Sync + 'static {
    /// Schedules `task` and returns a handle that can cancel it.
    fn submit(&self, task: BoxTask) -> TaskHandle;

    /// Schedules `task` without keeping a handle (fire-and-forget).
    fn execute(&self, task: BoxTask) {
        let _ = self.submit(task);
    }
}

/// [`ExecutionManager`] spawning onto a tokio runtime.
#[derive(Clone, Debug)]
pub struct TokioExecutor {
    runtime: Handle,
    root: CancellationToken,
}

impl TokioExecutor {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            root: CancellationToken::new(),
        }
    }

    /// Executor bound to the runtime of the calling context.
    ///
    /// # Panics
    /// Panics when called outside of a tokio runtime, like [`Handle::current`].
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    /// Cancels every task submitted so far and any submitted afterwards.
    pub fn shutdown(&self) {
        self.root.cancel();
    }

    pub fn is_shutdown(&self) -> bool {
        self.root.is_cancelled()
    }
}

impl ExecutionManager for TokioExecutor {
    fn submit(&self, task: BoxTask) -> TaskHandle {
        let token = self.root.child_token();
        let handle = TaskHandle::new(token.clone());
        let receipt = handle.clone();

        self.runtime.spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {}
                res = AssertUnwindSafe(task).catch_unwind() => {
                    if let Err(panic_err) = res {
                        error!(panic = %panic_message(&*panic_err), "submitted task panicked");
                    }
                }
            }
            receipt.mark_finished();
        });
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_submit_runs_task() {
        let exec = TokioExecutor::current();
        let (tx, rx) = oneshot::channel();
        let handle = exec.submit(Box::pin(async move {
            let _ = tx.send(42);
        }));
        assert_eq!(rx.await.unwrap(), 42);
        tokio::time::timeout(Duration::from_secs(1), async {
            while !handle.is_finished() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
        assert!(!handle.is_cancelled());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_cancel_before_poll_skips_task() {
        let exec = TokioExecutor::current();
        let ran = Arc::new(AtomicUsize::new(0));
        let r = Arc::clone(&ran);
        let handle = exec.submit(Box::pin(async move {
            r.fetch_add(1, Ordering::SeqCst);
        }));
        // current_thread: the spawned task cannot be polled before we yield.
        handle.cancel();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(ran.load(Ordering::SeqCst), 0);
        assert!(handle.is_finished());
    }

    #[tokio::test]
    async fn test_cancel_in_flight_drops_at_await() {
        let exec = TokioExecutor::current();
        let (started_tx, started_rx) = oneshot::channel();
        let reached_end = Arc::new(AtomicUsize::new(0));
        let r = Arc::clone(&reached_end);
        let handle = exec.submit(Box::pin(async move {
            let _ = started_tx.send(());
            tokio::time::sleep(Duration::from_secs(30)).await;
            r.fetch_add(1, Ordering::SeqCst);
        }));
        started_rx.await.unwrap();
        handle.cancel();
        tokio::time::timeout(Duration::from_secs(1), async {
            while !handle.is_finished() {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .unwrap();
        assert_eq!(reached_end.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_panicking_task_still_finishes() {
        let exec = TokioExecutor::current();
        let handle = exec.submit(Box::pin(async { panic!("task blew up"); }));
        tokio::time::timeout(Duration::from_secs(1), async {
            while !handle.is_finished() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_cancels_everything() {
        let exec = TokioExecutor::current();
        let a = exec.submit(Box::pin(std::future::pending::<()>()));
        let b = exec.submit(Box::pin(std::future::pending::<()>()));
        exec.shutdown();
        assert!(exec.is_shutdown());
        assert!(a.is_cancelled() && b.is_cancelled());
        let late = exec.submit(Box::pin(async {}));
        assert!(late.is_cancelled());
    }
}

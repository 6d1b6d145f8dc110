//! # Two-branch join barrier.
//!
//! Tracks settlement of the media and ad branches under one mutex. The call
//! that sets the second flag (media path, ad path or cancellation) is the only
//! one that observes the `Ready` transition, so the callback it takes out is
//! delivered at most once.
//!
//! ```text
//!            settle(Media)          settle(Ads)
//! Pending ───────────────► half ───────────────► Ready ─► callback taken
//!    │                                             ▲
//!    └──────────── force() (cancel, callback dropped)
//! ```
//!
//! Waiters: blocking threads park on a `Condvar`; async tasks watch a
//! `tokio::sync::watch` flag. Both are released on the `Ready` transition.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Branch {
    Media,
    Ads,
}

/// Outcome of one [`JoinBarrier::settle`] call.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Transition<C> {
    /// The branch was already settled; nothing changed.
    Repeated,
    /// The branch settled, the other one is still pending.
    Half,
    /// This call completed the barrier; carries the callback if one was left.
    Ready(Option<C>),
}

struct Settlement<C> {
    media: bool,
    ads: bool,
    callback: Option<C>,
}

impl<C> Settlement<C> {
    fn ready(&self) -> bool {
        self.media && self.ads
    }
}

pub(crate) struct JoinBarrier<C> {
    state: Mutex<Settlement<C>>,
    parked: Condvar,
    ready_tx: watch::Sender<bool>,
}

impl<C> JoinBarrier<C> {
    pub(crate) fn new(callback: Option<C>) -> Self {
        let (ready_tx, _) = watch::channel(false);
        Self {
            state: Mutex::new(Settlement {
                media: false,
                ads: false,
                callback,
            }),
            parked: Condvar::new(),
            ready_tx,
        }
    }

    /// Marks `branch` settled.
    ///
    /// Only the call that completes the barrier gets [`Transition::Ready`], and
    /// with it the callback. Settling a branch twice is a no-op.
    pub(crate) fn settle(&self, branch: Branch) -> Transition<C> {
        let mut state = self.lock();
        let flag = match branch {
            Branch::Media => &mut state.media,
            Branch::Ads => &mut state.ads,
        };
        if *flag {
            return Transition::Repeated;
        }
        *flag = true;
        if !state.ready() {
            return Transition::Half;
        }
        self.release_waiters();
        Transition::Ready(state.callback.take())
    }

    /// Settles every unsettled branch and discards the callback.
    ///
    /// Returns `true` if this call made the barrier ready.
    pub(crate) fn force(&self) -> bool {
        let mut state = self.lock();
        let callback = state.callback.take();
        let was_ready = state.ready();
        state.media = true;
        state.ads = true;
        if !was_ready {
            self.release_waiters();
        }
        drop(state);
        drop(callback);
        !was_ready
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.lock().ready()
    }

    /// Blocks the calling thread until both branches are settled.
    pub(crate) fn wait_blocking(&self) {
        let state = self.lock();
        let _ready = self
            .parked
            .wait_while(state, |s| !s.ready())
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Waits asynchronously until both branches are settled.
    pub(crate) async fn wait(&self) {
        let mut rx = self.ready_tx.subscribe();
        // The sender lives in `self`, so the channel cannot close under us.
        let _ = rx.wait_for(|ready| *ready).await;
    }

    fn release_waiters(&self) {
        self.ready_tx.send_replace(true);
        self.parked.notify_all();
    }

    fn lock(&self) -> MutexGuard<'_, Settlement<C>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_second_settle_takes_callback() {
        let barrier = JoinBarrier::new(Some("cb"));
        assert_eq!(barrier.settle(Branch::Ads), Transition::Half);
        assert!(!barrier.is_ready());
        assert_eq!(barrier.settle(Branch::Ads), Transition::Repeated);
        assert_eq!(barrier.settle(Branch::Media), Transition::Ready(Some("cb")));
        assert!(barrier.is_ready());
        assert_eq!(barrier.settle(Branch::Media), Transition::Repeated);
    }

    #[test]
    fn test_force_drops_callback_and_releases() {
        let barrier = JoinBarrier::new(Some("cb"));
        barrier.settle(Branch::Media);
        assert!(barrier.force());
        assert!(barrier.is_ready());
        assert_eq!(barrier.settle(Branch::Ads), Transition::Repeated);
        assert!(!barrier.force());
    }

    #[test]
    fn test_concurrent_settles_deliver_once() {
        for _ in 0..200 {
            let barrier = Arc::new(JoinBarrier::new(Some(())));
            let delivered = Arc::new(AtomicUsize::new(0));
            let handles: Vec<_> = [Branch::Media, Branch::Ads]
                .into_iter()
                .map(|branch| {
                    let barrier = Arc::clone(&barrier);
                    let delivered = Arc::clone(&delivered);
                    thread::spawn(move || {
                        if let Transition::Ready(Some(())) = barrier.settle(branch) {
                            delivered.fetch_add(1, Ordering::SeqCst);
                        }
                    })
                })
                .collect();
            for h in handles {
                h.join().unwrap();
            }
            assert_eq!(delivered.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn test_blocking_waiters_are_released() {
        let barrier = Arc::new(JoinBarrier::<()>::new(None));
        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || barrier.wait_blocking())
            })
            .collect();
        thread::sleep(Duration::from_millis(10));
        barrier.settle(Branch::Media);
        barrier.settle(Branch::Ads);
        for w in waiters {
            w.join().unwrap();
        }
    }

    #[tokio::test]
    async fn test_async_wait_after_ready_returns() {
        let barrier = JoinBarrier::<()>::new(None);
        barrier.force();
        tokio::time::timeout(Duration::from_secs(1), barrier.wait())
            .await
            .unwrap();
    }
}

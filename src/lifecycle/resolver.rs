//! # LifecycleResolver: parallel media and ad resolution behind one barrier.
//!
//! A resolver is created per media id. It immediately submits two tasks to the
//! injected [`ExecutionManager`]:
//!
//! ```text
//! spawn(id, params)
//!   ├─► media path: MediaResolver::resolve(id)  ─► set_media ─► on_media_resolved
//!   │                                  └─ Err   ─► on_media_error, cancel ad path
//!   └─► ad path:    AdResolver::resolve(id)     ─► set_ads   ─► on_ads_resolved
//!                                      └─ Err   ─► on_ad_error (lifecycle stays playable)
//!
//! both paths settled ─► JoinBarrier ready ─► callback(lifecycle)   exactly once
//!                                       └─► lifecycle() / wait() return
//! ```
//!
//! ## Rules
//! - Data is written into the [`Lifecycle`] before the matching listener signal
//!   is emitted, and both signals of a path come before the barrier settles.
//! - A failed media path cancels the in-flight ad path before settling itself,
//!   so nobody waits on ads for media that will never play.
//! - Ad results arriving after the ad path was cancelled are discarded.
//! - [`LifecycleResolver::cancel`] suppresses the callback and releases every
//!   waiter. It is idempotent and a no-op once the lifecycle is ready.
//! - The callback runs on whichever task settles last; a panic inside it is
//!   caught and logged.
//!
//! Dropping the resolver handle does not cancel anything.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::core::{Config, panic_message};
use crate::error::ResolveError;
use crate::lifecycle::barrier::{Branch, JoinBarrier, Transition};
use crate::lifecycle::entity::Lifecycle;
use crate::lifecycle::media::{AdResolver, MediaId, MediaResolver};
use crate::subscribers::LifecycleListener;
use crate::tasks::{ExecutionManager, TaskHandle};

/// Invoked once with the finished lifecycle.
pub type LifecycleCallback = Box<dyn FnOnce(Arc<Lifecycle>) + Send + 'static>;

/// Collaborators and settings for one [`LifecycleResolver`].
#[derive(Clone)]
pub struct ResolverParams {
    pub media_resolver: Arc<dyn MediaResolver>,
    pub ad_resolver: Arc<dyn AdResolver>,
    pub executor: Arc<dyn ExecutionManager>,
    /// Receives the four lifecycle signals; usually `router.lifecycle_listener()`.
    pub listener: Arc<dyn LifecycleListener>,
    pub config: Config,
}

impl std::fmt::Debug for ResolverParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverParams")
            .field("listener", &self.listener.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Handle to an in-flight lifecycle resolution. Cheap to clone.
#[derive(Clone)]
pub struct LifecycleResolver {
    shared: Arc<Shared>,
}

struct Shared {
    lifecycle: Arc<Lifecycle>,
    barrier: JoinBarrier<LifecycleCallback>,
    listener: Arc<dyn LifecycleListener>,
    media_token: CancellationToken,
    ads_token: CancellationToken,
    /// Executor receipts; emptied once the barrier is ready.
    tasks: Mutex<Vec<TaskHandle>>,
}

impl LifecycleResolver {
    /// Starts resolving `media_id` without a completion callback.
    pub fn spawn(media_id: impl Into<MediaId>, params: ResolverParams) -> Self {
        Self::start(media_id.into(), None, params)
    }

    /// Starts resolving `media_id`; `callback` runs once both paths settle.
    ///
    /// The callback is not invoked if the resolver is cancelled first.
    pub fn spawn_with_callback<F>(media_id: impl Into<MediaId>, params: ResolverParams, callback: F) -> Self
    where
        F: FnOnce(Arc<Lifecycle>) + Send + 'static,
    {
        Self::start(media_id.into(), Some(Box::new(callback)), params)
    }

    fn start(media_id: MediaId, callback: Option<LifecycleCallback>, params: ResolverParams) -> Self {
        let ResolverParams {
            media_resolver,
            ad_resolver,
            executor,
            listener,
            config,
        } = params;

        let shared = Arc::new(Shared {
            lifecycle: Arc::new(Lifecycle::new(media_id.clone())),
            barrier: JoinBarrier::new(callback),
            listener,
            media_token: CancellationToken::new(),
            ads_token: CancellationToken::new(),
            tasks: Mutex::new(Vec::with_capacity(2)),
        });
        debug!(media_id = %media_id, "resolving lifecycle");

        let media = executor.submit(Box::pin(fetch_media(
            Arc::clone(&shared),
            media_resolver,
            config.media_deadline(),
        )));
        let ads = executor.submit(Box::pin(fetch_ads(
            Arc::clone(&shared),
            ad_resolver,
            config.ads_deadline(),
        )));
        shared.track([media, ads]);

        Self { shared }
    }

    pub fn media_id(&self) -> &MediaId {
        self.shared.lifecycle.media_id()
    }

    /// Blocks the calling thread until both paths settle (or the resolver is
    /// cancelled) and returns the lifecycle.
    ///
    /// Must not be called from an async context on a current-thread runtime:
    /// the resolution tasks would never get to run. Use [`wait`](Self::wait).
    pub fn lifecycle(&self) -> Arc<Lifecycle> {
        self.shared.barrier.wait_blocking();
        Arc::clone(&self.shared.lifecycle)
    }

    /// Async counterpart of [`lifecycle`](Self::lifecycle).
    pub async fn wait(&self) -> Arc<Lifecycle> {
        self.shared.barrier.wait().await;
        Arc::clone(&self.shared.lifecycle)
    }

    /// `true` once both paths settled or the resolver was cancelled.
    pub fn is_ready(&self) -> bool {
        self.shared.barrier.is_ready()
    }

    /// Cancels both in-flight resolutions, drops the callback and releases
    /// every waiter with whatever the lifecycle holds.
    pub fn cancel(&self) {
        let shared = &self.shared;
        shared.media_token.cancel();
        shared.ads_token.cancel();
        for handle in shared.take_tasks() {
            handle.cancel();
        }
        if shared.barrier.force() {
            debug!(media_id = %shared.lifecycle.media_id(), "lifecycle resolution cancelled");
        }
    }
}

impl std::fmt::Debug for LifecycleResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleResolver")
            .field("media_id", self.media_id())
            .field("ready", &self.is_ready())
            .finish()
    }
}

impl Shared {
    fn track(&self, handles: [TaskHandle; 2]) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        // Both paths may already be done by the time submit returned.
        if self.barrier.is_ready() {
            return;
        }
        tasks.extend(handles);
    }

    fn take_tasks(&self) -> Vec<TaskHandle> {
        std::mem::take(&mut *self.tasks.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn settle(&self, branch: Branch) {
        let Transition::Ready(callback) = self.barrier.settle(branch) else {
            return;
        };
        let media_id = self.lifecycle.media_id();
        debug!(
            media_id = %media_id,
            playable = self.lifecycle.is_playable(),
            ads = self.lifecycle.ads().map_or(0, <[_]>::len),
            "lifecycle ready"
        );
        drop(self.take_tasks());

        if let Some(callback) = callback {
            let lifecycle = Arc::clone(&self.lifecycle);
            if let Err(panic_err) = panic::catch_unwind(AssertUnwindSafe(|| callback(lifecycle))) {
                error!(
                    media_id = %media_id,
                    panic = %panic_message(&*panic_err),
                    "lifecycle callback panicked"
                );
            }
        }
    }

    /// Cancels the ad path on behalf of a failed media path.
    fn abort_ads(&self) {
        self.ads_token.cancel();
        // The ad task may never observe the token if the executor drops it.
        self.settle(Branch::Ads);
    }
}

/// Forces the barrier if a path future is dropped before it settled, e.g. when
/// the executor shuts down underneath it.
struct SettleGuard<'a> {
    shared: &'a Shared,
    armed: bool,
}

impl Drop for SettleGuard<'_> {
    fn drop(&mut self) {
        if self.armed && self.shared.barrier.force() {
            warn!(
                media_id = %self.shared.lifecycle.media_id(),
                "resolution task dropped before settling"
            );
        }
    }
}

async fn fetch_media(shared: Arc<Shared>, resolver: Arc<dyn MediaResolver>, deadline: Option<Duration>) {
    let mut guard = SettleGuard {
        shared: &shared,
        armed: true,
    };
    let id = shared.lifecycle.media_id().clone();

    match guarded(&shared.media_token, deadline, resolver.resolve(&id)).await {
        Ok(media) => {
            shared.lifecycle.set_media(media);
            debug!(media_id = %id, "media resolved");
            shared.listener.on_media_resolved(id);
        }
        Err(ResolveError::Canceled) => {
            debug!(media_id = %id, "media resolution cancelled");
        }
        Err(err) => {
            error!(media_id = %id, label = err.as_label(), error = %err, "error getting media");
            shared.listener.on_media_error(id);
            shared.abort_ads();
        }
    }

    guard.armed = false;
    shared.settle(Branch::Media);
}

async fn fetch_ads(shared: Arc<Shared>, resolver: Arc<dyn AdResolver>, deadline: Option<Duration>) {
    let mut guard = SettleGuard {
        shared: &shared,
        armed: true,
    };
    let id = shared.lifecycle.media_id().clone();

    match guarded(&shared.ads_token, deadline, resolver.resolve(&id)).await {
        Ok(ads) if !shared.ads_token.is_cancelled() => {
            let count = ads.len();
            shared.lifecycle.set_ads(ads);
            debug!(media_id = %id, ads = count, "ads resolved");
            shared.listener.on_ads_resolved(id);
        }
        Ok(_) | Err(ResolveError::Canceled) => {
            debug!(media_id = %id, "ad resolution cancelled");
        }
        Err(err) => {
            warn!(media_id = %id, label = err.as_label(), error = %err, "error getting ads, skipping ads");
            shared.listener.on_ad_error(id);
        }
    }

    guard.armed = false;
    shared.settle(Branch::Ads);
}

/// Runs one resolver call under its path token and optional deadline.
async fn guarded<T, F>(token: &CancellationToken, deadline: Option<Duration>, call: F) -> Result<T, ResolveError>
where
    F: Future<Output = Result<T, ResolveError>>,
{
    let bounded = async {
        match deadline {
            Some(timeout) => time::timeout(timeout, call)
                .await
                .unwrap_or_else(|_elapsed| Err(ResolveError::Timeout { timeout })),
            None => call.await,
        }
    };

    tokio::select! {
        biased;
        _ = token.cancelled() => Err(ResolveError::Canceled),
        res = bounded => res,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{AdDescriptor, AdPosition, MediaDescriptor};
    use crate::tasks::TokioExecutor;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::mpsc;
    use url::Url;

    struct StubMedia {
        delay: Duration,
        fail: bool,
        calls: AtomicUsize,
    }

    impl StubMedia {
        fn new(delay: Duration, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                delay,
                fail,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl MediaResolver for StubMedia {
        async fn resolve(&self, id: &MediaId) -> Result<MediaDescriptor, ResolveError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            time::sleep(self.delay).await;
            if self.fail {
                return Err(ResolveError::fail("not in catalog"));
            }
            let url = Url::parse("https://cdn.example.com/v.m3u8").unwrap();
            Ok(MediaDescriptor::new(id.clone(), url).with_duration(Duration::from_secs(100)))
        }
    }

    struct StubAds {
        delay: Duration,
        fail: bool,
        calls: AtomicUsize,
    }

    impl StubAds {
        fn new(delay: Duration, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                delay,
                fail,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl AdResolver for StubAds {
        async fn resolve(&self, _id: &MediaId) -> Result<Vec<AdDescriptor>, ResolveError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            time::sleep(self.delay).await;
            if self.fail {
                return Err(ResolveError::fail("ad server down"));
            }
            let url = Url::parse("https://ads.example.com/vast.xml").unwrap();
            Ok(vec![
                AdDescriptor::new("mid", url.clone(), AdPosition::Relative(0.5)),
                AdDescriptor::new("pre", url, AdPosition::Absolute(Duration::ZERO)),
            ])
        }
    }

    #[derive(Default)]
    struct Signals(Mutex<Vec<&'static str>>);

    impl Signals {
        fn push(&self, s: &'static str) {
            self.0.lock().unwrap().push(s);
        }

        fn snapshot(&self) -> Vec<&'static str> {
            self.0.lock().unwrap().clone()
        }
    }

    impl LifecycleListener for Signals {
        fn on_media_resolved(&self, _id: MediaId) {
            self.push("media_resolved");
        }
        fn on_media_error(&self, _id: MediaId) {
            self.push("media_error");
        }
        fn on_ads_resolved(&self, _id: MediaId) {
            self.push("ads_resolved");
        }
        fn on_ad_error(&self, _id: MediaId) {
            self.push("ad_error");
        }
    }

    fn params(
        media: Arc<StubMedia>,
        ads: Arc<StubAds>,
        signals: Arc<Signals>,
        config: Config,
    ) -> ResolverParams {
        ResolverParams {
            media_resolver: media,
            ad_resolver: ads,
            executor: Arc::new(TokioExecutor::current()),
            listener: signals,
            config,
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[tokio::test(start_paused = true)]
    async fn test_both_paths_succeed() {
        let signals = Arc::new(Signals::default());
        let media = StubMedia::new(ms(20), false);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let seen = Arc::clone(&signals);

        let resolver = LifecycleResolver::spawn_with_callback(
            "m1",
            params(Arc::clone(&media), StubAds::new(ms(40), false), Arc::clone(&signals), Config::default()),
            move |lc| {
                let _ = tx.send((lc, seen.snapshot().len()));
            },
        );

        let (lc, signals_before_callback) = rx.recv().await.unwrap();
        assert!(rx.recv().await.is_none(), "callback must fire once");
        assert_eq!(signals_before_callback, 2);
        assert!(lc.is_playable());
        assert_eq!(lc.ads().map(<[_]>::len), Some(2));
        assert_eq!(lc.schedule().iter().map(|s| s.at).collect::<Vec<_>>(), vec![ms(0), ms(50_000)]);
        assert_eq!(signals.snapshot(), vec!["media_resolved", "ads_resolved"]);
        assert_eq!(media.calls.load(Ordering::SeqCst), 1);
        assert!(resolver.is_ready());
        assert!(Arc::ptr_eq(&resolver.wait().await, &lc));
    }

    #[tokio::test(start_paused = true)]
    async fn test_media_failure_cancels_ads() {
        let signals = Arc::new(Signals::default());
        let ads = StubAds::new(Duration::from_secs(10), false);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let _resolver = LifecycleResolver::spawn_with_callback(
            "m2",
            params(StubMedia::new(ms(5), true), Arc::clone(&ads), Arc::clone(&signals), Config::default()),
            move |lc| {
                let _ = tx.send(lc);
            },
        );

        let lc = rx.recv().await.unwrap();
        assert!(lc.media().is_none());
        assert!(lc.ads().is_none());
        assert!(!lc.is_playable());

        // Let the (cancelled) ad task wind down; nothing more may be signalled.
        time::sleep(Duration::from_secs(20)).await;
        assert!(rx.recv().await.is_none());
        assert_eq!(ads.calls.load(Ordering::SeqCst), 1);
        assert_eq!(signals.snapshot(), vec!["media_error"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ad_failure_keeps_media() {
        let signals = Arc::new(Signals::default());
        let resolver = LifecycleResolver::spawn(
            "m3",
            params(StubMedia::new(ms(30), false), StubAds::new(ms(10), true), Arc::clone(&signals), Config::default()),
        );

        let lc = resolver.wait().await;
        assert!(lc.is_playable());
        assert!(lc.ads().is_none());
        assert!(lc.schedule().is_empty());
        assert_eq!(signals.snapshot(), vec!["ad_error", "media_resolved"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ad_timeout_is_an_ad_error() {
        let signals = Arc::new(Signals::default());
        let cfg = Config {
            ads_timeout: ms(50),
            ..Config::default()
        };
        let resolver = LifecycleResolver::spawn(
            "m4",
            params(StubMedia::new(ms(10), false), StubAds::new(Duration::from_secs(10), false), Arc::clone(&signals), cfg),
        );

        let lc = resolver.wait().await;
        assert!(lc.is_playable());
        assert!(lc.ads().is_none());
        assert_eq!(signals.snapshot(), vec!["media_resolved", "ad_error"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_suppresses_callback() {
        let signals = Arc::new(Signals::default());
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);

        let resolver = LifecycleResolver::spawn_with_callback(
            "m5",
            params(
                StubMedia::new(Duration::from_secs(10), false),
                StubAds::new(Duration::from_secs(10), false),
                Arc::clone(&signals),
                Config::default(),
            ),
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        );

        time::sleep(ms(10)).await;
        resolver.cancel();
        resolver.cancel();

        let lc = time::timeout(ms(1), resolver.wait()).await.unwrap();
        assert!(lc.media().is_none());
        time::sleep(Duration::from_secs(20)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(signals.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_ready_is_noop() {
        let signals = Arc::new(Signals::default());
        let resolver = LifecycleResolver::spawn(
            "m6",
            params(StubMedia::new(ms(1), false), StubAds::new(ms(1), false), signals, Config::default()),
        );
        let lc = resolver.wait().await;
        resolver.cancel();
        assert!(lc.is_playable());
        assert_eq!(lc.ads().map(<[_]>::len), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_callback_panic_is_contained() {
        let signals = Arc::new(Signals::default());
        let resolver = LifecycleResolver::spawn_with_callback(
            "m7",
            params(StubMedia::new(ms(1), false), StubAds::new(ms(1), false), signals, Config::default()),
            |_| panic!("boom"),
        );
        assert!(resolver.wait().await.is_playable());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_blocking_lifecycle_and_single_callback() {
        for round in 0..50 {
            let signals = Arc::new(Signals::default());
            let fired = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&fired);

            let resolver = LifecycleResolver::spawn_with_callback(
                format!("race-{round}"),
                params(StubMedia::new(Duration::ZERO, false), StubAds::new(Duration::ZERO, false), signals, Config::default()),
                move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                },
            );

            let blocking = resolver.clone();
            let lc = tokio::task::spawn_blocking(move || blocking.lifecycle()).await.unwrap();
            assert!(lc.is_playable());

            // Waiters are released before the callback runs on the settling task.
            for _ in 0..100 {
                if fired.load(Ordering::SeqCst) > 0 {
                    break;
                }
                time::sleep(ms(5)).await;
            }
            time::sleep(ms(5)).await;
            assert_eq!(fired.load(Ordering::SeqCst), 1);
        }
    }
}

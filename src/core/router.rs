//! # EventRouter: one interception point for every listener category.
//!
//! The router hands out one handle per [`Category`]. Each handle implements that
//! category's full listener trait, so producers (the playback adapter, the
//! playlist, the lifecycle resolver) call it exactly as they would call a real
//! listener. Every call is funneled into [`EventRouter::route`].
//!
//! ## What `route` does, in order
//! ```text
//! route(Event)
//!   1. render "<Category>.<operation>(<args>)"
//!   2. loggers[0..n].log_event(&rendered)           sync, registration order
//!   3. registry.internals(category) ++ externals(category)
//!   4. executor.execute(deliver(listener, event))   one task per listener
//!   5. executor.execute(tracker.track_event(..))    one more task
//! ```
//!
//! ## What it guarantees
//! - `route` returns as soon as the loggers have run; it never waits for listeners.
//! - A panicking listener is caught inside its own task and logged; other
//!   listeners, the loggers and the tracker are unaffected.
//!
//! ## What it does **not** guarantee
//! - No ordering between listener tasks, nor between listeners and the tracker.
//! - No retries.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use playroute::{Config, Listener, PlaybackListener, RouterBuilder, SubscribeManager};
//!
//! struct Ui;
//! impl PlaybackListener for Ui {
//!     fn on_play(&self) { /* update play button */ }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let registry = Arc::new(SubscribeManager::new());
//!     registry.register_listener(Listener::Playback(Arc::new(Ui)));
//!
//!     let router = RouterBuilder::new(Config::default())
//!         .with_registry(registry)
//!         .with_logger(|line: &str| println!("{line}"))
//!         .build();
//!
//!     router.playback_listener().on_play(); // prints "Playback.on_play()"
//! }
//! ```

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tracing::{trace, warn};

use crate::core::config::Config;
use crate::error::RoutingError;
use crate::events::{
    Category, Event, LifecycleEvent, PlaybackEvent, PlayerEvent, PlaylistEvent, ShutdownEvent,
};
use crate::lifecycle::{ContentRef, MediaId};
use crate::subscribers::{
    EventLogger, EventTracker, LifecycleListener, Listener, PlaybackListener, PlayerListener,
    PlaylistListener, ShutdownListener, SubscribeRegistry,
};
use crate::tasks::ExecutionManager;

/// Fan-out router for listener calls. Cheap to clone.
#[derive(Clone)]
pub struct EventRouter {
    inner: Arc<RouterInner>,
}

pub(crate) struct RouterInner {
    cfg: Config,
    registry: Arc<dyn SubscribeRegistry>,
    executor: Arc<dyn ExecutionManager>,
    tracker: Arc<dyn EventTracker>,
    loggers: RwLock<Vec<Arc<dyn EventLogger>>>,
}

impl EventRouter {
    pub(crate) fn new(
        cfg: Config,
        registry: Arc<dyn SubscribeRegistry>,
        executor: Arc<dyn ExecutionManager>,
        tracker: Arc<dyn EventTracker>,
        loggers: Vec<Arc<dyn EventLogger>>,
    ) -> Self {
        Self {
            inner: Arc::new(RouterInner {
                cfg,
                registry,
                executor,
                tracker,
                loggers: RwLock::new(loggers),
            }),
        }
    }

    /// Appends a logger; it sees every event routed from now on.
    pub fn add_logger(&self, logger: Arc<dyn EventLogger>) {
        self.inner
            .loggers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(logger);
    }

    pub fn playlist_listener(&self) -> Arc<dyn PlaylistListener> {
        Arc::new(self.handle())
    }

    pub fn lifecycle_listener(&self) -> Arc<dyn LifecycleListener> {
        Arc::new(self.handle())
    }

    pub fn playback_listener(&self) -> Arc<dyn PlaybackListener> {
        Arc::new(self.handle())
    }

    pub fn player_listener(&self) -> Arc<dyn PlayerListener> {
        Arc::new(self.handle())
    }

    pub fn shutdown_listener(&self) -> Arc<dyn ShutdownListener> {
        Arc::new(self.handle())
    }

    /// Handle for `category`, wrapped as a [`Listener`].
    pub fn category_listener(&self, category: Category) -> Listener {
        match category {
            Category::Playlist => Listener::Playlist(self.playlist_listener()),
            Category::Lifecycle => Listener::Lifecycle(self.lifecycle_listener()),
            Category::Playback => Listener::Playback(self.playback_listener()),
            Category::Player => Listener::Player(self.player_listener()),
            Category::Shutdown => Listener::Shutdown(self.shutdown_listener()),
        }
    }

    /// Handle for a category given by name.
    ///
    /// # Errors
    /// [`RoutingError::UnsupportedCategory`] if `name` is not one of the five
    /// categories. This is a programming error and must not be retried.
    pub fn listener(&self, name: &str) -> Result<Listener, RoutingError> {
        let category: Category = name.parse()?;
        Ok(self.category_listener(category))
    }

    /// Routes one event: log synchronously, then dispatch asynchronously.
    pub fn route(&self, event: Event) {
        self.inner.route(event);
    }

    fn handle(&self) -> RouterHandle {
        RouterHandle {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl RouterInner {
    fn route(&self, event: Event) {
        let message: Arc<str> = Arc::from(event.render());

        let loggers = self
            .loggers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for logger in &loggers {
            logger.log_event(&message);
        }

        let category = event.category();
        let listeners: Vec<Listener> = self
            .registry
            .internals(category)
            .into_iter()
            .chain(self.registry.externals(category))
            .collect();
        trace!(event = %message, listeners = listeners.len(), "routing");

        let event = Arc::new(event);
        for listener in listeners {
            let event = Arc::clone(&event);
            let message = Arc::clone(&message);
            self.executor.execute(Box::pin(async move {
                deliver_isolated(&listener, &event, &message);
            }));
        }

        if self.cfg.track_events {
            let tracker = Arc::clone(&self.tracker);
            self.executor.execute(Box::pin(async move {
                if let Err(panic_err) =
                    panic::catch_unwind(AssertUnwindSafe(|| tracker.track_event(&message)))
                {
                    warn!(event = %message, panic = %panic_message(&*panic_err), "tracker panicked");
                }
            }));
        }
    }
}

/// Invokes one listener, containing any panic to this call.
fn deliver_isolated(listener: &Listener, event: &Event, message: &str) {
    if let Err(panic_err) = panic::catch_unwind(AssertUnwindSafe(|| listener.deliver(event))) {
        warn!(
            listener = listener.name(),
            event = message,
            panic = %panic_message(&*panic_err),
            "exception calling listener"
        );
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl std::fmt::Debug for EventRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let loggers = self
            .inner
            .loggers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("EventRouter")
            .field("config", &self.inner.cfg)
            .field("loggers", &loggers)
            .finish_non_exhaustive()
    }
}

/// The object behind every category handle: turns calls back into events.
struct RouterHandle {
    inner: Arc<RouterInner>,
}

impl RouterHandle {
    fn emit(&self, event: impl Into<Event>) {
        self.inner.route(event.into());
    }
}

impl PlaylistListener for RouterHandle {
    fn on_content_added(&self, content: ContentRef) {
        self.emit(PlaylistEvent::ContentAdded(content));
    }

    fn on_content_removed(&self, content: ContentRef) {
        self.emit(PlaylistEvent::ContentRemoved(content));
    }

    fn on_skip_to(&self, content: ContentRef) {
        self.emit(PlaylistEvent::SkipTo(content));
    }

    fn on_playlist_finished(&self) {
        self.emit(PlaylistEvent::PlaylistFinished);
    }

    fn name(&self) -> &'static str {
        "router"
    }
}

impl LifecycleListener for RouterHandle {
    fn on_media_resolved(&self, id: MediaId) {
        self.emit(LifecycleEvent::MediaResolved(id));
    }

    fn on_media_error(&self, id: MediaId) {
        self.emit(LifecycleEvent::MediaError(id));
    }

    fn on_ads_resolved(&self, id: MediaId) {
        self.emit(LifecycleEvent::AdsResolved(id));
    }

    fn on_ad_error(&self, id: MediaId) {
        self.emit(LifecycleEvent::AdError(id));
    }

    fn name(&self) -> &'static str {
        "router"
    }
}

impl PlaybackListener for RouterHandle {
    fn on_play(&self) {
        self.emit(PlaybackEvent::Play);
    }

    fn on_pause(&self) {
        self.emit(PlaybackEvent::Pause);
    }

    fn on_seek(&self, position: Duration) {
        self.emit(PlaybackEvent::Seek(position));
    }

    fn on_finished(&self) {
        self.emit(PlaybackEvent::Finished);
    }

    fn name(&self) -> &'static str {
        "router"
    }
}

impl PlayerListener for RouterHandle {
    fn on_media_opened(&self, content: ContentRef) {
        self.emit(PlayerEvent::MediaOpened(content));
    }

    fn on_fullscreen_changed(&self, fullscreen: bool) {
        self.emit(PlayerEvent::FullscreenChanged(fullscreen));
    }

    fn on_player_error(&self, message: String) {
        self.emit(PlayerEvent::PlayerError(message));
    }

    fn name(&self) -> &'static str {
        "router"
    }
}

impl ShutdownListener for RouterHandle {
    fn on_shutdown(&self) {
        self.emit(ShutdownEvent::Shutdown);
    }

    fn name(&self) -> &'static str {
        "router"
    }
}

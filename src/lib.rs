//! # playroute
//!
//! **Playroute** is the event-routing and lifecycle-resolution core of an
//! embeddable media player.
//!
//! It provides a single dispatch point that fans listener calls out to loggers,
//! listener groups and a tracker without blocking the caller, and a resolver
//! that fetches a media descriptor and its ad insertions in parallel and joins
//! both exactly once.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  playback adapter    playlist       LifecycleResolver    shutdown hook
//!         │               │                  │                  │
//!         ▼               ▼                  ▼                  ▼
//!   playback_listener playlist_listener lifecycle_listener shutdown_listener
//!         │               │                  │                  │
//!         └───────────────┴────────┬─────────┴──────────────────┘
//! ┌────────────────────────────────▼──────────────────────────────────┐
//! │  EventRouter::route(Event)                                        │
//! │  - render "Category.operation(args)"                              │
//! │  - EventLogger pass (sync, registration order)                    │
//! │  - SubscribeRegistry: internals ++ externals for the category     │
//! └──────┬──────────────────┬──────────────────┬───────────────┬──────┘
//!        ▼                  ▼                  ▼               ▼
//!   ExecutionManager   ExecutionManager   ExecutionManager  ExecutionManager
//!   deliver(listener1) deliver(listener2) deliver(listenerN) track_event
//!   (panic isolated)   (panic isolated)   (panic isolated)  (if enabled)
//! ```
//!
//! ### Lifecycle resolution
//! ```text
//! LifecycleResolver::spawn(id, params)
//!   ├─► media path ─ Ok  ─► store media ─► on_media_resolved ─┐
//!   │              └ Err ─► on_media_error, cancel ad path ───┤
//!   └─► ad path    ─ Ok  ─► store ads   ─► on_ads_resolved ───┤
//!                  └ Err ─► on_ad_error ──────────────────────┤
//!                                                             ▼
//!                                      JoinBarrier (both settled, or cancel)
//!                                        ├─► callback(lifecycle)  at most once
//!                                        └─► lifecycle() / wait() released
//! ```
//!
//! ## Features
//! | Area            | Description                                                  | Key types / traits                          |
//! |-----------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Routing**     | One interception point per listener category.                | [`EventRouter`], [`RouterBuilder`]          |
//! | **Events**      | Tagged events with a canonical string rendering.             | [`Event`], [`Category`]                     |
//! | **Listeners**   | Typed per-category callbacks and their registry.             | [`PlaybackListener`], [`SubscribeManager`]  |
//! | **Lifecycle**   | Parallel media/ad resolution joined exactly once.            | [`LifecycleResolver`], [`Lifecycle`]        |
//! | **Ads**         | Relative or absolute ad positions placed on the timeline.    | [`AdDescriptor`], [`AdPosition`]            |
//! | **Execution**   | Pluggable task-execution facility.                           | [`ExecutionManager`], [`TokioExecutor`]     |
//! | **Errors**      | Typed errors for routing and resolution.                     | [`RoutingError`], [`ResolveError`]          |
//! | **Configuration** | Timeouts and tracking switch.                              | [`Config`]                                  |
//!
//! ## Optional features
//! - `logging`: exports [`LogWriter`], an [`EventLogger`] that writes routed events to `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use playroute::{
//!     AdDescriptor, AdResolver, Config, LifecycleResolver, MediaDescriptor, MediaId,
//!     MediaResolver, ResolveError, ResolverParams, RouterBuilder, TokioExecutor,
//! };
//!
//! struct Catalog;
//!
//! #[async_trait::async_trait]
//! impl MediaResolver for Catalog {
//!     async fn resolve(&self, id: &MediaId) -> Result<MediaDescriptor, ResolveError> {
//!         let url = url::Url::parse("https://cdn.example.com/v.m3u8").map_err(|e| ResolveError::fail(e.to_string()))?;
//!         Ok(MediaDescriptor::new(id.clone(), url))
//!     }
//! }
//!
//! struct NoAds;
//!
//! #[async_trait::async_trait]
//! impl AdResolver for NoAds {
//!     async fn resolve(&self, _id: &MediaId) -> Result<Vec<AdDescriptor>, ResolveError> {
//!         Ok(Vec::new())
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let router = RouterBuilder::new(Config::default())
//!         .with_logger(|line: &str| println!("{line}"))
//!         .build();
//!
//!     let resolver = LifecycleResolver::spawn(
//!         "intro",
//!         ResolverParams {
//!             media_resolver: Arc::new(Catalog),
//!             ad_resolver: Arc::new(NoAds),
//!             executor: Arc::new(TokioExecutor::current()),
//!             listener: router.lifecycle_listener(),
//!             config: Config::default(),
//!         },
//!     );
//!
//!     let lifecycle = resolver.wait().await;
//!     assert!(lifecycle.is_playable());
//! }
//! ```
mod core;
mod error;
mod events;
mod lifecycle;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use crate::core::{Config, EventRouter, RouterBuilder};
pub use error::{ResolveError, RoutingError};
pub use events::{
    Category, Event, LifecycleEvent, PlaybackEvent, PlayerEvent, PlaylistEvent, ShutdownEvent,
};
pub use lifecycle::{
    AdDescriptor, AdPosition, AdResolver, AdStop, ContentRef, Lifecycle, LifecycleCallback,
    LifecycleResolver, MediaDescriptor, MediaId, MediaResolver, ResolverParams, resolve_ad_time,
};
pub use subscribers::{
    EventLogger, EventTracker, LifecycleListener, Listener, ListenerId, PlaybackListener,
    PlayerListener, PlaylistListener, ShutdownListener, SubscribeManager, SubscribeRegistry,
    TraceTracker,
};
pub use tasks::{BoxTask, ExecutionManager, TaskHandle, TokioExecutor};

// Optional: built-in logger writing routed events to `tracing`.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;

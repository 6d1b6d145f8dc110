//! # Event consumers: listeners, registry, loggers and the tracker.
//!
//! ## Architecture
//! ```text
//! EventRouter::route(Event)
//!     │
//!     ├──► EventLogger::log_event(&str)          (sync, registration order)
//!     │
//!     ├──► SubscribeRegistry::internals(category) ─┐
//!     ├──► SubscribeRegistry::externals(category) ─┴─► one task per Listener
//!     │                                                  └─► Listener::deliver(&Event)
//!     │                                                        panic → caught, logged
//!     └──► EventTracker::track_event(&str)        (own task)
//! ```
//!
//! ## Consumer types
//! - **Listeners** - typed, per-category callbacks ([`PlaybackListener`], ...)
//! - **Loggers** - receive the rendered string synchronously
//! - **Tracker** - receives the rendered string asynchronously

mod listener;
mod log;
mod registry;
mod tracker;

pub use listener::{
    LifecycleListener, Listener, PlaybackListener, PlayerListener, PlaylistListener,
    ShutdownListener,
};
#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use log::EventLogger;
pub use registry::{ListenerId, SubscribeManager, SubscribeRegistry};
pub use tracker::{EventTracker, TraceTracker};

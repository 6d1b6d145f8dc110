//! Routed events: categories and the tagged event type.
//!
//! ## Contents
//! - [`Category`] the five fixed listener operation sets
//! - [`Event`] one operation call, tagged by category, with its canonical rendering
//!
//! ## Quick reference
//! - **Producers**: category handles returned by [`EventRouter`](crate::EventRouter),
//!   which includes the lifecycle signals raised by the resolver.
//! - **Consumers**: loggers (rendered string), listeners (typed call), tracker
//!   (rendered string).

mod category;
mod event;

pub use category::Category;
pub use event::{Event, LifecycleEvent, PlaybackEvent, PlayerEvent, PlaylistEvent, ShutdownEvent};

//! # Category listener traits.
//!
//! One trait per [`Category`]; every operation has an empty default body so an
//! implementation overrides only what it cares about.
//!
//! A [`Listener`] wraps a shared reference to exactly one category's listener.
//! [`Listener::deliver`] is the per-category dispatch table: it invokes the
//! listener method matching an [`Event`] of the same category.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use playroute::{Event, Listener, PlaybackEvent, PlaybackListener};
//!
//! struct Position;
//!
//! impl PlaybackListener for Position {
//!     fn on_seek(&self, position: Duration) {
//!         println!("at {position:?}");
//!     }
//!     fn name(&self) -> &'static str { "position" }
//! }
//!
//! let listener = Listener::Playback(Arc::new(Position));
//! assert!(listener.deliver(&Event::from(PlaybackEvent::Seek(Duration::from_secs(3)))));
//! assert!(!listener.deliver(&Event::from(playroute::ShutdownEvent::Shutdown)));
//! ```
//!
//! Listener methods run on the execution manager, never on the caller's
//! thread. A panic inside one is caught by the router and logged.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::events::{
    Category, Event, LifecycleEvent, PlaybackEvent, PlayerEvent, PlaylistEvent, ShutdownEvent,
};
use crate::lifecycle::{ContentRef, MediaId};

/// Playlist changes.
pub trait PlaylistListener: Send + Sync + 'static {
    fn on_content_added(&self, _content: ContentRef) {}
    fn on_content_removed(&self, _content: ContentRef) {}
    fn on_skip_to(&self, _content: ContentRef) {}
    fn on_playlist_finished(&self) {}

    /// Name used in fault logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Media and ad resolution signals raised by the lifecycle resolver.
pub trait LifecycleListener: Send + Sync + 'static {
    fn on_media_resolved(&self, _id: MediaId) {}
    fn on_media_error(&self, _id: MediaId) {}
    fn on_ads_resolved(&self, _id: MediaId) {}
    fn on_ad_error(&self, _id: MediaId) {}

    /// Name used in fault logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Playback state changes.
pub trait PlaybackListener: Send + Sync + 'static {
    fn on_play(&self) {}
    fn on_pause(&self) {}
    fn on_seek(&self, _position: Duration) {}
    fn on_finished(&self) {}

    /// Name used in fault logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Player-model notifications.
pub trait PlayerListener: Send + Sync + 'static {
    fn on_media_opened(&self, _content: ContentRef) {}
    fn on_fullscreen_changed(&self, _fullscreen: bool) {}
    fn on_player_error(&self, _message: String) {}

    /// Name used in fault logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Player teardown.
pub trait ShutdownListener: Send + Sync + 'static {
    fn on_shutdown(&self) {}

    /// Name used in fault logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Shared reference to one category's listener.
#[derive(Clone)]
pub enum Listener {
    Playlist(Arc<dyn PlaylistListener>),
    Lifecycle(Arc<dyn LifecycleListener>),
    Playback(Arc<dyn PlaybackListener>),
    Player(Arc<dyn PlayerListener>),
    Shutdown(Arc<dyn ShutdownListener>),
}

impl Listener {
    pub fn category(&self) -> Category {
        match self {
            Listener::Playlist(_) => Category::Playlist,
            Listener::Lifecycle(_) => Category::Lifecycle,
            Listener::Playback(_) => Category::Playback,
            Listener::Player(_) => Category::Player,
            Listener::Shutdown(_) => Category::Shutdown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Listener::Playlist(l) => l.name(),
            Listener::Lifecycle(l) => l.name(),
            Listener::Playback(l) => l.name(),
            Listener::Player(l) => l.name(),
            Listener::Shutdown(l) => l.name(),
        }
    }

    /// Invokes the operation matching `event`.
    ///
    /// Returns `false` without calling anything when the event belongs to a
    /// different category than the listener.
    pub fn deliver(&self, event: &Event) -> bool {
        match (self, event) {
            (Listener::Playlist(l), Event::Playlist(ev)) => match ev.clone() {
                PlaylistEvent::ContentAdded(c) => l.on_content_added(c),
                PlaylistEvent::ContentRemoved(c) => l.on_content_removed(c),
                PlaylistEvent::SkipTo(c) => l.on_skip_to(c),
                PlaylistEvent::PlaylistFinished => l.on_playlist_finished(),
            },
            (Listener::Lifecycle(l), Event::Lifecycle(ev)) => match ev.clone() {
                LifecycleEvent::MediaResolved(id) => l.on_media_resolved(id),
                LifecycleEvent::MediaError(id) => l.on_media_error(id),
                LifecycleEvent::AdsResolved(id) => l.on_ads_resolved(id),
                LifecycleEvent::AdError(id) => l.on_ad_error(id),
            },
            (Listener::Playback(l), Event::Playback(ev)) => match ev {
                PlaybackEvent::Play => l.on_play(),
                PlaybackEvent::Pause => l.on_pause(),
                PlaybackEvent::Seek(position) => l.on_seek(*position),
                PlaybackEvent::Finished => l.on_finished(),
            },
            (Listener::Player(l), Event::Player(ev)) => match ev.clone() {
                PlayerEvent::MediaOpened(c) => l.on_media_opened(c),
                PlayerEvent::FullscreenChanged(on) => l.on_fullscreen_changed(on),
                PlayerEvent::PlayerError(msg) => l.on_player_error(msg),
            },
            (Listener::Shutdown(l), Event::Shutdown(ShutdownEvent::Shutdown)) => l.on_shutdown(),
            _ => return false,
        }
        true
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("category", &self.category())
            .field("name", &self.name())
            .finish()
    }
}

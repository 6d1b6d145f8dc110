//! # Routed events.
//!
//! An [`Event`] is one listener operation call captured as data: the category
//! variant selects the operation set, the inner enum selects the operation and
//! carries its arguments.
//!
//! Every event has a canonical rendering used by loggers and the tracker:
//! ```text
//! <Category>.<operation>(<arg1>, <arg2>, ...)
//!
//! Playback.on_seek(1500ms)
//! Lifecycle.on_media_resolved(clip-42)
//! Shutdown.on_shutdown()
//! ```
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use playroute::{Category, Event, PlaybackEvent};
//!
//! let ev = Event::from(PlaybackEvent::Seek(Duration::from_millis(1500)));
//! assert_eq!(ev.category(), Category::Playback);
//! assert_eq!(ev.render(), "Playback.on_seek(1500ms)");
//! ```

use std::fmt;
use std::time::Duration;

use crate::events::category::Category;
use crate::lifecycle::{ContentRef, MediaId};

/// Playlist operations.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaylistEvent {
    ContentAdded(ContentRef),
    ContentRemoved(ContentRef),
    SkipTo(ContentRef),
    PlaylistFinished,
}

/// Lifecycle resolution signals.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    MediaResolved(MediaId),
    MediaError(MediaId),
    AdsResolved(MediaId),
    AdError(MediaId),
}

/// Playback state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    Play,
    Pause,
    Seek(Duration),
    Finished,
}

/// Player-model notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    MediaOpened(ContentRef),
    FullscreenChanged(bool),
    PlayerError(String),
}

/// Player teardown.
#[derive(Debug, Clone, PartialEq)]
pub enum ShutdownEvent {
    Shutdown,
}

/// A single listener operation call, tagged by category.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Playlist(PlaylistEvent),
    Lifecycle(LifecycleEvent),
    Playback(PlaybackEvent),
    Player(PlayerEvent),
    Shutdown(ShutdownEvent),
}

impl Event {
    pub fn category(&self) -> Category {
        match self {
            Event::Playlist(_) => Category::Playlist,
            Event::Lifecycle(_) => Category::Lifecycle,
            Event::Playback(_) => Category::Playback,
            Event::Player(_) => Category::Player,
            Event::Shutdown(_) => Category::Shutdown,
        }
    }

    /// Listener method name of the operation.
    pub fn operation(&self) -> &'static str {
        match self {
            Event::Playlist(ev) => match ev {
                PlaylistEvent::ContentAdded(_) => "on_content_added",
                PlaylistEvent::ContentRemoved(_) => "on_content_removed",
                PlaylistEvent::SkipTo(_) => "on_skip_to",
                PlaylistEvent::PlaylistFinished => "on_playlist_finished",
            },
            Event::Lifecycle(ev) => match ev {
                LifecycleEvent::MediaResolved(_) => "on_media_resolved",
                LifecycleEvent::MediaError(_) => "on_media_error",
                LifecycleEvent::AdsResolved(_) => "on_ads_resolved",
                LifecycleEvent::AdError(_) => "on_ad_error",
            },
            Event::Playback(ev) => match ev {
                PlaybackEvent::Play => "on_play",
                PlaybackEvent::Pause => "on_pause",
                PlaybackEvent::Seek(_) => "on_seek",
                PlaybackEvent::Finished => "on_finished",
            },
            Event::Player(ev) => match ev {
                PlayerEvent::MediaOpened(_) => "on_media_opened",
                PlayerEvent::FullscreenChanged(_) => "on_fullscreen_changed",
                PlayerEvent::PlayerError(_) => "on_player_error",
            },
            Event::Shutdown(ShutdownEvent::Shutdown) => "on_shutdown",
        }
    }

    /// Arguments in declaration order, rendered for logging.
    pub fn arguments(&self) -> Vec<String> {
        match self {
            Event::Playlist(
                PlaylistEvent::ContentAdded(c)
                | PlaylistEvent::ContentRemoved(c)
                | PlaylistEvent::SkipTo(c),
            ) => vec![c.to_string()],
            Event::Lifecycle(
                LifecycleEvent::MediaResolved(id)
                | LifecycleEvent::MediaError(id)
                | LifecycleEvent::AdsResolved(id)
                | LifecycleEvent::AdError(id),
            ) => vec![id.to_string()],
            Event::Playback(PlaybackEvent::Seek(position)) => {
                vec![format!("{}ms", position.as_millis())]
            }
            Event::Player(PlayerEvent::MediaOpened(c)) => vec![c.to_string()],
            Event::Player(PlayerEvent::FullscreenChanged(on)) => vec![on.to_string()],
            Event::Player(PlayerEvent::PlayerError(msg)) => vec![msg.clone()],
            Event::Playlist(PlaylistEvent::PlaylistFinished)
            | Event::Playback(_)
            | Event::Shutdown(_) => Vec::new(),
        }
    }

    /// Canonical `<Category>.<operation>(<args>)` string.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}({})",
            self.category(),
            self.operation(),
            self.arguments().join(", ")
        )
    }
}

impl From<PlaylistEvent> for Event {
    fn from(ev: PlaylistEvent) -> Self {
        Event::Playlist(ev)
    }
}

impl From<LifecycleEvent> for Event {
    fn from(ev: LifecycleEvent) -> Self {
        Event::Lifecycle(ev)
    }
}

impl From<PlaybackEvent> for Event {
    fn from(ev: PlaybackEvent) -> Self {
        Event::Playback(ev)
    }
}

impl From<PlayerEvent> for Event {
    fn from(ev: PlayerEvent) -> Self {
        Event::Player(ev)
    }
}

impl From<ShutdownEvent> for Event {
    fn from(ev: ShutdownEvent) -> Self {
        Event::Shutdown(ev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn content() -> ContentRef {
        ContentRef::new("clip", Url::parse("https://cdn.example.com/clip.mp4").unwrap())
    }

    #[test]
    fn test_render_without_arguments() {
        assert_eq!(Event::from(PlaybackEvent::Play).render(), "Playback.on_play()");
        assert_eq!(Event::from(ShutdownEvent::Shutdown).render(), "Shutdown.on_shutdown()");
        assert_eq!(
            Event::from(PlaylistEvent::PlaylistFinished).render(),
            "Playlist.on_playlist_finished()"
        );
    }

    #[test]
    fn test_render_with_arguments() {
        let ev = Event::from(LifecycleEvent::AdError(MediaId::from("clip-7")));
        assert_eq!(ev.render(), "Lifecycle.on_ad_error(clip-7)");

        let ev = Event::from(PlayerEvent::FullscreenChanged(true));
        assert_eq!(ev.render(), "Player.on_fullscreen_changed(true)");

        let ev = Event::from(PlaylistEvent::SkipTo(content()));
        assert_eq!(
            ev.render(),
            "Playlist.on_skip_to(clip@https://cdn.example.com/clip.mp4)"
        );
    }

    #[test]
    fn test_category_matches_variant() {
        assert_eq!(Event::from(PlayerEvent::PlayerError("x".into())).category(), Category::Player);
        assert_eq!(Event::from(PlaybackEvent::Finished).category(), Category::Playback);
    }
}

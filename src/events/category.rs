//! # Listener categories.
//!
//! Every routed event belongs to exactly one [`Category`]; each category has a
//! matching listener trait in [`subscribers`](crate::subscribers). The set is
//! closed and fixed at compile time.

use std::fmt;
use std::str::FromStr;

use crate::error::RoutingError;

/// One of the five fixed listener operation sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Playlist,
    Lifecycle,
    Playback,
    Player,
    Shutdown,
}

impl Category {
    /// All categories, in declaration order.
    pub const ALL: [Category; 5] = [
        Category::Playlist,
        Category::Lifecycle,
        Category::Playback,
        Category::Player,
        Category::Shutdown,
    ];

    /// Name used as the prefix of rendered events.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Playlist => "Playlist",
            Category::Lifecycle => "Lifecycle",
            Category::Playback => "Playback",
            Category::Player => "Player",
            Category::Shutdown => "Shutdown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| RoutingError::UnsupportedCategory { name: s.to_string() })
    }
}

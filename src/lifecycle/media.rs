//! # Media identity, descriptors and the resolver collaborators.
//!
//! [`MediaResolver`] and [`AdResolver`] are implemented by the embedding
//! application (catalog lookups, ad servers, ...). Each is invoked exactly once
//! per [`LifecycleResolver`](crate::LifecycleResolver) and may fail.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::error::ResolveError;
use crate::lifecycle::ad::AdDescriptor;

/// Opaque media identifier. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaId(Arc<str>);

impl MediaId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MediaId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for MediaId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// A playlist entry: what the player is asked to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRef {
    pub id: MediaId,
    pub url: Url,
}

impl ContentRef {
    pub fn new(id: impl Into<MediaId>, url: Url) -> Self {
        Self { id: id.into(), url }
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.url)
    }
}

/// Resolved media descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaDescriptor {
    pub id: MediaId,
    pub url: Url,
    /// Total duration, when the catalog knows it (live streams usually don't).
    pub duration: Option<Duration>,
    pub title: Option<String>,
}

impl MediaDescriptor {
    pub fn new(id: impl Into<MediaId>, url: Url) -> Self {
        Self {
            id: id.into(),
            url,
            duration: None,
            title: None,
        }
    }

    #[inline]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    #[inline]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Resolves a media identifier into its descriptor.
#[async_trait]
pub trait MediaResolver: Send + Sync + 'static {
    async fn resolve(&self, id: &MediaId) -> Result<MediaDescriptor, ResolveError>;
}

/// Resolves the ad insertions scheduled for a media item.
#[async_trait]
pub trait AdResolver: Send + Sync + 'static {
    async fn resolve(&self, id: &MediaId) -> Result<Vec<AdDescriptor>, ResolveError>;
}

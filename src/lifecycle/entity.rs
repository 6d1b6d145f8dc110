//! # Per-media lifecycle aggregate.
//!
//! A [`Lifecycle`] is created by the [`LifecycleResolver`](crate::LifecycleResolver)
//! and filled by its two resolution paths. The media path writes only the media
//! cell, the ad path writes only the ad cell; each cell is written at most once,
//! so readers never need a lock.

use std::sync::OnceLock;
use std::time::Duration;

use crate::lifecycle::ad::{AdDescriptor, AdStop};
use crate::lifecycle::media::{MediaDescriptor, MediaId};

/// Resolved media and ads for one media identifier.
#[derive(Debug)]
pub struct Lifecycle {
    media_id: MediaId,
    media: OnceLock<MediaDescriptor>,
    ads: OnceLock<Vec<AdDescriptor>>,
}

impl Lifecycle {
    pub(crate) fn new(media_id: MediaId) -> Self {
        Self {
            media_id,
            media: OnceLock::new(),
            ads: OnceLock::new(),
        }
    }

    pub fn media_id(&self) -> &MediaId {
        &self.media_id
    }

    /// The media descriptor, absent if the media path failed or was cancelled.
    pub fn media(&self) -> Option<&MediaDescriptor> {
        self.media.get()
    }

    /// The ad list, absent if the ad path failed or was cancelled.
    pub fn ads(&self) -> Option<&[AdDescriptor]> {
        self.ads.get().map(Vec::as_slice)
    }

    /// Media duration, if the media resolved and its duration is known.
    pub fn duration(&self) -> Option<Duration> {
        self.media().and_then(|m| m.duration)
    }

    /// True when there is something to play.
    pub fn is_playable(&self) -> bool {
        self.media.get().is_some()
    }

    /// Places every ad on the media timeline and returns the stops in play order.
    ///
    /// Ads whose offset cannot be resolved (relative position, unknown duration)
    /// are left out. Stops sharing an offset keep the resolver's order.
    pub fn schedule(&self) -> Vec<AdStop> {
        let duration = self.duration();
        let mut stops: Vec<AdStop> = self
            .ads()
            .unwrap_or_default()
            .iter()
            .enumerate()
            .filter_map(|(index, ad)| {
                ad.resolve(duration).map(|at| AdStop {
                    at,
                    index,
                    id: ad.id.clone(),
                })
            })
            .collect();
        stops.sort_by_key(|stop| stop.at);
        stops
    }

    pub(crate) fn set_media(&self, media: MediaDescriptor) -> bool {
        self.media.set(media).is_ok()
    }

    pub(crate) fn set_ads(&self, ads: Vec<AdDescriptor>) -> bool {
        self.ads.set(ads).is_ok()
    }
}

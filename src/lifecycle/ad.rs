//! # Ad insertions and their placement on the media timeline.
//!
//! An ad is placed either at a fraction of the media ([`AdPosition::Relative`])
//! or at a fixed offset ([`AdPosition::Absolute`]). [`resolve_ad_time`] turns
//! either form into an absolute offset, capped to the media duration when it
//! is known:
//!
//! ```text
//!   position        duration unknown        duration d
//!   Relative(0)     0                       0
//!   Relative(f)     unresolved              round(d * f)
//!   Absolute(t)     t                       min(d, t)
//! ```

use std::sync::OnceLock;
use std::time::Duration;

use url::Url;

use crate::lifecycle::media::MediaId;

/// Placement of an ad relative to the media it interrupts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdPosition {
    /// Fraction of the total duration, in `[0, 1]`.
    Relative(f64),
    /// Fixed offset from the start of the media.
    Absolute(Duration),
}

/// Converts `position` into an absolute offset.
///
/// Returns `None` when a non-zero relative position meets an unknown duration.
/// Relative fractions outside `[0, 1]` are clamped.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use playroute::{AdPosition, resolve_ad_time};
///
/// let ms = Duration::from_millis;
/// assert_eq!(resolve_ad_time(AdPosition::Relative(0.5), Some(ms(1000))), Some(ms(500)));
/// assert_eq!(resolve_ad_time(AdPosition::Absolute(ms(5000)), Some(ms(3000))), Some(ms(3000)));
/// assert_eq!(resolve_ad_time(AdPosition::Relative(0.2), None), None);
/// ```
pub fn resolve_ad_time(position: AdPosition, duration: Option<Duration>) -> Option<Duration> {
    match (position, duration) {
        (AdPosition::Relative(fraction), None) => (fraction == 0.0).then_some(Duration::ZERO),
        (AdPosition::Relative(fraction), Some(d)) => {
            let ms = (d.as_millis() as f64 * fraction.clamp(0.0, 1.0)).round();
            Some(Duration::from_millis(ms as u64))
        }
        (AdPosition::Absolute(t), None) => Some(t),
        (AdPosition::Absolute(t), Some(d)) => Some(t.min(d)),
    }
}

/// An ad insertion as returned by the [`AdResolver`](crate::AdResolver).
#[derive(Debug, Clone)]
pub struct AdDescriptor {
    pub id: MediaId,
    pub metadata_url: Url,
    pub position: AdPosition,
    resolved_time: OnceLock<Duration>,
}

impl AdDescriptor {
    pub fn new(id: impl Into<MediaId>, metadata_url: Url, position: AdPosition) -> Self {
        Self {
            id: id.into(),
            metadata_url,
            position,
            resolved_time: OnceLock::new(),
        }
    }

    /// Resolves the ad's offset against `duration` and remembers it.
    ///
    /// The first successful resolution wins; later calls return the stored
    /// value regardless of the duration passed. An unresolved result is not
    /// stored, so a later call with a known duration can still place the ad.
    pub fn resolve(&self, duration: Option<Duration>) -> Option<Duration> {
        if let Some(at) = self.resolved_time.get() {
            return Some(*at);
        }
        let at = resolve_ad_time(self.position, duration)?;
        Some(*self.resolved_time.get_or_init(|| at))
    }

    /// Offset assigned by [`resolve`](Self::resolve), if any.
    pub fn resolved_time(&self) -> Option<Duration> {
        self.resolved_time.get().copied()
    }

    /// True once the ad has a place on the timeline.
    pub fn scheduled(&self) -> bool {
        self.resolved_time.get().is_some()
    }
}

impl PartialEq for AdDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.metadata_url == other.metadata_url
            && self.position == other.position
    }
}

/// A scheduled stop on the timeline: play `ads[index]` at `at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdStop {
    pub at: Duration,
    pub index: usize,
    pub id: MediaId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn ad(position: AdPosition) -> AdDescriptor {
        let url = Url::parse("https://ads.example.com/vast/1").unwrap();
        AdDescriptor::new("ad-1", url, position)
    }

    #[test]
    fn test_relative_with_duration_rounds() {
        assert_eq!(resolve_ad_time(AdPosition::Relative(0.5), Some(ms(1000))), Some(ms(500)));
        assert_eq!(resolve_ad_time(AdPosition::Relative(1.0 / 3.0), Some(ms(1000))), Some(ms(333)));
        assert_eq!(resolve_ad_time(AdPosition::Relative(0.5), Some(ms(3))), Some(ms(2)));
    }

    #[test]
    fn test_relative_without_duration() {
        assert_eq!(resolve_ad_time(AdPosition::Relative(0.0), None), Some(Duration::ZERO));
        assert_eq!(resolve_ad_time(AdPosition::Relative(0.2), None), None);
        assert_eq!(resolve_ad_time(AdPosition::Relative(1.0), None), None);
    }

    #[test]
    fn test_absolute_is_capped_to_duration() {
        assert_eq!(resolve_ad_time(AdPosition::Absolute(ms(5000)), Some(ms(3000))), Some(ms(3000)));
        assert_eq!(resolve_ad_time(AdPosition::Absolute(ms(1000)), Some(ms(3000))), Some(ms(1000)));
        assert_eq!(resolve_ad_time(AdPosition::Absolute(ms(5000)), None), Some(ms(5000)));
    }

    #[test]
    fn test_relative_fraction_is_clamped() {
        assert_eq!(resolve_ad_time(AdPosition::Relative(1.5), Some(ms(1000))), Some(ms(1000)));
        assert_eq!(resolve_ad_time(AdPosition::Relative(-0.5), Some(ms(1000))), Some(ms(0)));
    }

    #[test]
    fn test_resolve_is_stable_once_assigned() {
        let ad = ad(AdPosition::Relative(0.5));
        assert_eq!(ad.resolve(Some(ms(1000))), Some(ms(500)));
        assert_eq!(ad.resolve(Some(ms(4000))), Some(ms(500)));
        assert_eq!(ad.resolved_time(), Some(ms(500)));
    }

    #[test]
    fn test_unresolved_result_is_not_stored() {
        let ad = ad(AdPosition::Relative(0.25));
        assert_eq!(ad.resolve(None), None);
        assert!(!ad.scheduled());
        assert_eq!(ad.resolve(Some(ms(2000))), Some(ms(500)));
        assert!(ad.scheduled());
    }
}

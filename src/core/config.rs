//! # Runtime configuration.
//!
//! Provides [`Config`], the settings shared by the router and the lifecycle
//! resolver.
//!
//! Config is used in two ways:
//! 1. **Router creation**: `RouterBuilder::new(config)`
//! 2. **Resolver creation**: `ResolverParams { config, .. }`
//!
//! ## Sentinel values
//! - `media_timeout = 0s` → no timeout on the media path
//! - `ads_timeout = 0s` → no timeout on the ad path

use std::time::Duration;

/// Settings for routing and lifecycle resolution.
///
/// ## Field semantics
/// - `media_timeout`: upper bound for one media resolution (`0s` = none)
/// - `ads_timeout`: upper bound for one ad resolution (`0s` = none)
/// - `track_events`: whether routed events are forwarded to the tracker
///
/// ## Notes
/// All fields are public. Prefer the accessors to avoid scattering sentinel
/// checks.
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum time the media resolver may take.
    ///
    /// Exceeding it fails the media path with `ResolveError::Timeout`, which is
    /// handled like any other media failure (the ad path is cancelled).
    pub media_timeout: Duration,

    /// Maximum time the ad resolver may take.
    ///
    /// Exceeding it fails the ad path only; the lifecycle proceeds without ads.
    pub ads_timeout: Duration,

    /// Forward every routed event to the tracker.
    pub track_events: bool,
}

impl Config {
    /// Media timeout as an `Option` (`None` = wait indefinitely).
    #[inline]
    pub fn media_deadline(&self) -> Option<Duration> {
        Some(self.media_timeout).filter(|d| !d.is_zero())
    }

    /// Ad timeout as an `Option` (`None` = wait indefinitely).
    #[inline]
    pub fn ads_deadline(&self) -> Option<Duration> {
        Some(self.ads_timeout).filter(|d| !d.is_zero())
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `media_timeout = 0s` (no timeout)
    /// - `ads_timeout = 0s` (no timeout)
    /// - `track_events = true`
    fn default() -> Self {
        Self {
            media_timeout: Duration::ZERO,
            ads_timeout: Duration::ZERO,
            track_events: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_timeouts_mean_none() {
        let cfg = Config::default();
        assert_eq!(cfg.media_deadline(), None);
        assert_eq!(cfg.ads_deadline(), None);

        let cfg = Config {
            ads_timeout: Duration::from_secs(2),
            ..Config::default()
        };
        assert_eq!(cfg.ads_deadline(), Some(Duration::from_secs(2)));
        assert_eq!(cfg.media_deadline(), None);
    }
}

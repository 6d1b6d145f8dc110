//! Error types used by the router and the lifecycle resolver.
//!
//! This module defines two main error enums:
//!
//! - [`RoutingError`]: programming errors raised by the event router itself.
//! - [`ResolveError`]: failures of a single media or ad resolution path.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the event router.
///
/// These are development mistakes rather than runtime conditions: they are
/// surfaced immediately and must never be retried.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    /// A listener handle was requested for a category the router does not serve.
    #[error("listener category '{name}' isn't supported")]
    UnsupportedCategory {
        /// The requested category name.
        name: String,
    },
}

impl RoutingError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use playroute::RoutingError;
    ///
    /// let err = RoutingError::UnsupportedCategory { name: "Ads".into() };
    /// assert_eq!(err.as_label(), "routing_unsupported_category");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RoutingError::UnsupportedCategory { .. } => "routing_unsupported_category",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RoutingError::UnsupportedCategory { name } => {
                format!("unsupported listener category: {name}")
            }
        }
    }
}

/// # Errors produced by a resolution path.
///
/// Every variant is terminal for its own path only; nothing in the crate retries.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The resolver collaborator reported a failure.
    #[error("resolution failed: {reason}")]
    Fail {
        /// The underlying failure message.
        reason: String,
    },

    /// The resolver did not answer within the configured timeout.
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// The timeout duration that was exceeded.
        timeout: Duration,
    },

    /// The resolution was cancelled before it completed.
    #[error("resolution cancelled")]
    Canceled,
}

impl ResolveError {
    /// Shorthand for [`ResolveError::Fail`].
    pub fn fail(reason: impl Into<String>) -> Self {
        ResolveError::Fail {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use playroute::ResolveError;
    /// use std::time::Duration;
    ///
    /// let err = ResolveError::Timeout { timeout: Duration::from_secs(1) };
    /// assert_eq!(err.as_label(), "resolve_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ResolveError::Fail { .. } => "resolve_failed",
            ResolveError::Timeout { .. } => "resolve_timeout",
            ResolveError::Canceled => "resolve_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ResolveError::Fail { reason } => format!("error: {reason}"),
            ResolveError::Timeout { timeout } => format!("timeout: {timeout:?}"),
            ResolveError::Canceled => "resolution cancelled".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(ResolveError::fail("boom").as_label(), "resolve_failed");
        assert_eq!(ResolveError::Canceled.as_label(), "resolve_canceled");
        assert_eq!(
            RoutingError::UnsupportedCategory { name: "x".into() }.as_label(),
            "routing_unsupported_category"
        );
    }

    #[test]
    fn test_display_includes_reason() {
        let err = ResolveError::fail("no such media");
        assert_eq!(err.to_string(), "resolution failed: no such media");
        assert_eq!(err.as_message(), "error: no such media");
    }
}

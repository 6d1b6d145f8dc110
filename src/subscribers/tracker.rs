//! # Event tracker.
//!
//! The tracker is the reporting sink of the router: every routed event is
//! forwarded to it from its own asynchronous task, unordered with respect to
//! listener delivery.
//!
//! [`TraceTracker`] is the default: it counts events per category and records
//! each one at `DEBUG`.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tracing::debug;

/// Asynchronous sink for rendered events.
pub trait EventTracker: Send + Sync + 'static {
    fn track_event(&self, message: &str);
}

/// Default tracker: per-category counters plus a `DEBUG` record.
#[derive(Debug, Default)]
pub struct TraceTracker {
    counts: RwLock<HashMap<String, u64>>,
}

impl TraceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked events whose rendering starts with `category`.
    pub fn count(&self, category: &str) -> u64 {
        self.counts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(category)
            .copied()
            .unwrap_or(0)
    }

    /// Total number of tracked events.
    pub fn total(&self) -> u64 {
        self.counts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .sum()
    }
}

impl EventTracker for TraceTracker {
    fn track_event(&self, message: &str) {
        let category = message.split_once('.').map_or(message, |(c, _)| c);
        *self
            .counts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(category.to_string())
            .or_insert(0) += 1;
        debug!(target: "playroute::tracker", event = message, "tracked");
    }
}

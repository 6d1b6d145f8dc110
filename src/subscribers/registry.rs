//! # Subscribe registry: who listens to which category.
//!
//! The router asks a [`SubscribeRegistry`] for the listeners of a category on
//! every routed event, internal listeners first, then external ones.
//!
//! - **Internal** listeners belong to the player model itself (playlist
//!   advancing on `on_finished`, ad scheduling on `on_media_resolved`, ...).
//! - **External** listeners belong to the embedding application.
//!
//! [`SubscribeManager`] is the default in-memory registry. Registration order
//! is preserved within each group.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::events::Category;
use crate::subscribers::listener::Listener;

/// Registration counter shared by all managers.
static LISTENER_SEQ: AtomicU64 = AtomicU64::new(1);

/// Listener lookup consumed by the router.
pub trait SubscribeRegistry: Send + Sync + 'static {
    /// Listeners owned by the player model for `category`.
    fn internals(&self, category: Category) -> Vec<Listener>;

    /// Listeners owned by the embedding application for `category`.
    fn externals(&self, category: Category) -> Vec<Listener>;
}

/// Identifies one registration; used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Entry {
    id: ListenerId,
    listener: Listener,
}

/// In-memory [`SubscribeRegistry`] with register/unregister.
#[derive(Default)]
pub struct SubscribeManager {
    internals: RwLock<Vec<Entry>>,
    externals: RwLock<Vec<Entry>>,
}

impl SubscribeManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a player-model listener.
    pub fn register_internal(&self, listener: Listener) -> ListenerId {
        Self::push(&self.internals, listener, "internal")
    }

    /// Registers an application listener.
    pub fn register_listener(&self, listener: Listener) -> ListenerId {
        Self::push(&self.externals, listener, "external")
    }

    /// Removes a registration from either group. Returns `false` if unknown.
    pub fn unregister(&self, id: ListenerId) -> bool {
        [&self.internals, &self.externals].into_iter().any(|group| {
            let mut entries = group.write().unwrap_or_else(PoisonError::into_inner);
            let before = entries.len();
            entries.retain(|e| e.id != id);
            entries.len() != before
        })
    }

    /// Total number of registrations across both groups.
    pub fn len(&self) -> usize {
        let read = |g: &RwLock<Vec<Entry>>| g.read().unwrap_or_else(PoisonError::into_inner).len();
        read(&self.internals) + read(&self.externals)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(group: &RwLock<Vec<Entry>>, listener: Listener, kind: &'static str) -> ListenerId {
        let id = ListenerId(LISTENER_SEQ.fetch_add(1, Ordering::Relaxed));
        debug!(
            listener = listener.name(),
            category = %listener.category(),
            kind,
            "registered listener"
        );
        group
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Entry { id, listener });
        id
    }

    fn select(group: &RwLock<Vec<Entry>>, category: Category) -> Vec<Listener> {
        group
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| e.listener.category() == category)
            .map(|e| e.listener.clone())
            .collect()
    }
}

impl SubscribeRegistry for SubscribeManager {
    fn internals(&self, category: Category) -> Vec<Listener> {
        Self::select(&self.internals, category)
    }

    fn externals(&self, category: Category) -> Vec<Listener> {
        Self::select(&self.externals, category)
    }
}

impl std::fmt::Debug for SubscribeManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscribeManager")
            .field("registrations", &self.len())
            .finish()
    }
}

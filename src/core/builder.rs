use std::sync::Arc;

use crate::core::{config::Config, router::EventRouter};
use crate::subscribers::{EventLogger, EventTracker, SubscribeManager, SubscribeRegistry, TraceTracker};
use crate::tasks::{ExecutionManager, TokioExecutor};

/// Builder for an [`EventRouter`] with explicitly injected collaborators.
///
/// Anything left unset gets a default:
/// - registry: an empty [`SubscribeManager`] (keep your own `Arc` to register listeners)
/// - executor: [`TokioExecutor::current`]
/// - tracker: [`TraceTracker`]
/// - loggers: none
pub struct RouterBuilder {
    cfg: Config,
    registry: Option<Arc<dyn SubscribeRegistry>>,
    executor: Option<Arc<dyn ExecutionManager>>,
    tracker: Option<Arc<dyn EventTracker>>,
    loggers: Vec<Arc<dyn EventLogger>>,
}

impl RouterBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            registry: None,
            executor: None,
            tracker: None,
            loggers: Vec::new(),
        }
    }

    /// Sets the registry listeners are looked up in.
    pub fn with_registry(mut self, registry: Arc<dyn SubscribeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Sets the execution manager dispatch tasks are submitted to.
    pub fn with_executor(mut self, executor: Arc<dyn ExecutionManager>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Sets the tracker routed events are forwarded to.
    pub fn with_tracker(mut self, tracker: Arc<dyn EventTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Appends a logger. Loggers are called in the order they were added.
    pub fn with_logger(mut self, logger: impl EventLogger) -> Self {
        self.loggers.push(Arc::new(logger));
        self
    }

    /// Builds the router.
    ///
    /// # Panics
    /// Without [`with_executor`](Self::with_executor), the default executor is
    /// bound to the current tokio runtime and this panics outside of one.
    pub fn build(self) -> EventRouter {
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(SubscribeManager::new()));
        let executor = self
            .executor
            .unwrap_or_else(|| Arc::new(TokioExecutor::current()));
        let tracker = self
            .tracker
            .unwrap_or_else(|| Arc::new(TraceTracker::new()));

        EventRouter::new(self.cfg, registry, executor, tracker, self.loggers)
    }
}

impl std::fmt::Debug for RouterBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterBuilder")
            .field("cfg", &self.cfg)
            .field("loggers", &self.loggers.len())
            .finish_non_exhaustive()
    }
}

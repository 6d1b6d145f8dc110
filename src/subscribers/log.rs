//! # Event loggers.
//!
//! An [`EventLogger`] receives the canonical rendering of every routed event,
//! synchronously and on the caller's thread, before any listener is
//! dispatched. Loggers are called in registration order.
//!
//! [`LogWriter`] (feature `logging`) forwards the rendering to `tracing`:
//! ```text
//! INFO playroute::events: routed event="Playback.on_seek(1500ms)"
//! ```

/// Synchronous sink for rendered events.
///
/// Called on the routing caller's thread: keep it cheap and non-blocking.
pub trait EventLogger: Send + Sync + 'static {
    fn log_event(&self, message: &str);
}

/// Logger writing every routed event to `tracing` at `INFO`.
#[cfg(feature = "logging")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWriter;

#[cfg(feature = "logging")]
impl EventLogger for LogWriter {
    fn log_event(&self, message: &str) {
        tracing::info!(target: "playroute::events", event = message, "routed");
    }
}

impl<F> EventLogger for F
where
    F: Fn(&str) + Send + Sync + 'static,
{
    fn log_event(&self, message: &str) {
        self(message)
    }
}

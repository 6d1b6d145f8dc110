//! Routing core: configuration, router and its builder.
//!
//! Internal modules:
//! - [`config`]: settings shared by the router and the resolver;
//! - [`router`]: the single interception point and its category handles;
//! - [`builder`]: explicit injection of registry, executor, tracker and loggers.

mod builder;
mod config;
mod router;

pub use builder::RouterBuilder;
pub use config::Config;
pub use router::EventRouter;

pub(crate) use router::panic_message;

//! # Media lifecycle: what gets played, and which ads interrupt it.
//!
//! ## Contents
//! - [`MediaId`], [`ContentRef`], [`MediaDescriptor`] media identity and metadata
//! - [`AdDescriptor`], [`AdPosition`], [`AdStop`] ad insertions and their placement
//! - [`Lifecycle`] write-once aggregate filled by the two resolution paths
//! - [`LifecycleResolver`] runs both paths in parallel and joins them exactly once
//!
//! ```text
//! MediaResolver ──► media ─┐
//!                          ├─► Lifecycle ─► schedule() ─► [AdStop, ...]
//! AdResolver    ──► ads  ──┘
//! ```

mod ad;
mod barrier;
mod entity;
mod media;
mod resolver;

pub use ad::{AdDescriptor, AdPosition, AdStop, resolve_ad_time};
pub use entity::Lifecycle;
pub use media::{AdResolver, ContentRef, MediaDescriptor, MediaId, MediaResolver};
pub use resolver::{LifecycleCallback, LifecycleResolver, ResolverParams};

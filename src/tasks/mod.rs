//! # Task execution abstractions.
//!
//! This module provides:
//! - [`BoxTask`] - type-erased unit of work
//! - [`TaskHandle`] - cancellable receipt for a submitted task
//! - [`ExecutionManager`] - trait for the facility tasks are submitted to
//! - [`TokioExecutor`] - tokio-backed execution manager

mod executor;
mod task;

pub use executor::{ExecutionManager, TokioExecutor};
pub use task::{BoxTask, TaskHandle};

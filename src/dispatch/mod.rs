// src/dispatch/mod.rs

//! Dispatch engine.
//!
//! - [`context`] holds the read-only inputs shared by all channel tasks.
//! - [`coordinator`] runs the tasks (parallel or sequential), isolates their
//!   failures and reconciles the per-channel outcomes.

pub mod context;
pub mod coordinator;

pub use context::DispatchContext;
pub use coordinator::{DispatchOptions, Dispatcher};

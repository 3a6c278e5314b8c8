// src/watch/mod.rs

//! File watching and watch-scope computation.
//!
//! This module is responsible for:
//! - Deriving the watch scope (which paths are worth reporting at all)
//!   from the resolved source/destination/config-file layout.
//! - Wiring up a cross-platform filesystem watcher (`notify`) that turns
//!   raw events into added/modified/removed batches for the runtime.
//!
//! It does **not** decide what a change means; that is the classifiers'
//! job.

pub mod path_utils;
pub mod patterns;
pub mod watcher;

pub use patterns::{WatchPattern, build_watch_pattern};
pub use watcher::{WatcherHandle, spawn_watcher};

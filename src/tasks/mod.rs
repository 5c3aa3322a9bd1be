//! Background Tasks Module
//!
//! Periodic maintenance tasks for the cache.

pub mod sweep;

pub use sweep::spawn_sweep_task;

//! Models Module
//!
//! DTOs for the administrative HTTP surface.

pub mod responses;

pub use responses::*;

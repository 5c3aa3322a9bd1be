//! API Module
//!
//! HTTP handlers and routing for the administrative surface.
//!
//! # Endpoints
//! - `GET /cache/stats` - Snapshot of both tiers and performance counters
//! - `DELETE /cache` - Empty both tiers
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

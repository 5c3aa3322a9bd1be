//! API Handlers
//!
//! HTTP request handlers for the administrative surface. These are thin
//! pass-throughs to the cache engine; the business routes of the host
//! application never appear here.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::cache::CacheEngine;
use crate::error::Result;
use crate::models::{ClearResponse, HealthResponse, StatsResponse};

/// Application state shared across all handlers.
///
/// The engine is constructed once at process start and injected here;
/// nothing reaches it through a global.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<CacheEngine>,
}

impl AppState {
    /// Creates a new AppState around an engine handle.
    pub fn new(engine: Arc<CacheEngine>) -> Self {
        Self { engine }
    }
}

/// Handler for GET /cache/stats
///
/// Returns a snapshot of both tiers and the performance counters.
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let snapshot = state.engine.stats().await?;
    Ok(Json(StatsResponse::from(snapshot)))
}

/// Handler for DELETE /cache
///
/// Empties both tiers.
pub async fn clear_handler(State(state): State<AppState>) -> Result<Json<ClearResponse>> {
    state.engine.clear().await?;
    Ok(Json(ClearResponse::new()))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

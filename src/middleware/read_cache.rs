//! Read-Through Middleware
//!
//! Decorates idempotent read routes with cache lookups. A hit
//! short-circuits the handler entirely; a miss runs it, and a successful
//! JSON response is stored as a clearly sequenced post-processing step
//! before being returned. Cache faults never fail the request.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{CacheEngine, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::middleware::{request_key, CachePolicy};

/// Response header reporting how the cache handled the request.
pub const CACHE_STATUS_HEADER: &str = "x-cache";

// == Middleware State ==
#[derive(Clone)]
pub struct ReadCacheState {
    pub engine: Arc<CacheEngine>,
    pub policy: CachePolicy,
}

impl ReadCacheState {
    pub fn new(engine: Arc<CacheEngine>, policy: CachePolicy) -> Self {
        Self { engine, policy }
    }
}

// == Read Cache Middleware ==
/// Apply with `axum::middleware::from_fn_with_state(state, read_cache)` on
/// the routes whose responses should be memoized.
pub async fn read_cache(
    State(state): State<ReadCacheState>,
    req: Request,
    next: Next,
) -> Response {
    // Only idempotent reads are cacheable
    if req.method() != Method::GET || !state.policy.allows(&req) {
        return next.run(req).await;
    }

    let key = match &state.policy.key {
        Some(key) => key.clone(),
        None => request_key(&req),
    };
    if key.len() > MAX_KEY_LENGTH {
        debug!(len = key.len(), "request key too long to cache");
        return next.run(req).await;
    }

    if let Some(value) = state.engine.get(&key).await {
        return cached_response(&value);
    }

    let response = next.run(req).await;
    store_response(&state, &key, response).await
}

/// Short-circuit response for a cache hit.
fn cached_response(value: &Value) -> Response {
    let body = serde_json::to_vec(value).unwrap_or_default();
    (
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            ),
            (
                header::HeaderName::from_static(CACHE_STATUS_HEADER),
                HeaderValue::from_static("hit"),
            ),
        ],
        body,
    )
        .into_response()
}

/// Buffers a fresh response, stores it when eligible and rebuilds it for
/// the client.
async fn store_response(state: &ReadCacheState, key: &str, response: Response) -> Response {
    if !is_cacheable(&response) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(key, error = %err, "failed to buffer response body");
            return Response::from_parts(parts, Body::empty());
        }
    };

    if bytes.len() <= MAX_VALUE_SIZE {
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => state.engine.set(key, value, state.policy.ttl).await,
            Err(err) => debug!(key, error = %err, "response body is not JSON; not cached"),
        }
    } else {
        debug!(key, size = bytes.len(), "response too large to cache");
    }

    let mut rebuilt = Response::from_parts(parts, Body::from(bytes));
    rebuilt
        .headers_mut()
        .insert(CACHE_STATUS_HEADER, HeaderValue::from_static("miss"));
    rebuilt
}

/// Only successful JSON responses are stored; handler errors propagate
/// unchanged and are never cached.
fn is_cacheable(response: &Response) -> bool {
    if !response.status().is_success() {
        return false;
    }

    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

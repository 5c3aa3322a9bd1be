//! Invalidation Middleware
//!
//! Decorates mutating routes: after the wrapped handler completes
//! successfully, the configured domain tags are purged. A failed mutation
//! changed nothing, so nothing is invalidated.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};

use crate::invalidation::InvalidationRouter;

// == Middleware State ==
#[derive(Clone)]
pub struct InvalidateState {
    pub router: Arc<InvalidationRouter>,
    pub tags: Vec<String>,
}

impl InvalidateState {
    pub fn new(router: Arc<InvalidationRouter>, tags: &[&str]) -> Self {
        Self {
            router,
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
        }
    }
}

// == Invalidate Middleware ==
/// Apply with `axum::middleware::from_fn_with_state(state, invalidate_after)`
/// on mutating routes.
pub async fn invalidate_after(
    State(state): State<InvalidateState>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let response = next.run(req).await;

    let mutating = method == Method::POST
        || method == Method::PUT
        || method == Method::PATCH
        || method == Method::DELETE;

    if mutating && response.status().is_success() {
        state
            .router
            .invalidate(state.tags.iter().map(String::as_str))
            .await;
    }

    response
}

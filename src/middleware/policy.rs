//! Cache Policy Module
//!
//! Per-route caching options: TTL, an optional key override and an optional
//! gate condition. The presets mirror how long each kind of listing stays
//! useful in the source system.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;

/// Gate deciding whether a given request should go through the cache at all.
pub type Condition = Arc<dyn Fn(&Request<Body>) -> bool + Send + Sync>;

// == Cache Policy ==
#[derive(Clone, Default)]
pub struct CachePolicy {
    /// Custom key overriding the canonical request key
    pub key: Option<String>,
    /// Per-route TTL; the engine default applies when unset
    pub ttl: Option<Duration>,
    /// Caching gate; caching applies unconditionally when unset
    pub condition: Option<Condition>,
}

impl CachePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            ..Self::default()
        }
    }

    /// Overrides the computed request key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the caching gate.
    pub fn condition<F>(mut self, condition: F) -> Self
    where
        F: Fn(&Request<Body>) -> bool + Send + Sync + 'static,
    {
        self.condition = Some(Arc::new(condition));
        self
    }

    /// True when the request passes the gate (or no gate is set).
    pub fn allows(&self, req: &Request<Body>) -> bool {
        self.condition.as_ref().map_or(true, |gate| gate(req))
    }

    // == Presets ==
    /// Classroom listings change often: 1 minute.
    pub fn classroom_list() -> Self {
        Self::with_ttl(Duration::from_secs(60))
    }

    /// Classroom detail: 5 minutes.
    pub fn classroom_detail() -> Self {
        Self::with_ttl(Duration::from_secs(5 * 60))
    }

    /// Thread listings are the most volatile: 30 seconds.
    pub fn thread_list() -> Self {
        Self::with_ttl(Duration::from_secs(30))
    }

    /// Material listings: 2 minutes.
    pub fn material_list() -> Self {
        Self::with_ttl(Duration::from_secs(2 * 60))
    }

    /// User profiles: 10 minutes.
    pub fn user_profile() -> Self {
        Self::with_ttl(Duration::from_secs(10 * 60))
    }

    /// Search results: 1 minute.
    pub fn search_results() -> Self {
        Self::with_ttl(Duration::from_secs(60))
    }

    /// Popular searches: 30 minutes.
    pub fn popular_searches() -> Self {
        Self::with_ttl(Duration::from_secs(30 * 60))
    }

    /// Statistics: 5 minutes.
    pub fn statistics() -> Self {
        Self::with_ttl(Duration::from_secs(5 * 60))
    }
}

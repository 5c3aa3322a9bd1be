//! Invalidation Router Module
//!
//! Maps a mutating operation's declared domain tags to key patterns and
//! purges every matching entry from both tiers. The purge is deliberately
//! coarse: one mutation clears whole key families rather than enumerating
//! every derived key it could have touched, trading hit rate for
//! correctness. Invalidation is idempotent, so at-least-once delivery is
//! sufficient.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::CacheEngine;

/// Domain-tag to key-pattern table. Static configuration, not computed at
/// runtime.
const DEFAULT_ROUTES: &[(&str, &[&str])] = &[
    (
        "classroom",
        &["classroom:", "classrooms:", "threads:", "materials:"],
    ),
    ("user", &["user:", "notifications:", "dashboard:"]),
    ("search", &["search:", "stats:"]),
];

// == Invalidation Router ==
pub struct InvalidationRouter {
    engine: Arc<CacheEngine>,
    routes: HashMap<&'static str, Vec<&'static str>>,
}

impl InvalidationRouter {
    // == Constructor ==
    /// Creates a router with the built-in domain routes.
    pub fn new(engine: Arc<CacheEngine>) -> Self {
        let routes = DEFAULT_ROUTES
            .iter()
            .map(|(tag, patterns)| (*tag, patterns.to_vec()))
            .collect();
        Self { engine, routes }
    }

    // == With Route ==
    /// Adds or replaces the patterns for a tag.
    pub fn with_route(mut self, tag: &'static str, patterns: Vec<&'static str>) -> Self {
        self.routes.insert(tag, patterns);
        self
    }

    // == Invalidate ==
    /// Purges every pattern configured for each tag from both tiers.
    ///
    /// Unknown tags are logged and skipped; purging keys that are already
    /// absent is a no-op, so repeated invalidation converges to the same
    /// state.
    pub async fn invalidate<'a, I>(&self, tags: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for tag in tags {
            match self.routes.get(tag) {
                Some(patterns) => {
                    for pattern in patterns {
                        self.engine.delete_pattern(pattern).await;
                    }
                    debug!(tag, patterns = patterns.len(), "invalidated domain");
                }
                None => {
                    warn!(tag, "no invalidation route configured for tag");
                }
            }
        }
    }
}

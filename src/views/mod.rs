use std::collections::HashMap;
use std::io;
use std::io::ErrorKind;

use lazy_static::lazy_static;
use regex::Regex;
use spdlog::warn;

use crate::views::store::ViewStore;

pub mod store;

pub const DEFAULT_KEY_PREFIX: &str = "pageviews";

/// Per-post view counter backed by an external key-value store. The store
/// is the single source of truth: counts are never mirrored in process
/// memory across requests, and the store's atomic INCR is what makes
/// concurrent increments lose nothing.
///
/// Error policy, applied at every call-site: writes propagate, reads
/// default to zero. A best-effort count is fine; a silently dropped
/// increment is not.
pub struct ViewCounter<S> {
    pub(crate) store: S,
    key_prefix: String,
}

pub fn valid_slug(slug: &str) -> bool {
    lazy_static! {
        static ref SLUG_REGEX: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap();
    }
    SLUG_REGEX.is_match(slug)
}

impl<S: ViewStore> ViewCounter<S> {
    pub fn new(store: S, key_prefix: &str) -> Self {
        ViewCounter {
            store,
            key_prefix: key_prefix.to_string(),
        }
    }

    fn key(&self, slug: &str) -> String {
        format!("{}:{}", self.key_prefix, slug)
    }

    fn slug_of<'a>(&self, key: &'a str) -> &'a str {
        key.strip_prefix(self.key_prefix.as_str())
            .and_then(|rest| rest.strip_prefix(':'))
            .unwrap_or(key)
    }

    /// Adds exactly one view and returns the new count. Incrementing a slug
    /// with no post silently creates a new counter; existence checks belong
    /// to the content side.
    pub async fn incr(&self, slug: &str) -> io::Result<u64> {
        if !valid_slug(slug) {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("Invalid slug: {:?}", slug),
            ));
        }

        self.store.incr(&self.key(slug)).await
    }

    /// Current count for a slug. Absent keys and unreachable stores both
    /// read as zero; the latter is logged.
    pub async fn get(&self, slug: &str) -> u64 {
        match self.store.get(&self.key(slug)).await {
            Ok(views) => views.unwrap_or(0),
            Err(e) => {
                warn!("Error reading view count for {}: {}. Defaulting to 0", slug, e);
                0
            }
        }
    }

    /// All counters in one round-trip, for annotating post listings.
    pub async fn all(&self) -> HashMap<String, u64> {
        let pattern = format!("{}:*", self.key_prefix);
        match self.store.get_matching(&pattern).await {
            Ok(pairs) => pairs
                .into_iter()
                .map(|(key, views)| (self.slug_of(&key).to_string(), views))
                .collect(),
            Err(e) => {
                warn!("Error reading view counts: {}. Defaulting to empty", e);
                HashMap::new()
            }
        }
    }
}

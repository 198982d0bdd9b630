//! Read-through cache with rate-limit backoff.
//!
//! `SyncCache` fronts the remote REST API for every resource kind the
//! storefront and admin tabs display. Reads come from the in-memory map
//! while the entry is inside its TTL; otherwise the injected fetcher runs,
//! retrying with exponential backoff when the server signals rate
//! limiting. Writes go straight through and refresh the entry from the
//! server's canonical echo.
//!
//! Concurrent reads of the same key are deliberately not coalesced: two
//! callers racing on a cold key both fetch, and the later commit wins.
//! The map is only ever locked at synchronous points, never across an
//! await, so unrelated call chains do not block each other.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::SyncError;
use crate::retry::{RetryClassifier, RetryObserver, RetryPolicy};

use super::entry::CacheEntry;

/// Consider cache stale after 5 minutes.
/// Balances freshness with reducing unnecessary API calls for slowly-changing data.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Per-call knobs for `SyncCache::read`.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// How long a cached entry satisfies reads without refetching
    pub ttl: Duration,
    /// Skip the freshness check and always invoke the fetcher
    pub force_refresh: bool,
    /// Override the policy's retry cap for this call only
    pub max_retries: Option<u32>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            force_refresh: false,
            max_retries: None,
        }
    }
}

impl ReadOptions {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            ..Self::default()
        }
    }

    pub fn refresh() -> Self {
        Self {
            force_refresh: true,
            ..Self::default()
        }
    }
}

/// Shared read-through cache for named remote resources.
/// Clone is cheap - the entry map is behind an `Arc`.
pub struct SyncCache {
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
    policy: RetryPolicy,
    classifier: RetryClassifier,
    observer: Option<RetryObserver>,
}

impl Clone for SyncCache {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            policy: self.policy,
            classifier: Arc::clone(&self.classifier),
            observer: self.observer.clone(),
        }
    }
}

impl Default for SyncCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncCache {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            policy: RetryPolicy::default(),
            classifier: Arc::new(SyncError::is_rate_limited),
            observer: None,
        }
    }

    /// Replace the default backoff schedule.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the classifier that decides which errors are retried.
    /// The default retries only `SyncError::RateLimited`.
    pub fn with_classifier<C>(mut self, classifier: C) -> Self
    where
        C: Fn(&SyncError) -> bool + Send + Sync + 'static,
    {
        self.classifier = Arc::new(classifier);
        self
    }

    /// Install a callback fired once per backoff wait, for UI "retrying"
    /// indicators. Structured logging happens regardless.
    pub fn with_observer<O>(mut self, observer: O) -> Self
    where
        O: Fn(&str, u32, Duration) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
        self
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        // A poisoned map only means another caller panicked mid-insert;
        // the entries themselves are always whole values.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Read `key` through the cache.
    ///
    /// Returns the cached payload when the entry is fresher than
    /// `options.ttl` and `force_refresh` is off. Otherwise invokes
    /// `fetcher`, backing off and retrying on rate-limit classified
    /// failures; the fetcher runs at most `max_retries` times and the
    /// last error surfaces once that many consecutive attempts have
    /// failed. A successful fetch replaces the entry; a failed one
    /// leaves any previous entry in place.
    pub async fn read<T, F, Fut>(
        &self,
        key: &str,
        mut fetcher: F,
        options: ReadOptions,
    ) -> Result<T, SyncError>
    where
        T: Serialize + DeserializeOwned,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SyncError>>,
    {
        debug_assert!(!key.is_empty(), "cache keys must be non-empty");

        if !options.force_refresh {
            let entries = self.lock();
            if let Some(entry) = entries.get(key) {
                if entry.is_fresh(options.ttl) {
                    debug!(key = key, "cache hit");
                    return Ok(serde_json::from_value(entry.value.clone())?);
                }
                debug!(key = key, age = %entry.age_display(), "cache entry stale");
            }
        }

        let max_retries = options.max_retries.unwrap_or(self.policy.max_retries);
        let mut failures: u32 = 0;

        loop {
            match fetcher().await {
                Ok(value) => {
                    self.store(key, &value)?;
                    return Ok(value);
                }
                Err(err) if (self.classifier)(&err) => {
                    failures += 1;
                    if failures >= max_retries {
                        warn!(key = key, failures = failures, "retry budget exhausted");
                        return Err(err);
                    }
                    let attempt = failures - 1;
                    let delay = self.policy.backoff_delay(attempt);
                    warn!(
                        key = key,
                        attempt = attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Rate limited, backing off"
                    );
                    if let Some(ref observer) = self.observer {
                        observer(key, attempt, delay);
                    }
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Send a mutation straight through and refresh the entry for `key`
    /// from the server's canonical post-write value.
    ///
    /// Writes are never retried: a duplicated mutation could duplicate
    /// its side effects on the server. On failure the existing cache
    /// entry is left untouched so readers keep the last confirmed state.
    pub async fn write<T, M, Fut>(&self, key: &str, mutation: M) -> Result<T, SyncError>
    where
        T: Serialize + DeserializeOwned,
        M: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, SyncError>>,
    {
        debug_assert!(!key.is_empty(), "cache keys must be non-empty");

        let value = mutation().await?;
        self.store(key, &value)?;
        debug!(key = key, "cache entry refreshed from write echo");
        Ok(value)
    }

    /// Drop the entry for `key` unconditionally; the next `read` fetches.
    pub fn invalidate(&self, key: &str) {
        if self.lock().remove(key).is_some() {
            debug!(key = key, "cache entry invalidated");
        }
    }

    /// Human-readable age of the entry for `key`, for admin status lines.
    pub fn entry_age(&self, key: &str) -> Option<String> {
        self.lock().get(key).map(CacheEntry::age_display)
    }

    fn store<T: Serialize>(&self, key: &str, value: &T) -> Result<(), SyncError> {
        let value: Value = serde_json::to_value(value)?;
        self.lock().insert(key.to_string(), CacheEntry::new(value));
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Time-bounded memoization of expensive lookups
//!
//! Entries are keyed by operation name plus the structural value of the
//! arguments, and expire lazily: nothing sweeps the map, an expired entry is
//! simply treated as absent on the next lookup.
//!
//! Each key owns an async lock held while its value is computed, so
//! concurrent callers asking for the same key wait for one computation
//! instead of racing.

use serde::Serialize;
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Cache key: operation plus canonical JSON of its arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    operation: String,
    args: String,
}

impl CacheKey {
    pub fn new<A: Serialize + ?Sized>(operation: &str, args: &A) -> serde_json::Result<Self> {
        Ok(Self {
            operation: operation.to_string(),
            args: serde_json::to_string(args)?,
        })
    }
}

struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    expires_at: Instant,
}

type Slot = Arc<tokio::sync::Mutex<Option<CacheEntry>>>;

/// Process-wide TTL cache
#[derive(Default)]
pub struct TtlCache {
    slots: Mutex<HashMap<CacheKey, Slot>>,
}

impl TtlCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the live value for `(operation, args)`, or run `compute`, store
    /// its result for `ttl` and return it. Failures are returned as-is and
    /// leave nothing behind, so the next call computes again.
    pub async fn get_or_compute<A, T, E, F, Fut>(
        &self,
        operation: &str,
        args: &A,
        ttl: Duration,
        compute: F,
    ) -> Result<T, E>
    where
        A: Serialize + ?Sized,
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let key = match CacheKey::new(operation, args) {
            Ok(key) => key,
            Err(e) => {
                warn!(operation, error = %e, "uncacheable arguments, computing directly");
                return compute().await;
            }
        };

        let slot = self.slot(&key);
        let mut entry = slot.lock().await;

        if let Some(cached) = entry.as_ref() {
            if Instant::now() < cached.expires_at {
                if let Some(value) = cached.value.downcast_ref::<T>() {
                    debug!(operation, args = %key.args, "cache hit");
                    return Ok(value.clone());
                }
            }
        }

        debug!(operation, args = %key.args, "cache miss");
        // Expired entries must not be served if the recomputation fails.
        *entry = None;
        let value = compute().await?;
        *entry = Some(CacheEntry {
            value: Arc::new(value.clone()),
            expires_at: Instant::now() + ttl,
        });
        Ok(value)
    }

    /// Number of keys ever stored (live or expired)
    pub fn len(&self) -> usize {
        self.lock_slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.lock_slots().clear();
    }

    fn slot(&self, key: &CacheKey) -> Slot {
        self.lock_slots().entry(key.clone()).or_default().clone()
    }

    fn lock_slots(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, Slot>> {
        // A poisoned map only means another caller panicked mid-insert; the
        // map itself is still consistent.
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for TtlCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache").field("keys", &self.len()).finish()
    }
}

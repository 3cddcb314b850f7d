//! In-memory query cache with request deduplication.
//!
//! DESIGN
//! ======
//! One [`Entry`] per [`QueryKey`]. A read either returns data younger than the
//! query's staleness window, joins the request already in flight for that key,
//! or starts a new one. The in-flight request is a `Shared` future, so every
//! concurrent caller awaits the same network call and receives the same value
//! or the same error.
//!
//! The in-flight future is the only writer of its entry: it settles the entry
//! itself, tagged with a generation number. Invalidation or removal detaches
//! the current generation, and a detached request's result is dropped on
//! arrival instead of overwriting newer state.
//!
//! Values are stored type-erased (`Arc<dyn Any>`) so one cache serves every
//! resource shape; callers get their concrete `Arc<T>` back.

#[cfg(test)]
#[path = "cache_test.rs"]
mod cache_test;

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::broadcast;
use tokio::time::Instant;

use super::key::QueryKey;
use super::retry::{RetryPolicy, with_retry};
use crate::config::QueryDefaults;
use crate::net::error::ApiError;

type CachedValue = Arc<dyn Any + Send + Sync>;
type SharedFetch = Shared<BoxFuture<'static, Result<CachedValue, ApiError>>>;

const EVENT_CAPACITY: usize = 64;

/// Change notification delivered to [`QueryCache::subscribe`] receivers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryEvent {
    /// A request settled successfully and the entry holds new data.
    Updated(QueryKey),
    /// A request settled with an error (after retries).
    Failed(QueryKey),
    /// The entry was marked stale; the next read refetches.
    Invalidated(QueryKey),
    /// The entry was dropped entirely.
    Removed(QueryKey),
}

/// A read request against the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    key: QueryKey,
    enabled: bool,
    stale_time: Duration,
    retry: RetryPolicy,
}

impl Query {
    #[must_use]
    pub fn new(key: QueryKey, defaults: QueryDefaults) -> Self {
        Self { key, enabled: true, stale_time: defaults.stale_time, retry: defaults.retry }
    }

    /// Gate execution on a precondition. A disabled query never fetches.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    #[must_use]
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Observable snapshot of one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryState {
    pub has_data: bool,
    pub error: Option<ApiError>,
    pub fetched_at: Option<Instant>,
    pub fetching: bool,
}

struct InFlight {
    generation: u64,
    future: SharedFetch,
}

#[derive(Default)]
struct Entry {
    data: Option<CachedValue>,
    error: Option<ApiError>,
    /// `None` means never fetched or invalidated.
    fetched_at: Option<Instant>,
    in_flight: Option<InFlight>,
}

impl Entry {
    fn fresh_value(&self, stale_time: Duration, now: Instant) -> Option<CachedValue> {
        let fetched_at = self.fetched_at?;
        let data = self.data.as_ref()?;
        (now.saturating_duration_since(fetched_at) < stale_time).then(|| Arc::clone(data))
    }
}

struct CacheInner {
    entries: HashMap<QueryKey, Entry>,
    next_generation: u64,
}

/// Cheaply cloneable handle; clones share the same entries.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Mutex<CacheInner>>,
    events: broadcast::Sender<QueryEvent>,
    defaults: QueryDefaults,
}

impl QueryCache {
    #[must_use]
    pub fn new(defaults: QueryDefaults) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Mutex::new(CacheInner { entries: HashMap::new(), next_generation: 0 })),
            events,
            defaults,
        }
    }

    /// Build a [`Query`] for `key` using this cache's defaults.
    #[must_use]
    pub fn query(&self, key: QueryKey) -> Query {
        Query::new(key, self.defaults)
    }

    /// Receive a [`QueryEvent`] for every entry change from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<QueryEvent> {
        self.events.subscribe()
    }

    /// Read through the cache.
    ///
    /// Returns `Ok(None)` when the query is disabled, otherwise the fresh
    /// cached value or the result of the (possibly shared) request.
    ///
    /// # Errors
    ///
    /// Returns the request's final [`ApiError`] once retries are exhausted.
    pub async fn fetch<T, F, Fut>(&self, query: &Query, fetcher: F) -> Result<Option<Arc<T>>, ApiError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        if !query.enabled {
            tracing::debug!(key = %query.key, "query disabled; not fetching");
            return Ok(None);
        }

        let pending = {
            let mut inner = self.lock();
            let generation = inner.next_generation;
            let entry = inner.entries.entry(query.key.clone()).or_default();

            if let Some(value) = entry.fresh_value(query.stale_time, Instant::now()) {
                if let Ok(value) = value.downcast::<T>() {
                    tracing::debug!(key = %query.key, "query cache hit");
                    return Ok(Some(value));
                }
                tracing::warn!(key = %query.key, "cached value has a different type; refetching");
            }

            if let Some(in_flight) = &entry.in_flight {
                tracing::debug!(key = %query.key, "joining in-flight request");
                in_flight.future.clone()
            } else {
                tracing::debug!(key = %query.key, generation, "query cache miss; fetching");
                let future = self.start_fetch(query, generation, fetcher);
                entry.in_flight = Some(InFlight { generation, future: future.clone() });
                inner.next_generation += 1;
                future
            }
        };

        let value = pending.await?;
        value
            .downcast::<T>()
            .map(Some)
            .map_err(|_| ApiError::Decode(format!("cached value for {} has an unexpected type", query.key)))
    }

    fn start_fetch<T, F, Fut>(&self, query: &Query, generation: u64, fetcher: F) -> SharedFetch
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let events = self.events.clone();
        let key = query.key.clone();
        let policy = query.retry;

        async move {
            let result = with_retry(&policy, || {
                let attempt = fetcher();
                async move { attempt.await.map(|value| Arc::new(value) as CachedValue) }
            })
            .await;
            settle(&inner, &events, &key, generation, &result);
            result
        }
        .boxed()
        .shared()
    }

    /// Mark `key` stale so the next read issues a fresh request.
    ///
    /// Last data stays readable through [`QueryCache::peek`]. A request in
    /// flight for `key` is detached: its result will not be stored.
    pub fn invalidate(&self, key: &QueryKey) {
        let found = {
            let mut inner = self.lock();
            match inner.entries.get_mut(key) {
                Some(entry) => {
                    entry.fetched_at = None;
                    entry.in_flight = None;
                    true
                }
                None => false,
            }
        };
        if found {
            tracing::debug!(%key, "query invalidated");
            notify(&self.events, QueryEvent::Invalidated(key.clone()));
        }
    }

    /// Drop every entry whose key matches `predicate`. Returns the dropped keys.
    pub fn remove_where<P>(&self, predicate: P) -> Vec<QueryKey>
    where
        P: Fn(&QueryKey) -> bool,
    {
        let removed: Vec<QueryKey> = {
            let mut inner = self.lock();
            let keys: Vec<QueryKey> = inner
                .entries
                .keys()
                .filter(|key| predicate(key))
                .cloned()
                .collect();
            for key in &keys {
                inner.entries.remove(key);
            }
            keys
        };
        for key in &removed {
            tracing::debug!(%key, "query removed");
            notify(&self.events, QueryEvent::Removed(key.clone()));
        }
        removed
    }

    /// Drop one entry.
    pub fn remove(&self, key: &QueryKey) -> bool {
        !self.remove_where(|k| k == key).is_empty()
    }

    /// Drop every entry whose data depends on the logged-in identity.
    pub fn clear_identity_scoped(&self) -> Vec<QueryKey> {
        self.remove_where(QueryKey::is_identity_scoped)
    }

    /// Last stored data for `key`, fresh or not.
    #[must_use]
    pub fn peek<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let inner = self.lock();
        let data = inner.entries.get(key)?.data.as_ref()?;
        // A type mismatch reads as no data.
        Arc::clone(data).downcast::<T>().ok()
    }

    #[must_use]
    pub fn entry_state(&self, key: &QueryKey) -> Option<EntryState> {
        let inner = self.lock();
        inner.entries.get(key).map(|entry| EntryState {
            has_data: entry.data.is_some(),
            error: entry.error.clone(),
            fetched_at: entry.fetched_at,
            fetching: entry.in_flight.is_some(),
        })
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        lock_inner(&self.inner)
    }
}

fn lock_inner(inner: &Mutex<CacheInner>) -> MutexGuard<'_, CacheInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

fn settle(
    inner: &Mutex<CacheInner>,
    events: &broadcast::Sender<QueryEvent>,
    key: &QueryKey,
    generation: u64,
    result: &Result<CachedValue, ApiError>,
) {
    let event = {
        let mut inner = lock_inner(inner);
        let Some(entry) = inner.entries.get_mut(key) else {
            tracing::debug!(%key, generation, "entry removed; discarding late result");
            return;
        };
        if entry.in_flight.as_ref().map(|f| f.generation) != Some(generation) {
            tracing::debug!(%key, generation, "request detached; discarding late result");
            return;
        }
        entry.in_flight = None;
        match result {
            Ok(value) => {
                entry.data = Some(Arc::clone(value));
                entry.error = None;
                entry.fetched_at = Some(Instant::now());
                QueryEvent::Updated(key.clone())
            }
            Err(err) => {
                entry.error = Some(err.clone());
                QueryEvent::Failed(key.clone())
            }
        }
    };
    notify(events, event);
}

fn notify(events: &broadcast::Sender<QueryEvent>, event: QueryEvent) {
    if let Err(unsent) = events.send(event) {
        tracing::trace!(event = ?unsent.0, "no query subscribers");
    }
}

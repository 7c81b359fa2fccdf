//! Explicit query cache with request deduplication.
//!
//! One [`QueryCache`] is built at startup and shared by reference with every
//! component that reads remote data. It never patches a payload locally: a
//! write marks its revalidation targets stale and the next read re-fetches.
//!
//! # Invariants
//!
//! - At most one request is in flight per [`QueryKey`]; later readers join it.
//! - [`QueryCache::invalidate`] bumps the entry generation and detaches any
//!   in-flight request. A request that started before the invalidation still
//!   answers its own waiters, but its payload is never written back, so a
//!   pre-write response cannot resurface after the write resolved.
//! - A failed read keeps the last good payload and records the error beside it.

use crate::error::ClientError;
use crate::query::QueryKey;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tokio::sync::broadcast;

type SharedFetch = Shared<BoxFuture<'static, Result<Value, ClientError>>>;

/// Snapshot of one cached read, the `{data, error, isLoading}` triple plus a
/// staleness flag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    /// Last successful payload, possibly stale.
    pub data: Option<Value>,
    /// Error from the most recent attempt, cleared on success.
    pub error: Option<ClientError>,
    /// A request for this key is in flight.
    pub is_loading: bool,
    /// The payload was invalidated or aged out and will be re-fetched.
    pub is_stale: bool,
}

impl QueryState {
    /// Result view: the payload if one exists, otherwise the error.
    ///
    /// Returns `None` only when nothing has been fetched yet.
    pub fn result(&self) -> Option<Result<&Value, &ClientError>> {
        match (&self.data, &self.error) {
            (Some(data), _) => Some(Ok(data)),
            (None, Some(err)) => Some(Err(err)),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheEventKind {
    Fetching,
    Updated,
    Failed,
    Invalidated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEvent {
    pub key: QueryKey,
    pub kind: CacheEventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheConfig {
    /// Entries older than this are treated as stale. `None` keeps entries
    /// fresh until invalidated.
    pub max_age: Option<Duration>,
}

struct InFlight {
    ticket: u64,
    future: SharedFetch,
}

#[derive(Default)]
struct CacheEntry {
    data: Option<Value>,
    error: Option<ClientError>,
    fetched_at: Option<Instant>,
    stale: bool,
    generation: u64,
    in_flight: Option<InFlight>,
}

impl CacheEntry {
    fn is_fresh(&self, config: &CacheConfig) -> bool {
        if self.data.is_none() || self.stale || self.error.is_some() {
            return false;
        }
        match (config.max_age, self.fetched_at) {
            (Some(max_age), Some(at)) => at.elapsed() <= max_age,
            _ => true,
        }
    }

    fn snapshot(&self, config: &CacheConfig) -> QueryState {
        QueryState {
            data: self.data.clone(),
            error: self.error.clone(),
            is_loading: self.in_flight.is_some(),
            is_stale: self.data.is_some() && !self.is_fresh(config),
        }
    }
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<QueryKey, CacheEntry>,
    next_ticket: u64,
}

pub struct QueryCache {
    inner: Mutex<CacheInner>,
    events: broadcast::Sender<CacheEvent>,
    config: CacheConfig,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    pub fn with_config(config: CacheConfig) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            inner: Mutex::new(CacheInner::default()),
            events,
            config,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Current state for `key` without touching the network.
    pub fn get(&self, key: &QueryKey) -> QueryState {
        let inner = self.lock();
        inner
            .entries
            .get(key)
            .map(|entry| entry.snapshot(&self.config))
            .unwrap_or_default()
    }

    /// Mark `key` stale so the next read re-fetches it.
    pub fn invalidate(&self, key: &QueryKey) {
        let invalidated = {
            let mut inner = self.lock();
            match inner.entries.get_mut(key) {
                Some(entry) => {
                    entry.stale = true;
                    entry.generation += 1;
                    entry.in_flight = None;
                    true
                }
                None => false,
            }
        };
        if invalidated {
            tracing::debug!(key = %key, "Query invalidated");
            self.emit(key.clone(), CacheEventKind::Invalidated);
        }
    }

    /// Invalidate every cached key for `endpoint`, whatever its parameters.
    pub fn invalidate_endpoint(&self, endpoint: &str) {
        let keys: Vec<QueryKey> = {
            let inner = self.lock();
            inner
                .entries
                .keys()
                .filter(|k| k.endpoint() == endpoint)
                .cloned()
                .collect()
        };
        for key in keys {
            self.invalidate(&key);
        }
    }

    /// Drop every entry. Used when the session changes.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    /// Return the fresh entry for `key`, or run `fetch` and store its result.
    ///
    /// With `force` the fresh-entry shortcut is skipped, but an in-flight
    /// request is still joined rather than duplicated.
    pub async fn fetch_with<F>(&self, key: &QueryKey, force: bool, fetch: F) -> QueryState
    where
        F: FnOnce() -> BoxFuture<'static, Result<Value, ClientError>>,
    {
        let (future, ticket, generation, started) = {
            let mut guard = self.lock();
            let inner = &mut *guard;
            inner.next_ticket += 1;
            let ticket = inner.next_ticket;
            let entry = inner.entries.entry(key.clone()).or_default();

            if !force && entry.is_fresh(&self.config) {
                tracing::debug!(key = %key, "Query cache hit");
                return entry.snapshot(&self.config);
            }

            let joined = entry
                .in_flight
                .as_ref()
                .map(|in_flight| (in_flight.future.clone(), in_flight.ticket));
            match joined {
                Some((future, ticket)) => {
                    tracing::debug!(key = %key, "Joining in-flight request");
                    (future, ticket, entry.generation, false)
                }
                None => {
                    let future = fetch().shared();
                    entry.in_flight = Some(InFlight {
                        ticket,
                        future: future.clone(),
                    });
                    (future, ticket, entry.generation, true)
                }
            }
        };

        if started {
            self.emit(key.clone(), CacheEventKind::Fetching);
        }

        let result = future.await;
        self.settle(key, ticket, generation, result)
    }

    fn settle(
        &self,
        key: &QueryKey,
        ticket: u64,
        generation: u64,
        result: Result<Value, ClientError>,
    ) -> QueryState {
        let (state, event) = {
            let mut inner = self.lock();
            let entry = inner.entries.entry(key.clone()).or_default();
            let owns_slot = entry
                .in_flight
                .as_ref()
                .is_some_and(|in_flight| in_flight.ticket == ticket);

            if owns_slot {
                entry.in_flight = None;
                let event = match &result {
                    Ok(value) => {
                        entry.data = Some(value.clone());
                        entry.error = None;
                        entry.stale = false;
                        entry.fetched_at = Some(Instant::now());
                        CacheEventKind::Updated
                    }
                    Err(err) => {
                        entry.error = Some(err.clone());
                        CacheEventKind::Failed
                    }
                };
                (entry.snapshot(&self.config), Some(event))
            } else if entry.generation == generation {
                // Another waiter of the same request already stored it.
                (entry.snapshot(&self.config), None)
            } else {
                // Invalidated while in flight: answer this waiter, store nothing.
                tracing::debug!(key = %key, "Discarding response superseded by invalidation");
                let state = match result {
                    Ok(value) => QueryState {
                        data: Some(value),
                        error: None,
                        is_loading: false,
                        is_stale: true,
                    },
                    Err(err) => QueryState {
                        data: entry.data.clone(),
                        error: Some(err),
                        is_loading: false,
                        is_stale: true,
                    },
                };
                (state, None)
            }
        };

        if let Some(kind) = event {
            if kind == CacheEventKind::Failed {
                tracing::warn!(key = %key, error = ?state.error, "Query failed");
            }
            self.emit(key.clone(), kind);
        }
        state
    }

    fn emit(&self, key: QueryKey, kind: CacheEventKind) {
        // No subscribers is not an error.
        let _ = self.events.send(CacheEvent { key, kind });
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

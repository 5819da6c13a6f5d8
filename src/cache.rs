//! Freshness-windowed response cache with stale-while-revalidate.
//!
//! One instance per logical query family (bulk quotes, per-coin history),
//! constructed once per session and handed to whoever needs it.
//!
//! - fresh hit: cached value, no fetch
//! - stale hit: cached value now, one background refetch replaces it later
//! - miss: fetch inline
//!
//! Only successful fetches are stored. A background refetch never replaces
//! an entry written after it started. Listeners registered with
//! `on_revalidate` see every value a background refetch stores.

use crate::runtime::{self, MaybeSend, MaybeSync};

use async_lock::RwLock;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::fmt::{Debug, Display};
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

/// Time source for freshness checks.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Called after a background refetch stores a value. Returning `false`
/// unregisters the listener.
pub type Listener<K, V> = Arc<dyn Fn(&K, &V) -> bool + Send + Sync>;

/// Whether a cached entry is still inside its freshness window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

/// A cached value together with its age information.
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<V> {
    pub value: V,
    pub fetched_at: DateTime<Utc>,
    pub freshness: Freshness,
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    fetched_at: DateTime<Utc>,
}

/// Key → (value, fetched_at) cache with a fixed freshness window.
pub struct FreshnessCache<K, V> {
    entries: Arc<RwLock<HashMap<K, Entry<V>>>>,
    /// Keys with a background refetch in flight.
    revalidating: Arc<RwLock<HashSet<K>>>,
    listeners: Arc<RwLock<Vec<Listener<K, V>>>>,
    window: Duration,
    clock: Clock,
}

impl<K, V> Clone for FreshnessCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            revalidating: self.revalidating.clone(),
            listeners: self.listeners.clone(),
            window: self.window,
            clock: self.clock.clone(),
        }
    }
}

impl<K, V> FreshnessCache<K, V>
where
    K: Eq + Hash + Clone + Debug + MaybeSend + MaybeSync + 'static,
    V: Clone + MaybeSend + MaybeSync + 'static,
{
    pub fn new(window: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            revalidating: Arc::new(RwLock::new(HashSet::new())),
            listeners: Arc::new(RwLock::new(Vec::new())),
            window,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the time source (tests, replays).
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn freshness_at(&self, fetched_at: DateTime<Utc>, now: DateTime<Utc>) -> Freshness {
        // A clock that moved backwards counts as zero age.
        let age = (now - fetched_at).to_std().unwrap_or_default();
        if age < self.window {
            Freshness::Fresh
        } else {
            Freshness::Stale
        }
    }

    /// Return the cached value for `key`, fetching or revalidating as needed.
    ///
    /// `fetch` is only invoked on a miss or when a stale entry has no
    /// background refetch in flight yet.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + MaybeSend + 'static,
        E: Display + MaybeSend + 'static,
    {
        match self.peek(&key).await {
            Some(Cached {
                value,
                freshness: Freshness::Fresh,
                ..
            }) => {
                tracing::debug!(key = ?key, "Cache hit (fresh)");
                Ok(value)
            }
            Some(Cached {
                value,
                freshness: Freshness::Stale,
                ..
            }) => {
                tracing::debug!(key = ?key, "Cache hit (stale), revalidating in background");
                self.revalidate(key, fetch).await;
                Ok(value)
            }
            None => {
                tracing::debug!(key = ?key, "Cache miss");
                let value = fetch().await?;
                self.insert(key, value.clone()).await;
                Ok(value)
            }
        }
    }

    /// Fetch unconditionally and store the result on success.
    pub async fn refresh<F, Fut, E>(&self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let value = fetch().await?;
        self.insert(key, value.clone()).await;
        Ok(value)
    }

    async fn revalidate<F, Fut, E>(&self, key: K, fetch: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + MaybeSend + 'static,
        E: Display + MaybeSend + 'static,
    {
        if !self.revalidating.write().await.insert(key.clone()) {
            tracing::debug!(key = ?key, "Revalidation already in flight");
            return;
        }

        let entries = self.entries.clone();
        let revalidating = self.revalidating.clone();
        let listeners = self.listeners.clone();
        let clock = self.clock.clone();
        let started_at = clock();
        let fut = fetch();
        let task_key = key.clone();

        let spawned = runtime::spawn(async move {
            match fut.await {
                Ok(value) => {
                    let stored = {
                        let mut entries = entries.write().await;
                        match entries.get(&task_key) {
                            Some(current) if current.fetched_at > started_at => false,
                            _ => {
                                let fetched_at = clock();
                                entries.insert(
                                    task_key.clone(),
                                    Entry {
                                        value: value.clone(),
                                        fetched_at,
                                    },
                                );
                                true
                            }
                        }
                    };
                    if stored {
                        tracing::debug!(key = ?task_key, "Background revalidation stored");
                        listeners
                            .write()
                            .await
                            .retain(|listener| listener(&task_key, &value));
                    } else {
                        tracing::debug!(key = ?task_key, "Entry refreshed meanwhile, revalidation dropped");
                    }
                }
                Err(e) => {
                    tracing::warn!(key = ?task_key, error = %e, "Background revalidation failed, keeping stale value");
                }
            }
            revalidating.write().await.remove(&task_key);
        });

        if !spawned {
            self.revalidating.write().await.remove(&key);
        }
    }

    /// Register a listener for values stored by background refetches.
    pub async fn on_revalidate(&self, listener: Listener<K, V>) {
        self.listeners.write().await.push(listener);
    }

    /// Store `value` as fetched now.
    pub async fn insert(&self, key: K, value: V) {
        let fetched_at = (self.clock)();
        self.entries
            .write()
            .await
            .insert(key, Entry { value, fetched_at });
    }

    /// Read an entry without triggering any fetch.
    pub async fn peek(&self, key: &K) -> Option<Cached<V>> {
        let now = (self.clock)();
        let entries = self.entries.read().await;
        entries.get(key).map(|e| Cached {
            value: e.value.clone(),
            fetched_at: e.fetched_at,
            freshness: self.freshness_at(e.fetched_at, now),
        })
    }

    pub async fn is_revalidating(&self, key: &K) -> bool {
        self.revalidating.read().await.contains(key)
    }

    pub async fn invalidate(&self, key: &K) {
        self.entries.write().await.remove(key);
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

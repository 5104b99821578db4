//! Keyed query cache with in-flight request coalescing
//!
//! Each [`QueryKey`] moves through `Idle -> Loading -> Success | Error`.
//! While a key is loading, further fetches subscribe to the pending result
//! on a broadcast channel instead of issuing another request. Successful
//! results stay cached until invalidated. A failed result is remembered
//! for [`QueryClient::state`] but the next fetch re-issues the request.
//!
//! Dropping the future that issued a request releases its key. Callers that
//! were waiting on it issue the request again themselves.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tokio::sync::broadcast;
use tracing::debug;

use crate::types::{ExplorerError, Result};

/// Cache key: the request path plus its filter parameters, sorted
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(String);

impl QueryKey {
    pub fn path(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Build a key from a path and optional filters. `None` and empty
    /// values are left out so they share the unfiltered key.
    pub fn with_params(path: &str, params: &[(&str, Option<&str>)]) -> Self {
        let mut present: Vec<(&str, &str)> = params
            .iter()
            .filter_map(|(name, value)| value.filter(|v| !v.is_empty()).map(|v| (*name, v)))
            .collect();
        if present.is_empty() {
            return Self::path(path);
        }
        present.sort();
        let query = serde_urlencoded::to_string(&present).unwrap_or_default();
        Self(format!("{}?{}", path, query))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Observable state of one key
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    Idle,
    Loading,
    Success(T),
    Error(String),
}

/// Transport used by the query layer
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value>;
    async fn post(&self, path: &str, body: &Value) -> Result<Value>;
}

type Outcome = Result<Value>;

enum Entry {
    InFlight {
        sender: broadcast::Sender<Outcome>,
        generation: u64,
        started_at: Instant,
        /// Result is delivered to waiters but not cached
        invalidated: bool,
    },
    Ready(Value),
    Failed(ExplorerError),
}

type Entries = HashMap<QueryKey, Entry>;

/// Query cache over a [`Fetcher`]
pub struct QueryClient<F> {
    fetcher: F,
    entries: Mutex<Entries>,
    generation: AtomicU64,
}

/// Removes its key's in-flight entry if the owning fetch is dropped early
struct InFlightGuard<'a> {
    entries: &'a Mutex<Entries>,
    key: &'a QueryKey,
    generation: u64,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let pending = matches!(
            entries.get(self.key),
            Some(Entry::InFlight { generation, .. }) if *generation == self.generation
        );
        if pending {
            debug!(key = %self.key, "Query dropped before completion");
            entries.remove(self.key);
        }
    }
}

impl<F: Fetcher> QueryClient<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            entries: Mutex::new(HashMap::new()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached value, the pending in-flight result, or a fresh GET
    pub async fn fetch(&self, key: &QueryKey) -> Result<Value> {
        let (sender, generation) = loop {
            let mut rx = {
                let mut entries = self.entries();
                match entries.get(key) {
                    Some(Entry::Ready(value)) => return Ok(value.clone()),
                    Some(Entry::InFlight { sender, started_at, .. }) => {
                        let pending_ms = started_at.elapsed().as_millis() as u64;
                        debug!(key = %key, pending_ms, "Coalescing with in-flight query");
                        sender.subscribe()
                    }
                    Some(Entry::Failed(_)) | None => break self.register(&mut entries, key),
                }
            };
            match rx.recv().await {
                Ok(outcome) => return outcome,
                // Owner went away without a result
                Err(_) => debug!(key = %key, "In-flight query abandoned, re-issuing"),
            }
        };

        let _guard = InFlightGuard {
            entries: &self.entries,
            key,
            generation,
        };
        debug!(key = %key, "Issuing query");
        let outcome = self.fetcher.get(key.as_str()).await;
        self.complete(key, generation, &outcome);
        // Waiters that subscribed before completion receive the same outcome
        let _ = sender.send(outcome.clone());
        outcome
    }

    fn register(
        &self,
        entries: &mut Entries,
        key: &QueryKey,
    ) -> (broadcast::Sender<Outcome>, u64) {
        let (sender, _) = broadcast::channel(1);
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        entries.insert(
            key.clone(),
            Entry::InFlight {
                sender: sender.clone(),
                generation,
                started_at: Instant::now(),
                invalidated: false,
            },
        );
        (sender, generation)
    }

    /// Fetch and decode into `T`
    pub async fn fetch_as<T: DeserializeOwned>(&self, key: &QueryKey) -> Result<T> {
        let value = self.fetch(key).await?;
        decode(value)
    }

    fn complete(&self, key: &QueryKey, generation: u64, outcome: &Outcome) {
        let mut entries = self.entries();
        let invalidated = match entries.get(key) {
            Some(Entry::InFlight {
                generation: current,
                invalidated,
                ..
            }) if *current == generation => *invalidated,
            // Removed or replaced while we were fetching
            _ => return,
        };

        if invalidated {
            entries.remove(key);
            return;
        }

        let entry = match outcome {
            Ok(value) => Entry::Ready(value.clone()),
            Err(err) => Entry::Failed(err.clone()),
        };
        entries.insert(key.clone(), entry);
    }

    /// Mark a key stale. A cached result is dropped; an in-flight result
    /// will still reach its waiters but is not cached.
    pub async fn invalidate(&self, key: &QueryKey) {
        let mut entries = self.entries();
        match entries.get_mut(key) {
            Some(Entry::InFlight { invalidated, .. }) => *invalidated = true,
            Some(_) => {
                entries.remove(key);
            }
            None => {}
        }
    }

    /// Forget a key entirely
    pub async fn remove(&self, key: &QueryKey) {
        self.entries().remove(key);
    }

    pub async fn state(&self, key: &QueryKey) -> QueryState<Value> {
        match self.entries().get(key) {
            None => QueryState::Idle,
            Some(Entry::InFlight { .. }) => QueryState::Loading,
            Some(Entry::Ready(value)) => QueryState::Success(value.clone()),
            Some(Entry::Failed(err)) => QueryState::Error(err.message().to_string()),
        }
    }

    /// Issue a mutation. Mutations are never cached.
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.fetcher.post(path, body).await
    }
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| ExplorerError::Http(format!("Unexpected response shape: {}", e)))
}

//! Process-local `OrderCache` adapter.
//!
//! Entries live in a mutex-guarded map; expiry is evaluated against an
//! injected [`Clock`]. Scans walk entries in write order using the write
//! sequence number as the cursor, so deleting keys between pages never makes
//! the scan skip a live key.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::{Clock, DefaultClock};

use crate::domain::ports::{
    CacheTtl, OrderCache, OrderCacheError, OrderCacheKey, ScanCursor, ScanPage,
};

/// Default number of keys returned per scan page.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

struct Entry {
    payload: Vec<u8>,
    expires_at: Option<DateTime<Utc>>,
    seq: u64,
}

#[derive(Default)]
struct Store {
    entries: HashMap<String, Entry>,
    by_seq: BTreeMap<u64, String>,
    next_seq: u64,
}

impl Store {
    fn remove(&mut self, key: &str) -> Option<Entry> {
        let entry = self.entries.remove(key)?;
        self.by_seq.remove(&entry.seq);
        Some(entry)
    }

    fn is_live(entry: &Entry, now: DateTime<Utc>) -> bool {
        entry.expires_at.is_none_or(|at| now < at)
    }
}

/// In-memory order cache with clock-driven expiry.
pub struct InMemoryOrderCache {
    store: Mutex<Store>,
    clock: Arc<dyn Clock + Send + Sync>,
    page_size: usize,
}

impl Default for InMemoryOrderCache {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl InMemoryOrderCache {
    pub fn new(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            store: Mutex::new(Store {
                next_seq: 1,
                ..Store::default()
            }),
            clock,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Bound scan pages to `page_size` keys. Zero is clamped to one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Number of live entries.
    pub fn len(&self) -> Result<usize, OrderCacheError> {
        let now = self.clock.utc();
        let store = self.lock()?;
        Ok(store
            .entries
            .values()
            .filter(|entry| Store::is_live(entry, now))
            .count())
    }

    pub fn is_empty(&self) -> Result<bool, OrderCacheError> {
        Ok(self.len()? == 0)
    }

    /// Store a payload under a raw key, bypassing key composition.
    pub fn insert_raw(
        &self,
        key: impl Into<String>,
        payload: &[u8],
        ttl: CacheTtl,
    ) -> Result<(), OrderCacheError> {
        let expires_at = self.expiry(ttl)?;
        let key = key.into();
        let mut store = self.lock()?;
        store.remove(&key);
        let seq = store.next_seq;
        store.next_seq += 1;
        store.by_seq.insert(seq, key.clone());
        store.entries.insert(
            key,
            Entry {
                payload: payload.to_vec(),
                expires_at,
                seq,
            },
        );
        Ok(())
    }

    /// Whether a live entry exists under a raw key.
    pub fn contains_raw(&self, key: &str) -> Result<bool, OrderCacheError> {
        let now = self.clock.utc();
        let store = self.lock()?;
        Ok(store
            .entries
            .get(key)
            .is_some_and(|entry| Store::is_live(entry, now)))
    }

    fn expiry(&self, ttl: CacheTtl) -> Result<Option<DateTime<Utc>>, OrderCacheError> {
        let Some(seconds) = ttl.as_seconds() else {
            return Ok(None);
        };
        let delta = i64::try_from(seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| OrderCacheError::backend(format!("ttl out of range: {seconds}s")))?;
        self.clock
            .utc()
            .checked_add_signed(delta)
            .map(Some)
            .ok_or_else(|| OrderCacheError::backend(format!("ttl overflows the clock: {seconds}s")))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, OrderCacheError> {
        self.store
            .lock()
            .map_err(|_| OrderCacheError::backend("in-memory cache lock poisoned"))
    }
}

fn matches_pattern(pattern: &str, key: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => key.starts_with(prefix),
        None => key == pattern,
    }
}

#[async_trait]
impl OrderCache for InMemoryOrderCache {
    async fn get(&self, key: &OrderCacheKey) -> Result<Option<Vec<u8>>, OrderCacheError> {
        let now = self.clock.utc();
        let mut store = self.lock()?;
        let expired = match store.entries.get(key.as_str()) {
            None => return Ok(None),
            Some(entry) if Store::is_live(entry, now) => return Ok(Some(entry.payload.clone())),
            Some(_) => true,
        };
        if expired {
            store.remove(key.as_str());
        }
        Ok(None)
    }

    async fn set(
        &self,
        key: &OrderCacheKey,
        payload: &[u8],
        ttl: CacheTtl,
    ) -> Result<(), OrderCacheError> {
        self.insert_raw(key.as_str(), payload, ttl)
    }

    async fn scan_prefix(
        &self,
        pattern: &str,
        cursor: ScanCursor,
    ) -> Result<ScanPage, OrderCacheError> {
        let now = self.clock.utc();
        let store = self.lock()?;
        let mut keys = Vec::new();
        let mut next = None;

        for (&seq, key) in store.by_seq.range(cursor.get()..) {
            if keys.len() == self.page_size {
                next = Some(ScanCursor::new(seq));
                break;
            }
            let live = store
                .entries
                .get(key)
                .is_some_and(|entry| Store::is_live(entry, now));
            if live && matches_pattern(pattern, key) {
                keys.push(key.clone());
            }
        }

        Ok(ScanPage { keys, next })
    }

    async fn delete_many(&self, keys: &[String]) -> Result<u64, OrderCacheError> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut store = self.lock()?;
        let removed = keys
            .iter()
            .filter(|key| store.remove(key).is_some())
            .count();
        Ok(removed as u64)
    }
}

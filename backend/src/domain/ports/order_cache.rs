//! Port interface for the key/value store holding serialised order payloads.
use async_trait::async_trait;

use super::{OrderCacheKey, define_port_error};

define_port_error! {
    /// Errors surfaced by the caching adapter.
    pub enum OrderCacheError {
        /// Cache backend is unavailable or rejected the command.
        Backend { message: String } => "order cache backend failure: {message}",
        /// A reply from the backend could not be decoded.
        Serialization { message: String } => "order cache serialisation failed: {message}",
    }
}

/// Expiry applied when writing a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheTtl {
    /// Entry never expires.
    #[default]
    Persistent,
    /// Entry expires after the given number of seconds.
    Seconds(u64),
}

impl CacheTtl {
    /// Interpret a configured TTL; zero and negative values disable expiry.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::ports::CacheTtl;
    ///
    /// assert_eq!(CacheTtl::from_seconds(0), CacheTtl::Persistent);
    /// assert_eq!(CacheTtl::from_seconds(-5), CacheTtl::Persistent);
    /// assert_eq!(CacheTtl::from_seconds(30), CacheTtl::Seconds(30));
    /// ```
    pub fn from_seconds(seconds: i64) -> Self {
        match u64::try_from(seconds) {
            Ok(0) | Err(_) => Self::Persistent,
            Ok(value) => Self::Seconds(value),
        }
    }

    /// Expiry in seconds, or `None` when the entry never expires.
    pub fn as_seconds(self) -> Option<u64> {
        match self {
            Self::Persistent => None,
            Self::Seconds(value) => Some(value),
        }
    }
}

/// Opaque position within an incremental key scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanCursor(u64);

impl ScanCursor {
    /// Cursor that starts a fresh scan.
    pub const START: Self = Self(0);

    /// Wrap a backend-issued cursor value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw cursor value understood by the backend.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// One page of keys yielded by [`OrderCache::scan_prefix`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanPage {
    /// Keys matched in this page; may be empty even when more pages follow.
    pub keys: Vec<String>,
    /// Cursor for the next page, or `None` once the scan is complete.
    pub next: Option<ScanCursor>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderCache: Send + Sync {
    /// Read a cached payload; `Ok(None)` is a miss.
    async fn get(&self, key: &OrderCacheKey) -> Result<Option<Vec<u8>>, OrderCacheError>;

    /// Store a complete payload under `key`, replacing any previous value.
    async fn set(
        &self,
        key: &OrderCacheKey,
        payload: &[u8],
        ttl: CacheTtl,
    ) -> Result<(), OrderCacheError>;

    /// Fetch the page of keys matching `pattern` that starts at `cursor`.
    ///
    /// Starting again from [`ScanCursor::START`] restarts the scan.
    async fn scan_prefix(
        &self,
        pattern: &str,
        cursor: ScanCursor,
    ) -> Result<ScanPage, OrderCacheError>;

    /// Delete the given keys, returning how many existed.
    async fn delete_many(&self, keys: &[String]) -> Result<u64, OrderCacheError>;
}

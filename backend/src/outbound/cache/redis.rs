//! Redis-backed `OrderCache` adapter over a `bb8` connection pool.
//!
//! Payloads are stored as raw bytes under the composed key. Expiry is set in
//! the same `SET` command so a key is never observable without its TTL.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{Pool, PooledConnection, RunError};
use bb8_redis::redis::{self, RedisError};
use tracing::debug;

use crate::domain::ports::{
    CacheTtl, OrderCache, OrderCacheError, OrderCacheKey, ScanCursor, ScanPage,
};

/// Keys requested per `SCAN` round trip.
pub const SCAN_COUNT: usize = 1000;

/// Redis pool settings.
#[derive(Debug, Clone)]
pub struct RedisPoolConfig {
    redis_url: String,
    max_size: u32,
    connection_timeout: Duration,
}

impl RedisPoolConfig {
    /// Defaults: 16 connections, 5 second checkout timeout.
    pub fn new(redis_url: impl Into<String>) -> Self {
        Self {
            redis_url: redis_url.into(),
            max_size: 16,
            connection_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    pub fn redis_url(&self) -> &str {
        &self.redis_url
    }
}

/// Order cache adapter backed by Redis.
#[derive(Clone)]
pub struct RedisOrderCache {
    pool: Pool<RedisConnectionManager>,
}

impl RedisOrderCache {
    /// Build the pool. Connections are opened lazily on first checkout.
    ///
    /// # Errors
    ///
    /// Returns [`OrderCacheError::Backend`] when the URL cannot be parsed.
    pub async fn connect(config: RedisPoolConfig) -> Result<Self, OrderCacheError> {
        let manager = RedisConnectionManager::new(config.redis_url.as_str()).map_err(map_redis_error)?;
        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(map_redis_error)?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: Pool<RedisConnectionManager>) -> Self {
        Self { pool }
    }

    async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, RedisConnectionManager>, OrderCacheError> {
        self.pool.get().await.map_err(map_run_error)
    }
}

fn map_redis_error(error: RedisError) -> OrderCacheError {
    OrderCacheError::backend(error.to_string())
}

/// Interpret a `GET` reply; anything but a bulk string or nil is rejected.
fn decode_payload(reply: redis::Value) -> Result<Option<Vec<u8>>, OrderCacheError> {
    match reply {
        redis::Value::Nil => Ok(None),
        redis::Value::BulkString(bytes) => Ok(Some(bytes)),
        other => Err(OrderCacheError::serialization(format!(
            "unexpected reply to GET: {other:?}"
        ))),
    }
}

/// Interpret a `SCAN` reply: a cursor (sent as a bulk string) and a key array.
fn decode_scan_reply(reply: &redis::Value) -> Result<(u64, Vec<String>), OrderCacheError> {
    let malformed = || OrderCacheError::serialization(format!("unexpected reply to SCAN: {reply:?}"));
    let redis::Value::Array(parts) = reply else {
        return Err(malformed());
    };
    let [cursor, redis::Value::Array(keys)] = parts.as_slice() else {
        return Err(malformed());
    };
    let next = match cursor {
        redis::Value::BulkString(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|text| text.parse::<u64>().ok())
            .ok_or_else(malformed)?,
        redis::Value::Int(value) => u64::try_from(*value).map_err(|_| malformed())?,
        _ => return Err(malformed()),
    };
    let keys = keys
        .iter()
        .map(|key| match key {
            redis::Value::BulkString(bytes) => String::from_utf8(bytes.clone()).map_err(|_| malformed()),
            _ => Err(malformed()),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((next, keys))
}

/// Interpret a `DEL` reply as the number of keys removed.
fn decode_deleted(reply: &redis::Value) -> Result<u64, OrderCacheError> {
    match reply {
        redis::Value::Int(removed) => u64::try_from(*removed).map_err(|_| {
            OrderCacheError::serialization(format!("negative reply to DEL: {removed}"))
        }),
        other => Err(OrderCacheError::serialization(format!(
            "unexpected reply to DEL: {other:?}"
        ))),
    }
}

fn map_run_error(error: RunError<RedisError>) -> OrderCacheError {
    match error {
        RunError::User(inner) => map_redis_error(inner),
        RunError::TimedOut => OrderCacheError::backend("timed out waiting for a redis connection"),
    }
}

/// Build the `SET` command, appending `EX` only for expiring entries.
fn set_command(key: &OrderCacheKey, payload: &[u8], ttl: CacheTtl) -> redis::Cmd {
    let mut cmd = redis::cmd("SET");
    cmd.arg(key.as_str()).arg(payload);
    if let Some(seconds) = ttl.as_seconds() {
        cmd.arg("EX").arg(seconds);
    }
    cmd
}

fn scan_command(pattern: &str, cursor: ScanCursor) -> redis::Cmd {
    let mut cmd = redis::cmd("SCAN");
    cmd.arg(cursor.get())
        .arg("MATCH")
        .arg(pattern)
        .arg("COUNT")
        .arg(SCAN_COUNT);
    cmd
}

#[async_trait]
impl OrderCache for RedisOrderCache {
    async fn get(&self, key: &OrderCacheKey) -> Result<Option<Vec<u8>>, OrderCacheError> {
        let mut conn = self.connection().await?;
        let reply: redis::Value = redis::cmd("GET")
            .arg(key.as_str())
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)?;
        decode_payload(reply)
    }

    async fn set(
        &self,
        key: &OrderCacheKey,
        payload: &[u8],
        ttl: CacheTtl,
    ) -> Result<(), OrderCacheError> {
        let mut conn = self.connection().await?;
        let _: () = set_command(key, payload, ttl)
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }

    async fn scan_prefix(
        &self,
        pattern: &str,
        cursor: ScanCursor,
    ) -> Result<ScanPage, OrderCacheError> {
        let mut conn = self.connection().await?;
        let reply: redis::Value = scan_command(pattern, cursor)
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)?;
        let (next, keys) = decode_scan_reply(&reply)?;
        debug!(pattern, cursor = cursor.get(), next, found = keys.len(), "scanned redis keys");
        Ok(ScanPage {
            keys,
            next: (next != 0).then(|| ScanCursor::new(next)),
        })
    }

    async fn delete_many(&self, keys: &[String]) -> Result<u64, OrderCacheError> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.connection().await?;
        let reply: redis::Value = redis::cmd("DEL")
            .arg(keys)
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)?;
        decode_deleted(&reply)
    }
}

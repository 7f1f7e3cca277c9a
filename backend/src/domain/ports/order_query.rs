//! Driving port for the order read endpoints.
//!
//! HTTP handlers depend on this port only. Implementations hand back the
//! already-serialised JSON body so a cache hit can be written to the client
//! without decoding.

use async_trait::async_trait;

use crate::domain::{Error, OrderId};

/// Where a payload was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadSource {
    /// Served verbatim from the cache.
    Cache,
    /// Fetched from the store and serialised for this request.
    Store,
}

/// Serialised JSON body for one order read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPayload {
    bytes: Vec<u8>,
    source: PayloadSource,
}

impl OrderPayload {
    /// Wrap bytes returned by a cache hit.
    pub fn from_cache(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            source: PayloadSource::Cache,
        }
    }

    /// Wrap bytes serialised after a store fetch.
    pub fn from_store(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            source: PayloadSource::Store,
        }
    }

    /// Borrow the JSON body.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the payload, yielding the JSON body.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Where the payload came from.
    pub fn source(&self) -> PayloadSource {
        self.source
    }
}

/// Domain use-case port for reading orders.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderQuery: Send + Sync {
    /// Serialised order aggregate (order, user, address, products).
    async fn full_order(&self, order_id: OrderId) -> Result<OrderPayload, Error>;

    /// Serialised order row alone.
    async fn lite_order(&self, order_id: OrderId) -> Result<OrderPayload, Error>;
}

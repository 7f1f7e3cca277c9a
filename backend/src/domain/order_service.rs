//! Cache-aside order reads.
//!
//! Each read checks the cache under a shape-specific key, falls back to the
//! repository on a miss, serialises the record, and writes it back. A cache
//! backend failure on read takes the same path as a miss; a failure on write
//! is logged and dropped. Neither ever reaches the caller.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::ports::{
    CacheNamespace, CacheTtl, OrderCache, OrderPayload, OrderQuery, OrderRepository,
    OrderRepositoryError,
};
use crate::domain::{Error, OrderId, OrderShape};

/// Message returned when no order matches the requested id.
pub const ORDER_NOT_FOUND_MESSAGE: &str = "No orders found";

/// Order read service implementing the [`OrderQuery`] driving port.
#[derive(Clone)]
pub struct CacheAsideOrderService<R, C> {
    repository: Arc<R>,
    cache: Arc<C>,
    namespace: CacheNamespace,
    ttl: CacheTtl,
}

impl<R, C> CacheAsideOrderService<R, C> {
    /// Create a service reading through `cache` into `repository`.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use backend::domain::CacheAsideOrderService;
    /// use backend::domain::ports::{CacheNamespace, CacheTtl};
    /// use backend::outbound::cache::InMemoryOrderCache;
    /// # fn repository() -> Arc<backend::outbound::persistence::DieselOrderRepository> { unimplemented!() }
    ///
    /// let namespace = CacheNamespace::for_app("app").expect("valid namespace");
    /// let service = CacheAsideOrderService::new(
    ///     repository(),
    ///     Arc::new(InMemoryOrderCache::default()),
    ///     namespace,
    ///     CacheTtl::from_seconds(60),
    /// );
    /// ```
    pub fn new(repository: Arc<R>, cache: Arc<C>, namespace: CacheNamespace, ttl: CacheTtl) -> Self {
        Self {
            repository,
            cache,
            namespace,
            ttl,
        }
    }

    /// Namespace used to compose cache keys.
    pub fn namespace(&self) -> &CacheNamespace {
        &self.namespace
    }
}

impl<R, C> CacheAsideOrderService<R, C>
where
    R: OrderRepository,
    C: OrderCache,
{
    fn map_repository_error(error: OrderRepositoryError) -> Error {
        match error {
            OrderRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("order repository unavailable: {message}"))
            }
            OrderRepositoryError::Query { message } => {
                Error::internal(format!("order repository error: {message}"))
            }
        }
    }

    fn serialize_record<T: Serialize>(record: &T) -> Result<Vec<u8>, Error> {
        serde_json::to_vec(record)
            .map_err(|err| Error::internal(format!("failed to serialize order payload: {err}")))
    }

    async fn read_through<T, F, Fut>(
        &self,
        shape: OrderShape,
        order_id: OrderId,
        fetch: F,
    ) -> Result<OrderPayload, Error>
    where
        T: Serialize + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<Option<T>, OrderRepositoryError>> + Send,
    {
        let key = self.namespace.key_for(shape, order_id);

        match self.cache.get(&key).await {
            Ok(Some(bytes)) => {
                debug!(%key, "order cache hit");
                return Ok(OrderPayload::from_cache(bytes));
            }
            Ok(None) => debug!(%key, "order cache miss"),
            Err(error) => warn!(%error, %key, "order cache read failed; reading from store"),
        }

        let record = fetch()
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found(ORDER_NOT_FOUND_MESSAGE))?;
        let bytes = Self::serialize_record(&record)?;

        if let Err(error) = self.cache.set(&key, &bytes, self.ttl).await {
            warn!(%error, %key, "order cache write failed; serving uncached payload");
        }

        Ok(OrderPayload::from_store(bytes))
    }
}

#[async_trait]
impl<R, C> OrderQuery for CacheAsideOrderService<R, C>
where
    R: OrderRepository,
    C: OrderCache,
{
    async fn full_order(&self, order_id: OrderId) -> Result<OrderPayload, Error> {
        self.read_through(OrderShape::Full, order_id, || {
            self.repository.fetch_full(order_id)
        })
        .await
    }

    async fn lite_order(&self, order_id: OrderId) -> Result<OrderPayload, Error> {
        self.read_through(OrderShape::Lite, order_id, || {
            self.repository.fetch_lite(order_id)
        })
        .await
    }
}

#[cfg(test)]
#[path = "order_service_tests.rs"]
mod tests;

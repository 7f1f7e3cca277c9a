//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod cache_key;
mod order_cache;
mod order_query;
mod order_repository;

pub use cache_key::{CacheNamespace, CacheNamespaceValidationError, OrderCacheKey};
#[cfg(test)]
pub use order_cache::MockOrderCache;
pub use order_cache::{CacheTtl, OrderCache, OrderCacheError, ScanCursor, ScanPage};
#[cfg(test)]
pub use order_query::MockOrderQuery;
pub use order_query::{OrderPayload, OrderQuery, PayloadSource};
#[cfg(test)]
pub use order_repository::MockOrderRepository;
pub use order_repository::{OrderRepository, OrderRepositoryError};

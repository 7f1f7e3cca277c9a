//! Startup sequence: pools, optional migrations, cache sweep, service wiring.
//!
//! Every step runs before the HTTP server binds. A failure in any step is a
//! [`StartupError`] and stops the process.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::{
    CacheNamespaceValidationError, OrderCache, OrderCacheError, OrderQuery, OrderRepository,
};
use crate::domain::{CacheAsideOrderService, CacheInvalidationError, NamespaceInvalidator};
use crate::outbound::cache::{RedisOrderCache, RedisPoolConfig};
use crate::outbound::persistence::{
    DbPool, DieselOrderRepository, MigrationError, PoolConfig, PoolError, run_pending_migrations,
};
use crate::server::ServerConfig;
use crate::settings::OrdersSettings;

/// Failures that abort startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to load settings: {message}")]
    Settings { message: String },
    #[error("invalid cache namespace: {0}")]
    Namespace(#[from] CacheNamespaceValidationError),
    #[error(transparent)]
    DatabasePool(#[from] PoolError),
    #[error(transparent)]
    Migrations(#[from] MigrationError),
    #[error("failed to create cache pool: {0}")]
    CachePool(#[source] OrderCacheError),
    #[error("startup cache invalidation failed: {0}")]
    Invalidation(#[from] CacheInvalidationError),
}

impl From<StartupError> for std::io::Error {
    fn from(error: StartupError) -> Self {
        std::io::Error::other(error)
    }
}

/// Build an order query over `cache`, after clearing its namespace.
///
/// # Errors
///
/// Fails when the namespace cannot be derived or the sweep fails.
pub async fn wire_order_query<R, C>(
    settings: &OrdersSettings,
    repository: Arc<R>,
    cache: Arc<C>,
) -> Result<Arc<dyn OrderQuery>, StartupError>
where
    R: OrderRepository + 'static,
    C: OrderCache + 'static,
{
    let namespace = settings.cache_namespace()?;
    let report = NamespaceInvalidator::new(cache.clone())
        .invalidate(&namespace)
        .await?;
    info!(
        namespace = %namespace,
        scanned = report.scanned,
        foreign = report.foreign,
        deleted = report.deleted,
        batches = report.batches,
        "startup cache invalidation complete"
    );

    Ok(Arc::new(CacheAsideOrderService::new(
        repository,
        cache,
        namespace,
        settings.cache_ttl(),
    )))
}

/// Run the full production startup sequence and return the server config.
///
/// # Errors
///
/// Returns the first failing step as a [`StartupError`].
pub async fn bootstrap(settings: &OrdersSettings) -> Result<ServerConfig, StartupError> {
    let database_url = settings.database_url();

    let pool = DbPool::new(PoolConfig::new(database_url.as_str())).await?;
    info!("database pool ready");

    if settings.run_migrations {
        run_pending_migrations(&database_url).await?;
    }

    let cache = RedisOrderCache::connect(RedisPoolConfig::new(settings.redis_url()))
        .await
        .map_err(StartupError::CachePool)?;
    info!("cache pool ready");

    let repository = Arc::new(DieselOrderRepository::new(pool));
    let orders = wire_order_query(settings, repository, Arc::new(cache)).await?;

    Ok(ServerConfig::new(settings.bind_addr(), orders))
}

//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Provides the `OrderRepository` implementation backed by `diesel-async`
//! with `bb8` pooling, plus the embedded schema migrations.
//!
//! - **Thin adapters**: the repository only translates rows into domain
//!   records. No caching or HTTP concerns reside here.
//! - **Internal models**: row structs (`models.rs`) never leave this module.
//! - **Strongly typed errors**: pool and Diesel failures map to
//!   `OrderRepositoryError`.
//!
//! # Example
//!
//! ```no_run
//! use backend::outbound::persistence::{DbPool, DieselOrderRepository, PoolConfig};
//!
//! # async fn build() -> Result<(), backend::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/perf_test")).await?;
//! let repository = DieselOrderRepository::new(pool);
//! # Ok(())
//! # }
//! ```

mod diesel_order_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;

pub use diesel_order_repository::DieselOrderRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

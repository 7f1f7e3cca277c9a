//! Order cache adapters.
//!
//! - [`RedisOrderCache`]: production adapter over a `bb8-redis` pool.
//! - [`InMemoryOrderCache`]: process-local adapter with clock-driven expiry,
//!   used by tests and local runs without Redis.

mod in_memory;
mod redis;

pub use in_memory::{DEFAULT_PAGE_SIZE, InMemoryOrderCache};
pub use redis::{RedisOrderCache, RedisPoolConfig, SCAN_COUNT};

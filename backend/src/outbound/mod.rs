//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL order reads using Diesel
//! - **cache**: Redis and in-memory order payload caches
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no read-through or invalidation policy.

pub mod cache;
pub mod persistence;

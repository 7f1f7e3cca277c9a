//! Domain primitives, order read services, and the ports they depend on.
//!
//! Purpose: keep order reads transport and storage agnostic. Inbound adapters
//! call the [`ports::OrderQuery`] driving port; outbound adapters implement
//! [`ports::OrderRepository`] and [`ports::OrderCache`].
//!
//! Public surface:
//! - Error / ErrorCode: transport agnostic failure payload.
//! - TraceId: request-scoped correlation identifier.
//! - Order, OrderResponse and friends: serialised order shapes.
//! - CacheAsideOrderService: read-through order service.
//! - NamespaceInvalidator: startup cache sweep.

pub mod cache_invalidation;
pub mod error;
pub mod order;
pub mod order_service;
pub mod ports;
pub mod trace_id;

pub use self::cache_invalidation::{
    CacheInvalidationError, INVALIDATION_BATCH_SIZE, InvalidationReport, NamespaceInvalidator,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::order::{
    Address, Order, OrderId, OrderIdValidationError, OrderItem, OrderResponse, OrderShape, User,
    format_timestamp,
};
pub use self::order_service::{CacheAsideOrderService, ORDER_NOT_FOUND_MESSAGE};
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use backend::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<()> {
///     Err(Error::not_found("No orders found"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;

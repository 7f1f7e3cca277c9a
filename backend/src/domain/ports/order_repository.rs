//! Port abstraction for the relational order store.
//!
//! `Ok(None)` is the only "order does not exist" signal. Because the full read
//! is driven by an inner join over order items, an order that exists with no
//! items is reported the same way as a missing order.
use async_trait::async_trait;

use crate::domain::{Order, OrderId, OrderResponse};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by order repository adapters.
    pub enum OrderRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "order repository connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } => "order repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Fetch the order with its user, address, and line items.
    async fn fetch_full(
        &self,
        order_id: OrderId,
    ) -> Result<Option<OrderResponse>, OrderRepositoryError>;

    /// Fetch the order row alone.
    async fn fetch_lite(&self, order_id: OrderId) -> Result<Option<Order>, OrderRepositoryError>;
}

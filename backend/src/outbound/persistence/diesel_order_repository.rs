//! PostgreSQL-backed `OrderRepository` implementation using Diesel ORM.
//!
//! The full read is one inner join across orders, users, addresses, order
//! items, and products; the rows are folded into a single aggregate. The lite
//! read touches the `orders` table only.

use async_trait::async_trait;
use diesel::OptionalExtension;
use diesel::sql_query;
use diesel::sql_types::Integer;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{OrderRepository, OrderRepositoryError};
use crate::domain::{Order, OrderId, OrderResponse};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{OrderLineRow, OrderRow};
use super::pool::DbPool;

const FULL_ORDER_SQL: &str = r#"
SELECT
    o.id AS order_id,
    o.user_id AS order_user_id,
    o.address_id AS order_address_id,
    o.quantity AS order_quantity,
    o.status AS order_status,
    o.total::float8 AS order_total,
    o.created_at AS order_created_at,
    u.id AS user_id,
    u.email AS user_email,
    u.full_name AS user_full_name,
    u.created_at AS user_created_at,
    a.id AS address_id,
    a.user_id AS address_user_id,
    a.line1 AS address_line1,
    a.line2 AS address_line2,
    a.city AS address_city,
    a.state AS address_state,
    a.postal_code AS address_postal_code,
    a.created_at AS address_created_at,
    oi.id AS item_id,
    oi.product_id AS item_product_id,
    oi.quantity AS item_quantity,
    oi.unit_price::float8 AS item_unit_price,
    p.name AS product_name,
    p.sku AS product_sku,
    p.price::float8 AS product_price
FROM orders o
JOIN users u ON o.user_id = u.id
JOIN addresses a ON o.address_id = a.id
JOIN order_items oi ON oi.order_id = o.id
JOIN products p ON oi.product_id = p.id
WHERE o.id = $1
ORDER BY oi.id
"#;

const LITE_ORDER_SQL: &str = r#"
SELECT id, user_id, address_id, quantity, status, total::float8 AS total, created_at
FROM orders
WHERE id = $1
"#;

/// Diesel-backed implementation of the order repository port.
#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Fold join rows into one aggregate.
///
/// The first row seeds the order, user, and address; every row contributes
/// exactly one item. No rows means no aggregate.
pub(crate) fn fold_order_rows(rows: Vec<OrderLineRow>) -> Option<OrderResponse> {
    let mut rows = rows.into_iter();
    let first = rows.next()?;
    let mut response = OrderResponse {
        order: first.order(),
        user: first.user(),
        address: first.address(),
        products: vec![first.item()],
    };
    response.products.extend(rows.map(|row| row.item()));
    Some(response)
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn fetch_full(
        &self,
        order_id: OrderId,
    ) -> Result<Option<OrderResponse>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<OrderLineRow> = sql_query(FULL_ORDER_SQL)
            .bind::<Integer, _>(order_id.get())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "full order read"))?;

        debug!(%order_id, rows = rows.len(), "loaded order join rows");
        Ok(fold_order_rows(rows))
    }

    async fn fetch_lite(&self, order_id: OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<OrderRow> = sql_query(LITE_ORDER_SQL)
            .bind::<Integer, _>(order_id.get())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "lite order read"))?;

        Ok(row.map(Order::from))
    }
}

//! Internal Diesel row structs for the order read queries.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Money columns are cast to `float8` in SQL
//! so they load as `f64`.

use chrono::{DateTime, Utc};
use diesel::QueryableByName;
use diesel::sql_types::{Double, Integer, Nullable, Text, Timestamptz};

use crate::domain::{Address, Order, OrderItem, User, format_timestamp};

/// Row read from the `orders` table alone.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct OrderRow {
    #[diesel(sql_type = Integer)]
    pub id: i32,
    #[diesel(sql_type = Integer)]
    pub user_id: i32,
    #[diesel(sql_type = Integer)]
    pub address_id: i32,
    #[diesel(sql_type = Integer)]
    pub quantity: i32,
    #[diesel(sql_type = Text)]
    pub status: String,
    #[diesel(sql_type = Double)]
    pub total: f64,
    #[diesel(sql_type = Timestamptz)]
    pub created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            address_id: row.address_id,
            quantity: row.quantity,
            status: row.status,
            total: row.total,
            created_at: format_timestamp(row.created_at),
        }
    }
}

/// One row of the order/user/address/item/product join.
///
/// Every row repeats the order, user, and address columns; only the item and
/// product columns vary.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct OrderLineRow {
    #[diesel(sql_type = Integer)]
    pub order_id: i32,
    #[diesel(sql_type = Integer)]
    pub order_user_id: i32,
    #[diesel(sql_type = Integer)]
    pub order_address_id: i32,
    #[diesel(sql_type = Integer)]
    pub order_quantity: i32,
    #[diesel(sql_type = Text)]
    pub order_status: String,
    #[diesel(sql_type = Double)]
    pub order_total: f64,
    #[diesel(sql_type = Timestamptz)]
    pub order_created_at: DateTime<Utc>,

    #[diesel(sql_type = Integer)]
    pub user_id: i32,
    #[diesel(sql_type = Text)]
    pub user_email: String,
    #[diesel(sql_type = Text)]
    pub user_full_name: String,
    #[diesel(sql_type = Timestamptz)]
    pub user_created_at: DateTime<Utc>,

    #[diesel(sql_type = Integer)]
    pub address_id: i32,
    #[diesel(sql_type = Integer)]
    pub address_user_id: i32,
    #[diesel(sql_type = Text)]
    pub address_line1: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub address_line2: Option<String>,
    #[diesel(sql_type = Text)]
    pub address_city: String,
    #[diesel(sql_type = Text)]
    pub address_state: String,
    #[diesel(sql_type = Text)]
    pub address_postal_code: String,
    #[diesel(sql_type = Timestamptz)]
    pub address_created_at: DateTime<Utc>,

    #[diesel(sql_type = Integer)]
    pub item_id: i32,
    #[diesel(sql_type = Integer)]
    pub item_product_id: i32,
    #[diesel(sql_type = Integer)]
    pub item_quantity: i32,
    #[diesel(sql_type = Double)]
    pub item_unit_price: f64,
    #[diesel(sql_type = Text)]
    pub product_name: String,
    #[diesel(sql_type = Text)]
    pub product_sku: String,
    #[diesel(sql_type = Double)]
    pub product_price: f64,
}

impl OrderLineRow {
    pub(crate) fn order(&self) -> Order {
        Order {
            id: self.order_id,
            user_id: self.order_user_id,
            address_id: self.order_address_id,
            quantity: self.order_quantity,
            status: self.order_status.clone(),
            total: self.order_total,
            created_at: format_timestamp(self.order_created_at),
        }
    }

    pub(crate) fn user(&self) -> User {
        User {
            id: self.user_id,
            email: self.user_email.clone(),
            full_name: self.user_full_name.clone(),
            created_at: format_timestamp(self.user_created_at),
        }
    }

    pub(crate) fn address(&self) -> Address {
        Address {
            id: self.address_id,
            user_id: self.address_user_id,
            line1: self.address_line1.clone(),
            line2: self.address_line2.clone(),
            city: self.address_city.clone(),
            state: self.address_state.clone(),
            postal_code: self.address_postal_code.clone(),
            created_at: format_timestamp(self.address_created_at),
        }
    }

    pub(crate) fn item(&self) -> OrderItem {
        OrderItem {
            order_item_id: self.item_id,
            product_id: self.item_product_id,
            name: self.product_name.clone(),
            sku: self.product_sku.clone(),
            price: self.product_price,
            quantity: self.item_quantity,
            unit_price: self.item_unit_price,
        }
    }
}

//! Order read models served by the order endpoints.
//!
//! Records are immutable snapshots assembled by the persistence adapter and
//! serialised once into the cached JSON payload. Field names are snake_case
//! on the wire; `created_at` values are pre-formatted strings produced by
//! [`format_timestamp`] so the payload does not depend on the store's native
//! timestamp representation.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Render a store timestamp as RFC 3339 with nanosecond precision.
///
/// # Examples
/// ```
/// use backend::domain::format_timestamp;
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.with_ymd_and_hms(2026, 1, 27, 0, 1, 0).single().expect("valid");
/// assert_eq!(format_timestamp(at), "2026-01-27T00:01:00.000000000Z");
/// ```
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Validated order identifier (a positive 32-bit integer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderId(i32);

/// Validation errors raised when parsing an [`OrderId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderIdValidationError {
    /// The input is not a base-10 32-bit integer.
    #[error("order id must be an integer")]
    NotANumber,
    /// The input is zero or negative.
    #[error("order id must be positive")]
    NotPositive,
}

impl OrderId {
    /// Construct an identifier, rejecting zero and negative values.
    pub fn new(value: i32) -> Result<Self, OrderIdValidationError> {
        if value <= 0 {
            return Err(OrderIdValidationError::NotPositive);
        }
        Ok(Self(value))
    }

    /// Raw integer value as stored in the database.
    pub fn get(self) -> i32 {
        self.0
    }
}

impl FromStr for OrderId {
    type Err = OrderIdValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .parse::<i32>()
            .map_err(|_| OrderIdValidationError::NotANumber)?;
        Self::new(value)
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Representation served for an order read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderShape {
    /// Order with user, address, and line items.
    Full,
    /// Order row alone.
    Lite,
}

impl OrderShape {
    /// Segment used when composing cache keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Lite => "lite",
        }
    }
}

impl std::fmt::Display for OrderShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order header row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    #[schema(example = 42)]
    pub id: i32,
    pub user_id: i32,
    pub address_id: i32,
    pub quantity: i32,
    #[schema(example = "pending")]
    pub status: String,
    #[schema(example = 199.98)]
    pub total: f64,
    #[schema(example = "2026-01-27T00:01:00.000000000Z")]
    pub created_at: String,
}

/// Customer who placed the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    pub created_at: String,
}

/// Delivery address attached to the order.
///
/// `line2` distinguishes an absent second line (`null`) from an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Address {
    pub id: i32,
    pub user_id: i32,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub created_at: String,
}

/// One order line joined with its catalogue product.
///
/// `price` is the catalogue price seen by the join; `unit_price` is what the
/// order was charged and may differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub order_item_id: i32,
    pub product_id: i32,
    pub name: String,
    pub sku: String,
    pub price: f64,
    pub quantity: i32,
    pub unit_price: f64,
}

/// Aggregate served by the full order endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub order: Order,
    pub user: User,
    pub address: Address,
    pub products: Vec<OrderItem>,
}

//! Test utilities for the backend crate.
//!
//! Shared by unit tests in `src/` and integration tests in `tests/`. Only
//! compiled for tests or with the `test-support` feature.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{
    CacheTtl, OrderCache, OrderCacheError, OrderCacheKey, OrderRepository, OrderRepositoryError,
    ScanCursor, ScanPage,
};
use crate::domain::{
    Address, Order, OrderId, OrderItem, OrderResponse, User, format_timestamp,
};
use crate::outbound::cache::InMemoryOrderCache;

/// Clock whose time only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

fn fixture_timestamp() -> String {
    match Utc.timestamp_opt(1_769_472_060, 123_456_789).single() {
        Some(at) => format_timestamp(at),
        None => panic!("fixture timestamp out of range"),
    }
}

/// Order row for `id` owned by user 1 at address 1.
pub fn sample_order(id: i32) -> Order {
    Order {
        id,
        user_id: 1,
        address_id: 1,
        quantity: 2,
        status: "pending".to_owned(),
        total: 59.98,
        created_at: fixture_timestamp(),
    }
}

/// Full aggregate for `id` with `items` line items.
pub fn sample_order_response(id: i32, items: usize) -> OrderResponse {
    let created_at = fixture_timestamp();
    let products = (1..=items)
        .map(|n| {
            let n = i32::try_from(n).unwrap_or(i32::MAX);
            OrderItem {
                order_item_id: id * 100 + n,
                product_id: n,
                name: format!("Product {n}"),
                sku: format!("SKU-{n:04}"),
                price: 29.99,
                quantity: 1,
                unit_price: 29.99,
            }
        })
        .collect();

    OrderResponse {
        order: sample_order(id),
        user: User {
            id: 1,
            email: "ada@example.com".to_owned(),
            full_name: "Ada Lovelace".to_owned(),
            created_at: created_at.clone(),
        },
        address: Address {
            id: 1,
            user_id: 1,
            line1: "12 Engine Street".to_owned(),
            line2: None,
            city: "London".to_owned(),
            state: "LDN".to_owned(),
            postal_code: "EC1A 1BB".to_owned(),
            created_at,
        },
        products,
    }
}

/// In-memory order repository counting every read.
///
/// Orders inserted with no items mirror the inner-join behaviour of the
/// PostgreSQL adapter: the lite read finds them, the full read does not.
#[derive(Default)]
pub struct StaticOrderRepository {
    orders: HashMap<i32, OrderResponse>,
    full_reads: AtomicUsize,
    lite_reads: AtomicUsize,
    failure: Mutex<Option<OrderRepositoryError>>,
}

impl StaticOrderRepository {
    pub fn with_orders(orders: impl IntoIterator<Item = OrderResponse>) -> Self {
        Self {
            orders: orders
                .into_iter()
                .map(|order| (order.order.id, order))
                .collect(),
            ..Self::default()
        }
    }

    /// Make every subsequent read fail with `error`.
    pub fn fail_with(&self, error: OrderRepositoryError) {
        if let Ok(mut slot) = self.failure.lock() {
            *slot = Some(error);
        }
    }

    pub fn full_reads(&self) -> usize {
        self.full_reads.load(Ordering::SeqCst)
    }

    pub fn lite_reads(&self) -> usize {
        self.lite_reads.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<(), OrderRepositoryError> {
        match self.failure.lock() {
            Ok(slot) => slot.clone().map_or(Ok(()), Err),
            Err(_) => Err(OrderRepositoryError::query("failure slot poisoned")),
        }
    }
}

#[async_trait]
impl OrderRepository for StaticOrderRepository {
    async fn fetch_full(
        &self,
        order_id: OrderId,
    ) -> Result<Option<OrderResponse>, OrderRepositoryError> {
        self.full_reads.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self
            .orders
            .get(&order_id.get())
            .filter(|order| !order.products.is_empty())
            .cloned())
    }

    async fn fetch_lite(&self, order_id: OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        self.lite_reads.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self
            .orders
            .get(&order_id.get())
            .map(|order| order.order.clone()))
    }
}

/// Cache double delegating to [`InMemoryOrderCache`] with switchable faults.
pub struct FlakyOrderCache {
    inner: InMemoryOrderCache,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FlakyOrderCache {
    pub fn new(inner: InMemoryOrderCache) -> Self {
        Self {
            inner,
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn fail_reads(&self, enabled: bool) {
        self.fail_reads.store(enabled, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, enabled: bool) {
        self.fail_writes.store(enabled, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &InMemoryOrderCache {
        &self.inner
    }
}

#[async_trait]
impl OrderCache for FlakyOrderCache {
    async fn get(&self, key: &OrderCacheKey) -> Result<Option<Vec<u8>>, OrderCacheError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(OrderCacheError::backend("injected read failure"));
        }
        self.inner.get(key).await
    }

    async fn set(
        &self,
        key: &OrderCacheKey,
        payload: &[u8],
        ttl: CacheTtl,
    ) -> Result<(), OrderCacheError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(OrderCacheError::backend("injected write failure"));
        }
        self.inner.set(key, payload, ttl).await
    }

    async fn scan_prefix(
        &self,
        pattern: &str,
        cursor: ScanCursor,
    ) -> Result<ScanPage, OrderCacheError> {
        self.inner.scan_prefix(pattern, cursor).await
    }

    async fn delete_many(&self, keys: &[String]) -> Result<u64, OrderCacheError> {
        self.inner.delete_many(keys).await
    }
}

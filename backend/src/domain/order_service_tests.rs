//! Tests for the cache-aside order service.

use std::sync::Arc;

use mockall::predicate::{always, eq};
use rstest::{fixture, rstest};
use serde_json::Value;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockOrderCache, MockOrderRepository, OrderCacheError, PayloadSource};
use crate::test_support::{sample_order, sample_order_response};

const NAMESPACE: &str = "orders:test";

#[fixture]
fn order_id() -> OrderId {
    OrderId::new(42).expect("positive id")
}

fn namespace() -> CacheNamespace {
    CacheNamespace::new(NAMESPACE).expect("valid namespace")
}

fn make_service(
    repository: MockOrderRepository,
    cache: MockOrderCache,
    ttl: CacheTtl,
) -> CacheAsideOrderService<MockOrderRepository, MockOrderCache> {
    CacheAsideOrderService::new(Arc::new(repository), Arc::new(cache), namespace(), ttl)
}

#[rstest]
#[tokio::test]
async fn cache_hit_returns_bytes_verbatim_without_store_access(order_id: OrderId) {
    let cached = br#"{"cached":true}"#.to_vec();
    let returned = cached.clone();
    let mut cache = MockOrderCache::new();
    cache
        .expect_get()
        .withf(|key| key.as_str() == "orders:test:full:42")
        .times(1)
        .return_once(move |_| Ok(Some(returned)));
    cache.expect_set().never();
    let mut repository = MockOrderRepository::new();
    repository.expect_fetch_full().never();

    let service = make_service(repository, cache, CacheTtl::Persistent);
    let payload = service.full_order(order_id).await.expect("cache hit");

    assert_eq!(payload.as_bytes(), cached.as_slice());
    assert_eq!(payload.source(), PayloadSource::Cache);
}

#[rstest]
#[tokio::test]
async fn cache_miss_fetches_serialises_and_writes_back(order_id: OrderId) {
    let response = sample_order_response(42, 2);
    let expected = serde_json::to_vec(&response).expect("serialises");
    let expected_written = expected.clone();
    let mut cache = MockOrderCache::new();
    cache.expect_get().times(1).return_once(|_| Ok(None));
    cache
        .expect_set()
        .withf(move |key, payload, ttl| {
            key.as_str() == "orders:test:full:42"
                && payload == expected_written.as_slice()
                && *ttl == CacheTtl::Seconds(30)
        })
        .times(1)
        .return_once(|_, _, _| Ok(()));
    let mut repository = MockOrderRepository::new();
    repository
        .expect_fetch_full()
        .with(eq(order_id))
        .times(1)
        .return_once(move |_| Ok(Some(response)));

    let service = make_service(repository, cache, CacheTtl::Seconds(30));
    let payload = service.full_order(order_id).await.expect("store read");

    assert_eq!(payload.as_bytes(), expected.as_slice());
    assert_eq!(payload.source(), PayloadSource::Store);
}

#[rstest]
#[tokio::test]
async fn lite_reads_use_the_lite_key(order_id: OrderId) {
    let mut cache = MockOrderCache::new();
    cache
        .expect_get()
        .withf(|key| key.as_str() == "orders:test:lite:42")
        .times(1)
        .return_once(|_| Ok(None));
    cache
        .expect_set()
        .withf(|key, _, _| key.as_str() == "orders:test:lite:42")
        .times(1)
        .return_once(|_, _, _| Ok(()));
    let mut repository = MockOrderRepository::new();
    repository.expect_fetch_full().never();
    repository
        .expect_fetch_lite()
        .times(1)
        .return_once(|_| Ok(Some(sample_order(42))));

    let service = make_service(repository, cache, CacheTtl::Persistent);
    let payload = service.lite_order(order_id).await.expect("lite read");

    let body: Value = serde_json::from_slice(payload.as_bytes()).expect("json body");
    assert_eq!(body.get("id").and_then(Value::as_i64), Some(42));
    assert!(body.get("products").is_none());
}

#[rstest]
#[tokio::test]
async fn cache_read_error_falls_through_to_store(order_id: OrderId) {
    let mut cache = MockOrderCache::new();
    cache
        .expect_get()
        .times(1)
        .return_once(|_| Err(OrderCacheError::backend("connection refused")));
    cache.expect_set().times(1).return_once(|_, _, _| Ok(()));
    let mut repository = MockOrderRepository::new();
    repository
        .expect_fetch_lite()
        .times(1)
        .return_once(|_| Ok(Some(sample_order(42))));

    let service = make_service(repository, cache, CacheTtl::Persistent);
    let payload = service.lite_order(order_id).await.expect("falls back to store");

    assert_eq!(payload.source(), PayloadSource::Store);
}

#[rstest]
#[tokio::test]
async fn cache_write_error_is_not_propagated(order_id: OrderId) {
    let mut cache = MockOrderCache::new();
    cache.expect_get().times(1).return_once(|_| Ok(None));
    cache
        .expect_set()
        .with(always(), always(), always())
        .times(1)
        .return_once(|_, _, _| Err(OrderCacheError::backend("read only replica")));
    let mut repository = MockOrderRepository::new();
    repository
        .expect_fetch_full()
        .times(1)
        .return_once(|_| Ok(Some(sample_order_response(42, 1))));

    let service = make_service(repository, cache, CacheTtl::Persistent);
    let payload = service.full_order(order_id).await.expect("write failure tolerated");

    assert_eq!(payload.source(), PayloadSource::Store);
}

#[rstest]
#[case::full(OrderShape::Full)]
#[case::lite(OrderShape::Lite)]
#[tokio::test]
async fn missing_order_is_not_found_and_not_cached(#[case] shape: OrderShape) {
    let order_id = OrderId::new(9999).expect("positive id");
    let mut cache = MockOrderCache::new();
    cache.expect_get().times(1).return_once(|_| Ok(None));
    cache.expect_set().never();
    let mut repository = MockOrderRepository::new();
    repository.expect_fetch_full().returning(|_| Ok(None));
    repository.expect_fetch_lite().returning(|_| Ok(None));

    let service = make_service(repository, cache, CacheTtl::Persistent);
    let result = match shape {
        OrderShape::Full => service.full_order(order_id).await,
        OrderShape::Lite => service.lite_order(order_id).await,
    };

    let error = result.expect_err("missing order");
    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), ORDER_NOT_FOUND_MESSAGE);
}

#[rstest]
#[case::connection(OrderRepositoryError::connection("pool timed out"), ErrorCode::ServiceUnavailable)]
#[case::query(OrderRepositoryError::query("syntax error"), ErrorCode::InternalError)]
#[tokio::test]
async fn store_failures_surface_as_server_errors(
    order_id: OrderId,
    #[case] failure: OrderRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut cache = MockOrderCache::new();
    cache.expect_get().times(1).return_once(|_| Ok(None));
    cache.expect_set().never();
    let mut repository = MockOrderRepository::new();
    repository
        .expect_fetch_full()
        .times(1)
        .return_once(move |_| Err(failure));

    let service = make_service(repository, cache, CacheTtl::Persistent);
    let error = service.full_order(order_id).await.expect_err("store failure");

    assert_eq!(error.code(), expected);
}

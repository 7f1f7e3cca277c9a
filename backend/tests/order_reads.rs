//! End-to-end order reads through the HTTP app with in-memory adapters.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web};
use backend::domain::ports::{CacheNamespace, CacheTtl, OrderRepositoryError};
use backend::domain::{CacheAsideOrderService, OrderResponse, TRACE_ID_HEADER};
use backend::inbound::http::health::HealthState;
use backend::inbound::http::state::HttpState;
use backend::outbound::cache::InMemoryOrderCache;
use backend::server::{AppDependencies, build_app};
use backend::test_support::{
    FlakyOrderCache, StaticOrderRepository, sample_order_response,
};
use rstest::{fixture, rstest};
use serde_json::Value;

struct Harness {
    repository: Arc<StaticOrderRepository>,
    cache: Arc<FlakyOrderCache>,
}

impl Harness {
    fn deps(&self) -> AppDependencies {
        let namespace = CacheNamespace::for_app("app").expect("namespace");
        let service = CacheAsideOrderService::new(
            self.repository.clone(),
            self.cache.clone(),
            namespace,
            CacheTtl::Persistent,
        );
        AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: web::Data::new(HttpState::new(Arc::new(service))),
        }
    }

    async fn get(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        let app = test::init_service(build_app(self.deps())).await;
        let response = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = response.status();
        assert!(response.headers().contains_key(TRACE_ID_HEADER));
        let body = test::read_body(response).await;
        (status, body.to_vec())
    }
}

fn with_empty_line2(mut response: OrderResponse) -> OrderResponse {
    response.address.line2 = Some(String::new());
    response
}

#[fixture]
fn harness() -> Harness {
    Harness {
        repository: Arc::new(StaticOrderRepository::with_orders([
            sample_order_response(42, 2),
            sample_order_response(7, 0),
            with_empty_line2(sample_order_response(43, 1)),
        ])),
        cache: Arc::new(FlakyOrderCache::new(InMemoryOrderCache::default())),
    }
}

#[rstest]
#[actix_web::test]
async fn repeated_full_reads_are_byte_identical(harness: Harness) {
    let (first_status, first) = harness.get("/orders/42").await;
    let (second_status, second) = harness.get("/orders/42").await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(harness.repository.full_reads(), 1);
}

#[rstest]
#[actix_web::test]
async fn full_read_returns_the_aggregate(harness: Harness) {
    let (status, body) = harness.get("/orders/42").await;

    assert_eq!(status, StatusCode::OK);
    let response: OrderResponse = serde_json::from_slice(&body).expect("aggregate json");
    assert_eq!(response.order.id, 42);
    assert_eq!(response.products.len(), 2);

    let raw: Value = serde_json::from_slice(&body).expect("json");
    let line2 = raw.pointer("/address/line2").expect("line2 present");
    assert!(line2.is_null());
}

#[rstest]
#[actix_web::test]
async fn empty_second_address_line_is_served_as_empty_string(harness: Harness) {
    let (status, body) = harness.get("/orders/43").await;

    assert_eq!(status, StatusCode::OK);
    let raw: Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(raw.pointer("/address/line2"), Some(&Value::String(String::new())));
}

#[rstest]
#[actix_web::test]
async fn full_and_lite_entries_do_not_collide(harness: Harness) {
    let (_, full) = harness.get("/orders/42").await;
    let (_, lite) = harness.get("/orders/42/lite").await;
    let (_, full_again) = harness.get("/orders/42").await;
    let (_, lite_again) = harness.get("/orders/42/lite").await;

    assert_ne!(full, lite);
    assert_eq!(full, full_again);
    assert_eq!(lite, lite_again);
    let lite_json: Value = serde_json::from_slice(&lite).expect("json");
    assert!(lite_json.get("products").is_none());
    assert_eq!(harness.repository.full_reads(), 1);
    assert_eq!(harness.repository.lite_reads(), 1);
}

#[rstest]
#[case("/orders/9999")]
#[case("/orders/9999/lite")]
#[actix_web::test]
async fn missing_order_is_not_found_on_both_endpoints(harness: Harness, #[case] uri: &str) {
    let (status, body) = harness.get(uri).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(json.get("code").and_then(Value::as_str), Some("not_found"));
    assert_eq!(json.get("message").and_then(Value::as_str), Some("No orders found"));
    assert!(harness.cache.inner().is_empty().expect("len"));
}

#[rstest]
#[actix_web::test]
async fn order_without_items_is_not_found_in_full_shape(harness: Harness) {
    let (full_status, _) = harness.get("/orders/7").await;
    let (lite_status, _) = harness.get("/orders/7/lite").await;

    assert_eq!(full_status, StatusCode::NOT_FOUND);
    assert_eq!(lite_status, StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn cache_read_failure_falls_back_to_store(harness: Harness) {
    harness.get("/orders/42").await;
    harness.cache.fail_reads(true);

    let (status, _) = harness.get("/orders/42").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(harness.repository.full_reads(), 2);
}

#[rstest]
#[actix_web::test]
async fn cache_write_failure_still_serves(harness: Harness) {
    harness.cache.fail_writes(true);

    let (status, body) = harness.get("/orders/42").await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body.is_empty());
    assert!(harness.cache.inner().is_empty().expect("len"));
}

#[rstest]
#[case(OrderRepositoryError::connection("refused"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(OrderRepositoryError::query("bad column"), StatusCode::INTERNAL_SERVER_ERROR)]
#[actix_web::test]
async fn store_failures_are_server_errors(
    harness: Harness,
    #[case] failure: OrderRepositoryError,
    #[case] expected: StatusCode,
) {
    harness.repository.fail_with(failure);

    let (status, body) = harness.get("/orders/42").await;

    assert_eq!(status, expected);
    let text = String::from_utf8(body).expect("utf8");
    assert!(!text.contains("bad column"));
}

#[rstest]
#[case("/orders/abc")]
#[case("/orders/0/lite")]
#[actix_web::test]
async fn malformed_ids_are_bad_requests(harness: Harness, #[case] uri: &str) {
    let (status, _) = harness.get(uri).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(harness.repository.full_reads() + harness.repository.lite_reads(), 0);
}

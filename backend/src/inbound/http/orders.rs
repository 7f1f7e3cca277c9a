//! Order read handlers.
//!
//! ```text
//! GET /orders/42
//! GET /orders/42/lite
//! ```
//!
//! Bodies are written exactly as the order query returns them, so a cache
//! hit is served without decoding.

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get, web};
use tracing::debug;

use crate::domain::ports::OrderPayload;
use crate::domain::{Error, Order, OrderId, OrderResponse};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Message returned for malformed or non-positive order ids.
pub const INVALID_ORDER_ID_MESSAGE: &str = "Invalid order id";

fn parse_order_id(raw: &str) -> Result<OrderId, Error> {
    raw.parse::<OrderId>().map_err(|err| {
        debug!(raw, error = %err, "rejected order id");
        Error::invalid_request(INVALID_ORDER_ID_MESSAGE)
    })
}

fn json_response(payload: OrderPayload) -> HttpResponse {
    debug!(source = ?payload.source(), "serving order payload");
    HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(payload.into_bytes())
}

/// Fetch an order with its user, address, and line items.
#[utoipa::path(
    get,
    path = "/orders/{order_id}",
    params(("order_id" = i32, Path, description = "Positive order identifier")),
    responses(
        (status = 200, description = "Order aggregate", body = OrderResponse),
        (status = 400, description = "Invalid order id", body = Error),
        (status = 404, description = "No orders found", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Order store unavailable", body = Error)
    ),
    tags = ["orders"],
    operation_id = "getOrder"
)]
#[get("/orders/{order_id}")]
pub async fn get_order(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let order_id = parse_order_id(&path.into_inner())?;
    let payload = state.orders.full_order(order_id).await?;
    Ok(json_response(payload))
}

/// Fetch the order row alone.
#[utoipa::path(
    get,
    path = "/orders/{order_id}/lite",
    params(("order_id" = i32, Path, description = "Positive order identifier")),
    responses(
        (status = 200, description = "Order row", body = Order),
        (status = 400, description = "Invalid order id", body = Error),
        (status = 404, description = "No orders found", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Order store unavailable", body = Error)
    ),
    tags = ["orders"],
    operation_id = "getOrderLite"
)]
#[get("/orders/{order_id}/lite")]
pub async fn get_order_lite(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let order_id = parse_order_id(&path.into_inner())?;
    let payload = state.orders.lite_order(order_id).await?;
    Ok(json_response(payload))
}

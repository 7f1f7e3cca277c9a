//! OpenAPI documentation for the order read API.
//!
//! The generated document backs Swagger UI in debug builds and is exported
//! by the `openapi-dump` binary.

use utoipa::OpenApi;

use crate::domain::{Address, Error, ErrorCode, Order, OrderItem, OrderResponse, User};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Orders backend API",
        description = "Cache-aside read access to orders and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::orders::get_order,
        crate::inbound::http::orders::get_order_lite,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        OrderResponse,
        Order,
        User,
        Address,
        OrderItem,
        Error,
        ErrorCode
    )),
    tags(
        (name = "orders", description = "Order reads"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Schema shape checks for the generated document.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_fields(name: &str, fields: &[&str]) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get(name).expect("schema registered") {
            RefOr::T(Schema::Object(obj)) => {
                for field in fields {
                    assert!(
                        obj.properties.contains_key(*field),
                        "{name} schema should have field '{field}'"
                    );
                }
            }
            _ => panic!("expected Object schema for {name}"),
        }
    }

    #[rstest]
    #[case("Error", &["code", "message", "traceId"])]
    #[case("Order", &["id", "user_id", "address_id", "quantity", "status", "total", "created_at"])]
    #[case("OrderResponse", &["order", "user", "address", "products"])]
    #[case("Address", &["line1", "line2", "postal_code"])]
    fn schemas_expose_wire_fields(#[case] name: &str, #[case] fields: &[&str]) {
        assert_object_schema_has_fields(name, fields);
    }

    #[rstest]
    fn order_paths_are_documented() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/orders/{order_id}"));
        assert!(doc.paths.paths.contains_key("/orders/{order_id}/lite"));
        assert!(doc.paths.paths.contains_key("/health/ready"));
    }
}

//! Cache-aside order read service.
//!
//! Orders are read from PostgreSQL through a Redis cache keyed per
//! deployment namespace; the namespace is cleared on every start.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
pub mod settings;
pub mod startup;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;

//! Shared HTTP adapter state.
//!
//! Handlers receive this state via `actix_web::web::Data` so they depend only
//! on the order read port and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::OrderQuery;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub orders: Arc<dyn OrderQuery>,
}

impl HttpState {
    pub fn new(orders: Arc<dyn OrderQuery>) -> Self {
        Self { orders }
    }
}

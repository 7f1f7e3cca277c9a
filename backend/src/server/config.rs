//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::domain::ports::OrderQuery;

/// Everything `create_server` needs beyond the health state.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) orders: Arc<dyn OrderQuery>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, orders: Arc<dyn OrderQuery>) -> Self {
        Self { bind_addr, orders }
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

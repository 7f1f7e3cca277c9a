//! Backend entry-point: loads settings, runs startup, and serves orders.

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::server::create_server;
use backend::settings::{OrdersSettings, ignored_unprefixed_vars};
use backend::startup::{StartupError, bootstrap};

fn init_tracing() {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_tracing();

    let settings = OrdersSettings::load_from_iter(std::env::args_os()).map_err(|err| {
        let error = StartupError::Settings {
            message: err.to_string(),
        };
        error!(%error, "startup aborted");
        std::io::Error::from(error)
    })?;

    for (ignored, expected) in ignored_unprefixed_vars() {
        warn!(ignored, expected, "environment variable is not read; use the ORDERS_ prefixed name");
    }

    let config = bootstrap(&settings).await.map_err(|error| {
        error!(%error, "startup aborted");
        std::io::Error::from(error)
    })?;

    let health_state = web::Data::new(HealthState::new());
    let bind_addr = config.bind_addr();
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "order service listening");

    let result = server.await;
    health_state.mark_unhealthy();
    result
}

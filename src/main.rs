// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process;

use storefront_rust_server::{
    api::router,
    config::{bind_address, DatastoreSource, Environment, EnvironmentInputs, Settings},
    logging::{self, LogFormat},
    state::AppState,
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Snapshot the environment once; everything below reads from it.
    let inputs = EnvironmentInputs::from_process();
    let log_format = LogFormat::from_inputs(&inputs);
    let environment = Environment::from_inputs(&inputs);

    let settings = match Settings::resolve(environment, &inputs) {
        Ok(settings) => settings,
        Err(e) => {
            logging::init("INFO", log_format);
            error!(error = %e, "Invalid configuration, refusing to start");
            process::exit(1);
        }
    };

    logging::init(&settings.log_level, log_format);

    if let Some(requested) = Environment::requested(&inputs) {
        if Environment::parse(requested).is_none() {
            warn!(requested, "Unknown environment name, using production");
        }
    }

    let datastore = &settings.datastore;
    info!(
        environment = %settings.environment,
        datastore = %datastore.redacted_uri(),
        source = ?datastore.source(),
        pool_size = datastore.pool_size(),
        max_overflow = datastore.max_overflow(),
        pool_timeout_seconds = datastore.pool_timeout_seconds(),
        echo = datastore.echo(),
        "Configuration resolved"
    );

    if environment == Environment::Production {
        if datastore.source() == DatastoreSource::LocalFallback {
            warn!("No database configured, production is running on the local sqlite file");
        }
        if settings.uses_default_secret() {
            warn!("SECRET_KEY is not set, using the built-in placeholder");
        }
    }

    let addr = match bind_address(&inputs) {
        Ok(addr) => addr,
        Err(e) => {
            error!(error = %e, "Invalid bind address");
            process::exit(1);
        }
    };

    let app = router(AppState::new(settings));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "Failed to bind");
            process::exit(1);
        }
    };

    info!(%addr, "Storefront API listening (docs at /docs)");

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
        }
        info!("Shutting down");
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
    {
        error!(error = %e, "Server failed");
        process::exit(1);
    }
}

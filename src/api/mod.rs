// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Application factory.
//!
//! Business routes are registered by the services built on top of this
//! shell; here we only mount the health endpoints (at the root and under the
//! configured API prefix), the OpenAPI docs, and the cross-cutting layers.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

pub mod cors;
pub mod health;

fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
}

pub fn router(state: AppState) -> Router {
    let cors = cors::cors_layer(&state.settings.cors);
    let prefix = state.settings.api_prefix.clone();

    let mut app = Router::new()
        .route("/", get(health::index))
        .merge(health_routes());
    if !prefix.is_empty() {
        app = app.nest(&prefix, health_routes());
    }

    app.with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::index,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            health::IndexResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::DatastoreCheck,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::{DatastoreSource, ResolvedDatastoreConfig};
use crate::state::AppState;

/// Banner returned by the root endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct IndexResponse {
    pub status: String,
    pub message: String,
    pub service: String,
}

/// Body of `/health` and `/health/ready`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// `ok`, or `degraded` when the local database directory is absent.
    pub status: String,
    /// Deployment environment the settings were resolved for.
    pub environment: String,
    pub checks: HealthChecks,
}

/// Per-component results.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    /// Always `ok` once the router is serving.
    pub service: String,
    pub datastore: DatastoreCheck,
}

/// What the server was configured to connect to. Never includes credentials.
#[derive(Debug, Serialize, ToSchema)]
pub struct DatastoreCheck {
    /// Which resolution step produced the connection string.
    #[schema(value_type = String, example = "constructed")]
    pub source: DatastoreSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// Local database directory status ("ok" or "missing").
    /// Only present for file-backed sqlite.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_dir: Option<String>,
}

/// Body of `/health/live`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Check that the directory holding a file-backed sqlite database exists.
fn check_instance_dir(datastore: &ResolvedDatastoreConfig) -> Option<String> {
    let path = datastore.sqlite_path()?;
    let dir = path.parent()?;
    if dir.as_os_str().is_empty() || dir.is_dir() {
        Some("ok".to_string())
    } else {
        Some("missing".to_string())
    }
}

/// Root banner, kept for load balancers that probe `/`.
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses(
        (status = 200, description = "Service is running", body = IndexResponse)
    )
)]
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        status: "success".to_string(),
        message: "The Backend is Running!".to_string(),
        service: "Ecommerce API".to_string(),
    })
}

/// Report the resolved environment and datastore. Answers 503 when a
/// file-backed sqlite database has no instance directory to live in.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = ReadyResponse),
        (status = 503, description = "Service is unhealthy", body = ReadyResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let datastore = &state.settings.datastore;
    let instance_dir = check_instance_dir(datastore);
    let all_ok = instance_dir.as_deref().map(|s| s == "ok").unwrap_or(true);

    let response = ReadyResponse {
        status: if all_ok { "ok" } else { "degraded" }.to_string(),
        environment: state.settings.environment.to_string(),
        checks: HealthChecks {
            service: "ok".to_string(),
            datastore: DatastoreCheck {
                source: datastore.source(),
                database: datastore.database_name(),
                instance_dir,
            },
        },
    };

    let status = if all_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

/// 200 while the process can answer at all; touches no configuration.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Same checks as `/health`, under the path orchestrators poll.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadyResponse),
        (status = 503, description = "Service is not ready", body = ReadyResponse)
    )
)]
pub async fn readiness(state: State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    health(state).await
}

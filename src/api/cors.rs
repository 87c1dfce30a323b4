// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cross-origin policy derived from [`CorsSettings`].

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::{CorsOrigins, CorsSettings};

const ALLOWED_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];

/// Build the CORS layer.
///
/// Browsers reject a wildcard origin on credentialed requests, so with
/// credentials enabled a wildcard mirrors the request origin and headers are
/// listed explicitly.
pub fn cors_layer(settings: &CorsSettings) -> CorsLayer {
    let origin = match &settings.origins {
        CorsOrigins::Any if settings.supports_credentials => AllowOrigin::mirror_request(),
        CorsOrigins::Any => AllowOrigin::any(),
        CorsOrigins::List(origins) => AllowOrigin::list(origins.iter().filter_map(|origin| {
            match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(%origin, "Skipping invalid CORS origin");
                    None
                }
            }
        })),
    };

    let layer = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(ALLOWED_METHODS);

    if settings.supports_credentials {
        layer.allow_credentials(true).allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
    } else {
        layer.allow_headers(Any)
    }
}

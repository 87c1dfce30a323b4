// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines the environment variable names the server reads and
//! resolves them into [`Settings`]. The environment is captured once at
//! startup into an [`EnvironmentInputs`] snapshot; resolution is a pure
//! function of that snapshot and the selected [`Environment`].
//!
//! Fields with several historical variable names are read from an ordered
//! candidate list, canonical name first. Empty values count as unset.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `FLASK_ENV` / `APP_CONFIG` | Deployment environment (`development`, `testing`, `production`) | `production` |
//! | `DATABASE_URL` / `DATABASE_URI` | Direct connection string | - |
//! | `MYSQLUSER` / `MYSQL_USER` / `DB_USER` | MySQL user | - |
//! | `MYSQLPASSWORD` / `MYSQL_ROOT_PASSWORD` / `MYSQL_PASSWORD` / `DB_PASS` | MySQL password | - |
//! | `MYSQLHOST` / `MYSQL_HOST` / `DB_HOST` | MySQL host | - |
//! | `MYSQLPORT` / `MYSQL_PORT` | MySQL port | `3306` |
//! | `MYSQLDATABASE` / `MYSQL_DATABASE` / `DB_NAME` | MySQL database | - |
//! | `TEST_DATABASE_URI` | Connection string used by `testing` | `sqlite:///:memory:` |
//! | `SQLALCHEMY_POOL_SIZE` | Pool size | `5` (dev) / `10` (prod) |
//! | `SQLALCHEMY_MAX_OVERFLOW` | Pool overflow | `10` (dev) / `20` (prod) |
//! | `SQLALCHEMY_POOL_TIMEOUT` | Pool checkout timeout, seconds | `30` |
//! | `SQLALCHEMY_ECHO` | Log every statement (development only) | `false` |
//! | `SECRET_KEY` | Application secret | `change-me-in-production` |
//! | `JWT_SECRET_KEY` | Token signing secret | `SECRET_KEY` |
//! | `JWT_ALGORITHM` | Token signing algorithm | `HS256` |
//! | `JWT_ACCESS_TOKEN_EXPIRES_SECONDS` | Access token lifetime | `86400` |
//! | `JWT_REFRESH_TOKEN_EXPIRES_SECONDS` | Refresh token lifetime | `2592000` |
//! | `CORS_ORIGINS` | Comma separated allowed origins, `*` for any | `*` |
//! | `CORS_SUPPORTS_CREDENTIALS` | Allow credentialed CORS requests | `false` |
//! | `RATELIMIT_DEFAULT` | Default rate limit expression | `200 per day;50 per hour` |
//! | `API_PREFIX` | Prefix for API routes | `/api/v1` |
//! | `LOG_LEVEL` | Log level | `DEBUG` (dev) / `INFO` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log filter, overrides `LOG_LEVEL` | - |
//! | `HOST` | Server bind address, IP literal or resolvable host name | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `APP_BASE_DIR` | Directory holding `instance/` for the local database | executable's directory |

pub mod datastore;
pub mod environment;
pub mod inputs;
pub mod settings;

use std::net::{SocketAddr, ToSocketAddrs};

use url::Host;

use crate::error::{ConfigError, ConfigResult};

pub use datastore::{resolve, DatastoreSource, ResolvedDatastoreConfig};
pub use environment::Environment;
pub use inputs::EnvironmentInputs;
pub use settings::{CorsOrigins, CorsSettings, JwtSettings, Settings};

// ========== Environment selection ==========

/// Variables selecting the deployment environment, in priority order.
pub const ENVIRONMENT_VARS: &[&str] = &["FLASK_ENV", "APP_CONFIG"];

// ========== Datastore ==========

/// Direct connection string.
pub const DATABASE_URL_VARS: &[&str] = &["DATABASE_URL", "DATABASE_URI"];

/// MySQL credential fields. Railway-style names first, then the official
/// MySQL image names, then the generic `DB_*` names.
pub const DB_USER_VARS: &[&str] = &["MYSQLUSER", "MYSQL_USER", "DB_USER"];
pub const DB_PASSWORD_VARS: &[&str] = &[
    "MYSQLPASSWORD",
    "MYSQL_ROOT_PASSWORD",
    "MYSQL_PASSWORD",
    "DB_PASS",
];
pub const DB_HOST_VARS: &[&str] = &["MYSQLHOST", "MYSQL_HOST", "DB_HOST"];
pub const DB_PORT_VARS: &[&str] = &["MYSQLPORT", "MYSQL_PORT"];
pub const DB_NAME_VARS: &[&str] = &["MYSQLDATABASE", "MYSQL_DATABASE", "DB_NAME"];

/// Connection string used by the `testing` environment.
pub const TEST_DATABASE_URI_ENV: &str = "TEST_DATABASE_URI";

pub const POOL_SIZE_ENV: &str = "SQLALCHEMY_POOL_SIZE";
pub const MAX_OVERFLOW_ENV: &str = "SQLALCHEMY_MAX_OVERFLOW";
pub const POOL_TIMEOUT_ENV: &str = "SQLALCHEMY_POOL_TIMEOUT";
pub const ECHO_ENV: &str = "SQLALCHEMY_ECHO";

// ========== Secrets & tokens ==========

pub const SECRET_KEY_ENV: &str = "SECRET_KEY";
pub const JWT_SECRET_KEY_ENV: &str = "JWT_SECRET_KEY";
pub const JWT_ALGORITHM_ENV: &str = "JWT_ALGORITHM";
pub const JWT_ACCESS_EXPIRES_ENV: &str = "JWT_ACCESS_TOKEN_EXPIRES_SECONDS";
pub const JWT_REFRESH_EXPIRES_ENV: &str = "JWT_REFRESH_TOKEN_EXPIRES_SECONDS";

// ========== HTTP surface ==========

pub const CORS_ORIGINS_ENV: &str = "CORS_ORIGINS";
pub const CORS_CREDENTIALS_ENV: &str = "CORS_SUPPORTS_CREDENTIALS";
pub const RATELIMIT_DEFAULT_ENV: &str = "RATELIMIT_DEFAULT";
pub const API_PREFIX_ENV: &str = "API_PREFIX";

// ========== Process ==========

pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Logging format (`json` or `pretty`).
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Base directory for the local fallback database.
pub const APP_BASE_DIR_ENV: &str = "APP_BASE_DIR";
pub const DEFAULT_PORT: u16 = 8080;

/// Every variable the server reads. [`EnvironmentInputs::from_process`]
/// captures exactly these.
pub fn known_variables() -> impl Iterator<Item = &'static str> {
    [
        ENVIRONMENT_VARS,
        DATABASE_URL_VARS,
        DB_USER_VARS,
        DB_PASSWORD_VARS,
        DB_HOST_VARS,
        DB_PORT_VARS,
        DB_NAME_VARS,
    ]
    .into_iter()
    .flatten()
    .copied()
    .chain([
        TEST_DATABASE_URI_ENV,
        POOL_SIZE_ENV,
        MAX_OVERFLOW_ENV,
        POOL_TIMEOUT_ENV,
        ECHO_ENV,
        SECRET_KEY_ENV,
        JWT_SECRET_KEY_ENV,
        JWT_ALGORITHM_ENV,
        JWT_ACCESS_EXPIRES_ENV,
        JWT_REFRESH_EXPIRES_ENV,
        CORS_ORIGINS_ENV,
        CORS_CREDENTIALS_ENV,
        RATELIMIT_DEFAULT_ENV,
        API_PREFIX_ENV,
        LOG_LEVEL_ENV,
        LOG_FORMAT_ENV,
        HOST_ENV,
        PORT_ENV,
        APP_BASE_DIR_ENV,
    ])
}

/// Socket address from `HOST` and `PORT`.
///
/// `HOST` may be an IPv4 or IPv6 literal or a host name. Host names are
/// resolved through the system resolver and the first address is used.
pub fn bind_address(inputs: &EnvironmentInputs) -> ConfigResult<SocketAddr> {
    let raw = inputs.get(HOST_ENV).map(str::trim).unwrap_or(DEFAULT_HOST);
    let port = inputs.number::<u16>(PORT_ENV)?.unwrap_or(DEFAULT_PORT);

    let invalid = |reason: String| ConfigError::InvalidBindAddress {
        address: format!("{raw}:{port}"),
        reason,
    };

    // Bare IPv6 literals need brackets to parse as a host.
    let bracketed;
    let host_text = if raw.contains(':') && !raw.starts_with('[') {
        bracketed = format!("[{raw}]");
        bracketed.as_str()
    } else {
        raw
    };

    match Host::parse(host_text).map_err(|e| invalid(e.to_string()))? {
        Host::Ipv4(ip) => Ok(SocketAddr::new(ip.into(), port)),
        Host::Ipv6(ip) => Ok(SocketAddr::new(ip.into(), port)),
        Host::Domain(name) => (name.as_str(), port)
            .to_socket_addrs()
            .map_err(|e| invalid(e.to_string()))?
            .next()
            .ok_or_else(|| invalid("host name resolved to no addresses".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn known_variables_are_unique() {
        let all: Vec<_> = known_variables().collect();
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(all.len(), unique.len());
    }

    #[test]
    fn canonical_names_come_first() {
        assert_eq!(DATABASE_URL_VARS[0], "DATABASE_URL");
        assert_eq!(DB_USER_VARS[0], "MYSQLUSER");
        assert_eq!(DB_PASSWORD_VARS[0], "MYSQLPASSWORD");
        assert_eq!(ENVIRONMENT_VARS[0], "FLASK_ENV");
    }

    #[test]
    fn bind_address_defaults() {
        let inputs = EnvironmentInputs::from_pairs::<_, &str, &str>([]);
        assert_eq!(bind_address(&inputs).unwrap(), "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn bind_address_from_host_and_port() {
        let inputs = EnvironmentInputs::from_pairs([("HOST", "127.0.0.1"), ("PORT", "5000")]);
        assert_eq!(bind_address(&inputs).unwrap(), "127.0.0.1:5000".parse::<SocketAddr>().unwrap());

        let inputs = EnvironmentInputs::from_pairs([("HOST", "::1"), ("PORT", "5000")]);
        assert_eq!(bind_address(&inputs).unwrap(), "[::1]:5000".parse::<SocketAddr>().unwrap());

        let inputs = EnvironmentInputs::from_pairs([("HOST", "[::1]"), ("PORT", "5000")]);
        assert_eq!(bind_address(&inputs).unwrap(), "[::1]:5000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn bind_address_resolves_host_names() {
        let inputs = EnvironmentInputs::from_pairs([("HOST", "localhost"), ("PORT", "5000")]);
        let addr = bind_address(&inputs).unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 5000);
    }

    #[test]
    fn bind_address_errors() {
        let inputs = EnvironmentInputs::from_pairs([("PORT", "70000")]);
        assert_eq!(bind_address(&inputs).unwrap_err().variable(), Some("PORT"));

        let inputs = EnvironmentInputs::from_pairs([("HOST", "not a host")]);
        assert!(matches!(
            bind_address(&inputs).unwrap_err(),
            ConfigError::InvalidBindAddress { .. }
        ));
    }
}

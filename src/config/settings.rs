// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Application settings resolved from an [`EnvironmentInputs`] snapshot.
//!
//! Secrets are carried through unmodified; they never appear in `Debug`
//! output or in the serialised summary.

use std::fmt;

use serde::Serialize;

use crate::error::ConfigResult;

use super::datastore::{resolve_for, DatastoreSource, ResolvedDatastoreConfig};
use super::{
    Environment, EnvironmentInputs, API_PREFIX_ENV, CORS_CREDENTIALS_ENV, CORS_ORIGINS_ENV,
    JWT_ACCESS_EXPIRES_ENV, JWT_ALGORITHM_ENV, JWT_REFRESH_EXPIRES_ENV,
    JWT_SECRET_KEY_ENV, LOG_LEVEL_ENV, RATELIMIT_DEFAULT_ENV, SECRET_KEY_ENV,
};

pub const DEFAULT_SECRET_KEY: &str = "change-me-in-production";
pub const DEFAULT_JWT_ALGORITHM: &str = "HS256";
pub const DEFAULT_ACCESS_TOKEN_SECS: u64 = 60 * 60 * 24;
pub const DEFAULT_REFRESH_TOKEN_SECS: u64 = 60 * 60 * 24 * 30;
/// Access tokens in the testing environment expire after a minute.
pub const TESTING_ACCESS_TOKEN_SECS: u64 = 60;
pub const DEFAULT_RATE_LIMIT: &str = "200 per day;50 per hour";
pub const DEFAULT_API_PREFIX: &str = "/api/v1";

/// Token signing settings, consumed by the token issuer.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct JwtSettings {
    #[serde(skip)]
    pub secret_key: String,
    pub algorithm: String,
    pub access_token_expires_secs: u64,
    pub refresh_token_expires_secs: u64,
}

impl fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret_key", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("access_token_expires_secs", &self.access_token_expires_secs)
            .field("refresh_token_expires_secs", &self.refresh_token_expires_secs)
            .finish()
    }
}

/// Allowed CORS origins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl CorsOrigins {
    /// `*` (alone or anywhere in the list) means any origin; otherwise a
    /// comma separated list. Blank entries are dropped.
    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            CorsOrigins::Any
        } else {
            CorsOrigins::List(origins)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorsSettings {
    pub origins: CorsOrigins,
    pub supports_credentials: bool,
}

/// Everything the application needs from its environment.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub environment: Environment,
    #[serde(skip)]
    pub secret_key: String,
    pub jwt: JwtSettings,
    pub cors: CorsSettings,
    pub rate_limit_default: String,
    pub api_prefix: String,
    pub debug: bool,
    pub testing: bool,
    pub log_level: String,
    #[serde(serialize_with = "serialize_datastore")]
    pub datastore: ResolvedDatastoreConfig,
}

impl Settings {
    /// Resolve settings for the environment named by `FLASK_ENV`/`APP_CONFIG`.
    pub fn from_inputs(inputs: &EnvironmentInputs) -> ConfigResult<Self> {
        Self::resolve(Environment::from_inputs(inputs), inputs)
    }

    pub fn resolve(environment: Environment, inputs: &EnvironmentInputs) -> ConfigResult<Self> {
        let datastore = resolve_for(environment, inputs)?;

        let secret_key = inputs
            .get(SECRET_KEY_ENV)
            .unwrap_or(DEFAULT_SECRET_KEY)
            .to_string();

        let access_token_expires_secs = inputs
            .number::<u64>(JWT_ACCESS_EXPIRES_ENV)?
            .unwrap_or(DEFAULT_ACCESS_TOKEN_SECS);
        let refresh_token_expires_secs = inputs
            .number::<u64>(JWT_REFRESH_EXPIRES_ENV)?
            .unwrap_or(DEFAULT_REFRESH_TOKEN_SECS);

        let jwt = JwtSettings {
            secret_key: inputs
                .get(JWT_SECRET_KEY_ENV)
                .map(str::to_string)
                .unwrap_or_else(|| secret_key.clone()),
            algorithm: inputs
                .get(JWT_ALGORITHM_ENV)
                .unwrap_or(DEFAULT_JWT_ALGORITHM)
                .to_string(),
            access_token_expires_secs: match environment {
                Environment::Testing => TESTING_ACCESS_TOKEN_SECS,
                _ => access_token_expires_secs,
            },
            refresh_token_expires_secs,
        };

        let cors = CorsSettings {
            origins: CorsOrigins::parse(inputs.get(CORS_ORIGINS_ENV).unwrap_or("*")),
            supports_credentials: inputs.flag(CORS_CREDENTIALS_ENV),
        };

        // Production never runs in debug mode, whatever the environment says.
        let debug = environment != Environment::Production;

        let default_level = match environment {
            Environment::Development => "DEBUG",
            _ => "INFO",
        };

        Ok(Self {
            environment,
            secret_key,
            jwt,
            cors,
            rate_limit_default: inputs
                .get(RATELIMIT_DEFAULT_ENV)
                .unwrap_or(DEFAULT_RATE_LIMIT)
                .to_string(),
            api_prefix: normalize_prefix(inputs.get(API_PREFIX_ENV).unwrap_or(DEFAULT_API_PREFIX)),
            debug,
            testing: environment == Environment::Testing,
            log_level: inputs
                .get(LOG_LEVEL_ENV)
                .unwrap_or(default_level)
                .trim()
                .to_string(),
            datastore,
        })
    }

    /// True when the application secret is still the built-in placeholder.
    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("environment", &self.environment)
            .field("secret_key", &"<redacted>")
            .field("jwt", &self.jwt)
            .field("cors", &self.cors)
            .field("rate_limit_default", &self.rate_limit_default)
            .field("api_prefix", &self.api_prefix)
            .field("debug", &self.debug)
            .field("testing", &self.testing)
            .field("log_level", &self.log_level)
            .field("datastore", &self.datastore)
            .finish()
    }
}

/// Leading slash, no trailing slash; `/` alone collapses to the empty prefix.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

fn serialize_datastore<S>(datastore: &ResolvedDatastoreConfig, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    #[derive(Serialize)]
    struct View<'a> {
        uri: String,
        source: DatastoreSource,
        database: Option<String>,
        pool_size: u32,
        max_overflow: u32,
        pool_timeout_seconds: u32,
        pool_pre_ping: bool,
        echo: bool,
        environment: &'a str,
    }

    View {
        uri: datastore.redacted_uri(),
        source: datastore.source(),
        database: datastore.database_name(),
        pool_size: datastore.pool_size(),
        max_overflow: datastore.max_overflow(),
        pool_timeout_seconds: datastore.pool_timeout_seconds(),
        pool_pre_ping: datastore.pool_pre_ping(),
        echo: datastore.echo(),
        environment: datastore.environment_name(),
    }
    .serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    fn inputs<const N: usize>(pairs: [(&str, &str); N]) -> EnvironmentInputs {
        EnvironmentInputs::from_pairs(pairs).with_base_dir("/srv/shop")
    }

    #[test]
    fn defaults_per_environment() {
        let empty = inputs([]);
        let cases = [
            (Environment::Development, true, false, "DEBUG", DEFAULT_ACCESS_TOKEN_SECS),
            (Environment::Testing, true, true, "INFO", TESTING_ACCESS_TOKEN_SECS),
            (Environment::Production, false, false, "INFO", DEFAULT_ACCESS_TOKEN_SECS),
        ];
        for (env, debug, testing, level, access) in cases {
            let settings = Settings::resolve(env, &empty).unwrap();
            assert_eq!(settings.environment, env);
            assert_eq!(settings.debug, debug, "{env}");
            assert_eq!(settings.testing, testing, "{env}");
            assert_eq!(settings.log_level, level, "{env}");
            assert_eq!(settings.jwt.access_token_expires_secs, access, "{env}");
            assert_eq!(settings.jwt.refresh_token_expires_secs, DEFAULT_REFRESH_TOKEN_SECS);
            assert_eq!(settings.jwt.algorithm, "HS256");
            assert_eq!(settings.api_prefix, "/api/v1");
            assert_eq!(settings.rate_limit_default, "200 per day;50 per hour");
            assert_eq!(settings.cors.origins, CorsOrigins::Any);
            assert!(!settings.cors.supports_credentials);
            assert!(settings.uses_default_secret());
            assert_eq!(settings.datastore.environment(), env);
        }
    }

    #[test]
    fn jwt_secret_defaults_to_app_secret() {
        let settings = Settings::resolve(Environment::Production, &inputs([("SECRET_KEY", "abc")])).unwrap();
        assert_eq!(settings.secret_key, "abc");
        assert_eq!(settings.jwt.secret_key, "abc");
        assert!(!settings.uses_default_secret());

        let settings = Settings::resolve(
            Environment::Production,
            &inputs([("SECRET_KEY", "abc"), ("JWT_SECRET_KEY", "xyz")]),
        )
        .unwrap();
        assert_eq!(settings.jwt.secret_key, "xyz");
    }

    #[test]
    fn secrets_pass_through_unmodified() {
        let raw = " pad:ded@secret/ ";
        let settings = Settings::resolve(Environment::Production, &inputs([("SECRET_KEY", raw)])).unwrap();
        assert_eq!(settings.secret_key, raw);
    }

    #[test]
    fn secrets_never_render() {
        let settings = Settings::resolve(
            Environment::Production,
            &inputs([
                ("SECRET_KEY", "app-secret-value"),
                ("JWT_SECRET_KEY", "jwt-secret-value"),
                ("DATABASE_URL", "mysql://u:db-password@h/shop"),
            ]),
        )
        .unwrap();
        let debug = format!("{settings:?}");
        let json = serde_json::to_string(&settings).unwrap();
        for rendered in [&debug, &json] {
            assert!(!rendered.contains("app-secret-value"), "{rendered}");
            assert!(!rendered.contains("jwt-secret-value"), "{rendered}");
            assert!(!rendered.contains("db-password"), "{rendered}");
        }
    }

    #[test]
    fn summary_serialization_shape() {
        let settings = Settings::resolve(
            Environment::Production,
            &inputs([("DATABASE_URL", "mysql://u:pw@h:3306/shop")]),
        )
        .unwrap();
        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["environment"], "production");
        assert_eq!(value["datastore"]["source"], "direct");
        assert_eq!(value["datastore"]["database"], "shop");
        assert_eq!(value["datastore"]["uri"], "mysql+pymysql://u:***@h:3306/shop");
        assert_eq!(value["datastore"]["pool_size"], 10);
        assert_eq!(value["cors"]["origins"], "any");
        assert!(value.get("secret_key").is_none());
        assert!(value["jwt"].get("secret_key").is_none());
    }

    #[test]
    fn debug_is_fixed_per_environment() {
        let settings = Settings::resolve(Environment::Production, &inputs([("FLASK_DEBUG", "1")])).unwrap();
        assert!(!settings.debug);
        let settings = Settings::resolve(Environment::Development, &inputs([("FLASK_DEBUG", "false")])).unwrap();
        assert!(settings.debug);
    }

    #[test]
    fn token_lifetimes_are_overridable_and_validated() {
        let settings = Settings::resolve(
            Environment::Production,
            &inputs([
                ("JWT_ACCESS_TOKEN_EXPIRES_SECONDS", "900"),
                ("JWT_REFRESH_TOKEN_EXPIRES_SECONDS", "3600"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.jwt.access_token_expires_secs, 900);
        assert_eq!(settings.jwt.refresh_token_expires_secs, 3600);

        let err = Settings::resolve(
            Environment::Production,
            &inputs([("JWT_ACCESS_TOKEN_EXPIRES_SECONDS", "1h")]),
        )
        .unwrap_err();
        assert_eq!(err.variable(), Some("JWT_ACCESS_TOKEN_EXPIRES_SECONDS"));
    }

    #[test]
    fn datastore_errors_propagate() {
        let err = Settings::resolve(Environment::Production, &inputs([("SQLALCHEMY_POOL_SIZE", "abc")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumericOverride { .. }));
    }

    #[test]
    fn cors_origins_parsing() {
        assert_eq!(CorsOrigins::parse("*"), CorsOrigins::Any);
        assert_eq!(CorsOrigins::parse(" , "), CorsOrigins::Any);
        assert_eq!(CorsOrigins::parse("https://a.example, *"), CorsOrigins::Any);
        assert_eq!(
            CorsOrigins::parse("https://a.example, https://b.example ,"),
            CorsOrigins::List(vec![
                "https://a.example".to_string(),
                "https://b.example".to_string()
            ])
        );

        let settings = Settings::resolve(
            Environment::Production,
            &inputs([
                ("CORS_ORIGINS", "https://shop.example"),
                ("CORS_SUPPORTS_CREDENTIALS", "1"),
            ]),
        )
        .unwrap();
        assert_eq!(
            settings.cors,
            CorsSettings {
                origins: CorsOrigins::List(vec!["https://shop.example".to_string()]),
                supports_credentials: true,
            }
        );
    }

    #[test]
    fn api_prefix_is_normalized() {
        for (raw, expected) in [
            ("/api/v2", "/api/v2"),
            ("api/v2/", "/api/v2"),
            ("/", ""),
            ("  /shop  ", "/shop"),
        ] {
            let settings = Settings::resolve(Environment::Production, &inputs([("API_PREFIX", raw)])).unwrap();
            assert_eq!(settings.api_prefix, expected, "{raw:?}");
        }
    }

    #[test]
    fn from_inputs_selects_environment() {
        let settings = Settings::from_inputs(&inputs([
            ("FLASK_ENV", "test"),
            ("TEST_DATABASE_URI", "sqlite:////tmp/test.db"),
        ]))
        .unwrap();
        assert_eq!(settings.environment, Environment::Testing);
        assert_eq!(settings.datastore.uri(), "sqlite:////tmp/test.db");
        assert_eq!(settings.datastore.source(), DatastoreSource::TestOverride);
    }

    #[test]
    fn log_level_override() {
        let settings = Settings::resolve(Environment::Development, &inputs([("LOG_LEVEL", "warning")])).unwrap();
        assert_eq!(settings.log_level, "warning");
    }
}

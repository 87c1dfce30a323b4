// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Tracing subscriber setup.
//!
//! `RUST_LOG` takes precedence; otherwise the filter is derived from
//! `LOG_LEVEL`, which accepts the usual level names (`DEBUG`, `INFO`,
//! `WARNING`, `ERROR`, `CRITICAL`) in any case.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{EnvironmentInputs, LOG_FORMAT_ENV};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn from_inputs(inputs: &EnvironmentInputs) -> Self {
        match inputs.get(LOG_FORMAT_ENV).map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Map a `LOG_LEVEL` value onto a tracing level name.
pub fn tracing_level(log_level: &str) -> &'static str {
    match log_level.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" | "warning" => "warn",
        "error" | "critical" | "fatal" => "error",
        _ => "info",
    }
}

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_directive(log_level: &str) -> String {
    let level = tracing_level(log_level);
    format!("{level},tower_http={level}")
}

pub fn init(log_level: &str, format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(log_level)));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .json(),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_map_to_tracing_levels() {
        let cases = [
            ("DEBUG", "debug"),
            ("info", "info"),
            ("WARNING", "warn"),
            ("warn", "warn"),
            ("ERROR", "error"),
            ("CRITICAL", "error"),
            ("TRACE", "trace"),
            ("verbose", "info"),
        ];
        for (raw, expected) in cases {
            assert_eq!(tracing_level(raw), expected, "{raw}");
        }
    }

    #[test]
    fn default_directive_covers_http_tracing() {
        assert_eq!(default_directive("DEBUG"), "debug,tower_http=debug");
    }

    #[test]
    fn default_directive_is_a_valid_filter() {
        for level in ["DEBUG", "INFO", "WARNING", "ERROR"] {
            assert!(EnvFilter::try_new(default_directive(level)).is_ok());
        }
    }

    #[test]
    fn log_format_selection() {
        let json = EnvironmentInputs::from_pairs([("LOG_FORMAT", "JSON")]);
        assert_eq!(LogFormat::from_inputs(&json), LogFormat::Json);
        let other = EnvironmentInputs::from_pairs([("LOG_FORMAT", "text")]);
        assert_eq!(LogFormat::from_inputs(&other), LogFormat::Pretty);
        let unset = EnvironmentInputs::from_pairs::<_, &str, &str>([]);
        assert_eq!(LogFormat::from_inputs(&unset), LogFormat::Pretty);
    }
}

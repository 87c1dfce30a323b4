// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Configuration errors.
//!
//! Every variant is startup-fatal: the process must not serve traffic with a
//! configuration it could not resolve. Configuration never changes during a
//! process lifetime, so there is nothing to retry.

/// Result alias for configuration resolution.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric tuning variable is not a valid value for its field.
    #[error("invalid value {value:?} for {name}: {reason}")]
    InvalidNumericOverride {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// A direct connection string could not be parsed as a URL.
    ///
    /// The offending value is deliberately not included: it may carry
    /// credentials.
    #[error("{name} is not a valid connection string: {reason}")]
    MalformedDatabaseUrl { name: &'static str, reason: String },

    /// `HOST`/`PORT` do not form a socket address.
    #[error("invalid bind address {address:?}: {reason}")]
    InvalidBindAddress { address: String, reason: String },
}

impl ConfigError {
    pub fn invalid_number(
        name: &'static str,
        value: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        Self::InvalidNumericOverride {
            name,
            value: value.into(),
            reason: reason.to_string(),
        }
    }

    /// The environment variable the error points at, if any.
    pub fn variable(&self) -> Option<&'static str> {
        match self {
            ConfigError::InvalidNumericOverride { name, .. }
            | ConfigError::MalformedDatabaseUrl { name, .. } => Some(name),
            ConfigError::InvalidBindAddress { .. } => None,
        }
    }
}

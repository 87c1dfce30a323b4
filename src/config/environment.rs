// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Deployment environments.

use std::fmt;

use serde::Serialize;

use super::{EnvironmentInputs, ENVIRONMENT_VARS};

/// The closed set of deployment environments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Testing,
    Production,
}

impl Environment {
    pub const ALL: [Environment; 3] = [
        Environment::Development,
        Environment::Testing,
        Environment::Production,
    ];

    /// Strict lookup: `development`/`dev`, `testing`/`test`,
    /// `production`/`prod`, case-insensitive.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Environment::Development),
            "testing" | "test" => Some(Environment::Testing),
            "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }

    /// Lenient lookup: unrecognised names select production.
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or(Environment::Production)
    }

    /// The name requested by `FLASK_ENV` or `APP_CONFIG`, if any.
    pub fn requested(inputs: &EnvironmentInputs) -> Option<&str> {
        inputs.first_of(ENVIRONMENT_VARS).map(|(_, name)| name)
    }

    /// Environment selected by the snapshot, production when none is named.
    pub fn from_inputs(inputs: &EnvironmentInputs) -> Self {
        Self::requested(inputs)
            .map(Self::from_name)
            .unwrap_or(Environment::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Testing => "testing",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

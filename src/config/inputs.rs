// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Immutable snapshot of the environment variables the server reads.

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{ConfigError, ConfigResult};

use super::{known_variables, APP_BASE_DIR_ENV};

/// Environment captured once at startup.
///
/// Values are stored as given; a value that is empty or only whitespace is
/// treated as unset by every accessor. The snapshot also records the
/// application base directory, which roots the local fallback database file.
#[derive(Clone, PartialEq, Eq)]
pub struct EnvironmentInputs {
    vars: BTreeMap<String, String>,
    base_dir: PathBuf,
}

impl EnvironmentInputs {
    /// Capture the known variables from the process environment.
    ///
    /// Variables that are not valid Unicode are skipped. The base directory
    /// is `APP_BASE_DIR` when set, otherwise the directory holding the
    /// executable, so the local database does not move with the caller's
    /// working directory.
    pub fn from_process() -> Self {
        let vars: BTreeMap<String, String> = known_variables()
            .filter_map(|name| env::var(name).ok().map(|value| (name.to_string(), value)))
            .collect();
        let fallback = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::rooted(vars, fallback)
    }

    /// Build a snapshot from explicit pairs. The base directory is the
    /// `APP_BASE_DIR` pair when present, otherwise `.`.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::rooted(vars, PathBuf::from("."))
    }

    fn rooted(vars: BTreeMap<String, String>, fallback: PathBuf) -> Self {
        let base_dir = vars
            .get(APP_BASE_DIR_ENV)
            .map(|dir| dir.trim())
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .unwrap_or(fallback);
        Self { vars, base_dir }
    }

    pub fn with_base_dir(mut self, base_dir: impl AsRef<Path>) -> Self {
        self.base_dir = base_dir.as_ref().to_path_buf();
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Value of `name`, if set to something other than blanks.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// First set variable among `names`, with the name that matched.
    pub fn first_of(&self, names: &[&'static str]) -> Option<(&'static str, &str)> {
        names
            .iter()
            .find_map(|&name| self.get(name).map(|value| (name, value)))
    }

    /// Boolean flag: `1`, `true` or `yes` (any case) is on, anything else off.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false)
    }

    /// Parse `name` as a number. Unset yields `Ok(None)`; a value that does
    /// not parse is an error rather than a silent default.
    pub fn number<T>(&self, name: &'static str) -> ConfigResult<Option<T>>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.get(name) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|e| ConfigError::invalid_number(name, raw, e)),
        }
    }
}

impl fmt::Debug for EnvironmentInputs {
    // Only names are printed; values include secrets.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentInputs")
            .field("vars", &self.vars.keys().collect::<Vec<_>>())
            .field("base_dir", &self.base_dir)
            .finish()
    }
}

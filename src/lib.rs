// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Storefront API Server - environment configuration and bootstrap
//!
//! This crate resolves the datastore connection string, pool tuning and the
//! rest of the application settings from the process environment, and builds
//! the HTTP application shell the storefront services are mounted on.
//!
//! ## Modules
//!
//! - `config` - Environment snapshot, datastore resolution, settings
//! - `api` - Application factory and health endpoints (Axum)
//! - `logging` - Tracing subscriber setup
//! - `error` - Configuration errors

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod state;

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Solution Workbench: select polygon solutions on a map and merge them.
//!
//! This crate provides the backend for the map viewer: it owns the
//! selection state, applies union/intersection over selected polygons and
//! serves the render model the front end draws.

pub mod config;
pub mod error;
pub mod models;
pub mod projector;
pub mod routes;
pub mod services;
pub mod store;

use config::Config;
use store::SelectionStore;
use tokio::sync::Mutex;

/// Shared application state.
///
/// The mutex serializes store transitions: each request holds it for exactly
/// one transition.
pub struct AppState {
    pub config: Config,
    pub store: Mutex<SelectionStore>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            store: Mutex::new(SelectionStore::default()),
        }
    }
}

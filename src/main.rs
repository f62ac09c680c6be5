// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Solution Workbench API Server
//!
//! Serves the selection state behind the map viewer and applies boolean
//! operations over the polygons a user selects.

use anyhow::Context;
use solution_workbench::{config::Config, services::loader, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        port = config.port,
        solutions_dir = %config.solutions_dir.display(),
        "Starting Solution Workbench API"
    );

    let state = Arc::new(AppState::new(config.clone()));

    // Load solutions in the background; the API reports "loading" until done
    tokio::spawn(loader::run_initial_load(state.clone()));

    // Build router
    let app = solution_workbench::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("solution_workbench=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use solution_workbench::config::Config;
use solution_workbench::routes::create_router;
use solution_workbench::services::SolutionLoader;
use solution_workbench::AppState;
use solution_workbench::services::loader::run_initial_load;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

/// Fixture solutions committed under data/solutions.
pub const FIXTURE_DIR: &str = "data/solutions";

/// Create a test app seeded with the fixture solutions.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let solutions = SolutionLoader::load_from_dir(FIXTURE_DIR)
        .expect("Failed to load fixture solutions - is data/ committed?");

    let state = Arc::new(AppState::new(config));
    state
        .store
        .try_lock()
        .expect("fresh store is unlocked")
        .seed_solutions(solutions);

    (create_router(state.clone()), state)
}

/// Create a test app whose initial load has not settled yet.
#[allow(dead_code)]
pub fn create_loading_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::test_default()));
    (create_router(state.clone()), state)
}

/// Write solution files into a fresh directory under the system temp dir.
#[allow(dead_code)]
pub fn solutions_dir(name: &str, files: &[(&str, &str)]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "solution-workbench-{}-{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("Failed to create temp dir");
    for (file, contents) in files {
        std::fs::write(dir.join(file), contents).expect("Failed to write solution file");
    }
    dir
}

/// Create a test app whose initial load ran against `dir`.
#[allow(dead_code)]
pub async fn create_app_from_dir(dir: PathBuf) -> (axum::Router, Arc<AppState>) {
    let config = Config {
        solutions_dir: dir,
        ..Config::test_default()
    };
    let state = Arc::new(AppState::new(config));
    run_initial_load(state.clone()).await;
    (create_router(state.clone()), state)
}

/// Send a bodiless request and decode the JSON response.
#[allow(dead_code)]
pub async fn send(app: &axum::Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Initial solution loading from GeoJSON feature collections.

use crate::models::solution::{default_feature_id, default_solution_id};
use crate::models::{Feature, FeatureGeometry, Properties, Solution};
use crate::AppState;
use geo::{Geometry, MultiPolygon, Polygon};
use geojson::{feature::Id, GeoJson};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File extensions picked up from the solutions directory.
const SOLUTION_EXTENSIONS: [&str; 2] = ["geojson", "json"];

/// Loads solutions, one GeoJSON `FeatureCollection` per solution.
pub struct SolutionLoader;

impl SolutionLoader {
    /// Load every solution file in a directory, ordered by file name.
    ///
    /// A directory without solution files yields an empty set.
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<Solution>, LoadError> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir)
            .map_err(|e| LoadError::IoError(format!("{}: {}", dir.display(), e)))?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| SOLUTION_EXTENSIONS.contains(&ext))
            })
            .collect();
        paths.sort();

        if paths.is_empty() {
            tracing::warn!(dir = %dir.display(), "No solution files found");
        }

        let mut solutions = Vec::with_capacity(paths.len());
        for (index, path) in paths.iter().enumerate() {
            let json_data = fs::read_to_string(path)
                .map_err(|e| LoadError::IoError(format!("{}: {}", path.display(), e)))?;
            let solution = Self::parse_collection(&json_data, index + 1)?;
            tracing::debug!(
                path = %path.display(),
                solution_id = %solution.id,
                features = solution.features.len(),
                "Loaded solution file"
            );
            solutions.push(solution);
        }

        tracing::info!(count = solutions.len(), "Loaded solutions");
        Ok(solutions)
    }

    /// Load a single solution from a GeoJSON string.
    pub fn load_from_json(json_data: &str) -> Result<Solution, LoadError> {
        Self::parse_collection(json_data, 1)
    }

    /// Parse one feature collection as the `n`th solution (1-indexed).
    fn parse_collection(json_data: &str, n: usize) -> Result<Solution, LoadError> {
        let geojson: GeoJson = json_data
            .parse()
            .map_err(|e: geojson::Error| LoadError::ParseError(e.to_string()))?;

        let GeoJson::FeatureCollection(collection) = geojson else {
            return Err(LoadError::NotAFeatureCollection);
        };

        let id = collection
            .foreign_members
            .as_ref()
            .and_then(|members| members.get("id"))
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .unwrap_or_else(|| default_solution_id(n));

        let mut features = Vec::with_capacity(collection.features.len());
        for (index, feature) in collection.features.into_iter().enumerate() {
            let feature_id = match feature.id {
                Some(Id::String(s)) if !s.is_empty() => s,
                Some(Id::Number(num)) => num.to_string(),
                _ => default_feature_id(n, index + 1),
            };

            let Some(geom) = feature.geometry else {
                tracing::warn!(solution_id = %id, feature_id = %feature_id, "Skipping feature without geometry");
                continue;
            };

            features.push(Feature {
                id: feature_id,
                geometry: Self::convert_geometry(geom.value)?,
                properties: feature.properties.unwrap_or_else(Properties::new),
            });
        }

        Ok(Solution { id, features })
    }

    /// Convert GeoJSON geometry to our internal format.
    fn convert_geometry(value: geojson::Value) -> Result<FeatureGeometry, LoadError> {
        use std::convert::TryInto;

        let poly_result: Result<Polygon<f64>, _> = value.clone().try_into();
        if let Ok(poly) = poly_result {
            return Ok(FeatureGeometry::Polygon(poly));
        }

        let multi_result: Result<MultiPolygon<f64>, _> = value.clone().try_into();
        if let Ok(multi) = multi_result {
            return Ok(FeatureGeometry::MultiPolygon(multi));
        }

        // Anything else is kept but never measured or rendered
        let other_result: Result<Geometry<f64>, _> = value.try_into();
        other_result
            .map(FeatureGeometry::Other)
            .map_err(|_| LoadError::UnsupportedGeometry)
    }
}

/// Run the one-shot startup load and settle the store.
///
/// Seeds the store on success and records the failure otherwise. There is
/// no retry; a failed load leaves the store empty.
pub async fn run_initial_load(state: Arc<AppState>) {
    let dir = state.config.solutions_dir.clone();
    tracing::info!(dir = %dir.display(), "Loading solutions");

    let result = match tokio::task::spawn_blocking(move || SolutionLoader::load_from_dir(dir)).await
    {
        Ok(result) => result,
        Err(e) => Err(LoadError::IoError(format!("loader task failed: {}", e))),
    };

    let mut store = state.store.lock().await;
    match result {
        Ok(solutions) => store.seed_solutions(solutions),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load solutions");
            store.fail_load(e.to_string());
        }
    }
}

/// Errors from solution loading.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read solutions: {0}")]
    IoError(String),

    #[error("Failed to parse GeoJSON: {0}")]
    ParseError(String),

    #[error("Solution file is not a GeoJSON FeatureCollection")]
    NotAFeatureCollection,

    #[error("Unsupported geometry type")]
    UnsupportedGeometry,
}

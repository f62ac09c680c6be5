// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - geometry engine and solution loading.

pub mod geometry;
pub mod loader;

pub use geometry::{BooleanOp, GeoAdapter, GeometryAdapter, GeometryError};
pub use loader::{LoadError, SolutionLoader};

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod solution;
pub mod view;

pub use solution::{Feature, FeatureGeometry, Properties, Solution};
pub use view::RenderModel;

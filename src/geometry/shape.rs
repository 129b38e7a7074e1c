// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Cadshot Contributors

//! Solid shapes that tessellate into renderable poly-data

use super::polydata::PolyData;
use super::tessellate::{
    tessellate_box, tessellate_cone, tessellate_cylinder, tessellate_sphere, Tolerances,
};
use anyhow::{Context, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A solid body placed by a part.
///
/// Primitives are tessellated on demand; `Stl` pulls a pre-meshed body from
/// disk so externally modelled geometry can join an assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    /// Axis-aligned box with one corner at the origin
    Box { size: Vector3<f64> },
    /// Sphere centered at the origin
    Sphere { radius: f64 },
    /// Cylinder along +Z with its base at the origin
    Cylinder { radius: f64, height: f64 },
    /// Truncated cone along +Z with its base at the origin
    Cone {
        bottom_radius: f64,
        top_radius: f64,
        height: f64,
    },
    /// Triangle mesh loaded from an STL file
    Stl { path: PathBuf },
}

impl Shape {
    /// Tessellate into points, triangles, feature edges and vertices
    pub fn tessellate(&self, tolerances: &Tolerances) -> Result<PolyData> {
        match self {
            Self::Box { size } => Ok(tessellate_box(*size)),
            Self::Sphere { radius } => Ok(tessellate_sphere(*radius, tolerances)),
            Self::Cylinder { radius, height } => {
                Ok(tessellate_cylinder(*radius, *height, tolerances))
            }
            Self::Cone {
                bottom_radius,
                top_radius,
                height,
            } => Ok(tessellate_cone(
                *bottom_radius,
                *top_radius,
                *height,
                tolerances,
            )),
            Self::Stl { path } => crate::io::import_stl(path)
                .with_context(|| format!("Failed to load STL shape from {}", path.display())),
        }
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Cadshot Contributors

//! Mixed-cell geometry container for tessellated shapes
//!
//! A [`PolyData`] holds one shared point array plus three kinds of cells
//! referencing it: triangles for the surface, polylines for feature edges,
//! and vertex cells for topological corners. Rendering splits the set by
//! cell type so faces and wireframe can carry different appearance.

use super::bbox::BoundingBox;
use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Cell categories stored in a [`PolyData`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellType {
    Triangle,
    Line,
    Vertex,
}

/// Indexed point/cell set with optional per-point normals
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolyData {
    pub points: Vec<Point3<f64>>,
    /// Per-point shading normals; `None` after [`PolyData::remove_normals`]
    pub normals: Option<Vec<Vector3<f64>>>,
    pub triangles: Vec<[u32; 3]>,
    /// Polylines as runs of point indices (at least two per line)
    pub lines: Vec<Vec<u32>>,
    /// Isolated vertex cells as point indices
    pub verts: Vec<u32>,
}

impl PolyData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn cell_count(&self) -> usize {
        self.triangles.len() + self.lines.len() + self.verts.len()
    }

    /// True when the set holds no cells at all
    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }

    /// Copy of this set keeping only cells of the given types.
    ///
    /// Points and normals are carried over unchanged, so indices stay valid
    /// in the extracted set.
    pub fn extract_cells(&self, types: &[CellType]) -> PolyData {
        PolyData {
            points: self.points.clone(),
            normals: self.normals.clone(),
            triangles: if types.contains(&CellType::Triangle) {
                self.triangles.clone()
            } else {
                Vec::new()
            },
            lines: if types.contains(&CellType::Line) {
                self.lines.clone()
            } else {
                Vec::new()
            },
            verts: if types.contains(&CellType::Vertex) {
                self.verts.clone()
            } else {
                Vec::new()
            },
        }
    }

    /// Drop the shading normals, leaving the set to render unlit
    pub fn remove_normals(&mut self) {
        self.normals = None;
    }

    /// Apply an affine transform to points and normals in place.
    ///
    /// Normals use the inverse-transpose so non-uniform scaling keeps them
    /// perpendicular to the surface.
    pub fn transform(&mut self, matrix: &Matrix4<f64>) {
        for point in &mut self.points {
            *point = matrix.transform_point(point);
        }
        if let Some(normals) = &mut self.normals {
            let normal_matrix = matrix
                .try_inverse()
                .map(|m| m.transpose())
                .unwrap_or(*matrix);
            for normal in normals.iter_mut() {
                *normal = normal_matrix.transform_vector(normal).normalize();
            }
        }
    }

    /// Append another set, re-basing its cell indices onto this point array.
    ///
    /// Normals survive only when both sides carry them; a mixed merge drops
    /// them rather than invent values for the unshaded points.
    pub fn merge(&mut self, other: &PolyData) {
        let offset = self.points.len() as u32;

        if self.points.is_empty() {
            self.normals = other.normals.clone();
        } else if let Some(theirs) = &other.normals {
            if let Some(ours) = &mut self.normals {
                ours.extend_from_slice(theirs);
            }
        } else {
            self.normals = None;
        }

        self.points.extend_from_slice(&other.points);
        self.triangles.extend(
            other
                .triangles
                .iter()
                .map(|t| [t[0] + offset, t[1] + offset, t[2] + offset]),
        );
        self.lines.extend(
            other
                .lines
                .iter()
                .map(|line| line.iter().map(|i| i + offset).collect()),
        );
        self.verts.extend(other.verts.iter().map(|i| i + offset));
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.points)
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Cadshot Contributors

//! Geometry module - shapes, tessellation and poly-data

mod bbox;
mod polydata;
mod shape;
mod tessellate;

pub use bbox::BoundingBox;
pub use polydata::{CellType, PolyData};
pub use shape::Shape;
pub use tessellate::{
    tessellate_box, tessellate_cone, tessellate_cylinder, tessellate_sphere, Tolerances,
};

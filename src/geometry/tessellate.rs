// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Cadshot Contributors

//! Deflection-driven tessellation of solid shapes
//!
//! Each generator emits a [`PolyData`] carrying the full cell mix a B-rep
//! tessellator would produce: surface triangles with per-point normals,
//! feature-edge polylines, and vertex cells at topological corners.

use super::polydata::PolyData;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

const MIN_SEGMENTS: u32 = 8;
const MAX_SEGMENTS: u32 = 256;

/// Radii below this tessellate as a degenerate apex
const APEX_EPS: f64 = 1e-9;

/// Tessellation quality bounds.
///
/// `linear` caps the chord deviation between the mesh and the true surface,
/// `angular` caps the angle (radians) between normals of adjacent facets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tolerances {
    pub linear: f64,
    pub angular: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            linear: 1e-3,
            angular: 0.1,
        }
    }
}

impl Tolerances {
    pub fn new(linear: f64, angular: f64) -> Self {
        Self { linear, angular }
    }
}

/// Number of segments for a full circle of the given radius so that both
/// the angular and the chord-deviation bound hold
pub(crate) fn segment_count(radius: f64, tolerances: &Tolerances) -> u32 {
    use std::f64::consts::TAU;

    if radius <= 0.0 {
        return MIN_SEGMENTS;
    }

    let by_angle = (TAU / tolerances.angular.max(1e-6)).ceil();

    // chord sagitta d = r(1 - cos(theta/2)) solved for the step angle
    let sag = (tolerances.linear / radius).min(1.0);
    let theta = 2.0 * (1.0 - sag).acos();
    let by_chord = if theta > 1e-9 {
        (TAU / theta).ceil()
    } else {
        MAX_SEGMENTS as f64
    };

    (by_angle.max(by_chord) as u32).clamp(MIN_SEGMENTS, MAX_SEGMENTS)
}

/// Axis-aligned box with one corner at the origin.
///
/// Faces carry flat normals (four points per face), while the wireframe
/// corners are appended as separate points so edge extraction keeps sharp
/// silhouette lines.
pub fn tessellate_box(size: Vector3<f64>) -> PolyData {
    let corners = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(size.x, 0.0, 0.0),
        Point3::new(size.x, size.y, 0.0),
        Point3::new(0.0, size.y, 0.0),
        Point3::new(0.0, 0.0, size.z),
        Point3::new(size.x, 0.0, size.z),
        Point3::new(size.x, size.y, size.z),
        Point3::new(0.0, size.y, size.z),
    ];
    let quads: [([usize; 4], Vector3<f64>); 6] = [
        ([4, 5, 6, 7], Vector3::z()),
        ([1, 0, 3, 2], -Vector3::z()),
        ([5, 1, 2, 6], Vector3::x()),
        ([0, 4, 7, 3], -Vector3::x()),
        ([7, 6, 2, 3], Vector3::y()),
        ([0, 1, 5, 4], -Vector3::y()),
    ];

    let mut data = PolyData::new();
    let mut normals = Vec::with_capacity(32);

    for (quad, normal) in &quads {
        let base = data.points.len() as u32;
        for &corner in quad {
            data.points.push(corners[corner]);
            normals.push(*normal);
        }
        data.triangles.push([base, base + 1, base + 2]);
        data.triangles.push([base, base + 2, base + 3]);
    }

    // corner points for edges and vertices, shaded away from the center
    let center = Point3::from(size * 0.5);
    let edge_base = data.points.len() as u32;
    for corner in &corners {
        data.points.push(*corner);
        let dir = corner - center;
        normals.push(if dir.norm() > 1e-12 {
            dir.normalize()
        } else {
            Vector3::z()
        });
    }

    const EDGES: [[u32; 2]; 12] = [
        [0, 1],
        [1, 2],
        [2, 3],
        [3, 0],
        [4, 5],
        [5, 6],
        [6, 7],
        [7, 4],
        [0, 4],
        [1, 5],
        [2, 6],
        [3, 7],
    ];
    for edge in &EDGES {
        data.lines
            .push(vec![edge_base + edge[0], edge_base + edge[1]]);
    }
    for i in 0..8 {
        data.verts.push(edge_base + i);
    }

    data.normals = Some(normals);
    data
}

/// Sphere centered at the origin, meshed as a UV grid with the polar axis
/// along +Z. Smooth surfaces contribute no feature edges or vertices.
pub fn tessellate_sphere(radius: f64, tolerances: &Tolerances) -> PolyData {
    use std::f64::consts::{PI, TAU};

    let n = segment_count(radius, tolerances) as usize;
    let stacks = n;
    let slices = n;

    let mut data = PolyData::new();
    let mut normals = Vec::with_capacity((stacks + 1) * (slices + 1));

    for i in 0..=stacks {
        let phi = PI * i as f64 / stacks as f64;
        let z = radius * phi.cos();
        let ring = radius * phi.sin();
        for j in 0..=slices {
            let theta = TAU * j as f64 / slices as f64;
            let point = Point3::new(ring * theta.cos(), ring * theta.sin(), z);
            data.points.push(point);
            normals.push(if radius > 1e-12 {
                point.coords / radius
            } else {
                Vector3::z()
            });
        }
    }

    for i in 0..stacks {
        for j in 0..slices {
            let current = (i * (slices + 1) + j) as u32;
            let next = current + slices as u32 + 1;
            if i != 0 {
                data.triangles.push([current, next, current + 1]);
            }
            if i != stacks - 1 {
                data.triangles.push([current + 1, next, next + 1]);
            }
        }
    }

    data.normals = Some(normals);
    data
}

/// Cylinder along +Z with the base at the origin
pub fn tessellate_cylinder(radius: f64, height: f64, tolerances: &Tolerances) -> PolyData {
    tessellate_cone(radius, radius, height, tolerances)
}

/// Truncated cone along +Z with the base at the origin.
///
/// A `top_radius` of zero produces a sharp apex with a vertex cell; both
/// rim circles become closed wireframe polylines.
pub fn tessellate_cone(
    bottom_radius: f64,
    top_radius: f64,
    height: f64,
    tolerances: &Tolerances,
) -> PolyData {
    use std::f64::consts::TAU;

    let n = segment_count(bottom_radius.max(top_radius), tolerances) as usize;
    let has_top = top_radius > APEX_EPS;

    let mut data = PolyData::new();
    let mut normals = Vec::new();
    let angle = |i: f64| TAU * i / n as f64;

    let push_point = |data: &mut PolyData,
                      normals: &mut Vec<Vector3<f64>>,
                      point: Point3<f64>,
                      normal: Vector3<f64>|
     -> u32 {
        let index = data.points.len() as u32;
        data.points.push(point);
        normals.push(normal);
        index
    };

    // slant normal: radial direction tilted by the radius change over height
    let slope = bottom_radius - top_radius;
    let side_normal = |a: f64| {
        let dir = Vector3::new(a.cos() * height, a.sin() * height, slope);
        if dir.norm() > 1e-12 {
            dir.normalize()
        } else {
            Vector3::new(a.cos(), a.sin(), 0.0)
        }
    };

    // bottom cap
    let bottom_center = push_point(&mut data, &mut normals, Point3::origin(), -Vector3::z());
    let bottom_rim = data.points.len() as u32;
    for i in 0..n {
        let a = angle(i as f64);
        push_point(
            &mut data,
            &mut normals,
            Point3::new(bottom_radius * a.cos(), bottom_radius * a.sin(), 0.0),
            -Vector3::z(),
        );
    }
    for i in 0..n as u32 {
        let next = (i + 1) % n as u32;
        data.triangles
            .push([bottom_center, bottom_rim + next, bottom_rim + i]);
    }

    // top cap
    let top_rim = if has_top {
        let top_center = push_point(
            &mut data,
            &mut normals,
            Point3::new(0.0, 0.0, height),
            Vector3::z(),
        );
        let top_rim = data.points.len() as u32;
        for i in 0..n {
            let a = angle(i as f64);
            push_point(
                &mut data,
                &mut normals,
                Point3::new(top_radius * a.cos(), top_radius * a.sin(), height),
                Vector3::z(),
            );
        }
        for i in 0..n as u32 {
            let next = (i + 1) % n as u32;
            data.triangles.push([top_center, top_rim + i, top_rim + next]);
        }
        Some(top_rim)
    } else {
        None
    };

    // side wall with slant-shaded rings
    let side_bottom = data.points.len() as u32;
    for i in 0..n {
        let a = angle(i as f64);
        push_point(
            &mut data,
            &mut normals,
            Point3::new(bottom_radius * a.cos(), bottom_radius * a.sin(), 0.0),
            side_normal(a),
        );
    }
    if has_top {
        let side_top = data.points.len() as u32;
        for i in 0..n {
            let a = angle(i as f64);
            push_point(
                &mut data,
                &mut normals,
                Point3::new(top_radius * a.cos(), top_radius * a.sin(), height),
                side_normal(a),
            );
        }
        for i in 0..n as u32 {
            let next = (i + 1) % n as u32;
            data.triangles
                .push([side_bottom + i, side_bottom + next, side_top + i]);
            data.triangles
                .push([side_top + i, side_bottom + next, side_top + next]);
        }
    } else {
        // apex duplicated per segment so each facet keeps its own slant normal
        let apex_start = data.points.len() as u32;
        for i in 0..n {
            let mid = angle(i as f64 + 0.5);
            push_point(
                &mut data,
                &mut normals,
                Point3::new(0.0, 0.0, height),
                side_normal(mid),
            );
        }
        for i in 0..n as u32 {
            let next = (i + 1) % n as u32;
            data.triangles
                .push([side_bottom + i, side_bottom + next, apex_start + i]);
        }
        data.verts.push(apex_start);
    }

    // rim circles as closed polylines over the cap rim points
    let mut bottom_loop: Vec<u32> = (0..n as u32).map(|i| bottom_rim + i).collect();
    bottom_loop.push(bottom_rim);
    data.lines.push(bottom_loop);
    if let Some(top_rim) = top_rim {
        let mut top_loop: Vec<u32> = (0..n as u32).map(|i| top_rim + i).collect();
        top_loop.push(top_rim);
        data.lines.push(top_loop);
    }

    data.normals = Some(normals);
    data
}

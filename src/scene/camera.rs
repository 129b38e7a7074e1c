// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Cadshot Contributors

//! View and projection camera model
//!
//! Mirrors the position / focal-point / view-up convention of scene-graph
//! toolkits: the projection is derived from a vertical view angle, and the
//! clipping range either comes from the caller or is fitted to the scene
//! bounds.

use crate::geometry::BoundingBox;
use nalgebra::{Matrix4, Orthographic3, Perspective3, Point3, Vector3};

/// Clipping range used when the scene has no bounds to fit
const EMPTY_SCENE_CLIP: (f64, f64) = (0.1, 1000.0);

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f64>,
    pub focal_point: Point3<f64>,
    pub view_up: Vector3<f64>,
    /// Vertical view angle in degrees
    pub view_angle: f64,
    /// Orthographic instead of perspective projection
    pub parallel_projection: bool,
    /// Near/far override; `None` fits the range to the scene
    pub clipping_range: Option<(f64, f64)>,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 1.0),
            focal_point: Point3::origin(),
            view_up: Vector3::y(),
            view_angle: 30.0,
            parallel_projection: false,
            clipping_range: None,
        }
    }
}

impl Camera {
    /// Unit vector from the camera towards the focal point
    pub fn view_direction(&self) -> Vector3<f64> {
        let dir = self.focal_point - self.position;
        if dir.norm() < 1e-12 {
            -Vector3::z()
        } else {
            dir.normalize()
        }
    }

    /// View-up vector guaranteed not to be parallel to the view direction
    fn usable_up(&self) -> Vector3<f64> {
        let dir = self.view_direction();
        let up = if self.view_up.norm() < 1e-12 {
            Vector3::z()
        } else {
            self.view_up
        };
        if dir.cross(&up).norm() > 1e-9 {
            return up;
        }
        // up looks along the view axis: substitute the world axis least
        // aligned with it
        if dir.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        }
    }

    /// World-to-view transform
    pub fn view_matrix(&self) -> Matrix4<f64> {
        let target = if (self.focal_point - self.position).norm() < 1e-12 {
            self.position + self.view_direction()
        } else {
            self.focal_point
        };
        Matrix4::look_at_rh(&self.position, &target, &self.usable_up())
    }

    /// Half-height of the orthographic frustum at the focal plane.
    ///
    /// Chosen so that switching projections keeps objects around the focal
    /// point at the same apparent size.
    pub fn parallel_scale(&self) -> f64 {
        let distance = (self.focal_point - self.position).norm().max(1e-6);
        distance * (self.view_angle.to_radians() * 0.5).tan()
    }

    /// View-to-clip transform for the given aspect ratio and depth range
    pub fn projection_matrix(&self, aspect: f64, near: f64, far: f64) -> Matrix4<f64> {
        if self.parallel_projection {
            let half_height = self.parallel_scale().max(1e-9);
            let half_width = half_height * aspect;
            Orthographic3::new(
                -half_width,
                half_width,
                -half_height,
                half_height,
                near,
                far,
            )
            .to_homogeneous()
        } else {
            Perspective3::new(aspect, self.view_angle.to_radians(), near, far).to_homogeneous()
        }
    }

    /// Near/far planes for rendering a scene with the given bounds.
    ///
    /// An explicit range is clamped to stay positive and ordered; otherwise
    /// the range is fitted around the bounds with a small margin.
    pub fn resolve_clipping_range(&self, bounds: &BoundingBox) -> (f64, f64) {
        if let Some((near, far)) = self.clipping_range {
            let near = near.max(1e-6);
            return (near, far.max(near + 1e-6));
        }
        if bounds.is_empty() {
            return EMPTY_SCENE_CLIP;
        }

        let dir = self.view_direction();
        let mut nearest = f64::INFINITY;
        let mut farthest = f64::NEG_INFINITY;
        for corner in bounds.corners() {
            let depth = (corner - self.position).dot(&dir);
            nearest = nearest.min(depth);
            farthest = farthest.max(depth);
        }

        let far = (farthest * 1.1).max(1e-3);
        let near = (nearest * 0.9).max(far * 1e-4).max(1e-6);
        (near, far.max(near + 1e-6))
    }
}

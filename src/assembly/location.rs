// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Cadshot Contributors

//! Rigid placement of parts within an assembly

use crate::utils::math::deg_to_rad;
use nalgebra::{Matrix4, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Translation plus XYZ Euler rotation.
///
/// Rotation angles are radians, applied in X, then Y, then Z order around
/// the fixed world axes, before the translation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Location {
    pub translation: Vector3<f64>,
    pub rotation: Vector3<f64>,
}

impl Location {
    pub fn new(translation: Vector3<f64>, rotation: Vector3<f64>) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    pub fn from_translation(translation: Vector3<f64>) -> Self {
        Self {
            translation,
            rotation: Vector3::zeros(),
        }
    }

    /// Convenience constructor taking rotation angles in degrees
    pub fn from_degrees(translation: Vector3<f64>, rotation_degrees: Vector3<f64>) -> Self {
        Self {
            translation,
            rotation: Vector3::new(
                deg_to_rad(rotation_degrees.x),
                deg_to_rad(rotation_degrees.y),
                deg_to_rad(rotation_degrees.z),
            ),
        }
    }

    /// Homogeneous transform placing shape-local points in assembly space
    pub fn to_matrix(&self) -> Matrix4<f64> {
        let rx = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), self.rotation.x);
        let ry = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), self.rotation.y);
        let rz = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), self.rotation.z);
        let rotation = (rz * ry * rx).to_homogeneous();
        Matrix4::new_translation(&self.translation) * rotation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_identity_by_default() {
        let matrix = Location::default().to_matrix();
        assert_relative_eq!(matrix, Matrix4::identity(), epsilon = 1e-12);
    }

    #[test]
    fn test_translation() {
        let location = Location::from_translation(Vector3::new(1.0, 2.0, 3.0));
        let moved = location.to_matrix().transform_point(&Point3::origin());
        assert_relative_eq!(moved, Point3::new(1.0, 2.0, 3.0), epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_about_z() {
        let location = Location::new(Vector3::zeros(), Vector3::new(0.0, 0.0, FRAC_PI_2));
        let turned = location.to_matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(turned, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_rotation_applies_before_translation() {
        let location = Location::new(
            Vector3::new(10.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, FRAC_PI_2),
        );
        let placed = location.to_matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(placed, Point3::new(10.0, 1.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_from_degrees_matches_radians() {
        let degrees = Location::from_degrees(Vector3::zeros(), Vector3::new(0.0, 0.0, 90.0));
        assert_relative_eq!(degrees.rotation.z, FRAC_PI_2, epsilon = 1e-12);
    }
}

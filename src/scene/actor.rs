// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Cadshot Contributors

//! Scene actors pairing poly-data with placement and appearance

use crate::geometry::{BoundingBox, PolyData};
use nalgebra::Matrix4;

/// Appearance of an actor's cells
#[derive(Debug, Clone)]
pub struct ActorProperty {
    /// Base color, `[0, 1]` per channel
    pub color: [f64; 3],
    /// 1.0 is fully opaque
    pub opacity: f64,
    /// Stroke width of line cells in pixels
    pub line_width: f64,
    /// Stamp size of vertex cells in pixels
    pub point_size: f64,
}

impl Default for ActorProperty {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            opacity: 1.0,
            line_width: 1.0,
            point_size: 1.0,
        }
    }
}

/// A drawable: geometry, a world transform and a property
#[derive(Debug, Clone)]
pub struct Actor {
    pub data: PolyData,
    pub transform: Matrix4<f64>,
    pub property: ActorProperty,
}

impl Actor {
    pub fn new(data: PolyData) -> Self {
        Self {
            data,
            transform: Matrix4::identity(),
            property: ActorProperty::default(),
        }
    }

    pub fn with_transform(mut self, transform: Matrix4<f64>) -> Self {
        self.transform = transform;
        self
    }

    /// World-space bounds of the transformed geometry
    pub fn bounds(&self) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        for point in &self.data.points {
            bbox.expand_to_include(&self.transform.transform_point(point));
        }
        bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::tessellate_box;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn test_bounds_follow_transform() {
        let data = tessellate_box(Vector3::new(1.0, 1.0, 1.0));
        let actor = Actor::new(data)
            .with_transform(Matrix4::new_translation(&Vector3::new(5.0, 0.0, 0.0)));

        let bounds = actor.bounds();
        assert_relative_eq!(bounds.min.x, 5.0, epsilon = 1e-12);
        assert_relative_eq!(bounds.max.x, 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_default_property_is_opaque_white() {
        let property = ActorProperty::default();
        assert_eq!(property.color, [1.0, 1.0, 1.0]);
        assert_eq!(property.opacity, 1.0);
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Cadshot Contributors

//! PNG snapshot export for assemblies
//!
//! Every part becomes two actors: surface triangles in the part color, and
//! the feature edges plus vertices re-drawn on top as white wireframe with
//! shading normals stripped. The camera either comes from the options or is
//! placed by a bounding-box heuristic.

use crate::assembly::Assembly;
use crate::geometry::{BoundingBox, CellType, Tolerances};
use crate::render::Renderer;
use crate::scene::{Actor, Camera};
use anyhow::{bail, Context, Result};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Camera position used when the scene is empty or sits exactly at the
/// origin with no extent
const FALLBACK_CAMERA: [f64; 3] = [20.0, 20.0, 20.0];

/// Options controlling [`export_png`].
///
/// Every field has a default, so callers typically start from
/// `SnapshotOptions::default()` and override what they need.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotOptions {
    /// Output image width in pixels
    pub width: u32,
    /// Output image height in pixels
    pub height: u32,
    /// Camera position; `None` derives one from the scene bounds
    pub camera_position: Option<[f64; 3]>,
    /// Camera up direction
    pub view_up_direction: [f64; 3],
    /// Point the camera looks at
    pub focal_point: [f64; 3],
    /// Orthographic instead of perspective projection
    pub parallel_projection: bool,
    /// Background color, `[0, 1]` per channel
    pub background_color: [f64; 3],
    /// Near/far clipping planes; `None` fits them to the scene
    pub clipping_range: Option<[f64; 2]>,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            camera_position: None,
            view_up_direction: [0.0, 0.0, 1.0],
            focal_point: [0.0, 0.0, 0.0],
            parallel_projection: false,
            background_color: [0.8, 0.8, 0.8],
            clipping_range: None,
        }
    }
}

/// Camera position derived from scene bounds: twice the extent along each
/// axis, with a fixed fallback for degenerate scenes
pub fn default_camera_position(bounds: &BoundingBox) -> Point3<f64> {
    if bounds.is_empty() {
        return Point3::from(Vector3::from(FALLBACK_CAMERA));
    }
    let size = bounds.size();
    let position = Point3::new(size.x * 2.0, size.y * 2.0, size.z * 2.0);
    if position.coords.norm() < 1e-9 {
        return Point3::from(Vector3::from(FALLBACK_CAMERA));
    }
    position
}

/// Render an assembly into a PNG file.
///
/// Parts are tessellated with the default tolerances, split into face and
/// edge actors, and rasterized offscreen with the camera described by
/// `options`.
pub fn export_png(
    assembly: &Assembly,
    options: &SnapshotOptions,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    log::info!("Exporting PNG to {}", path.display());

    if options.width == 0 || options.height == 0 {
        bail!(
            "Invalid image size {}x{}: both dimensions must be positive",
            options.width,
            options.height
        );
    }

    let tolerances = Tolerances::default();
    let mut face_actors = Vec::new();
    let mut edge_actors = Vec::new();

    for node in assembly.traverse() {
        for part in &node.parts {
            let color = part.effective_color();
            let transform = part.location.to_matrix();

            let data = part
                .shape
                .tessellate(&tolerances)
                .with_context(|| format!("Failed to tessellate part '{}'", part.name))?;

            let faces = data.extract_cells(&[CellType::Triangle]);
            let mut edges = data.extract_cells(&[CellType::Line, CellType::Vertex]);
            // wireframe renders unlit
            edges.remove_normals();

            let mut face_actor = Actor::new(faces).with_transform(transform);
            face_actor.property.color = color.rgb_array();
            face_actor.property.opacity = color.a;

            let mut edge_actor = Actor::new(edges).with_transform(transform);
            edge_actor.property.color = [1.0, 1.0, 1.0];
            edge_actor.property.line_width = 1.0;

            face_actors.push(face_actor);
            edge_actors.push(edge_actor);
        }
    }

    let mut renderer = Renderer::new(options.width, options.height);
    renderer.background = options.background_color;

    // faces first so the wireframe pass draws over them
    for actor in face_actors {
        renderer.add_actor(actor);
    }
    for actor in edge_actors {
        renderer.add_actor(actor);
    }

    let bounds = renderer.bounds();
    let position = match options.camera_position {
        Some(p) => Point3::from(Vector3::from(p)),
        None => default_camera_position(&bounds),
    };

    renderer.camera = Camera {
        position,
        focal_point: Point3::from(Vector3::from(options.focal_point)),
        view_up: Vector3::from(options.view_up_direction),
        parallel_projection: options.parallel_projection,
        clipping_range: options.clipping_range.map(|r| (r[0], r[1])),
        ..Camera::default()
    };

    let image = renderer.render();
    image
        .save(path)
        .with_context(|| format!("Failed to write PNG to {}", path.display()))?;

    log::info!(
        "Wrote {}x{} snapshot of {} parts",
        options.width,
        options.height,
        assembly.part_count()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = SnapshotOptions::default();
        assert_eq!(options.width, 800);
        assert_eq!(options.height, 600);
        assert!(options.camera_position.is_none());
        assert!(!options.parallel_projection);
        assert_eq!(options.background_color, [0.8, 0.8, 0.8]);
        assert_eq!(options.view_up_direction, [0.0, 0.0, 1.0]);
        assert!(options.clipping_range.is_none());
    }

    #[test]
    fn test_options_deserialize_partial_json() {
        let options: SnapshotOptions =
            serde_json::from_str(r#"{ "width": 320, "parallel_projection": true }"#).unwrap();
        assert_eq!(options.width, 320);
        assert_eq!(options.height, 600);
        assert!(options.parallel_projection);
    }

    #[test]
    fn test_camera_heuristic_doubles_extent() {
        let bounds = BoundingBox::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 2.0, 3.0));
        let position = default_camera_position(&bounds);
        assert_eq!(position, Point3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn test_camera_heuristic_fallback_for_empty_bounds() {
        let position = default_camera_position(&BoundingBox::empty());
        assert_eq!(position, Point3::new(20.0, 20.0, 20.0));
    }

    #[test]
    fn test_camera_heuristic_fallback_for_zero_extent() {
        // a single point has bounds but no extent
        let bounds = BoundingBox::new(Point3::new(1.0, 1.0, 1.0), Point3::new(1.0, 1.0, 1.0));
        let position = default_camera_position(&bounds);
        assert_eq!(position, Point3::new(20.0, 20.0, 20.0));
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let assembly = Assembly::new("empty");
        let options = SnapshotOptions {
            width: 0,
            ..SnapshotOptions::default()
        };
        let result = export_png(&assembly, &options, "/tmp/unused.png");
        assert!(result.is_err());
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Cadshot Contributors

//! Offscreen rendering of scenes to RGB images
//!
//! The renderer walks its actors in insertion order, lights them with a
//! headlight at the camera position, and rasterizes triangles, polylines
//! and vertex cells into a depth-buffered framebuffer.

mod raster;

use crate::geometry::BoundingBox;
use crate::scene::{Actor, Camera};
use image::RgbImage;
use nalgebra::{Matrix4, Point3, Vector3};
use raster::{
    clip_segment_near, clip_triangle_near, draw_point, draw_segment, fill_triangle, to_screen,
    vertex_visible, ClipVertex, FrameBuffer,
};

/// Shading floor so faces turned away from the headlight stay visible
const MIN_INTENSITY: f64 = 0.05;

/// Offscreen renderer drawing actors into an RGB image
pub struct Renderer {
    pub width: u32,
    pub height: u32,
    /// Background color, `[0, 1]` per channel
    pub background: [f64; 3],
    pub camera: Camera,
    actors: Vec<Actor>,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: [0.0, 0.0, 0.0],
            camera: Camera::default(),
            actors: Vec::new(),
        }
    }

    pub fn add_actor(&mut self, actor: Actor) {
        self.actors.push(actor);
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// World bounds over all actors
    pub fn bounds(&self) -> BoundingBox {
        let mut bounds = BoundingBox::empty();
        for actor in &self.actors {
            bounds = bounds.union(&actor.bounds());
        }
        bounds
    }

    /// Rasterize all actors into a fresh image
    pub fn render(&self) -> RgbImage {
        let mut fb = FrameBuffer::new(self.width, self.height, self.background);
        if self.width == 0 || self.height == 0 {
            return fb.into_image();
        }
        let aspect = self.width as f64 / self.height.max(1) as f64;
        let (near, far) = self.camera.resolve_clipping_range(&self.bounds());
        let view_proj =
            self.camera.projection_matrix(aspect, near, far) * self.camera.view_matrix();

        for actor in &self.actors {
            self.draw_actor(&mut fb, actor, &view_proj);
        }

        log::debug!(
            "Rendered {} actors at {}x{} (clip range {:.3}..{:.3})",
            self.actors.len(),
            self.width,
            self.height,
            near,
            far
        );
        fb.into_image()
    }

    fn draw_actor(&self, fb: &mut FrameBuffer, actor: &Actor, view_proj: &Matrix4<f64>) {
        let data = &actor.data;
        if data.is_empty() {
            return;
        }

        let world: Vec<Point3<f64>> = data
            .points
            .iter()
            .map(|p| actor.transform.transform_point(p))
            .collect();

        // per-point shading; data without normals renders unlit
        let intensities: Vec<f64> = match &data.normals {
            Some(normals) => {
                let normal_matrix = actor
                    .transform
                    .try_inverse()
                    .map(|m| m.transpose())
                    .unwrap_or(actor.transform);
                world
                    .iter()
                    .zip(normals)
                    .map(|(point, normal)| {
                        let n = normal_matrix.transform_vector(normal);
                        headlight_intensity(&self.camera.position, point, &n)
                    })
                    .collect()
            }
            None => vec![1.0; world.len()],
        };

        let clip: Vec<_> = world
            .iter()
            .map(|p| view_proj * p.to_homogeneous())
            .collect();
        let vertex = |i: u32| ClipVertex {
            position: clip[i as usize],
            intensity: intensities[i as usize],
        };

        let property = &actor.property;
        for tri in &data.triangles {
            let corners = [vertex(tri[0]), vertex(tri[1]), vertex(tri[2])];
            for clipped in clip_triangle_near(&corners) {
                let screen = [
                    to_screen(&clipped[0], self.width, self.height),
                    to_screen(&clipped[1], self.width, self.height),
                    to_screen(&clipped[2], self.width, self.height),
                ];
                fill_triangle(fb, &screen, property.color, property.opacity);
            }
        }

        for line in &data.lines {
            for pair in line.windows(2) {
                let (a, b) = match clip_segment_near(&vertex(pair[0]), &vertex(pair[1])) {
                    Some(clipped) => clipped,
                    None => continue,
                };
                draw_segment(
                    fb,
                    &to_screen(&a, self.width, self.height),
                    &to_screen(&b, self.width, self.height),
                    property.color,
                    property.opacity,
                    property.line_width,
                );
            }
        }

        for &index in &data.verts {
            let v = vertex(index);
            if vertex_visible(&v) {
                draw_point(
                    fb,
                    &to_screen(&v, self.width, self.height),
                    property.color,
                    property.opacity,
                    property.point_size,
                );
            }
        }
    }
}

/// Cosine intensity of a headlight at the camera, floored so geometry
/// never goes fully black
fn headlight_intensity(eye: &Point3<f64>, point: &Point3<f64>, normal: &Vector3<f64>) -> f64 {
    let to_eye = eye - point;
    let distance = to_eye.norm();
    let normal_len = normal.norm();
    if distance < 1e-12 || normal_len < 1e-12 {
        return 1.0;
    }
    (normal.dot(&to_eye) / (normal_len * distance))
        .abs()
        .max(MIN_INTENSITY)
        .min(1.0)
}

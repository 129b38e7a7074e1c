// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Cadshot Contributors

//! Low-level rasterization over an RGB framebuffer
//!
//! Works in two spaces: clip space (after view and projection, before the
//! perspective divide) for near-plane clipping, and screen space (pixel
//! coordinates plus NDC depth) for scan conversion. Depth values are NDC z,
//! so smaller is closer and the buffer starts at +infinity.

use crate::utils::math::lerp;
use image::{Rgb, RgbImage};
use nalgebra::Vector4;

/// Depth offset pulling line and vertex fragments towards the camera so
/// wireframe wins depth ties against the faces it sits on
const EDGE_DEPTH_BIAS: f64 = 1.5e-3;

const NEAR_EPS: f64 = 1e-9;

/// Vertex in clip space with its shading intensity
#[derive(Debug, Clone, Copy)]
pub(crate) struct ClipVertex {
    pub position: Vector4<f64>,
    pub intensity: f64,
}

/// Vertex mapped to the viewport: pixel coordinates, NDC depth, intensity
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScreenVertex {
    pub x: f64,
    pub y: f64,
    pub depth: f64,
    pub intensity: f64,
}

/// Color target plus z-buffer
pub(crate) struct FrameBuffer {
    image: RgbImage,
    depth: Vec<f64>,
    width: u32,
    height: u32,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32, background: [f64; 3]) -> Self {
        let fill = Rgb([
            channel(background[0]),
            channel(background[1]),
            channel(background[2]),
        ]);
        Self {
            image: RgbImage::from_pixel(width, height, fill),
            depth: vec![f64::INFINITY; width as usize * height as usize],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Depth-tested source-over blend of a single fragment
    fn blend(&mut self, x: u32, y: u32, depth: f64, color: [f64; 3], opacity: f64) {
        let index = y as usize * self.width as usize + x as usize;
        if depth >= self.depth[index] {
            return;
        }
        self.depth[index] = depth;

        let Rgb(dst) = *self.image.get_pixel(x, y);
        let alpha = opacity.clamp(0.0, 1.0);
        let mut out = [0u8; 3];
        for c in 0..3 {
            let src = color[c].clamp(0.0, 1.0);
            let blended = src * alpha + (dst[c] as f64 / 255.0) * (1.0 - alpha);
            out[c] = (blended * 255.0).round() as u8;
        }
        self.image.put_pixel(x, y, Rgb(out));
    }
}

fn channel(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Signed near-plane distance in clip space; positive is in front
fn near_value(v: &ClipVertex) -> f64 {
    v.position.z + v.position.w
}

fn in_front_of_near(v: &ClipVertex) -> bool {
    near_value(v) > NEAR_EPS
}

fn intersect_near(a: &ClipVertex, b: &ClipVertex) -> ClipVertex {
    let fa = near_value(a);
    let fb = near_value(b);
    let t = fa / (fa - fb);
    ClipVertex {
        position: a.position + (b.position - a.position) * t,
        intensity: lerp(a.intensity, b.intensity, t),
    }
}

/// Clip a triangle against the near plane. Yields nothing when fully
/// behind, the input when fully in front, and one or two triangles when
/// the plane cuts it.
pub(crate) fn clip_triangle_near(triangle: &[ClipVertex; 3]) -> Vec<[ClipVertex; 3]> {
    let mut polygon: Vec<ClipVertex> = Vec::with_capacity(4);
    for i in 0..3 {
        let current = &triangle[i];
        let next = &triangle[(i + 1) % 3];
        let current_in = in_front_of_near(current);
        if current_in {
            polygon.push(*current);
        }
        if current_in != in_front_of_near(next) {
            polygon.push(intersect_near(current, next));
        }
    }
    match polygon.len() {
        3 => vec![[polygon[0], polygon[1], polygon[2]]],
        4 => vec![
            [polygon[0], polygon[1], polygon[2]],
            [polygon[0], polygon[2], polygon[3]],
        ],
        _ => Vec::new(),
    }
}

/// Clip a segment against the near plane
pub(crate) fn clip_segment_near(
    a: &ClipVertex,
    b: &ClipVertex,
) -> Option<(ClipVertex, ClipVertex)> {
    match (in_front_of_near(a), in_front_of_near(b)) {
        (true, true) => Some((*a, *b)),
        (true, false) => Some((*a, intersect_near(a, b))),
        (false, true) => Some((intersect_near(a, b), *b)),
        (false, false) => None,
    }
}

pub(crate) fn vertex_visible(v: &ClipVertex) -> bool {
    in_front_of_near(v)
}

/// Perspective divide and viewport mapping. Pixel y grows downwards.
pub(crate) fn to_screen(v: &ClipVertex, width: u32, height: u32) -> ScreenVertex {
    let w = v.position.w;
    let inv = if w.abs() > 1e-12 { 1.0 / w } else { 1.0 };
    ScreenVertex {
        x: (v.position.x * inv * 0.5 + 0.5) * width as f64,
        y: (0.5 - v.position.y * inv * 0.5) * height as f64,
        depth: v.position.z * inv,
        intensity: v.intensity,
    }
}

fn edge(ax: f64, ay: f64, bx: f64, by: f64, px: f64, py: f64) -> f64 {
    (px - ax) * (by - ay) - (py - ay) * (bx - ax)
}

/// Rasterize a filled triangle with barycentric depth and intensity
pub(crate) fn fill_triangle(
    fb: &mut FrameBuffer,
    triangle: &[ScreenVertex; 3],
    color: [f64; 3],
    opacity: f64,
) {
    let [v0, v1, v2] = triangle;

    let min_xf = v0.x.min(v1.x).min(v2.x);
    let max_xf = v0.x.max(v1.x).max(v2.x);
    let min_yf = v0.y.min(v1.y).min(v2.y);
    let max_yf = v0.y.max(v1.y).max(v2.y);
    if max_xf < 0.0
        || max_yf < 0.0
        || min_xf >= fb.width() as f64
        || min_yf >= fb.height() as f64
    {
        return;
    }

    let area = edge(v0.x, v0.y, v1.x, v1.y, v2.x, v2.y);
    if area.abs() < 1e-12 {
        return;
    }
    let inv_area = 1.0 / area;

    let min_x = min_xf.floor().max(0.0) as u32;
    let max_x = max_xf.ceil().min(fb.width() as f64 - 1.0) as u32;
    let min_y = min_yf.floor().max(0.0) as u32;
    let max_y = max_yf.ceil().min(fb.height() as f64 - 1.0) as u32;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = x as f64 + 0.5;
            let py = y as f64 + 0.5;
            let w0 = edge(v1.x, v1.y, v2.x, v2.y, px, py);
            let w1 = edge(v2.x, v2.y, v0.x, v0.y, px, py);
            let w2 = edge(v0.x, v0.y, v1.x, v1.y, px, py);

            let inside = (w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0)
                || (w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0);
            if !inside {
                continue;
            }

            let b0 = w0 * inv_area;
            let b1 = w1 * inv_area;
            let b2 = w2 * inv_area;

            let depth = b0 * v0.depth + b1 * v1.depth + b2 * v2.depth;
            // beyond the far plane
            if depth > 1.0 {
                continue;
            }

            let intensity =
                (b0 * v0.intensity + b1 * v1.intensity + b2 * v2.intensity).clamp(0.0, 1.0);
            let shaded = [
                color[0] * intensity,
                color[1] * intensity,
                color[2] * intensity,
            ];
            fb.blend(x, y, depth, shaded, opacity);
        }
    }
}

/// Draw a line segment by stepping one pixel at a time, depth-biased
/// towards the camera
pub(crate) fn draw_segment(
    fb: &mut FrameBuffer,
    a: &ScreenVertex,
    b: &ScreenVertex,
    color: [f64; 3],
    opacity: f64,
    width: f64,
) {
    let Some((a, b)) = clip_segment_viewport(a, b, fb.width(), fb.height()) else {
        return;
    };

    let steps = (b.x - a.x).abs().max((b.y - a.y).abs()).ceil().max(1.0);
    let count = steps as usize;
    let radius = stamp_radius(width);
    for i in 0..=count {
        let t = i as f64 / steps;
        let x = lerp(a.x, b.x, t);
        let y = lerp(a.y, b.y, t);
        let depth = lerp(a.depth, b.depth, t) - EDGE_DEPTH_BIAS;
        stamp(fb, x, y, depth, radius, color, opacity);
    }
}

/// Draw a vertex cell as a square stamp
pub(crate) fn draw_point(
    fb: &mut FrameBuffer,
    v: &ScreenVertex,
    color: [f64; 3],
    opacity: f64,
    size: f64,
) {
    stamp(
        fb,
        v.x,
        v.y,
        v.depth - EDGE_DEPTH_BIAS,
        stamp_radius(size),
        color,
        opacity,
    );
}

fn stamp_radius(size: f64) -> i64 {
    ((size - 1.0) / 2.0).round().max(0.0) as i64
}

fn stamp(
    fb: &mut FrameBuffer,
    x: f64,
    y: f64,
    depth: f64,
    radius: i64,
    color: [f64; 3],
    opacity: f64,
) {
    if depth > 1.0 {
        return;
    }
    let cx = x.floor() as i64;
    let cy = y.floor() as i64;
    for oy in -radius..=radius {
        for ox in -radius..=radius {
            let px = cx + ox;
            let py = cy + oy;
            if px < 0 || py < 0 || px >= fb.width() as i64 || py >= fb.height() as i64 {
                continue;
            }
            fb.blend(px as u32, py as u32, depth, color, opacity);
        }
    }
}

/// Liang-Barsky clip of a segment to the viewport rectangle, keeping depth
/// and intensity interpolated. Bounds segment length before the pixel walk.
fn clip_segment_viewport(
    a: &ScreenVertex,
    b: &ScreenVertex,
    width: u32,
    height: u32,
) -> Option<(ScreenVertex, ScreenVertex)> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;

    let checks = [
        (-dx, a.x),
        (dx, width as f64 - a.x),
        (-dy, a.y),
        (dy, height as f64 - a.y),
    ];
    for (p, q) in checks {
        if p.abs() < 1e-12 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                if r > t0 {
                    t0 = r;
                }
            } else {
                if r < t0 {
                    return None;
                }
                if r < t1 {
                    t1 = r;
                }
            }
        }
    }

    let at = |t: f64| ScreenVertex {
        x: lerp(a.x, b.x, t),
        y: lerp(a.y, b.y, t),
        depth: lerp(a.depth, b.depth, t),
        intensity: lerp(a.intensity, b.intensity, t),
    };
    Some((at(t0), at(t1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen(x: f64, y: f64, depth: f64) -> ScreenVertex {
        ScreenVertex {
            x,
            y,
            depth,
            intensity: 1.0,
        }
    }

    fn clip(x: f64, y: f64, z: f64, w: f64) -> ClipVertex {
        ClipVertex {
            position: Vector4::new(x, y, z, w),
            intensity: 1.0,
        }
    }

    #[test]
    fn test_framebuffer_background() {
        let fb = FrameBuffer::new(4, 4, [1.0, 0.0, 0.5]);
        let image = fb.into_image();
        assert_eq!(image.get_pixel(0, 0), &Rgb([255, 0, 128]));
        assert_eq!(image.get_pixel(3, 3), &Rgb([255, 0, 128]));
    }

    #[test]
    fn test_fill_triangle_covers_center() {
        let mut fb = FrameBuffer::new(8, 8, [0.0, 0.0, 0.0]);
        let triangle = [screen(0.0, 0.0, 0.0), screen(8.0, 0.0, 0.0), screen(0.0, 8.0, 0.0)];
        fill_triangle(&mut fb, &triangle, [0.0, 1.0, 0.0], 1.0);

        let image = fb.into_image();
        assert_eq!(image.get_pixel(1, 1), &Rgb([0, 255, 0]));
        // outside the hypotenuse stays background
        assert_eq!(image.get_pixel(7, 7), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_depth_test_keeps_nearer_fragment() {
        let mut fb = FrameBuffer::new(8, 8, [0.0, 0.0, 0.0]);
        let near = [screen(0.0, 0.0, 0.1), screen(8.0, 0.0, 0.1), screen(0.0, 8.0, 0.1)];
        let far = [screen(0.0, 0.0, 0.9), screen(8.0, 0.0, 0.9), screen(0.0, 8.0, 0.9)];

        fill_triangle(&mut fb, &near, [1.0, 0.0, 0.0], 1.0);
        fill_triangle(&mut fb, &far, [0.0, 0.0, 1.0], 1.0);

        let image = fb.into_image();
        assert_eq!(image.get_pixel(1, 1), &Rgb([255, 0, 0]));
    }

    #[test]
    fn test_translucent_blend() {
        let mut fb = FrameBuffer::new(4, 4, [0.0, 0.0, 0.0]);
        let triangle = [screen(0.0, 0.0, 0.0), screen(4.0, 0.0, 0.0), screen(0.0, 4.0, 0.0)];
        fill_triangle(&mut fb, &triangle, [1.0, 1.0, 1.0], 0.5);

        let image = fb.into_image();
        let Rgb(pixel) = *image.get_pixel(0, 0);
        assert!(pixel[0] > 120 && pixel[0] < 135);
    }

    #[test]
    fn test_offscreen_triangle_is_skipped() {
        let mut fb = FrameBuffer::new(4, 4, [0.0, 0.0, 0.0]);
        let triangle = [
            screen(-20.0, -20.0, 0.0),
            screen(-10.0, -20.0, 0.0),
            screen(-20.0, -10.0, 0.0),
        ];
        fill_triangle(&mut fb, &triangle, [1.0, 1.0, 1.0], 1.0);

        let image = fb.into_image();
        assert_eq!(image.get_pixel(0, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_clip_triangle_fully_in_front() {
        let triangle = [
            clip(0.0, 0.0, 0.0, 1.0),
            clip(1.0, 0.0, 0.0, 1.0),
            clip(0.0, 1.0, 0.0, 1.0),
        ];
        assert_eq!(clip_triangle_near(&triangle).len(), 1);
    }

    #[test]
    fn test_clip_triangle_fully_behind() {
        let triangle = [
            clip(0.0, 0.0, -2.0, 1.0),
            clip(1.0, 0.0, -2.0, 1.0),
            clip(0.0, 1.0, -2.0, 1.0),
        ];
        assert!(clip_triangle_near(&triangle).is_empty());
    }

    #[test]
    fn test_clip_triangle_crossing_near_plane() {
        // one vertex behind the plane leaves a quad, split into two
        let triangle = [
            clip(0.0, 0.0, -2.0, 1.0),
            clip(1.0, 0.0, 0.0, 1.0),
            clip(0.0, 1.0, 0.0, 1.0),
        ];
        assert_eq!(clip_triangle_near(&triangle).len(), 2);

        // two vertices behind leave a single smaller triangle
        let triangle = [
            clip(0.0, 0.0, -2.0, 1.0),
            clip(1.0, 0.0, -2.0, 1.0),
            clip(0.0, 1.0, 0.0, 1.0),
        ];
        assert_eq!(clip_triangle_near(&triangle).len(), 1);
    }

    #[test]
    fn test_clip_segment_near() {
        let a = clip(0.0, 0.0, 0.0, 1.0);
        let behind = clip(0.0, 0.0, -3.0, 1.0);

        assert!(clip_segment_near(&a, &a).is_some());
        assert!(clip_segment_near(&behind, &behind).is_none());

        let (_, clipped) = clip_segment_near(&a, &behind).unwrap();
        let f = clipped.position.z + clipped.position.w;
        assert!(f.abs() < 1e-9);
    }

    #[test]
    fn test_segment_draws_pixels() {
        let mut fb = FrameBuffer::new(8, 8, [0.0, 0.0, 0.0]);
        draw_segment(
            &mut fb,
            &screen(0.5, 4.5, 0.0),
            &screen(7.5, 4.5, 0.0),
            [1.0, 1.0, 1.0],
            1.0,
            1.0,
        );
        let image = fb.into_image();
        assert_eq!(image.get_pixel(3, 4), &Rgb([255, 255, 255]));
        assert_eq!(image.get_pixel(3, 2), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_segment_beats_coplanar_triangle() {
        let mut fb = FrameBuffer::new(8, 8, [0.0, 0.0, 0.0]);
        let triangle = [screen(0.0, 0.0, 0.5), screen(8.0, 0.0, 0.5), screen(0.0, 8.0, 0.5)];
        fill_triangle(&mut fb, &triangle, [1.0, 0.0, 0.0], 1.0);
        draw_segment(
            &mut fb,
            &screen(0.5, 1.5, 0.5),
            &screen(6.5, 1.5, 0.5),
            [1.0, 1.0, 1.0],
            1.0,
            1.0,
        );
        let image = fb.into_image();
        assert_eq!(image.get_pixel(2, 1), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_segment_clipped_to_viewport() {
        let mut fb = FrameBuffer::new(8, 8, [0.0, 0.0, 0.0]);
        // crosses the whole viewport from far outside
        draw_segment(
            &mut fb,
            &screen(-1000.0, 3.5, 0.0),
            &screen(1000.0, 3.5, 0.0),
            [1.0, 1.0, 1.0],
            1.0,
            1.0,
        );
        let image = fb.into_image();
        assert_eq!(image.get_pixel(0, 3), &Rgb([255, 255, 255]));
        assert_eq!(image.get_pixel(7, 3), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_point_stamp_size() {
        let mut fb = FrameBuffer::new(8, 8, [0.0, 0.0, 0.0]);
        draw_point(&mut fb, &screen(4.0, 4.0, 0.0), [1.0, 1.0, 1.0], 1.0, 3.0);
        let image = fb.into_image();
        assert_eq!(image.get_pixel(4, 4), &Rgb([255, 255, 255]));
        assert_eq!(image.get_pixel(3, 3), &Rgb([255, 255, 255]));
        assert_eq!(image.get_pixel(5, 5), &Rgb([255, 255, 255]));
        assert_eq!(image.get_pixel(1, 1), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_to_screen_viewport_mapping() {
        // NDC (0, 0) lands at the image center, +y NDC goes up
        let center = to_screen(&clip(0.0, 0.0, 0.0, 1.0), 100, 50);
        assert!((center.x - 50.0).abs() < 1e-9);
        assert!((center.y - 25.0).abs() < 1e-9);

        let top = to_screen(&clip(0.0, 1.0, 0.0, 1.0), 100, 50);
        assert!(top.y.abs() < 1e-9);
    }
}

//! Scanline triangle rasterization and line primitives.
//!
//! The pipeline accumulates [`Primitive`] values in a display list and
//! hands them to a [`RasterBackend`] one at a time, so the backend is
//! swappable without touching the pipeline.
//!
//! Triangles are filled with the classic flat-top/flat-bottom
//! decomposition: vertices are sorted by y, the triangle is split at the
//! middle vertex, and each half is walked scanline by scanline along its
//! edge slopes. Per-pixel attributes come from barycentric weights
//! against the sorted screen-space vertices; depth and UVs interpolate
//! through `1/w`, which is linear in screen space, making the result
//! perspective correct.

use crate::math::utils::{barycentric_weights, parallelogram_area};
use crate::math::vec2::Vec2;
use crate::math::vec4::Vec4;
use crate::texture::Texture;

use super::framebuffer::FrameBuffer;

/// A draw command in screen space.
///
/// Triangle points carry pixel x/y in `x`/`y`, NDC depth in `z` and the
/// original view-space z in `w`. Lines with depth use `x`, `y` and `w` of
/// their endpoints.
#[derive(Clone, Copy, Debug)]
pub enum Primitive {
    SolidTriangle {
        points: [Vec4; 3],
        color: u32,
    },
    TexturedTriangle {
        points: [Vec4; 3],
        uvs: [Vec2; 3],
    },
    Line3d {
        from: Vec4,
        to: Vec4,
        color: u32,
    },
    LineOverlay {
        from: Vec2,
        to: Vec2,
        color: u32,
    },
    Rect {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: u32,
    },
}

/// Trait for rasterization backends consuming the display list.
pub trait RasterBackend {
    /// Draw a single primitive into the frame buffer.
    ///
    /// Out-of-viewport coordinates are clipped or skipped by the
    /// primitives themselves; a draw call never fails.
    fn draw(&self, primitive: &Primitive, buffer: &mut FrameBuffer, texture: Option<&Texture>);
}

/// A screen-space vertex with every attribute the scanline walk swaps in
/// parallel while sorting by y.
#[derive(Clone, Copy)]
struct ScreenVertex {
    x: i32,
    y: i32,
    w: f32,
    uv: Vec2,
}

impl ScreenVertex {
    fn from_point(point: Vec4, uv: Vec2) -> Self {
        Self {
            x: point.x as i32,
            y: point.y as i32,
            w: point.w,
            uv,
        }
    }

    fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

/// Per-pixel color computation for the shared scanline traversal.
///
/// Receives the barycentric weights of the pixel and the already
/// reconstructed interpolated `1/w`.
trait SpanShader {
    fn shade(&self, weights: [f32; 3], one_over_w: f32) -> u32;
}

/// Solid fill: one flat-shaded color for the whole face.
struct SolidShader {
    color: u32,
}

impl SpanShader for SolidShader {
    #[inline]
    fn shade(&self, _weights: [f32; 3], _one_over_w: f32) -> u32 {
        self.color
    }
}

/// Texture fill: perspective-correct UV reconstruction plus a
/// nearest-neighbor sample.
struct TextureShader<'a> {
    texture: &'a Texture,
    u_over_w: [f32; 3],
    v_over_w: [f32; 3],
}

impl<'a> TextureShader<'a> {
    fn new(texture: &'a Texture, vertices: &[ScreenVertex; 3]) -> Self {
        Self {
            texture,
            u_over_w: [
                vertices[0].uv.x / vertices[0].w,
                vertices[1].uv.x / vertices[1].w,
                vertices[2].uv.x / vertices[2].w,
            ],
            v_over_w: [
                vertices[0].uv.y / vertices[0].w,
                vertices[1].uv.y / vertices[1].w,
                vertices[2].uv.y / vertices[2].w,
            ],
        }
    }
}

impl SpanShader for TextureShader<'_> {
    #[inline]
    fn shade(&self, weights: [f32; 3], one_over_w: f32) -> u32 {
        let [alpha, beta, gamma] = weights;
        let u = (self.u_over_w[0] * alpha + self.u_over_w[1] * beta + self.u_over_w[2] * gamma)
            / one_over_w;
        let v = (self.v_over_w[0] * alpha + self.v_over_w[1] * beta + self.v_over_w[2] * gamma)
            / one_over_w;
        self.texture.sample(u, v)
    }
}

/// Scanline rasterizer with a depth-buffered pixel pipeline.
pub struct ScanlineRasterizer;

impl ScanlineRasterizer {
    pub fn new() -> Self {
        Self
    }

    /// Sorts the vertices ascending in y with three conditional swaps,
    /// carrying w and UV along with each position.
    fn sort_by_y(vertices: &mut [ScreenVertex; 3]) {
        if vertices[0].y > vertices[1].y {
            vertices.swap(0, 1);
        }
        if vertices[1].y > vertices[2].y {
            vertices.swap(1, 2);
        }
        if vertices[0].y > vertices[1].y {
            vertices.swap(0, 1);
        }
    }

    /// Shared scanline traversal for solid and textured fills.
    ///
    /// Splits the sorted triangle at the middle vertex and walks the
    /// flat-bottom upper half and flat-top lower half along their edge
    /// slopes. A half with zero height contributes nothing, so flat-top
    /// and flat-bottom inputs use only the matching half.
    fn fill_triangle<S: SpanShader>(v: &[ScreenVertex; 3], buffer: &mut FrameBuffer, shader: &S) {
        // Vertices must be in front of the camera; clipping guarantees
        // this, stray input is skipped
        if v[0].w <= 0.0 || v[1].w <= 0.0 || v[2].w <= 0.0 {
            return;
        }

        let mut v = *v;
        Self::sort_by_y(&mut v);

        let (a, b, c) = (v[0].as_vec2(), v[1].as_vec2(), v[2].as_vec2());
        let area = parallelogram_area(a, b, c);
        if area == 0.0 {
            // Degenerate triangle
            return;
        }
        let inv_area = 1.0 / area;

        let one_over_w = [1.0 / v[0].w, 1.0 / v[1].w, 1.0 / v[2].w];

        let (x0, y0) = (v[0].x, v[0].y);
        let (x1, y1) = (v[1].x, v[1].y);
        let (x2, y2) = (v[2].x, v[2].y);

        let mut span = |x_start: i32, x_end: i32, y: i32| {
            if y < 0 || y >= buffer.height() as i32 {
                return;
            }
            let (x_start, x_end) = if x_end < x_start {
                (x_end, x_start)
            } else {
                (x_start, x_end)
            };
            let x_start = x_start.max(0);
            let x_end = x_end.min(buffer.width() as i32);
            for x in x_start..x_end {
                let p = Vec2::new(x as f32, y as f32);
                let weights = barycentric_weights(a, b, c, p, inv_area);
                let interpolated = weights[0] * one_over_w[0]
                    + weights[1] * one_over_w[1]
                    + weights[2] * one_over_w[2];
                if interpolated <= 0.0 {
                    continue;
                }
                let depth = 1.0 - interpolated;
                buffer.set_pixel_with_depth(x, y, depth, shader.shade(weights, interpolated));
            }
        };

        // Upper half (flat bottom), scanlines y0 .. y1-1
        if y1 - y0 != 0 {
            let m1 = -((y1 - y0) as f32 / (x0 - x1) as f32);
            let m2 = (y2 - y0) as f32 / (x2 - x0) as f32;
            for i in 0..(y1 - y0) {
                let x_start = x0 + (i as f32 / m1) as i32;
                let x_end = x0 + (i as f32 / m2) as i32;
                span(x_start, x_end, y0 + i);
            }
        }

        // Lower half (flat top), scanlines y2 down to y1, mirrored
        // around (x2, y2)
        if y2 - y1 != 0 {
            let m1 = -((y2 - y1) as f32 / (x2 - x1) as f32);
            let m2 = -((y2 - y0) as f32 / (x2 - x0) as f32);
            for i in 0..=(y2 - y1) {
                let x_start = x2 + (i as f32 / m1) as i32;
                let x_end = x2 + (i as f32 / m2) as i32;
                span(x_start, x_end, y2 - i);
            }
        }
    }

    /// DDA line without depth, used for overlays.
    fn draw_line(buffer: &mut FrameBuffer, from: Vec2, to: Vec2, color: u32) {
        let dx = to.x - from.x;
        let dy = to.y - from.y;

        let side_length = dx.abs().max(dy.abs()).round() as i32;
        if side_length == 0 {
            return;
        }

        let x_inc = dx / side_length as f32;
        let y_inc = dy / side_length as f32;

        for i in 0..=side_length {
            let x = (from.x + x_inc * i as f32).round() as i32;
            let y = (from.y + y_inc * i as f32).round() as i32;
            buffer.set_pixel(x, y, color);
        }
    }

    /// DDA line with linear `1/w` interpolation and depth testing, so
    /// wireframes and normal segments occlude correctly.
    fn draw_line_3d(buffer: &mut FrameBuffer, from: Vec4, to: Vec4, color: u32) {
        if from.w <= 0.0 || to.w <= 0.0 {
            return;
        }

        let dx = to.x - from.x;
        let dy = to.y - from.y;

        let side_length = dx.abs().max(dy.abs()).round() as i32;
        if side_length == 0 {
            return;
        }

        let inv_w0 = 1.0 / from.w;
        let inv_w1 = 1.0 / to.w;

        let x_inc = dx / side_length as f32;
        let y_inc = dy / side_length as f32;
        let w_inc = (inv_w1 - inv_w0) / side_length as f32;

        for i in 0..=side_length {
            let x = (from.x + x_inc * i as f32).round() as i32;
            let y = (from.y + y_inc * i as f32).round() as i32;
            let one_over_w = inv_w0 + w_inc * i as f32;
            let depth = 1.0 - one_over_w;
            buffer.set_pixel_with_depth(x, y, depth, color);
        }
    }

    /// Axis-aligned filled rectangle without depth, used for vertex dots.
    fn draw_rect(buffer: &mut FrameBuffer, x: i32, y: i32, width: i32, height: i32, color: u32) {
        for dy in 0..height {
            for dx in 0..width {
                buffer.set_pixel(x + dx, y + dy, color);
            }
        }
    }
}

impl Default for ScanlineRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterBackend for ScanlineRasterizer {
    fn draw(&self, primitive: &Primitive, buffer: &mut FrameBuffer, texture: Option<&Texture>) {
        match primitive {
            Primitive::SolidTriangle { points, color } => {
                let vertices = [
                    ScreenVertex::from_point(points[0], Vec2::ZERO),
                    ScreenVertex::from_point(points[1], Vec2::ZERO),
                    ScreenVertex::from_point(points[2], Vec2::ZERO),
                ];
                Self::fill_triangle(&vertices, buffer, &SolidShader { color: *color });
            }
            Primitive::TexturedTriangle { points, uvs } => {
                let Some(texture) = texture else {
                    return;
                };
                // Source assets are upper-origin: flip V right before
                // rasterization
                let vertices = [
                    ScreenVertex::from_point(points[0], Vec2::new(uvs[0].x, 1.0 - uvs[0].y)),
                    ScreenVertex::from_point(points[1], Vec2::new(uvs[1].x, 1.0 - uvs[1].y)),
                    ScreenVertex::from_point(points[2], Vec2::new(uvs[2].x, 1.0 - uvs[2].y)),
                ];
                let shader = TextureShader::new(texture, &vertices);
                Self::fill_triangle(&vertices, buffer, &shader);
            }
            Primitive::Line3d { from, to, color } => {
                Self::draw_line_3d(buffer, *from, *to, *color);
            }
            Primitive::LineOverlay { from, to, color } => {
                Self::draw_line(buffer, *from, *to, *color);
            }
            Primitive::Rect {
                x,
                y,
                width,
                height,
                color,
            } => {
                Self::draw_rect(buffer, *x, *y, *width, *height, *color);
            }
        }
    }
}

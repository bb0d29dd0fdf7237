//! Core rendering pipeline.
//!
//! The [`Engine`] drives the per-frame fixed-function pipeline: vertex
//! transformation (model -> world -> view), back-face culling, view-space
//! frustum clipping, perspective projection and flat shading. The
//! resulting triangle queue is handed to the rasterizer, which writes
//! pixels through the depth buffer into the color buffer.
//!
//! Everything the pipeline reads per frame arrives in a [`RenderParams`]
//! snapshot; the only state the pipeline itself writes back is the
//! camera, which is updated from input by the caller.

use std::fmt;

use crate::camera::Camera;
use crate::clipping::{ClipPolygon, ClipVertex, Frustum};
use crate::colors;
use crate::light::DirectionalLight;
use crate::mesh::Mesh;
use crate::prelude::{Mat4, Vec2, Vec3, Vec4};
use crate::render::{FrameBuffer, Primitive, RasterBackend, Renderer, ScanlineRasterizer};
use crate::triangle::Triangle;

/// Length of the projected face-normal visualization segment, in view
/// space units.
const NORMAL_SEGMENT_LENGTH: f32 = 0.05;

/// Pixel spacing of the background grid overlay.
const GRID_SPACING: u32 = 50;

/// Per-frame rendering options, built from the UI snapshot and passed to
/// the pipeline by reference.
#[derive(Debug, Clone)]
pub struct RenderParams {
    pub draw_grid: bool,
    pub draw_wireframe: bool,
    pub draw_wireframe_dots: bool,
    pub draw_triangle_normals: bool,
    pub draw_filled_triangles: bool,
    pub draw_textured_triangles: bool,
    pub enable_backface_culling: bool,
    pub model_scale: Vec3,
    pub model_rotation: Vec3,
    pub model_translation: Vec3,
    pub light_direction: Vec3,
    pub fov_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            draw_grid: true,
            draw_wireframe: false,
            draw_wireframe_dots: false,
            draw_triangle_normals: false,
            draw_filled_triangles: false,
            draw_textured_triangles: true,
            enable_backface_culling: true,
            model_scale: Vec3::ONE,
            model_rotation: Vec3::ZERO,
            model_translation: Vec3::new(0.0, 0.0, 5.0),
            light_direction: Vec3::new(0.0, 0.0, 1.0),
            fov_degrees: 60.0,
            z_near: 0.5,
            z_far: 20.0,
        }
    }
}

/// Scene configuration rejected at setup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    InvalidDimensions { width: u32, height: u32 },
    InvalidDepthRange { z_near: f32, z_far: f32 },
    InvalidFov(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDimensions { width, height } => {
                write!(f, "render target dimensions {}x{} are invalid", width, height)
            }
            ConfigError::InvalidDepthRange { z_near, z_far } => {
                write!(f, "depth range [{}, {}] is invalid", z_near, z_far)
            }
            ConfigError::InvalidFov(fov) => {
                write!(f, "field of view {} degrees is out of range", fov)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

pub struct Engine {
    renderer: Renderer,
    rasterizer: ScanlineRasterizer,
    triangles_to_render: Vec<Triangle>,
    mesh: Mesh,
    camera: Camera,
    projection_matrix: Mat4,
    frustum: Frustum,
}

impl Engine {
    /// Create an engine for a fixed-size render target.
    ///
    /// Configuration errors are detected here, before the first frame;
    /// the pipeline never runs against a malformed scene.
    pub fn new(
        width: u32,
        height: u32,
        mesh: Mesh,
        params: &RenderParams,
    ) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidDimensions { width, height });
        }
        if !(params.z_near > 0.0 && params.z_near < params.z_far) {
            return Err(ConfigError::InvalidDepthRange {
                z_near: params.z_near,
                z_far: params.z_far,
            });
        }
        if !(params.fov_degrees > 0.0 && params.fov_degrees < 180.0) {
            return Err(ConfigError::InvalidFov(params.fov_degrees));
        }

        let (projection_matrix, frustum) = Self::projection(width, height, params);

        Ok(Self {
            renderer: Renderer::new(width, height),
            rasterizer: ScanlineRasterizer::new(),
            triangles_to_render: Vec::new(),
            mesh,
            camera: Camera::new(Vec3::ZERO),
            projection_matrix,
            frustum,
        })
    }

    /// Projection matrix and matching view frustum for the given
    /// parameters. The horizontal fov is derived from the vertical one:
    /// tan(fov_x / 2) = aspect * tan(fov_y / 2).
    fn projection(width: u32, height: u32, params: &RenderParams) -> (Mat4, Frustum) {
        let fov_y = params.fov_degrees.to_radians();
        let aspect_x = width as f32 / height as f32;
        let aspect_y = height as f32 / width as f32;
        let fov_x = 2.0 * ((fov_y / 2.0).tan() * aspect_x).atan();

        let matrix = Mat4::perspective(fov_y, aspect_y, params.z_near, params.z_far);
        let frustum = Frustum::new(fov_x, fov_y, params.z_near, params.z_far);
        (matrix, frustum)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn width(&self) -> u32 {
        self.renderer.width()
    }

    pub fn height(&self) -> u32 {
        self.renderer.height()
    }

    /// Returns the rendered frame as bytes (ARGB8888 format)
    pub fn frame_buffer(&self) -> &[u8] {
        self.renderer.as_bytes()
    }

    /// Transform, cull, clip, project and shade the mesh, rebuilding the
    /// triangle queue for this frame.
    pub fn update(&mut self, params: &RenderParams) {
        self.triangles_to_render.clear();

        let (projection_matrix, frustum) =
            Self::projection(self.renderer.width(), self.renderer.height(), params);
        self.projection_matrix = projection_matrix;
        self.frustum = frustum;

        self.mesh.set_transform(
            params.model_scale,
            params.model_rotation,
            params.model_translation,
        );

        let world_matrix = Mat4::world(
            self.mesh.scale(),
            self.mesh.rotation(),
            self.mesh.translation(),
        );
        let view_matrix = self.camera.view_matrix();
        let light = DirectionalLight::new(params.light_direction);

        let half_width = self.renderer.width() as f32 / 2.0;
        let half_height = self.renderer.height() as f32 / 2.0;

        for face in self.mesh.faces() {
            let model_positions = [
                self.mesh.vertex(face.a),
                self.mesh.vertex(face.b),
                self.mesh.vertex(face.c),
            ];
            let uvs = [
                self.mesh.texcoord(face.uv_a),
                self.mesh.texcoord(face.uv_b),
                self.mesh.texcoord(face.uv_c),
            ];

            // Model space -> world space -> view space
            let mut view_positions = [Vec3::ZERO; 3];
            for (j, position) in model_positions.iter().enumerate() {
                let world = world_matrix * Vec4::from(*position);
                view_positions[j] = (view_matrix * world).to_vec3();
            }

            // Face normal in view space: AB x AC with normalized edges
            // (left-handed, z grows into the scene)
            let ab = (view_positions[1] - view_positions[0]).normalize();
            let ac = (view_positions[2] - view_positions[0]).normalize();
            let normal = ab.cross(ac).normalize();

            // A face whose normal points away from (or exactly along) the
            // ray back to the camera shows its back side
            if params.enable_backface_culling {
                let camera_ray = Vec3::ZERO - view_positions[0];
                if normal.dot(camera_ray) <= 0.0 {
                    continue;
                }
            }

            // Clip against all six frustum planes, interpolating UVs
            let polygon = ClipPolygon::from_triangle(
                ClipVertex::new(view_positions[0], uvs[0]),
                ClipVertex::new(view_positions[1], uvs[1]),
                ClipVertex::new(view_positions[2], uvs[2]),
            );
            let clipped = self.frustum.clip_polygon(polygon);
            if clipped.is_empty() {
                continue;
            }

            for (v0, v1, v2) in clipped.triangulate() {
                let mut triangle = Triangle::new(
                    [v0.position, v1.position, v2.position],
                    [v0.uv, v1.uv, v2.uv],
                    normal,
                    colors::FILL,
                );
                triangle.color = light.shade(triangle.base_color, triangle.normal);

                let mut visible = true;
                for (j, view_position) in triangle.view_positions.iter().enumerate() {
                    match Self::project_to_screen(
                        &self.projection_matrix,
                        *view_position,
                        half_width,
                        half_height,
                    ) {
                        Some(projected) => triangle.projected[j] = projected,
                        None => {
                            visible = false;
                            break;
                        }
                    }
                }
                if !visible {
                    continue;
                }

                if params.draw_triangle_normals {
                    let center = triangle.center();
                    let tip = center + normal * NORMAL_SEGMENT_LENGTH;
                    let segment = (
                        Self::project_to_screen(
                            &self.projection_matrix,
                            center,
                            half_width,
                            half_height,
                        ),
                        Self::project_to_screen(
                            &self.projection_matrix,
                            tip,
                            half_width,
                            half_height,
                        ),
                    );
                    if let (Some(from), Some(to)) = segment {
                        triangle.projected_normal = Some([from, to]);
                    }
                }

                self.triangles_to_render.push(triangle);
            }
        }
    }

    /// Perspective-project a view-space point and map NDC to pixels.
    ///
    /// Screen y is inverted because it grows downward. Returns `None` for
    /// points at or behind the camera plane; clipping guarantees this
    /// cannot happen for queued geometry.
    fn project_to_screen(
        projection_matrix: &Mat4,
        view_position: Vec3,
        half_width: f32,
        half_height: f32,
    ) -> Option<Vec4> {
        let projected = projection_matrix.project(Vec4::from(view_position));
        if projected.w <= 0.0 {
            return None;
        }
        Some(Vec4::new(
            projected.x * half_width + half_width,
            -projected.y * half_height + half_height,
            projected.z,
            projected.w,
        ))
    }

    /// Background grid overlay: one line every `spacing` columns and rows.
    fn draw_grid(
        rasterizer: &ScanlineRasterizer,
        fb: &mut FrameBuffer,
        spacing: u32,
        color: u32,
    ) {
        let right = fb.width() as f32 - 1.0;
        let bottom = fb.height() as f32 - 1.0;

        for x in (0..fb.width()).step_by(spacing as usize) {
            rasterizer.draw(
                &Primitive::LineOverlay {
                    from: Vec2::new(x as f32, 0.0),
                    to: Vec2::new(x as f32, bottom),
                    color,
                },
                fb,
                None,
            );
        }
        for y in (0..fb.height()).step_by(spacing as usize) {
            rasterizer.draw(
                &Primitive::LineOverlay {
                    from: Vec2::new(0.0, y as f32),
                    to: Vec2::new(right, y as f32),
                    color,
                },
                fb,
                None,
            );
        }
    }

    /// Rasterize the current triangle queue into the color buffer.
    pub fn render(&mut self, params: &RenderParams) {
        self.renderer.clear(colors::BACKGROUND);
        self.renderer.clear_depth();

        let texture = self.mesh.texture();
        let mut fb = self.renderer.as_framebuffer();

        if params.draw_grid {
            Self::draw_grid(&self.rasterizer, &mut fb, GRID_SPACING, colors::GRID);
        }

        for triangle in &self.triangles_to_render {
            if params.draw_filled_triangles && !params.draw_textured_triangles {
                self.rasterizer.draw(
                    &Primitive::SolidTriangle {
                        points: triangle.projected,
                        color: triangle.color,
                    },
                    &mut fb,
                    None,
                );
            }

            if params.draw_textured_triangles {
                self.rasterizer.draw(
                    &Primitive::TexturedTriangle {
                        points: triangle.projected,
                        uvs: triangle.uvs,
                    },
                    &mut fb,
                    Some(texture),
                );
            }

            if params.draw_wireframe {
                let [p0, p1, p2] = triangle.projected;
                for (from, to) in [(p0, p1), (p1, p2), (p2, p0)] {
                    self.rasterizer.draw(
                        &Primitive::Line3d {
                            from,
                            to,
                            color: colors::WIREFRAME,
                        },
                        &mut fb,
                        None,
                    );
                }
            }

            if let (true, Some([from, to])) = (params.draw_triangle_normals, triangle.projected_normal)
            {
                self.rasterizer.draw(
                    &Primitive::Line3d {
                        from,
                        to,
                        color: colors::NORMALS,
                    },
                    &mut fb,
                    None,
                );
            }

            if params.draw_wireframe_dots {
                for point in &triangle.projected {
                    self.rasterizer.draw(
                        &Primitive::Rect {
                            x: point.x as i32 - 1,
                            y: point.y as i32 - 1,
                            width: 3,
                            height: 3,
                            color: colors::VERTEX,
                        },
                        &mut fb,
                        None,
                    );
                }
            }
        }
    }
}

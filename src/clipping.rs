//! View-space frustum clipping.
//!
//! Clipping happens in camera space, before projection, using the
//! Sutherland-Hodgman algorithm against six point + normal planes. Doing
//! it before the perspective divide avoids the singularity at w = 0 and
//! guarantees every surviving vertex has positive view-space z.

use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;

/// Upper bound on polygon size: clipping a triangle against a plane can
/// grow it by at most one vertex, so six planes top out at 3 + 6.
pub const MAX_POLYGON_VERTICES: usize = 9;

/// A plane defined by a point on the plane and its normal vector.
/// The normal points toward the "inside" (visible) half-space.
#[derive(Clone, Copy, Debug)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl Plane {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self { point, normal }
    }

    /// Returns the signed distance from a point to this plane.
    /// Positive = inside (same side as normal), Negative = outside.
    pub fn signed_distance(&self, position: Vec3) -> f32 {
        (position - self.point).dot(self.normal)
    }
}

/// A vertex with all attributes needed for clipping interpolation.
#[derive(Clone, Copy, Debug)]
pub struct ClipVertex {
    pub position: Vec3,
    pub uv: Vec2,
}

impl ClipVertex {
    pub fn new(position: Vec3, uv: Vec2) -> Self {
        Self { position, uv }
    }

    /// Linearly interpolate position and UV between two vertices.
    /// Used when a polygon edge crosses a clipping plane.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            uv: self.uv.lerp(other.uv, t),
        }
    }
}

/// An ordered ring of vertices used as the clipper's intermediate
/// representation. Backed by an inline buffer sized for the worst case so
/// the per-face clipping loop never allocates.
#[derive(Clone, Copy)]
pub struct ClipPolygon {
    vertices: [ClipVertex; MAX_POLYGON_VERTICES],
    len: usize,
}

impl ClipPolygon {
    /// Create a polygon from the three vertices of a triangle.
    pub fn from_triangle(v0: ClipVertex, v1: ClipVertex, v2: ClipVertex) -> Self {
        let mut polygon = Self::empty();
        polygon.push(v0);
        polygon.push(v1);
        polygon.push(v2);
        polygon
    }

    fn empty() -> Self {
        Self {
            vertices: [ClipVertex::new(Vec3::ZERO, Vec2::ZERO); MAX_POLYGON_VERTICES],
            len: 0,
        }
    }

    fn push(&mut self, vertex: ClipVertex) {
        debug_assert!(self.len < MAX_POLYGON_VERTICES);
        self.vertices[self.len] = vertex;
        self.len += 1;
    }

    pub fn vertices(&self) -> &[ClipVertex] {
        &self.vertices[..self.len]
    }

    /// Returns true if the polygon has been completely clipped away.
    pub fn is_empty(&self) -> bool {
        self.len < 3
    }

    /// Clip this polygon against a single plane using the
    /// Sutherland-Hodgman algorithm.
    pub fn clip_against_plane(&self, plane: &Plane) -> Self {
        let mut output = Self::empty();
        if self.len == 0 {
            return output;
        }

        for i in 0..self.len {
            let current = &self.vertices[i];
            let next = &self.vertices[(i + 1) % self.len];

            let d1 = plane.signed_distance(current.position);
            let d2 = plane.signed_distance(next.position);

            let current_inside = d1 >= 0.0;
            let next_inside = d2 >= 0.0;

            if current_inside {
                // Current vertex is inside, keep it
                output.push(*current);

                if !next_inside {
                    // Going from inside to outside, add the intersection
                    let t = d1 / (d1 - d2);
                    output.push(current.lerp(next, t));
                }
            } else if next_inside {
                // Going from outside to inside, add the intersection
                let t = d1 / (d1 - d2);
                output.push(current.lerp(next, t));
            }
            // Both outside: add nothing
        }

        output
    }

    /// Fan-triangulate this convex polygon.
    /// Returns an iterator of (v0, v1, v2) triangles.
    pub fn triangulate(&self) -> impl Iterator<Item = (&ClipVertex, &ClipVertex, &ClipVertex)> {
        (1..self.len.saturating_sub(1))
            .map(move |i| (&self.vertices[0], &self.vertices[i], &self.vertices[i + 1]))
    }
}

/// View-space frustum defined by 6 clipping planes.
pub struct Frustum {
    planes: [Plane; 6],
}

impl Frustum {
    /// Creates a new view frustum from projection parameters.
    ///
    /// # Arguments
    /// * `fov_x` - Horizontal field of view in radians
    /// * `fov_y` - Vertical field of view in radians
    /// * `z_near` - Near clipping plane distance
    /// * `z_far` - Far clipping plane distance
    pub fn new(fov_x: f32, fov_y: f32, z_near: f32, z_far: f32) -> Self {
        let half_fov_x = fov_x / 2.0;
        let half_fov_y = fov_y / 2.0;
        let origin = Vec3::ZERO;

        Self {
            planes: [
                // Left plane: normal points right-ish, into the frustum
                Plane::new(origin, Vec3::new(half_fov_x.cos(), 0.0, half_fov_x.sin())),
                // Right plane: normal points left-ish, into the frustum
                Plane::new(origin, Vec3::new(-half_fov_x.cos(), 0.0, half_fov_x.sin())),
                // Top plane: normal points down-ish, into the frustum
                Plane::new(origin, Vec3::new(0.0, -half_fov_y.cos(), half_fov_y.sin())),
                // Bottom plane: normal points up-ish, into the frustum
                Plane::new(origin, Vec3::new(0.0, half_fov_y.cos(), half_fov_y.sin())),
                // Near plane: normal points forward (+Z)
                Plane::new(Vec3::new(0.0, 0.0, z_near), Vec3::new(0.0, 0.0, 1.0)),
                // Far plane: normal points backward (-Z)
                Plane::new(Vec3::new(0.0, 0.0, z_far), Vec3::new(0.0, 0.0, -1.0)),
            ],
        }
    }

    pub fn planes(&self) -> &[Plane; 6] {
        &self.planes
    }

    /// Clip a polygon against all frustum planes in order: left, right,
    /// top, bottom, near, far. Returns the clipped polygon, which may be
    /// empty if the input was fully outside.
    pub fn clip_polygon(&self, polygon: ClipPolygon) -> ClipPolygon {
        let mut result = polygon;

        for plane in &self.planes {
            if result.is_empty() {
                break;
            }
            result = result.clip_against_plane(plane);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const FOV: f32 = std::f32::consts::FRAC_PI_3;

    fn test_frustum() -> Frustum {
        Frustum::new(FOV, FOV, 0.5, 20.0)
    }

    fn triangle_polygon(a: Vec3, b: Vec3, c: Vec3) -> ClipPolygon {
        ClipPolygon::from_triangle(
            ClipVertex::new(a, Vec2::new(0.0, 0.0)),
            ClipVertex::new(b, Vec2::new(1.0, 0.0)),
            ClipVertex::new(c, Vec2::new(0.0, 1.0)),
        )
    }

    fn contains_vertex(polygon: &ClipPolygon, position: Vec3) -> bool {
        polygon.vertices().iter().any(|v| {
            (v.position - position).magnitude() < 1e-5
        })
    }

    #[test]
    fn fully_inside_triangle_is_unchanged() {
        let frustum = test_frustum();
        // At z = 1 the frustum half-width is tan(30 deg) = 0.577, so these
        // stay inside every plane
        let a = Vec3::new(0.0, 0.0, 1.0);
        let b = Vec3::new(0.5, 0.0, 1.0);
        let c = Vec3::new(0.0, 0.5, 1.0);

        let clipped = frustum.clip_polygon(triangle_polygon(a, b, c));

        assert_eq!(clipped.vertices().len(), 3);
        assert!(contains_vertex(&clipped, a));
        assert!(contains_vertex(&clipped, b));
        assert!(contains_vertex(&clipped, c));
        assert_eq!(clipped.triangulate().count(), 1);
    }

    #[test]
    fn triangle_behind_near_plane_is_discarded() {
        let frustum = test_frustum();
        let clipped = frustum.clip_polygon(triangle_polygon(
            Vec3::new(0.0, 0.0, 0.1),
            Vec3::new(1.0, 0.0, 0.1),
            Vec3::new(0.0, 1.0, 0.1),
        ));

        assert!(clipped.is_empty());
        assert_eq!(clipped.triangulate().count(), 0);
    }

    #[test]
    fn triangle_outside_each_side_plane_is_discarded() {
        let frustum = test_frustum();
        // Far to the left, right, above and below at z = 1, where the
        // frustum half-width is well under 1
        let offsets = [
            Vec3::new(-50.0, 0.0, 1.0),
            Vec3::new(50.0, 0.0, 1.0),
            Vec3::new(0.0, 50.0, 1.0),
            Vec3::new(0.0, -50.0, 1.0),
        ];
        for offset in offsets {
            let clipped = frustum.clip_polygon(triangle_polygon(
                offset,
                offset + Vec3::new(0.1, 0.0, 0.0),
                offset + Vec3::new(0.0, 0.1, 0.0),
            ));
            assert!(clipped.is_empty());
        }
    }

    #[test]
    fn straddling_triangle_gains_a_vertex() {
        let frustum = test_frustum();
        let left_plane = &frustum.planes()[0];
        // One vertex pokes out past the left plane, the other two are
        // inside: the cut replaces it with two intersection points
        let clipped = triangle_polygon(
            Vec3::new(-1.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 5.0),
        )
        .clip_against_plane(left_plane);

        assert_eq!(clipped.vertices().len(), 4);
        assert_eq!(clipped.triangulate().count(), 2);
    }

    #[test]
    fn intersection_points_lie_on_the_plane() {
        let frustum = test_frustum();
        let left_plane = &frustum.planes()[0];
        let original = [
            Vec3::new(-1.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 5.0),
        ];
        let clipped = triangle_polygon(original[0], original[1], original[2])
            .clip_against_plane(left_plane);

        let mut cut_vertices = 0;
        for vertex in clipped.vertices() {
            let is_original = original
                .iter()
                .any(|p| (*p - vertex.position).magnitude() < 1e-5);
            if !is_original {
                cut_vertices += 1;
                assert!(left_plane.signed_distance(vertex.position).abs() <= 1e-5);
            }
        }
        assert_eq!(cut_vertices, 2);
    }

    #[test]
    fn clipping_interpolates_uvs_along_the_edge() {
        // A single plane cutting an edge exactly in half must produce the
        // midpoint UV
        let plane = Plane::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
        let polygon = ClipPolygon::from_triangle(
            ClipVertex::new(Vec3::new(1.0, 0.0, 1.0), Vec2::new(0.0, 0.0)),
            ClipVertex::new(Vec3::new(-1.0, 0.0, 1.0), Vec2::new(1.0, 0.0)),
            ClipVertex::new(Vec3::new(1.0, 1.0, 1.0), Vec2::new(0.0, 1.0)),
        );

        let clipped = polygon.clip_against_plane(&plane);
        let cut = clipped
            .vertices()
            .iter()
            .find(|v| v.position.x.abs() < 1e-6 && v.position.y.abs() < 1e-6)
            .expect("edge crossing the plane must produce an intersection");
        assert_relative_eq!(cut.uv.x, 0.5, epsilon = 1e-6);
        assert_relative_eq!(cut.uv.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn six_plane_clip_never_overflows_the_inline_buffer() {
        let frustum = test_frustum();
        // A huge triangle crossing every plane produces the worst-case
        // vertex count
        let clipped = frustum.clip_polygon(triangle_polygon(
            Vec3::new(-100.0, -100.0, 0.6),
            Vec3::new(100.0, -100.0, 30.0),
            Vec3::new(0.0, 200.0, 15.0),
        ));
        assert!(clipped.vertices().len() <= MAX_POLYGON_VERTICES);
        assert!(!clipped.is_empty());
    }
}

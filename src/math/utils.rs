//! Shared 2D helpers for the rasterizer.

use super::vec2::Vec2;

/// Signed parallelogram area spanned by AB and AC.
///
/// Positive for one winding, negative for the other, zero when the three
/// points are collinear. Triangles with zero area are degenerate and must
/// not be rasterized.
#[inline]
pub fn parallelogram_area(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}

/// Barycentric weights of point `p` relative to triangle ABC.
///
/// `inv_area` is the reciprocal of [`parallelogram_area`]`(a, b, c)`,
/// precomputed once per triangle. Returns [alpha, beta, gamma] where
/// alpha weighs A (sub-triangle BCP), beta weighs B (sub-triangle ACP)
/// and gamma = 1 - alpha - beta.
#[inline]
pub fn barycentric_weights(a: Vec2, b: Vec2, c: Vec2, p: Vec2, inv_area: f32) -> [f32; 3] {
    let bc = c - b;
    let ac = c - a;
    let ap = p - a;
    let bp = p - b;

    let alpha = (bc.x * bp.y - bp.x * bc.y) * inv_area;
    let beta = (ap.x * ac.y - ac.x * ap.y) * inv_area;
    let gamma = 1.0 - alpha - beta;

    [alpha, beta, gamma]
}

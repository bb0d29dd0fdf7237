//! First-person camera
//!
//! # Coordinate System
//!
//! Uses a **left-handed** coordinate system:
//! - X: positive right
//! - Y: positive up
//! - Z: positive forward (into screen)
//!
//! # Orientation
//!
//! Orientation is stored as yaw/pitch angles. The forward direction is
//! the +Z unit vector rotated first by pitch around X, then by yaw
//! around Y. Pitch is clamped just short of straight up/down so the
//! look-at basis never collapses.

use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::window::InputState;

/// Margin kept between the pitch limit and a full quarter turn.
const PITCH_MARGIN: f32 = 0.05;

/// First-person camera with position and yaw/pitch orientation.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    yaw: f32,   // Rotation around Y-axis (radians)
    pitch: f32, // Rotation around X-axis (radians)
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl Camera {
    /// Creates a new camera at the given position, looking along +Z.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Returns the camera's world position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Teleports the camera without changing orientation.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Returns the yaw angle in radians.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Returns the pitch angle in radians.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Rotates the camera by yaw and pitch deltas, clamping pitch.
    pub fn rotate(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw += yaw_delta;
        self.pitch += pitch_delta;

        let limit = std::f32::consts::FRAC_PI_2 - PITCH_MARGIN;
        self.pitch = self.pitch.clamp(-limit, limit);
    }

    /// Returns the camera's forward direction (normalized).
    ///
    /// The +Z unit vector rotated by pitch, then by yaw.
    pub fn forward(&self) -> Vec3 {
        Vec3::FORWARD.rotate_x(self.pitch).rotate_y(self.yaw)
    }

    /// Returns the camera's right direction (world up x forward).
    pub fn right(&self) -> Vec3 {
        Vec3::UP.cross(self.forward()).normalize()
    }

    /// Moves the camera along its forward direction.
    pub fn move_forward(&mut self, distance: f32) {
        self.position = self.position + self.forward() * distance;
    }

    /// Moves the camera along its right direction (strafe).
    pub fn move_right(&mut self, distance: f32) {
        self.position = self.position + self.right() * distance;
    }

    /// Moves the camera along the world up direction.
    pub fn move_up(&mut self, distance: f32) {
        self.position = self.position + Vec3::UP * distance;
    }

    /// Computes the view matrix for the rendering pipeline.
    ///
    /// Look-at with the target one forward-unit ahead of the eye and the
    /// world +Y as up.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.position + self.forward(), Vec3::UP)
    }
}

/// Configuration and input handling for camera movement.
#[derive(Debug, Clone)]
pub struct CameraController {
    /// Movement speed in units per second.
    pub move_speed: f32,
    /// Dolly speed for the mouse wheel, units per second.
    pub dolly_speed: f32,
    /// Mouse sensitivity in radians per pixel per second.
    pub look_sensitivity: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            dolly_speed: 30.0,
            look_sensitivity: 0.175,
        }
    }
}

impl CameraController {
    /// Updates the camera from one frame's input snapshot.
    ///
    /// # Input Mapping
    /// - W/S: Move forward/backward
    /// - A/D: Strafe left/right
    /// - E/Q: Move up/down
    /// - Wheel: Dolly along forward
    /// - Mouse drag: Look around
    pub fn update(&self, camera: &mut Camera, input: &InputState, delta_time: f32) {
        let move_amount = self.move_speed * delta_time;

        if input.forward {
            camera.move_forward(move_amount);
        }
        if input.back {
            camera.move_forward(-move_amount);
        }
        if input.right {
            camera.move_right(move_amount);
        }
        if input.left {
            camera.move_right(-move_amount);
        }
        if input.up {
            camera.move_up(move_amount);
        }
        if input.down {
            camera.move_up(-move_amount);
        }

        // The wheel dollies by a fixed step per frame; only the scroll
        // direction matters, not its magnitude
        let dolly_amount = self.dolly_speed * delta_time;
        if input.wheel > 0 {
            camera.move_forward(dolly_amount);
        } else if input.wheel < 0 {
            camera.move_forward(-dolly_amount);
        }

        let (dx, dy) = input.mouse_delta;
        if dx != 0 || dy != 0 {
            camera.rotate(
                dx as f32 * self.look_sensitivity * delta_time,
                dy as f32 * self.look_sensitivity * delta_time,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn camera_starts_looking_forward() {
        let camera = Camera::new(Vec3::ZERO);
        assert_relative_eq!(camera.forward().z, 1.0, epsilon = 1e-5);
        assert_relative_eq!(camera.forward().x, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn yaw_rotates_horizontally() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.rotate(std::f32::consts::FRAC_PI_2, 0.0);

        // After a quarter turn the camera looks along +X
        assert_relative_eq!(camera.forward().x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(camera.forward().z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.rotate(0.0, std::f32::consts::PI);

        assert!(camera.pitch() < std::f32::consts::FRAC_PI_2);
        assert!(camera.pitch() > 0.0);

        camera.rotate(0.0, -std::f32::consts::PI * 2.0);
        assert!(camera.pitch() > -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn move_forward_changes_position() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.move_forward(5.0);
        assert_relative_eq!(camera.position().z, 5.0, epsilon = 1e-5);
    }

    #[test]
    fn right_points_along_positive_x_when_facing_forward() {
        let camera = Camera::new(Vec3::ZERO);
        let right = camera.right();
        assert_relative_eq!(right.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(right.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(right.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn strafe_input_moves_along_positive_x() {
        let controller = CameraController::default();
        let mut camera = Camera::new(Vec3::ZERO);
        let input = InputState {
            right: true,
            ..Default::default()
        };

        controller.update(&mut camera, &input, 1.0);

        assert!(camera.position().x > 0.0);
        assert_relative_eq!(camera.position().x, controller.move_speed, epsilon = 1e-5);
        assert_relative_eq!(camera.position().z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn wheel_dolly_step_ignores_scroll_magnitude() {
        let controller = CameraController::default();
        let mut one_tick = Camera::new(Vec3::ZERO);
        let mut three_ticks = Camera::new(Vec3::ZERO);

        let input = |wheel| InputState {
            wheel,
            ..Default::default()
        };
        controller.update(&mut one_tick, &input(1), 0.5);
        controller.update(&mut three_ticks, &input(3), 0.5);

        assert_relative_eq!(
            one_tick.position().z,
            controller.dolly_speed * 0.5,
            epsilon = 1e-5
        );
        assert_relative_eq!(one_tick.position().z, three_ticks.position().z, epsilon = 1e-5);

        let mut back = Camera::new(Vec3::ZERO);
        controller.update(&mut back, &input(-2), 0.5);
        assert_relative_eq!(back.position().z, -controller.dolly_speed * 0.5, epsilon = 1e-5);
    }

    #[test]
    fn identity_view_at_origin() {
        // Camera at the origin with no rotation: world space equals view
        // space, so (0, 0, 1) stays (0, 0, 1).
        use crate::math::vec4::Vec4;
        let camera = Camera::new(Vec3::ZERO);
        let view = camera.view_matrix();
        let p = view * Vec4::point(0.0, 0.0, 1.0);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.z, 1.0, epsilon = 1e-6);
    }
}

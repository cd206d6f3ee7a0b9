//! # Free-flying camera
//!
//! First-person camera driven by yaw/pitch angles. Position and angles are
//! mutated by input; the view matrix is computed on demand.
//!
//! ## Conventions
//! - Right-handed, Y-up world
//! - Yaw and pitch are in degrees; yaw −90° looks down −Z
//! - Pitch is clamped to ±`pitch_limit` (89° by default) so the front
//!   vector never becomes parallel to world up
//! - Movement speed never drops below `min_movement_speed`

use crate::config::CameraConfig;
use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

/// Direction of a keyboard-driven camera move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    /// Along the front vector
    Forward,
    /// Against the front vector
    Backward,
    /// Against the right vector
    Left,
    /// Along the right vector
    Right,
    /// Along the camera up vector
    Up,
    /// Against the camera up vector
    Down,
}

/// First-person camera state
#[derive(Debug, Clone)]
pub struct Camera {
    /// Eye position in world space
    pub position: Vec3,
    /// Unit view direction
    pub front: Vec3,
    /// Unit camera up, orthogonal to `front`
    pub up: Vec3,
    /// Unit camera right
    pub right: Vec3,
    /// World up used to rebuild the basis
    pub world_up: Vec3,
    /// Heading in degrees
    pub yaw: f32,
    /// Elevation in degrees
    pub pitch: f32,
    /// Vertical field of view in degrees
    pub zoom: f32,
    /// Keyboard movement speed in units per second
    pub movement_speed: f32,
    /// Degrees per pixel of pointer motion
    pub mouse_sensitivity: f32,
    min_movement_speed: f32,
    speed_step: f32,
    pitch_limit: f32,
}

impl Camera {
    /// Create a camera from configuration
    ///
    /// Yaw and pitch are recovered from the configured front vector so the
    /// first pointer motion continues from the configured view.
    #[must_use]
    pub fn from_config(config: &CameraConfig) -> Self {
        let front = config.front_vec().normalize();
        let mut camera = Self {
            position: config.position_vec(),
            front,
            up: Vec3::y(),
            right: Vec3::x(),
            world_up: config.up_vec().normalize(),
            yaw: utils::rad_to_deg(front.z.atan2(front.x)),
            pitch: utils::rad_to_deg(front.y.clamp(-1.0, 1.0).asin()),
            zoom: config.zoom,
            movement_speed: config.movement_speed.max(config.min_movement_speed),
            mouse_sensitivity: config.mouse_sensitivity,
            min_movement_speed: config.min_movement_speed,
            speed_step: config.speed_step,
            pitch_limit: config.pitch_limit,
        };

        if camera.pitch.abs() > camera.pitch_limit {
            camera.pitch = camera.pitch.clamp(-camera.pitch_limit, camera.pitch_limit);
            camera.front = camera.front_from_angles();
        }
        camera.update_basis();

        log::debug!(
            "Camera created at {:?}, yaw {:.2}, pitch {:.2}, zoom {:.1}",
            camera.position,
            camera.yaw,
            camera.pitch,
            camera.zoom
        );
        camera
    }

    /// Rotate by a pointer delta in pixels; `y_offset` is positive for upward motion
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch = (self.pitch + y_offset * self.mouse_sensitivity).clamp(-self.pitch_limit, self.pitch_limit);
        self.front = self.front_from_angles();
        self.update_basis();
    }

    /// Adjust movement speed by one step per scroll event
    ///
    /// Positive scroll speeds up, negative slows down to the floor, zero is ignored.
    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        if y_offset > 0.0 {
            self.movement_speed += self.speed_step;
        } else if y_offset < 0.0 {
            self.movement_speed = (self.movement_speed - self.speed_step).max(self.min_movement_speed);
        } else {
            return;
        }
        log::debug!("Camera movement speed now {:.1}", self.movement_speed);
    }

    /// Translate along a basis vector by `movement_speed * delta_time`
    pub fn process_keyboard(&mut self, movement: CameraMovement, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        let offset = match movement {
            CameraMovement::Forward => self.front,
            CameraMovement::Backward => -self.front,
            CameraMovement::Left => -self.right,
            CameraMovement::Right => self.right,
            CameraMovement::Up => self.up,
            CameraMovement::Down => -self.up,
        };
        self.position += offset * velocity;
    }

    /// World-to-view matrix
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.position + self.front, self.up)
    }

    fn front_from_angles(&self) -> Vec3 {
        let (yaw, pitch) = (utils::deg_to_rad(self.yaw), utils::deg_to_rad(self.pitch));
        Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize()
    }

    fn update_basis(&mut self) {
        self.right = self.front.cross(&self.world_up).normalize();
        self.up = self.right.cross(&self.front).normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_angles_recovered_from_front() {
        let camera = Camera::default();
        assert_relative_eq!(camera.yaw, -90.0, epsilon = 1e-4);
        assert_relative_eq!(camera.front, Vec3::new(0.0, -0.5, -2.0).normalize(), epsilon = EPSILON);

        // A zero-length pointer move rebuilds the same front vector
        let mut moved = camera.clone();
        moved.process_mouse_movement(0.0, 0.0);
        assert_relative_eq!(moved.front, camera.front, epsilon = EPSILON);
    }

    #[test]
    fn test_pitch_clamped() {
        let mut camera = Camera::default();
        for _ in 0..1000 {
            camera.process_mouse_movement(3.0, 50.0);
            assert!(camera.pitch <= 89.0);
        }
        assert_relative_eq!(camera.pitch, 89.0);
        for _ in 0..1000 {
            camera.process_mouse_movement(-7.0, -50.0);
            assert!(camera.pitch >= -89.0);
        }
        assert_relative_eq!(camera.pitch, -89.0);
        assert!(camera.right.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn test_scroll_steps_and_floor() {
        let mut camera = Camera::default();
        let start = camera.movement_speed;
        for i in 1..=5 {
            camera.process_mouse_scroll(1.0);
            assert_relative_eq!(camera.movement_speed, start + 2.0 * i as f32);
        }
        for _ in 0..20 {
            camera.process_mouse_scroll(-3.5);
            assert!(camera.movement_speed >= 1.0);
        }
        assert_relative_eq!(camera.movement_speed, 1.0);

        camera.process_mouse_scroll(0.0);
        assert_relative_eq!(camera.movement_speed, 1.0);
    }

    #[test]
    fn test_keyboard_moves_along_basis() {
        let mut camera = Camera::default();
        let start = camera.position;
        camera.process_keyboard(CameraMovement::Forward, 0.5);
        assert_relative_eq!(camera.position, start + camera.front * 2.5, epsilon = EPSILON);

        camera.process_keyboard(CameraMovement::Backward, 0.5);
        camera.process_keyboard(CameraMovement::Right, 1.0);
        assert_relative_eq!(camera.position, start + camera.right * 5.0, epsilon = EPSILON);
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let mut camera = Camera::default();
        camera.process_mouse_movement(123.0, -45.0);
        assert_relative_eq!(camera.front.dot(&camera.right), 0.0, epsilon = EPSILON);
        assert_relative_eq!(camera.front.dot(&camera.up), 0.0, epsilon = EPSILON);
        assert_relative_eq!(camera.up.norm(), 1.0, epsilon = EPSILON);
    }
}

//! Math utilities and types
//!
//! Provides the vector and matrix aliases used throughout the scene code,
//! plus the OpenGL-convention projection and view helpers.

pub use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    #[must_use]
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    #[must_use]
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }
}

/// Extension trait for Mat4 with the camera and model helpers the scene needs
///
/// All angles are in radians. Projections map depth to the `[-1, 1]` clip
/// range used by OpenGL-style pipelines.
pub trait Mat4Ext {
    /// Create a rotation matrix around the X axis
    fn rotation_x(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Y axis
    fn rotation_y(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Z axis
    fn rotation_z(angle: f32) -> Mat4;

    /// Create a perspective projection matrix
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create an orthographic projection matrix
    fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4;

    /// Create a right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn rotation_x(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), angle)
    }

    fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle)
    }

    fn rotation_z(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), angle)
    }

    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new_perspective(aspect, fov_y, near, far)
    }

    fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new_orthographic(left, right, bottom, top, near, far)
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_degree_conversion() {
        assert_relative_eq!(utils::deg_to_rad(180.0), constants::PI, epsilon = EPSILON);
        assert_relative_eq!(utils::rad_to_deg(constants::PI / 2.0), 90.0, epsilon = 1e-4);
    }

    #[test]
    fn test_rotation_y_quarter_turn() {
        let rotated = Mat4::rotation_y(utils::deg_to_rad(90.0)).transform_vector(&Vec3::x());
        assert_relative_eq!(rotated, Vec3::new(0.0, 0.0, -1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_look_at_moves_eye_to_origin() {
        let eye = Vec3::new(0.0, 5.0, 12.0);
        let view = Mat4::look_at(eye, Vec3::new(0.0, 5.0, 0.0), Vec3::y());
        let eye_in_view = view.transform_point(&Point3::from(eye));
        assert_relative_eq!(eye_in_view.coords, Vec3::zeros(), epsilon = 1e-5);
    }

    #[test]
    fn test_orthographic_maps_extents_to_clip_edges() {
        let ortho = Mat4::orthographic(-10.0, 10.0, -10.0, 10.0, 0.1, 100.0);
        let corner = ortho.transform_point(&Point3::new(10.0, -10.0, -0.1));
        assert_relative_eq!(corner.x, 1.0, epsilon = EPSILON);
        assert_relative_eq!(corner.y, -1.0, epsilon = EPSILON);
        assert_relative_eq!(corner.z, -1.0, epsilon = 1e-5);
    }
}

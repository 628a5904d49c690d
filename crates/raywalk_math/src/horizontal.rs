//! Ground-plane vector helpers
//!
//! The controller moves strictly on the X-Z plane, so most directions are
//! flattened before use. Every helper here is zero-safe: degenerate input
//! yields the zero vector instead of NaN.

use glam::{Mat4, Vec3};

/// World up axis (Y)
pub const UP: Vec3 = Vec3::Y;

/// Extension methods for [`Vec3`] used by the movement and collision code
pub trait HorizontalExt {
    /// Drop the vertical component
    fn flattened(self) -> Vec3;

    /// Flatten onto the ground plane and normalize
    ///
    /// Returns the zero vector when the horizontal projection has no length
    /// (e.g. looking straight up or down).
    fn horizontal_dir(self) -> Vec3;

    /// Remove the component along `normal`
    ///
    /// A zero `normal` leaves the vector unchanged.
    fn project_on_plane(self, normal: Vec3) -> Vec3;

    /// Rotate/scale a direction by the upper 3x3 of `matrix` and normalize
    fn transform_direction(self, matrix: &Mat4) -> Vec3;
}

impl HorizontalExt for Vec3 {
    #[inline]
    fn flattened(self) -> Vec3 {
        Vec3::new(self.x, 0.0, self.z)
    }

    #[inline]
    fn horizontal_dir(self) -> Vec3 {
        self.flattened().normalize_or_zero()
    }

    #[inline]
    fn project_on_plane(self, normal: Vec3) -> Vec3 {
        let denom = normal.length_squared();
        if denom == 0.0 {
            return self;
        }
        self - normal * (self.dot(normal) / denom)
    }

    #[inline]
    fn transform_direction(self, matrix: &Mat4) -> Vec3 {
        matrix.transform_vector3(self).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    const EPSILON: f32 = 0.0001;

    #[test]
    fn test_flattened() {
        let v = Vec3::new(1.0, 5.0, -2.0).flattened();
        assert_eq!(v, Vec3::new(1.0, 0.0, -2.0));
    }

    #[test]
    fn test_horizontal_dir_is_unit() {
        let v = Vec3::new(3.0, 7.0, 4.0).horizontal_dir();
        assert!((v.length() - 1.0).abs() < EPSILON);
        assert_eq!(v.y, 0.0);
        assert!((v.x - 0.6).abs() < EPSILON);
        assert!((v.z - 0.8).abs() < EPSILON);
    }

    #[test]
    fn test_horizontal_dir_straight_up_is_zero() {
        let v = Vec3::new(0.0, 1.0, 0.0).horizontal_dir();
        assert_eq!(v, Vec3::ZERO);
        assert!(!v.is_nan());
    }

    #[test]
    fn test_project_on_plane() {
        let v = Vec3::new(1.0, 2.0, 3.0).project_on_plane(UP);
        assert_eq!(v, Vec3::new(1.0, 0.0, 3.0));

        // Non-unit normals are handled
        let v = Vec3::new(1.0, 1.0, 0.0).project_on_plane(Vec3::new(2.0, 0.0, 0.0));
        assert!((v - Vec3::new(0.0, 1.0, 0.0)).length() < EPSILON);
    }

    #[test]
    fn test_project_on_zero_plane_is_identity() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.project_on_plane(Vec3::ZERO), v);
    }

    #[test]
    fn test_transform_direction_rotates_and_normalizes() {
        let m = Mat4::from_scale_rotation_translation(
            Vec3::splat(3.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            Vec3::new(10.0, 0.0, 0.0),
        );
        let d = Vec3::Z.transform_direction(&m);
        // Translation ignored, scale removed, +Z rotated onto +X
        assert!((d - Vec3::X).length() < EPSILON);
    }
}

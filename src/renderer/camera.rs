//! Fixed perspective camera overlooking the course

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

/// Vertical field of view (degrees)
pub const FOV_Y_DEGREES: f32 = 60.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 1000.0;
pub const EYE: Vec3 = Vec3::new(0.0, 20.0, 35.0);
pub const TARGET: Vec3 = Vec3::ZERO;

#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self {
            eye: EYE,
            target: TARGET,
            fov_y: FOV_Y_DEGREES.to_radians(),
            aspect: 1.0,
        };
        camera.resize(width, height);
        camera
    }

    /// Track the canvas aspect ratio; zero-sized canvases are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, Z_NEAR, Z_FAR)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Clip space back to world space, used by the shader to build rays
    pub fn inverse_view_proj(&self) -> Mat4 {
        self.view_proj().inverse()
    }

    /// World-space ray direction through a point in normalized device coordinates
    pub fn ray_dir(&self, ndc: Vec2) -> Vec3 {
        let far = self.inverse_view_proj() * ndc.extend(1.0).extend(1.0);
        let far = far.xyz() / far.w;
        (far - self.eye).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_projects_to_screen_centre() {
        let camera = Camera::new(1280, 720);
        let clip = camera.view_proj() * TARGET.extend(1.0);
        let ndc = clip.xyz() / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_centre_ray_points_at_target() {
        let camera = Camera::new(800, 600);
        let dir = camera.ray_dir(Vec2::ZERO);
        let expected = (TARGET - EYE).normalize();
        assert!(dir.distance(expected) < 1e-4);
    }

    #[test]
    fn test_resize_updates_aspect_and_ignores_zero() {
        let mut camera = Camera::new(800, 600);
        camera.resize(1000, 500);
        assert!((camera.aspect - 2.0).abs() < 1e-6);
        camera.resize(0, 500);
        assert!((camera.aspect - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_ground_is_below_horizon() {
        // Looking down at the course, the bottom of the screen hits the ground
        let camera = Camera::new(800, 600);
        let dir = camera.ray_dir(Vec2::new(0.0, -1.0));
        assert!(dir.y < 0.0);
    }
}

//! Course layout: tilted ground, tee, and hole

use glam::{Quat, Vec2, Vec3};

use super::physics::{RigidBody, StaticPlane};
use crate::consts::*;

/// Static course geometry
#[derive(Debug, Clone)]
pub struct Course {
    /// Ground tilt about the X axis (radians, downhill toward -Z)
    pub tilt: f32,
    /// Ground plane rotation (applied to +Y)
    pub ground_rotation: Quat,
    pub ground: StaticPlane,
    /// Side length of the square ground
    pub ground_size: f32,
    /// Tee position on the XZ plane
    pub tee: Vec2,
    /// Hole centre on the ground surface
    pub hole: Vec3,
    pub hole_radius: f32,
}

impl Course {
    pub fn new(tilt: f32) -> Self {
        let ground_rotation = Quat::from_rotation_x(-tilt);
        let ground = StaticPlane::from_rotation(ground_rotation);
        let mut course = Self {
            tilt,
            ground_rotation,
            ground,
            ground_size: GROUND_SIZE,
            tee: Vec2::ZERO,
            hole: Vec3::ZERO,
            hole_radius: HOLE_RADIUS,
        };
        course.hole = course.surface_point(HOLE_X, HOLE_Z);
        course
    }

    /// Ground height at (x, z)
    pub fn ground_height(&self, x: f32, z: f32) -> f32 {
        let n = self.ground.normal;
        // n · (x, y, z) = offset
        (self.ground.offset - n.x * x - n.z * z) / n.y
    }

    /// Point on the ground surface at (x, z)
    pub fn surface_point(&self, x: f32, z: f32) -> Vec3 {
        Vec3::new(x, self.ground_height(x, z), z)
    }

    /// Where a fresh ball starts: above the tee, dropped onto the ground
    pub fn tee_position(&self) -> Vec3 {
        let ground = self.surface_point(self.tee.x, self.tee.y);
        ground + Vec3::Y * (BALL_RADIUS + BALL_DROP_HEIGHT)
    }

    /// A ball body at the tee
    pub fn spawn_ball(&self) -> RigidBody {
        RigidBody::sphere(BALL_MASS, BALL_RADIUS)
            .with_damping(BALL_LINEAR_DAMPING, BALL_ANGULAR_DAMPING)
            .at(self.tee_position())
    }

    /// Off the edge of the ground, or fallen through it
    pub fn is_out_of_bounds(&self, position: Vec3) -> bool {
        let half = self.ground_size / 2.0;
        // Ground extent is measured in the plane's own frame
        let local = self.ground_rotation.inverse() * position;
        local.x.abs() > half
            || local.z.abs() > half
            || self.ground.signed_distance(position) < -OUT_OF_BOUNDS_DROP
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_course_height_is_zero() {
        let course = Course::new(0.0);
        assert!(course.ground_height(12.0, -40.0).abs() < 1e-6);
        assert!((course.hole - Vec3::new(HOLE_X, 0.0, HOLE_Z)).length() < 1e-6);
    }

    #[test]
    fn test_tilted_course_slopes_down_toward_negative_z() {
        let course = Course::new(0.17);
        assert!(course.ground_height(0.0, -10.0) < 0.0);
        assert!(course.ground_height(0.0, 10.0) > 0.0);
        // Height doesn't depend on x
        assert!((course.ground_height(50.0, 3.0) - course.ground_height(-50.0, 3.0)).abs() < 1e-5);
        // Hole sits on the surface
        assert!(course.ground.signed_distance(course.hole).abs() < 1e-4);
    }

    #[test]
    fn test_tee_is_above_ground() {
        let course = Course::new(0.1);
        let tee = course.tee_position();
        assert!(course.ground.signed_distance(tee) > BALL_RADIUS);
        assert!(!course.is_out_of_bounds(tee));
    }

    #[test]
    fn test_out_of_bounds() {
        let course = Course::new(0.03);
        assert!(!course.is_out_of_bounds(course.surface_point(99.0, -99.0)));
        assert!(course.is_out_of_bounds(course.surface_point(101.0, 0.0)));
        assert!(course.is_out_of_bounds(course.surface_point(0.0, -120.0)));
        assert!(course.is_out_of_bounds(course.surface_point(0.0, 0.0) - Vec3::Y * 6.0));
    }
}

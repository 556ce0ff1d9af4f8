//! Shot control: aim direction and charged power
//!
//! Holding the putt button charges power linearly up to 1. Releasing turns the
//! aim direction and power into an impulse on the ball.

use glam::{Vec2, Vec3};

use crate::consts::{CHARGE_RATE, SHOT_LOFT};
use crate::{dir_to_yaw, normalize_angle, yaw_to_dir};

/// Aim and power state
#[derive(Debug, Clone)]
pub struct ShotControl {
    /// Unit aim direction on the XZ plane (x, z)
    aim: Vec2,
    /// Charged power, 0..=1
    power: f32,
    charging: bool,
}

impl Default for ShotControl {
    fn default() -> Self {
        Self {
            aim: Vec2::X,
            power: 0.0,
            charging: false,
        }
    }
}

impl ShotControl {
    pub fn aim(&self) -> Vec2 {
        self.aim
    }

    pub fn power(&self) -> f32 {
        self.power
    }

    pub fn is_charging(&self) -> bool {
        self.charging
    }

    /// Start charging from zero. Ignored while the ball moves or a charge is underway.
    pub fn begin_charge(&mut self, ball_moving: bool) -> bool {
        if ball_moving || self.charging {
            return false;
        }
        self.charging = true;
        self.power = 0.0;
        true
    }

    /// Accumulate power while charging
    pub fn charge(&mut self, dt: f32) {
        if self.charging {
            self.power = (self.power + CHARGE_RATE * dt).min(1.0);
        }
    }

    /// Stop charging and return the impulse to apply, if a charge was underway
    pub fn release(&mut self, max_impulse: f32) -> Option<Vec3> {
        if !self.charging {
            return None;
        }
        self.charging = false;

        let dir = Vec3::new(self.aim.x, SHOT_LOFT, self.aim.y).normalize();
        let impulse = dir * (max_impulse * self.power);
        self.power = 0.0;
        Some(impulse)
    }

    /// Cancel a charge without shooting
    pub fn cancel(&mut self) {
        self.charging = false;
        self.power = 0.0;
    }

    /// Point the aim along `dir`; a zero vector leaves the aim unchanged
    pub fn aim_at(&mut self, dir: Vec2) {
        if let Some(unit) = dir.try_normalize() {
            self.aim = unit;
        }
    }

    /// Rotate the aim on the XZ plane
    pub fn rotate_aim(&mut self, delta_yaw: f32) {
        let yaw = normalize_angle(dir_to_yaw(self.aim) + delta_yaw);
        self.aim = yaw_to_dir(yaw).normalize();
    }
}

/// Map a pointer position to an aim vector relative to the canvas centre
///
/// Screen right is +X and screen down is +Z (toward the camera). Each axis is
/// scaled so the canvas edges sit at ±1.
pub fn pointer_to_aim(client: Vec2, rect_origin: Vec2, rect_size: Vec2) -> Vec2 {
    let half = rect_size / 2.0;
    let center = rect_origin + half;
    if half.x <= 0.0 || half.y <= 0.0 {
        return Vec2::ZERO;
    }
    (client - center) / half
}

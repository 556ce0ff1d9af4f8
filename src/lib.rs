//! Mini Golf - A single-hole 3D putting game
//!
//! Core modules:
//! - `sim`: Simulation (ball physics, course, shot control, game state)
//! - `renderer`: WebGPU rendering pipeline
//! - `difficulty`: Difficulty levels and their tuning tables
//! - `settings`: Persisted player preferences
//! - `scorecard`: Best rounds leaderboard

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod difficulty;
pub mod error;
pub mod renderer;
pub mod scorecard;
pub mod settings;
pub mod sim;

pub use difficulty::{Difficulty, Tuning};
pub use error::StartupError;
pub use scorecard::ScoreCard;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed physics timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum physics substeps per frame
    pub const MAX_SUBSTEPS: u32 = 3;
    /// Longest frame delta fed to the simulation (tab switches, breakpoints)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Gravity (m/s²)
    pub const GRAVITY: f32 = 9.81;

    /// Course ground is a square of this side length (m)
    pub const GROUND_SIZE: f32 = 200.0;

    /// Ball defaults - regulation ball scaled up 5x for visibility
    pub const BALL_RADIUS: f32 = 0.0213 * 5.0;
    pub const BALL_MASS: f32 = 0.04593;
    pub const BALL_LINEAR_DAMPING: f32 = 0.03;
    pub const BALL_ANGULAR_DAMPING: f32 = 0.02;
    /// Ball is dropped from this height above the tee
    pub const BALL_DROP_HEIGHT: f32 = 2.0;

    /// Hole - regulation cup scaled up 3x
    pub const HOLE_RADIUS: f32 = 0.108 * 3.0;
    pub const HOLE_X: f32 = 30.0;
    pub const HOLE_Z: f32 = -10.0;
    /// Ball slower than this inside the hole radius drops in (m/s)
    pub const CAPTURE_SPEED: f32 = 1.8;

    /// Ball faster than this counts as moving and locks out aiming (m/s)
    pub const MOVING_SPEED: f32 = 0.05;
    /// Power gained per second while charging (0.02 per frame at 60 Hz)
    pub const CHARGE_RATE: f32 = 1.2;
    /// Upward component of the shot direction before normalisation
    pub const SHOT_LOFT: f32 = 0.15;
    /// Aim rotation per arrow key press (radians)
    pub const AIM_KEY_STEP: f32 = 0.05;

    /// Sleep when slower than this for `SLEEP_TIME_LIMIT` seconds
    pub const SLEEP_SPEED_LIMIT: f32 = 0.1;
    pub const SLEEP_TIME_LIMIT: f32 = 1.0;
    /// Rolling resistance of the green; must exceed tan(steepest tilt) so a
    /// ball can come to rest between putts
    pub const ROLLING_RESISTANCE: f32 = 0.2;
    /// Approach speeds below this don't bounce (stops resting jitter)
    pub const RESTITUTION_THRESHOLD: f32 = 0.5;

    /// Ball this far below the ground surface is lost
    pub const OUT_OF_BOUNDS_DROP: f32 = 5.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert a yaw on the XZ plane to a unit direction (x, z)
#[inline]
pub fn yaw_to_dir(yaw: f32) -> Vec2 {
    Vec2::new(yaw.cos(), yaw.sin())
}

/// Convert an XZ direction to its yaw
#[inline]
pub fn dir_to_yaw(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        // 3π lands on the ±π seam; f32 rounding may pick either side
        assert!((normalize_angle(3.0 * PI).abs() - PI).abs() < 1e-5);
        assert!((normalize_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-5);
        assert!((normalize_angle(-2.5 * PI) - (-0.5 * PI)).abs() < 1e-5);
        assert_eq!(normalize_angle(0.25), 0.25);
    }

    #[test]
    fn test_yaw_dir_round_trip() {
        let dir = yaw_to_dir(PI / 2.0);
        assert!(dir.x.abs() < 1e-6);
        assert!((dir.y - 1.0).abs() < 1e-6);
        assert!((dir_to_yaw(Vec2::new(-1.0, 0.0)).abs() - PI).abs() < 1e-6);
    }
}

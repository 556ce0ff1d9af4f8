//! Game state and core simulation types
//!
//! Everything is built once at startup and mutated in place every frame.

use glam::{Quat, Vec3};

use super::course::Course;
use super::physics::{BodyHandle, ContactMaterial, World};
use super::shot::ShotControl;
use crate::consts::*;
use crate::difficulty::{Difficulty, Tuning};

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Ball at rest, player may aim and charge
    Ready,
    /// Ball in motion
    Rolling,
    /// Ball dropped into the hole
    Holed,
}

/// Things that happened during a tick, for audio/HUD
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A putt was struck with the given power (0..1)
    Shot { power: f32 },
    /// The ball dropped in
    Holed { strokes: u32 },
    /// The ball left the course and was re-teed
    OutOfBounds,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub difficulty: Difficulty,
    pub tuning: Tuning,
    pub course: Course,
    pub world: World,
    pub ball: BodyHandle,
    pub shot: ShotControl,
    pub phase: GamePhase,
    /// Strokes taken on this hole, penalties included
    pub strokes: u32,
    /// Frame counter
    pub time_ticks: u64,
    /// Events raised by the last tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(difficulty: Difficulty) -> Self {
        let tuning = difficulty.tuning();
        let course = Course::new(tuning.tilt);

        let mut world = World::new(
            Vec3::new(0.0, -GRAVITY, 0.0),
            ContactMaterial {
                friction: tuning.friction,
                restitution: tuning.restitution,
                rolling_resistance: ROLLING_RESISTANCE,
            },
        );
        world.allow_sleep = true;
        world.add_plane(course.ground);
        let ball = world.add_body(course.spawn_ball());

        log::info!(
            "Course ready ({}): tilt {:.2} rad, hole at ({:.1}, {:.2}, {:.1})",
            difficulty.as_str(),
            tuning.tilt,
            course.hole.x,
            course.hole.y,
            course.hole.z
        );

        Self {
            difficulty,
            tuning,
            course,
            world,
            ball,
            shot: ShotControl::default(),
            phase: GamePhase::Rolling,
            strokes: 0,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Ball speed above the aiming lockout threshold
    pub fn is_ball_moving(&self) -> bool {
        self.world.body(self.ball).speed() > MOVING_SPEED
    }

    pub fn distance_to_hole(&self) -> f32 {
        self.world.body(self.ball).position.distance(self.course.hole)
    }

    /// Put a fresh ball back on the tee
    pub fn reset_ball(&mut self) {
        let fresh = self.course.spawn_ball();
        *self.world.body_mut(self.ball) = fresh;
        self.shot.cancel();
        self.phase = GamePhase::Rolling;
    }

    /// Start the hole over
    pub fn restart(&mut self) {
        self.reset_ball();
        self.strokes = 0;
        log::info!("Hole restarted");
    }
}

/// Ball transform to mirror into the renderer
pub fn ball_transform(state: &GameState) -> (Vec3, Quat) {
    let body = state.world.body(state.ball);
    (body.position, body.orientation)
}

//! Per-frame simulation tick
//!
//! Turns the frame's input into shot state, advances physics, then checks
//! whether the ball dropped or left the course.

use glam::Vec2;

use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input gathered since the last frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Aim direction from the pointer, on the XZ plane
    pub aim: Option<Vec2>,
    /// Keyboard aim rotation (radians)
    pub rotate_aim: f32,
    /// Putt button pressed
    pub charge: bool,
    /// Putt button released
    pub release: bool,
    /// Re-tee and clear the stroke count
    pub restart: bool,
}

/// Advance the game by one animation frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    state.events.clear();
    state.time_ticks += 1;

    if input.restart {
        state.restart();
    }

    if state.phase != GamePhase::Holed {
        apply_shot_input(state, input, dt);
    }

    state.world.step(SIM_DT, dt, MAX_SUBSTEPS);

    if state.phase == GamePhase::Holed {
        return;
    }

    if try_capture(state) {
        state.phase = GamePhase::Holed;
        state.events.push(GameEvent::Holed {
            strokes: state.strokes,
        });
        log::info!("Holed in {} stroke(s)", state.strokes);
        return;
    }

    let position = state.world.body(state.ball).position;
    if state.course.is_out_of_bounds(position) {
        state.reset_ball();
        state.strokes += 1;
        state.events.push(GameEvent::OutOfBounds);
        log::info!("Out of bounds, re-teed (stroke {})", state.strokes);
        return;
    }

    state.phase = if state.is_ball_moving() {
        GamePhase::Rolling
    } else {
        GamePhase::Ready
    };
}

fn apply_shot_input(state: &mut GameState, input: &TickInput, dt: f32) {
    let moving = state.is_ball_moving();

    if input.rotate_aim != 0.0 {
        state.shot.rotate_aim(input.rotate_aim);
    }
    if let Some(dir) = input.aim {
        if !moving {
            state.shot.aim_at(dir);
        }
    }

    if input.charge {
        state.shot.begin_charge(moving);
    }
    state.shot.charge(dt);

    if input.release {
        let power = state.shot.power();
        let Some(impulse) = state.shot.release(state.tuning.max_impulse) else {
            return;
        };
        // A tap with no charge isn't a stroke
        if power <= 0.0 {
            return;
        }

        // Impulse wakes a sleeping ball
        let ball = state.world.body_mut(state.ball);
        let center = ball.position;
        ball.apply_impulse(impulse, center);

        state.strokes += 1;
        state.phase = GamePhase::Rolling;
        state.events.push(GameEvent::Shot { power });
        log::debug!(
            "Stroke {}: power {:.2}, impulse {:.3} N·s",
            state.strokes,
            power,
            impulse.length()
        );
    }
}

/// Drop a slow ball that is over the hole
///
/// On capture the ball stops dead, sits exactly on the hole centre, and is
/// taken out of the simulation.
pub fn try_capture(state: &mut GameState) -> bool {
    let hole = state.course.hole;
    let radius = state.course.hole_radius;
    let ball = state.world.body_mut(state.ball);

    if ball.position.distance(hole) > radius || ball.speed() > CAPTURE_SPEED {
        return false;
    }

    ball.stop();
    ball.position = hole;
    ball.enabled = false;
    true
}

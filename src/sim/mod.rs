//! Simulation module
//!
//! All gameplay logic lives here, free of rendering and platform code:
//! - Fixed physics timestep
//! - One ball, one static course
//! - Input arrives as a plain `TickInput` per frame

pub mod course;
pub mod physics;
pub mod shot;
pub mod state;
pub mod tick;

pub use course::Course;
pub use physics::{BodyHandle, ContactMaterial, RigidBody, SleepState, StaticPlane, World};
pub use shot::{ShotControl, pointer_to_aim};
pub use state::{GameEvent, GamePhase, GameState, ball_transform};
pub use tick::{TickInput, tick, try_capture};

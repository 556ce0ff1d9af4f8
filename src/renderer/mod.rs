//! WebGPU rendering module
//!
//! One fullscreen pass; the fragment shader ray-traces the course.

pub mod camera;
pub mod colors;
pub mod scene_pipeline;

pub use camera::Camera;
pub use scene_pipeline::SceneRenderer;

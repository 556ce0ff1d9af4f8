//! Startup errors
//!
//! Anything that fails before the first frame is unrecoverable: the game
//! logs it and stops.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("no browser window")]
    NoWindow,
    #[error("no document on window")]
    NoDocument,
    #[error("element #{0} not found")]
    MissingElement(&'static str),
    #[error("element #{0} is not a canvas")]
    NotACanvas(&'static str),
    #[error("failed to create surface: {0}")]
    Surface(String),
    #[error("no suitable GPU adapter: {0}")]
    Adapter(String),
    #[error("failed to create device: {0}")]
    Device(String),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

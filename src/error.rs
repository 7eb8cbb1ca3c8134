//! Crate-wide error type
//!
//! Construction problems (bad dimensions, malformed stencils, empty animations)
//! fail fast here. Drawing outside the buffer is never an error; it clips.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid {what} dimensions {width}x{height}: both must be positive")]
    InvalidDimensions {
        what: &'static str,
        width: u32,
        height: u32,
    },

    #[error("stencil holds {actual} cells but the sprite needs {expected}")]
    StencilSize { expected: usize, actual: usize },

    #[error("animation needs at least one frame")]
    EmptyAnimation,

    #[error("animation frame duration must be at least one tick")]
    ZeroFrameDuration,

    #[error("animation of {frames} frames x {frame_duration} ticks overflows the tick counter")]
    AnimationTooLong { frames: usize, frame_duration: u32 },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// SDL reports failures as plain strings
    #[error("display error: {0}")]
    Display(String),

    #[error("remote control error: {0}")]
    Control(String),
}

pub type Result<T> = std::result::Result<T, Error>;

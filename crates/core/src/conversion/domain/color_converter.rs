use thiserror::Error;

use crate::shared::frame::Frame;
use crate::shared::yuv_frame::YuvFrame;

/// A frame whose plane data is inconsistent with its declared geometry.
///
/// Such a frame is dropped by callers, never retried: the stream delivers
/// a fresh one momentarily.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("frame dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },
    #[error("{plane} plane declares a zero stride")]
    ZeroStride { plane: &'static str },
    #[error("{plane} plane holds {actual} bytes but {width}x{height} needs at least {required}")]
    PlaneTooShort {
        plane: &'static str,
        width: u32,
        height: u32,
        required: usize,
        actual: usize,
    },
}

/// Domain interface for converting a planar camera frame to packed RGB.
///
/// Conversion is pure and per-pixel: identical input bytes yield identical
/// output bytes, and no state is carried between frames.
pub trait ColorConverter: Send {
    fn convert(&self, frame: &YuvFrame) -> Result<Frame, ConvertError>;
}

use crate::shared::frame::Frame;

/// Domain interface for estimating the meniscus band height within a crop.
///
/// The output is total: every crop yields a non-negative height, with a
/// small fallback value standing in when no band is found. Implementations
/// are deterministic; identical pixel content yields an identical estimate.
pub trait MeniscusDetector: Send {
    /// Estimated band height in pixels.
    fn band_height(&self, crop: &Frame) -> f64;
}

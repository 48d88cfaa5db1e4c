//! Tear-film meniscus height (TMH) measurement core.
//!
//! Per-frame pipeline: planar 4:2:0 color conversion, eye-region geometry,
//! coordinate remapping, luminance-band detection, and pixel-to-millimeter
//! calibration. Camera capture and face detection belong to the hosting
//! application; this crate consumes raw frames plus face geometry and
//! produces measurements.

pub mod calibration;
pub mod conversion;
pub mod meniscus;
pub mod pipeline;
pub mod roi;
pub mod shared;

/// One frame's result: band height in pixels and its physical equivalent.
///
/// `calibrated` distinguishes a conversion through an explicit
/// pixels-per-millimeter scale from the corneal-diameter estimate; hosts
/// typically label the latter as approximate. The millimeter value is fixed
/// by the calibration in effect when the frame was processed and is never
/// recomputed afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    pub pixel_height: f64,
    pub height_mm: f64,
    pub calibrated: bool,
}

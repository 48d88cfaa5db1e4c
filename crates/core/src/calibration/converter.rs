use crate::shared::constants::MEAN_CORNEAL_DIAMETER_MM;

use super::state::CalibrationState;

/// Converts a band height in pixels to millimeters.
///
/// An explicit calibration wins. Without one, the crop width is assumed to
/// span an average cornea horizontally and the scale is derived from that
/// anatomical prior. A non-positive crop width yields 0.0.
pub fn to_millimeters(pixel_height: f64, crop_width_px: f64, state: CalibrationState) -> f64 {
    if state.is_calibrated() && state.pixels_per_mm() > 0.0 {
        return pixel_height / state.pixels_per_mm();
    }
    if crop_width_px <= 0.0 {
        return 0.0;
    }
    let px_per_mm = crop_width_px / MEAN_CORNEAL_DIAMETER_MM;
    pixel_height / px_per_mm
}

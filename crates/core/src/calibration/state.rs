use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Calibration input the caller must correct before retrying.
///
/// Unlike frame-stream failures, these surface synchronously: calibration is
/// a deliberate, infrequent user action where a silent failure would mislead.
#[derive(Error, Debug)]
pub enum CalibrationError {
    #[error("reference length must be a positive number of millimeters, got {0}")]
    InvalidLength(f64),
    #[error("observed width must be a positive number of pixels, got {0}")]
    InvalidWidth(f64),
}

/// Pixel-to-millimeter scale in effect for a measurement.
///
/// `pixels_per_mm` is positive whenever `calibrated` is set; the two fields
/// are only ever read and written together, through a snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CalibrationState {
    pixels_per_mm: f64,
    calibrated: bool,
}

impl CalibrationState {
    pub fn uncalibrated() -> Self {
        Self {
            pixels_per_mm: 0.0,
            calibrated: false,
        }
    }

    pub fn pixels_per_mm(&self) -> f64 {
        self.pixels_per_mm
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }
}

impl Default for CalibrationState {
    fn default() -> Self {
        Self::uncalibrated()
    }
}

/// Shared, synchronized calibration state.
///
/// Clones share the underlying state: the host keeps one handle for its
/// calibration flow while the measurement pipeline keeps another. Each
/// measurement reads a single snapshot, so a concurrent `calibrate` can
/// never produce a torn scale.
#[derive(Clone, Default)]
pub struct CalibrationHandle {
    state: Arc<Mutex<CalibrationState>>,
}

impl CalibrationHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> CalibrationState {
        *self.state.lock().expect("calibration lock poisoned")
    }

    /// Installs a new scale from a reference object of `known_length_mm`
    /// physical length observed spanning `observed_pixel_width` pixels.
    ///
    /// On invalid input the previous state is left untouched.
    pub fn calibrate(
        &self,
        known_length_mm: f64,
        observed_pixel_width: f64,
    ) -> Result<CalibrationState, CalibrationError> {
        if known_length_mm <= 0.0 || !known_length_mm.is_finite() {
            return Err(CalibrationError::InvalidLength(known_length_mm));
        }
        if observed_pixel_width <= 0.0 || !observed_pixel_width.is_finite() {
            return Err(CalibrationError::InvalidWidth(observed_pixel_width));
        }

        let state = CalibrationState {
            pixels_per_mm: observed_pixel_width / known_length_mm,
            calibrated: true,
        };
        *self.state.lock().expect("calibration lock poisoned") = state;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_initial_state_is_uncalibrated() {
        let handle = CalibrationHandle::new();
        let state = handle.snapshot();
        assert!(!state.is_calibrated());
        assert_relative_eq!(state.pixels_per_mm(), 0.0);
    }

    #[test]
    fn test_calibrate_derives_pixels_per_mm() {
        let handle = CalibrationHandle::new();
        let state = handle.calibrate(10.0, 200.0).unwrap();
        assert!(state.is_calibrated());
        assert_relative_eq!(state.pixels_per_mm(), 20.0);
        assert_eq!(handle.snapshot(), state);
    }

    #[rstest]
    #[case::zero(0.0)]
    #[case::negative(-4.2)]
    #[case::nan(f64::NAN)]
    #[case::infinite(f64::INFINITY)]
    fn test_invalid_length_is_rejected(#[case] length: f64) {
        let handle = CalibrationHandle::new();
        let err = handle.calibrate(length, 100.0).unwrap_err();
        assert!(matches!(err, CalibrationError::InvalidLength(_)));
    }

    #[rstest]
    #[case::zero(0.0)]
    #[case::negative(-1.0)]
    #[case::nan(f64::NAN)]
    fn test_invalid_width_is_rejected(#[case] width: f64) {
        let handle = CalibrationHandle::new();
        let err = handle.calibrate(10.0, width).unwrap_err();
        assert!(matches!(err, CalibrationError::InvalidWidth(_)));
    }

    #[test]
    fn test_failed_calibration_keeps_previous_state() {
        let handle = CalibrationHandle::new();
        handle.calibrate(10.0, 200.0).unwrap();

        assert!(handle.calibrate(-1.0, 50.0).is_err());

        let state = handle.snapshot();
        assert!(state.is_calibrated());
        assert_relative_eq!(state.pixels_per_mm(), 20.0);
    }

    #[test]
    fn test_clones_share_state() {
        let host_handle = CalibrationHandle::new();
        let pipeline_handle = host_handle.clone();

        host_handle.calibrate(5.0, 100.0).unwrap();

        let seen = pipeline_handle.snapshot();
        assert!(seen.is_calibrated());
        assert_relative_eq!(seen.pixels_per_mm(), 20.0);
    }

    #[test]
    fn test_recalibration_replaces_scale() {
        let handle = CalibrationHandle::new();
        handle.calibrate(10.0, 200.0).unwrap();
        handle.calibrate(10.0, 300.0).unwrap();
        assert_relative_eq!(handle.snapshot().pixels_per_mm(), 30.0);
    }
}

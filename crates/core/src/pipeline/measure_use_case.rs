use crate::calibration::converter::to_millimeters;
use crate::calibration::state::CalibrationHandle;
use crate::conversion::domain::color_converter::{ColorConverter, ConvertError};
use crate::meniscus::domain::meniscus_detector::MeniscusDetector;
use crate::pipeline::measurement::Measurement;
use crate::roi::domain::face_geometry::FaceGeometry;
use crate::roi::domain::meniscus_roi_builder::MeniscusRoiBuilder;
use crate::shared::yuv_frame::YuvFrame;

/// Per-frame measurement pipeline: convert → locate → crop → detect →
/// convert units.
///
/// A pure function of (frame, geometry, calibration snapshot): no state is
/// carried between invocations, so one use case serves a whole stream.
pub struct MeasureUseCase {
    converter: Box<dyn ColorConverter>,
    roi_builder: MeniscusRoiBuilder,
    detector: Box<dyn MeniscusDetector>,
    calibration: CalibrationHandle,
}

impl MeasureUseCase {
    pub fn new(
        converter: Box<dyn ColorConverter>,
        roi_builder: MeniscusRoiBuilder,
        detector: Box<dyn MeniscusDetector>,
        calibration: CalibrationHandle,
    ) -> Self {
        Self {
            converter,
            roi_builder,
            detector,
            calibration,
        }
    }

    /// Processes one frame.
    ///
    /// `Ok(None)` is the normal no-measurement outcome: missing geometry, or
    /// geometry no usable region can be derived from. A malformed frame is
    /// an error; callers drop it and move on, since the stream delivers a
    /// fresh frame momentarily.
    pub fn execute(
        &self,
        frame: &YuvFrame,
        geometry: Option<&FaceGeometry>,
    ) -> Result<Option<Measurement>, ConvertError> {
        let Some(geometry) = geometry else {
            log::trace!("frame {}: no face geometry, skipping", frame.index());
            return Ok(None);
        };

        if geometry.frame_width == 0 || geometry.frame_height == 0 {
            log::trace!("frame {}: empty detection space, skipping", frame.index());
            return Ok(None);
        }

        let Some(roi) = self.roi_builder.build(geometry) else {
            log::trace!("frame {}: degenerate face geometry, skipping", frame.index());
            return Ok(None);
        };

        let rgb = self.converter.convert(frame)?;
        let mapped = roi.scaled_to(geometry.detection_size(), (rgb.width(), rgb.height()));
        let crop = rgb.crop(&mapped);

        let pixel_height = self.detector.band_height(&crop);
        let snapshot = self.calibration.snapshot();
        let height_mm = to_millimeters(pixel_height, crop.width() as f64, snapshot);

        Ok(Some(Measurement {
            pixel_height,
            height_mm,
            calibrated: snapshot.is_calibrated(),
        }))
    }
}

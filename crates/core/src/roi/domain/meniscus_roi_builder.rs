use crate::shared::rect::Rect;

use super::face_geometry::{BoundingBox, FaceGeometry};

/// Rect size relative to the face box when centered on an eye landmark.
pub const DEFAULT_EYE_WIDTH_RATIO: f64 = 0.28;
pub const DEFAULT_EYE_HEIGHT_RATIO: f64 = 0.14;

/// Landmark-free fallback: where the lower-lid strip sits inside a face box.
pub const DEFAULT_FACE_LEFT_RATIO: f64 = 0.15;
pub const DEFAULT_FACE_TOP_RATIO: f64 = 0.45;
pub const DEFAULT_FACE_WIDTH_RATIO: f64 = 0.70;
pub const DEFAULT_FACE_HEIGHT_RATIO: f64 = 0.25;

/// Sizing priors for the meniscus search rect.
///
/// These encode where, relative to a face or an eye, the lower eyelid is
/// expected to be. They are tunable priors, not measured values.
#[derive(Clone, Copy, Debug)]
pub struct RoiConfig {
    pub eye_width_ratio: f64,
    pub eye_height_ratio: f64,
    pub face_left_ratio: f64,
    pub face_top_ratio: f64,
    pub face_width_ratio: f64,
    pub face_height_ratio: f64,
}

impl Default for RoiConfig {
    fn default() -> Self {
        Self {
            eye_width_ratio: DEFAULT_EYE_WIDTH_RATIO,
            eye_height_ratio: DEFAULT_EYE_HEIGHT_RATIO,
            face_left_ratio: DEFAULT_FACE_LEFT_RATIO,
            face_top_ratio: DEFAULT_FACE_TOP_RATIO,
            face_width_ratio: DEFAULT_FACE_WIDTH_RATIO,
            face_height_ratio: DEFAULT_FACE_HEIGHT_RATIO,
        }
    }
}

/// Derives the meniscus search rect from detected face geometry.
///
/// Candidates are tried in priority order (left-eye landmark, right-eye
/// landmark, bounding-box fallback) and the first applicable one wins.
/// Output rects are non-empty but not clamped against frame bounds; that
/// clamp happens when the rect is remapped onto the converted buffer.
pub struct MeniscusRoiBuilder {
    config: RoiConfig,
}

impl MeniscusRoiBuilder {
    pub fn new(config: RoiConfig) -> Self {
        Self { config }
    }

    /// Returns `None` only when the bounding box is degenerate.
    pub fn build(&self, geometry: &FaceGeometry) -> Option<Rect> {
        let candidates = [
            self.eye_candidate(geometry.left_eye, &geometry.bbox),
            self.eye_candidate(geometry.right_eye, &geometry.bbox),
            self.face_candidate(&geometry.bbox),
        ];
        candidates.into_iter().flatten().next()
    }

    /// Rect centered on an eye landmark, sized against the face box.
    fn eye_candidate(&self, eye: Option<(f64, f64)>, bbox: &BoundingBox) -> Option<Rect> {
        let (eye_x, eye_y) = eye?;
        if !usable(bbox) {
            return None;
        }
        let width = scaled_span(bbox.width, self.config.eye_width_ratio);
        let height = scaled_span(bbox.height, self.config.eye_height_ratio);
        Some(Rect::new(
            eye_x.round() as i32 - width / 2,
            eye_y.round() as i32 - height / 2,
            width,
            height,
        ))
    }

    /// Lower-lid strip derived from the box alone.
    fn face_candidate(&self, bbox: &BoundingBox) -> Option<Rect> {
        if !usable(bbox) {
            return None;
        }
        Some(Rect::new(
            (bbox.left + bbox.width * self.config.face_left_ratio).round() as i32,
            (bbox.top + bbox.height * self.config.face_top_ratio).round() as i32,
            scaled_span(bbox.width, self.config.face_width_ratio),
            scaled_span(bbox.height, self.config.face_height_ratio),
        ))
    }
}

fn usable(bbox: &BoundingBox) -> bool {
    bbox.width > 0.0 && bbox.height > 0.0
}

fn scaled_span(span: f64, ratio: f64) -> i32 {
    ((span * ratio).round() as i32).max(1)
}

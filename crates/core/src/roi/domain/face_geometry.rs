/// Face bounding box in detection-space pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Face geometry supplied by the external detector for one frame.
///
/// Box and landmark points are expressed in detection-space pixels;
/// `frame_width`/`frame_height` are that space's dimensions, needed when a
/// derived region is remapped onto the converted buffer (detectors often run
/// on a downscaled copy of the frame).
#[derive(Clone, Debug, PartialEq)]
pub struct FaceGeometry {
    pub frame_width: u32,
    pub frame_height: u32,
    pub bbox: BoundingBox,
    pub left_eye: Option<(f64, f64)>,
    pub right_eye: Option<(f64, f64)>,
}

impl FaceGeometry {
    pub fn new(frame_width: u32, frame_height: u32, bbox: BoundingBox) -> Self {
        Self {
            frame_width,
            frame_height,
            bbox,
            left_eye: None,
            right_eye: None,
        }
    }

    pub fn detection_size(&self) -> (u32, u32) {
        (self.frame_width, self.frame_height)
    }
}

use crate::conversion::domain::color_converter::{ColorConverter, ConvertError};
use crate::shared::frame::{Frame, CHANNELS};
use crate::shared::yuv_frame::{Plane, YuvFrame};

// Limited-range BT.601 coefficients, applied per pixel with
// round-to-nearest before clamping to [0, 255].
const V_TO_R: f64 = 1.370705;
const U_TO_G: f64 = -0.337633;
const V_TO_G: f64 = -0.698001;
const U_TO_B: f64 = 1.732446;

/// Scalar CPU implementation of the 4:2:0 → RGB conversion.
///
/// Chroma is sampled at (x/2, y/2) through each plane's own strides, so
/// both interleaved and separate chroma layouts decode without copying.
pub struct CpuYuv420Converter;

impl CpuYuv420Converter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CpuYuv420Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorConverter for CpuYuv420Converter {
    fn convert(&self, frame: &YuvFrame) -> Result<Frame, ConvertError> {
        validate(frame)?;

        let w = frame.width() as usize;
        let h = frame.height() as usize;
        let mut data = Vec::with_capacity(w * h * CHANNELS);

        for row in 0..h {
            for col in 0..w {
                let y = frame.y().sample(col, row) as f64;
                let u = frame.u().sample(col / 2, row / 2) as f64 - 128.0;
                let v = frame.v().sample(col / 2, row / 2) as f64 - 128.0;

                data.push(quantize(y + V_TO_R * v));
                data.push(quantize(y + U_TO_G * u + V_TO_G * v));
                data.push(quantize(y + U_TO_B * u));
            }
        }

        Ok(Frame::new(data, frame.width(), frame.height(), frame.index()))
    }
}

fn quantize(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn validate(frame: &YuvFrame) -> Result<(), ConvertError> {
    let (w, h) = (frame.width(), frame.height());
    if w == 0 || h == 0 {
        return Err(ConvertError::ZeroDimension {
            width: w,
            height: h,
        });
    }

    // Highest sample addressed per plane: (w-1, h-1) for luma,
    // ((w-1)/2, (h-1)/2) for the subsampled chroma.
    let luma_cols = w as usize;
    let luma_rows = h as usize;
    let chroma_cols = (w as usize - 1) / 2 + 1;
    let chroma_rows = (h as usize - 1) / 2 + 1;

    check_plane(frame.y(), "luma", luma_cols, luma_rows, w, h)?;
    check_plane(frame.u(), "u chroma", chroma_cols, chroma_rows, w, h)?;
    check_plane(frame.v(), "v chroma", chroma_cols, chroma_rows, w, h)?;
    Ok(())
}

fn check_plane(
    plane: &Plane,
    name: &'static str,
    cols: usize,
    rows: usize,
    width: u32,
    height: u32,
) -> Result<(), ConvertError> {
    if plane.row_stride() == 0 || plane.pixel_stride() == 0 {
        return Err(ConvertError::ZeroStride { plane: name });
    }
    if !plane.holds(cols, rows) {
        return Err(ConvertError::PlaneTooShort {
            plane: name,
            width,
            height,
            required: plane.offset(cols - 1, rows - 1) + 1,
            actual: plane.data().len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Frame with a packed luma plane and tightly packed chroma planes.
    fn planar_frame(width: u32, height: u32, luma: Vec<u8>, u: Vec<u8>, v: Vec<u8>) -> YuvFrame {
        let chroma_stride = (width as usize - 1) / 2 + 1;
        YuvFrame::new(
            width,
            height,
            Plane::new(luma, width as usize, 1),
            Plane::new(u, chroma_stride, 1),
            Plane::new(v, chroma_stride, 1),
            0,
        )
    }

    fn uniform_frame(width: u32, height: u32, y: u8, u: u8, v: u8) -> YuvFrame {
        let chroma_cols = (width as usize - 1) / 2 + 1;
        let chroma_rows = (height as usize - 1) / 2 + 1;
        planar_frame(
            width,
            height,
            vec![y; width as usize * height as usize],
            vec![u; chroma_cols * chroma_rows],
            vec![v; chroma_cols * chroma_rows],
        )
    }

    fn pixel(frame: &Frame, col: usize, row: usize) -> [u8; 3] {
        let arr = frame.as_ndarray();
        [arr[[row, col, 0]], arr[[row, col, 1]], arr[[row, col, 2]]]
    }

    #[test]
    fn test_neutral_chroma_yields_exact_gray() {
        let frame = uniform_frame(4, 4, 128, 128, 128);
        let rgb = CpuYuv420Converter::new().convert(&frame).unwrap();
        assert!(rgb.data().iter().all(|&b| b == 128));
    }

    #[test]
    fn test_strong_v_saturates_red() {
        // V-128 = 100: R = 128 + 137.07 clamps at 255, G = 128 - 69.80 = 58.
        let frame = uniform_frame(2, 2, 128, 128, 228);
        let rgb = CpuYuv420Converter::new().convert(&frame).unwrap();
        assert_eq!(pixel(&rgb, 0, 0), [255, 58, 128]);
    }

    #[test]
    fn test_rounds_to_nearest_before_clamping() {
        // U-128 = 2: B = 100 + 3.464892 rounds to 103, G = 100 - 0.675266
        // rounds down to 99.
        let frame = uniform_frame(2, 2, 100, 130, 128);
        let rgb = CpuYuv420Converter::new().convert(&frame).unwrap();
        assert_eq!(pixel(&rgb, 0, 0), [100, 99, 103]);
    }

    #[test]
    fn test_permuting_luma_rows_permutes_output_rows() {
        // Conversion is pointwise: swapping input rows swaps output rows.
        let a = planar_frame(2, 2, vec![50, 60, 200, 210], vec![128], vec![128]);
        let b = planar_frame(2, 2, vec![200, 210, 50, 60], vec![128], vec![128]);

        let converter = CpuYuv420Converter::new();
        let rgb_a = converter.convert(&a).unwrap();
        let rgb_b = converter.convert(&b).unwrap();

        let stride = 2 * CHANNELS;
        assert_eq!(rgb_a.data()[..stride], rgb_b.data()[stride..]);
        assert_eq!(rgb_a.data()[stride..], rgb_b.data()[..stride]);
    }

    #[test]
    fn test_interleaved_chroma_matches_planar() {
        let luma: Vec<u8> = (0..16).map(|i| 40 + i * 10).collect();
        let planar = planar_frame(
            4,
            4,
            luma.clone(),
            vec![90, 110, 140, 160],
            vec![100, 120, 150, 170],
        );

        // Same chroma samples at pixel stride 2, as a semi-planar camera
        // would deliver them.
        let interleaved = YuvFrame::new(
            4,
            4,
            Plane::new(luma, 4, 1),
            Plane::new(vec![90, 100, 110, 120, 140, 150, 160, 170], 4, 2),
            Plane::new(vec![100, 90, 120, 110, 150, 140, 170, 160], 4, 2),
            0,
        );

        let converter = CpuYuv420Converter::new();
        let a = converter.convert(&planar).unwrap();
        let b = converter.convert(&interleaved).unwrap();
        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn test_padded_luma_rows_match_tight_layout() {
        let tight = planar_frame(2, 2, vec![10, 20, 30, 40], vec![128], vec![128]);
        let padded = YuvFrame::new(
            2,
            2,
            Plane::new(vec![10, 20, 0, 0, 30, 40, 0, 0], 4, 1),
            Plane::new(vec![128], 1, 1),
            Plane::new(vec![128], 1, 1),
            0,
        );

        let converter = CpuYuv420Converter::new();
        assert_eq!(
            converter.convert(&tight).unwrap().data(),
            converter.convert(&padded).unwrap().data()
        );
    }

    #[test]
    fn test_odd_dimensions_convert() {
        let frame = uniform_frame(3, 3, 128, 128, 128);
        let rgb = CpuYuv420Converter::new().convert(&frame).unwrap();
        assert_eq!(rgb.width(), 3);
        assert_eq!(rgb.height(), 3);
        assert_eq!(rgb.data().len(), 27);
    }

    #[test]
    fn test_truncated_luma_plane_is_rejected() {
        let frame = planar_frame(4, 4, vec![0u8; 15], vec![0u8; 4], vec![0u8; 4]);
        let err = CpuYuv420Converter::new().convert(&frame).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::PlaneTooShort { plane: "luma", .. }
        ));
    }

    #[test]
    fn test_truncated_chroma_plane_is_rejected() {
        let frame = planar_frame(4, 4, vec![0u8; 16], vec![0u8; 3], vec![0u8; 4]);
        let err = CpuYuv420Converter::new().convert(&frame).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::PlaneTooShort {
                plane: "u chroma",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_dimension_is_rejected() {
        let frame = YuvFrame::new(
            0,
            4,
            Plane::new(vec![], 1, 1),
            Plane::new(vec![], 1, 1),
            Plane::new(vec![], 1, 1),
            0,
        );
        let err = CpuYuv420Converter::new().convert(&frame).unwrap_err();
        assert!(matches!(err, ConvertError::ZeroDimension { .. }));
    }

    #[test]
    fn test_zero_stride_is_rejected() {
        let frame = YuvFrame::new(
            2,
            2,
            Plane::new(vec![0u8; 4], 2, 1),
            Plane::new(vec![0u8; 1], 0, 1),
            Plane::new(vec![0u8; 1], 1, 1),
            0,
        );
        let err = CpuYuv420Converter::new().convert(&frame).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::ZeroStride { plane: "u chroma" }
        ));
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let frame = planar_frame(2, 2, vec![10, 250, 90, 170], vec![60], vec![190]);
        let converter = CpuYuv420Converter::new();
        let first = converter.convert(&frame).unwrap();
        let second = converter.convert(&frame).unwrap();
        assert_eq!(first.data(), second.data());
    }
}

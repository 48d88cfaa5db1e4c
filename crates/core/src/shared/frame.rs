use ndarray::ArrayView3;

use super::rect::Rect;

/// Bytes per pixel; converted frames are always packed RGB.
pub const CHANNELS: usize = 3;

/// A converted frame: contiguous RGB bytes in row-major order.
///
/// Produced once per measurement invocation by the color converter; the
/// analysis layers treat the pixel data as read-only.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * CHANNELS,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// View as (height, width, channel).
    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(
            (self.height as usize, self.width as usize, CHANNELS),
            &self.data,
        )
        .expect("Frame data length must match dimensions")
    }

    /// Copies the pixels under `rect` into a new frame.
    ///
    /// `rect` must already be clamped to this frame's bounds.
    pub fn crop(&self, rect: &Rect) -> Frame {
        debug_assert!(
            rect.fits_within(self.width, self.height),
            "crop rect must lie within frame bounds"
        );
        let x = rect.x as usize;
        let w = rect.width as usize;
        let h = rect.height as usize;
        let src_stride = self.width as usize * CHANNELS;

        let mut data = Vec::with_capacity(w * h * CHANNELS);
        for row in 0..h {
            let start = (rect.y as usize + row) * src_stride + x * CHANNELS;
            data.extend_from_slice(&self.data[start..start + w * CHANNELS]);
        }
        Frame::new(data, rect.width as u32, rect.height as u32, self.index)
    }
}

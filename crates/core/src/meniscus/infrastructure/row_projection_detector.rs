use ndarray::{s, Axis};

use crate::meniscus::domain::meniscus_detector::MeniscusDetector;
use crate::shared::frame::Frame;

/// Fraction of the crop skipped before analysis begins; the meniscus sits
/// along the lower lid, in the bottom part of any reasonable crop.
pub const DEFAULT_LOWER_START_RATIO: f64 = 0.45;

/// A row belongs to the band when its mean luminance falls below this
/// fraction of the analysis window's average.
pub const DEFAULT_DARKNESS_RATIO: f64 = 0.92;

/// Height reported (as a fraction of crop height) when no row qualifies.
pub const DEFAULT_FALLBACK_RATIO: f64 = 0.02;

/// Detector tunables. Heuristic constants, exposed for host-side tuning.
#[derive(Clone, Copy, Debug)]
pub struct DetectorConfig {
    pub lower_start_ratio: f64,
    pub darkness_ratio: f64,
    pub fallback_ratio: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            lower_start_ratio: DEFAULT_LOWER_START_RATIO,
            darkness_ratio: DEFAULT_DARKNESS_RATIO,
            fallback_ratio: DEFAULT_FALLBACK_RATIO,
        }
    }
}

/// Finds the meniscus as the first contiguous run of darker rows in the
/// lower portion of a crop.
///
/// The crop is reduced to a 1-D vertical projection (per-row mean
/// luminance); the thin fluid band shows up as a locally darker horizontal
/// stripe. Only the first below-threshold run is reported: the scan stops
/// at the first recovering row and never weighs later, possibly darker runs
/// against it.
pub struct RowProjectionDetector {
    config: DetectorConfig,
}

impl RowProjectionDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Analysis rows as (start, count), anchored at the bottom of the crop.
    ///
    /// Crops too short for the proportional window fall back to the lower
    /// half, and never to less than one row.
    fn analysis_window(&self, height: usize) -> (usize, usize) {
        let start = (self.config.lower_start_ratio * height as f64).floor() as usize;
        let rows = height - start;
        if rows > 2 {
            (start, rows)
        } else {
            let rows = (height / 2).max(1);
            (height - rows, rows)
        }
    }
}

impl Default for RowProjectionDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

impl MeniscusDetector for RowProjectionDetector {
    fn band_height(&self, crop: &Frame) -> f64 {
        let height = crop.height() as usize;
        let (start, rows) = self.analysis_window(height);

        let projection = row_luminance(crop, start, rows);
        let mean_all = projection.iter().sum::<f64>() / projection.len() as f64;
        let threshold = self.config.darkness_ratio * mean_all;

        match first_dark_run(&projection, threshold) {
            Some((top, bottom)) => (bottom - top + 1) as f64,
            None => (self.config.fallback_ratio * height as f64).max(0.0),
        }
    }
}

/// Per-row mean luminance (0.299 R + 0.587 G + 0.114 B) over `rows` rows
/// starting at `start`.
fn row_luminance(crop: &Frame, start: usize, rows: usize) -> Vec<f64> {
    let pixels = crop.as_ndarray();
    let window = pixels.slice(s![start..start + rows, .., ..]);

    window
        .axis_iter(Axis(0))
        .map(|row| {
            let sum: f64 = row
                .axis_iter(Axis(0))
                .map(|px| 0.299 * px[0] as f64 + 0.587 * px[1] as f64 + 0.114 * px[2] as f64)
                .sum();
            sum / row.len_of(Axis(0)) as f64
        })
        .collect()
}

/// First maximal contiguous run of values below `threshold`, as inclusive
/// (top, bottom) indices.
fn first_dark_run(projection: &[f64], threshold: f64) -> Option<(usize, usize)> {
    let top = projection.iter().position(|&v| v < threshold)?;
    let mut bottom = top;
    while bottom + 1 < projection.len() && projection[bottom + 1] < threshold {
        bottom += 1;
    }
    Some((top, bottom))
}

/// Mean horizontal corneal diameter in millimeters.
///
/// The uncalibrated unit conversion assumes the analyzed crop spans roughly
/// one cornea; this anatomical average anchors that fallback scale.
pub const MEAN_CORNEAL_DIAMETER_MM: f64 = 11.7;

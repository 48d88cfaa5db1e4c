/// An axis-aligned region of interest.
///
/// Rects produced by the estimator are non-empty but may extend past frame
/// bounds; `scaled_to` clamps them onto a concrete pixel buffer. Every rect
/// that reaches pixel indexing has gone through that clamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rescales this rect from one coordinate space onto a buffer of a
    /// different size.
    ///
    /// Each side is multiplied by the per-axis scale factor and rounded.
    /// The origin is then clamped into `[0, dim-1]` and each dimension into
    /// `[1, dim - origin]`, so the result never leaves the target bounds and
    /// never collapses to zero area.
    pub fn scaled_to(&self, from: (u32, u32), to: (u32, u32)) -> Rect {
        debug_assert!(
            from.0 > 0 && from.1 > 0 && to.0 > 0 && to.1 > 0,
            "coordinate spaces must have non-zero dimensions"
        );
        let sx = to.0 as f64 / from.0 as f64;
        let sy = to.1 as f64 / from.1 as f64;

        let x = ((self.x as f64 * sx).round() as i32).clamp(0, to.0 as i32 - 1);
        let y = ((self.y as f64 * sy).round() as i32).clamp(0, to.1 as i32 - 1);
        let width = ((self.width as f64 * sx).round() as i32).clamp(1, to.0 as i32 - x);
        let height = ((self.height as f64 * sy).round() as i32).clamp(1, to.1 as i32 - y);

        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether this rect is non-empty and lies entirely within a buffer of
    /// the given dimensions.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.width >= 1
            && self.height >= 1
            && self.x + self.width <= width as i32
            && self.y + self.height <= height as i32
    }
}

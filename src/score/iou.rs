//! Bounding-box intersection over union.

use crate::report::DetectedObject;

/// Box corners in inclusive pixel coordinates.
///
/// Corners are widened to `i128` so any `i64` box from a report fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxCorners {
    /// Left edge.
    pub x_min: i128,
    /// Top edge.
    pub y_min: i128,
    /// Right edge.
    pub x_max: i128,
    /// Bottom edge.
    pub y_max: i128,
}

impl BoxCorners {
    /// Area counting both edges, so a box from 0 to 10 is 11 pixels wide.
    #[must_use]
    pub fn area(&self) -> f64 {
        span(self.x_min, self.x_max) * span(self.y_min, self.y_max)
    }
}

/// Inclusive length of `[lo, hi]`; may be zero or negative for degenerate boxes.
fn span(lo: i128, hi: i128) -> f64 {
    (hi - lo + 1) as f64
}

impl From<&DetectedObject> for BoxCorners {
    fn from(obj: &DetectedObject) -> Self {
        let (x, y) = (i128::from(obj.x), i128::from(obj.y));
        Self {
            x_min: x,
            y_min: y,
            x_max: x + i128::from(obj.width),
            y_max: y + i128::from(obj.height),
        }
    }
}

/// Intersection over union of two boxes, in `[0, 1]`.
///
/// Degenerate boxes whose union has no area yield 0.
#[must_use]
pub fn iou(a: &BoxCorners, b: &BoxCorners) -> f64 {
    let x_a = a.x_min.max(b.x_min);
    let y_a = a.y_min.max(b.y_min);
    let x_b = a.x_max.min(b.x_max);
    let y_b = a.y_max.min(b.y_max);

    let inter = span(x_a, x_b).max(0.0) * span(y_a, y_b).max(0.0);
    let union = a.area() + b.area() - inter;
    if union <= 0.0 {
        return 0.0;
    }

    inter / union
}

/// Intersection over union of two objects' boxes.
#[must_use]
pub fn object_iou(a: &DetectedObject, b: &DetectedObject) -> f64 {
    iou(&BoxCorners::from(a), &BoxCorners::from(b))
}

//! Geometry primitives shared across the connector subsystem.
//!
//! Everything here is pixel-space `f64` via [`glam::DVec2`]. Validation
//! constructors (`try_*`) exist for values that cross the persistence
//! boundary; internal geometry trusts its inputs.

use std::fmt;

use glam::{DVec2, dvec2};

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is negative when non-negative required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

fn check_finite(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else {
        Ok(val)
    }
}

/// Axis-aligned rectangle, `min` at the top-left in screen coordinates
/// (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        min: DVec2::ZERO,
        max: DVec2::ZERO,
    };

    /// Create a rectangle from two corner points, normalizing the ordering.
    pub fn new(a: DVec2, b: DVec2) -> Rect {
        Rect {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create a rectangle from its top-left origin and a size.
    pub fn from_origin_size(origin: DVec2, size: DVec2) -> Rect {
        Rect::new(origin, origin + size)
    }

    /// Create a square hit region of half-extent `half` around `center`.
    pub fn around(center: DVec2, half: f64) -> Rect {
        Rect {
            min: center - DVec2::splat(half),
            max: center + DVec2::splat(half),
        }
    }

    /// Create a rectangle with validation (rejects NaN/infinite corners).
    pub fn try_new(a: DVec2, b: DVec2) -> Result<Rect, NumericError> {
        for v in [a.x, a.y, b.x, b.y] {
            check_finite(v)?;
        }
        Ok(Rect::new(a, b))
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    #[inline]
    pub fn half_size(&self) -> DVec2 {
        (self.max - self.min) * 0.5
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    /// True when the rectangle has no area on at least one axis.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Outset the rectangle by `amount` on every side (negative insets).
    ///
    /// The result is not re-normalized: shrinking past the center yields an
    /// empty rectangle, which callers detect with [`Rect::is_empty`].
    pub fn grow(&self, amount: f64) -> Rect {
        self.grow_xy(amount, amount)
    }

    /// Outset by `gx` horizontally and `gy` vertically (negative insets).
    pub fn grow_xy(&self, gx: f64, gy: f64) -> Rect {
        Rect {
            min: self.min - dvec2(gx, gy),
            max: self.max + dvec2(gx, gy),
        }
    }

    /// Shift the rectangle by a displacement.
    pub fn translate(&self, delta: DVec2) -> Rect {
        Rect {
            min: self.min + delta,
            max: self.max + delta,
        }
    }
}

/// Where the stroke sits relative to the shape outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokePlacement {
    Inside,
    Outside,
    #[default]
    Center,
}

/// Stroke policy of a figure, as consumed by boundary resolution.
///
/// Only placement and total width matter here; color, dashing and joins
/// belong to the paint layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub placement: StrokePlacement,
    pub total_width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        StrokeStyle {
            placement: StrokePlacement::Center,
            total_width: 1.0,
        }
    }
}

impl StrokeStyle {
    pub fn new(placement: StrokePlacement, total_width: f64) -> StrokeStyle {
        StrokeStyle {
            placement,
            total_width,
        }
    }

    /// Validating constructor (rejects NaN/infinite/negative widths).
    pub fn try_new(
        placement: StrokePlacement,
        total_width: f64,
    ) -> Result<StrokeStyle, NumericError> {
        let total_width = check_finite(total_width)?;
        if total_width < 0.0 {
            return Err(NumericError::Negative);
        }
        Ok(StrokeStyle {
            placement,
            total_width,
        })
    }

    /// A hairline stroke drawn inside the outline: zero boundary growth.
    pub fn inside_hairline() -> StrokeStyle {
        StrokeStyle {
            placement: StrokePlacement::Inside,
            total_width: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Rect tests ====================

    #[test]
    fn rect_new_normalizes_corners() {
        let r = Rect::new(dvec2(10.0, 20.0), dvec2(-5.0, 4.0));
        assert_eq!(r.min, dvec2(-5.0, 4.0));
        assert_eq!(r.max, dvec2(10.0, 20.0));
    }

    #[test]
    fn rect_from_origin_size() {
        let r = Rect::from_origin_size(dvec2(1.0, 2.0), dvec2(3.0, 4.0));
        assert_eq!(r.min, dvec2(1.0, 2.0));
        assert_eq!(r.max, dvec2(4.0, 6.0));
        assert_eq!(r.width(), 3.0);
        assert_eq!(r.height(), 4.0);
    }

    #[test]
    fn rect_center_and_half_size() {
        let r = Rect::new(dvec2(0.0, 0.0), dvec2(4.0, 6.0));
        assert_eq!(r.center(), dvec2(2.0, 3.0));
        assert_eq!(r.half_size(), dvec2(2.0, 3.0));
    }

    #[test]
    fn rect_grow_and_inset() {
        let r = Rect::new(dvec2(0.0, 0.0), dvec2(10.0, 10.0));
        let grown = r.grow(2.0);
        assert_eq!(grown.min, dvec2(-2.0, -2.0));
        assert_eq!(grown.max, dvec2(12.0, 12.0));

        let inset = r.grow(-6.0);
        assert!(inset.is_empty());
    }

    #[test]
    fn rect_contains_is_inclusive() {
        let r = Rect::new(dvec2(0.0, 0.0), dvec2(10.0, 10.0));
        assert!(r.contains(dvec2(0.0, 0.0)));
        assert!(r.contains(dvec2(10.0, 10.0)));
        assert!(r.contains(dvec2(5.0, 5.0)));
        assert!(!r.contains(dvec2(10.01, 5.0)));
    }

    #[test]
    fn rect_try_new_rejects_non_finite() {
        assert_eq!(
            Rect::try_new(dvec2(f64::NAN, 0.0), dvec2(1.0, 1.0)),
            Err(NumericError::NaN)
        );
        assert_eq!(
            Rect::try_new(dvec2(0.0, 0.0), dvec2(f64::INFINITY, 1.0)),
            Err(NumericError::Infinite)
        );
        assert!(Rect::try_new(dvec2(0.0, 0.0), dvec2(1.0, 1.0)).is_ok());
    }

    #[test]
    fn rect_around_builds_hit_region() {
        let r = Rect::around(dvec2(5.0, 5.0), 4.0);
        assert_eq!(r.min, dvec2(1.0, 1.0));
        assert_eq!(r.max, dvec2(9.0, 9.0));
    }

    #[test]
    fn rect_translate() {
        let r = Rect::new(dvec2(0.0, 0.0), dvec2(2.0, 2.0)).translate(dvec2(3.0, -1.0));
        assert_eq!(r.min, dvec2(3.0, -1.0));
        assert_eq!(r.max, dvec2(5.0, 1.0));
    }

    // ==================== StrokeStyle tests ====================

    #[test]
    fn stroke_style_default_is_center_width_one() {
        let s = StrokeStyle::default();
        assert_eq!(s.placement, StrokePlacement::Center);
        assert_eq!(s.total_width, 1.0);
    }

    #[test]
    fn stroke_style_try_new_rejects_bad_widths() {
        assert_eq!(
            StrokeStyle::try_new(StrokePlacement::Center, -1.0),
            Err(NumericError::Negative)
        );
        assert_eq!(
            StrokeStyle::try_new(StrokePlacement::Center, f64::NAN),
            Err(NumericError::NaN)
        );
        assert!(StrokeStyle::try_new(StrokePlacement::Outside, 2.0).is_ok());
    }
}

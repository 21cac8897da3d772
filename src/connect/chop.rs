//! Boundary resolution: where a ray from a shape's interior toward an
//! external point crosses the shape's visible boundary ("chop").
//!
//! All resolvers are pure and total. Degenerate input (zero-size box,
//! external point at the center, parallel rays) resolves to a deterministic
//! fallback point; nothing here returns an error or panics.

use glam::{DVec2, dvec2};

use crate::types::{Rect, StrokePlacement, StrokeStyle};

use super::defaults;

/// How far the effective boundary sits outside the figure bounds for a given
/// stroke policy.
pub fn stroke_growth(stroke: StrokeStyle) -> f64 {
    match stroke.placement {
        StrokePlacement::Center => stroke.total_width / 2.0,
        StrokePlacement::Outside => stroke.total_width,
        StrokePlacement::Inside => 0.0,
    }
}

/// Which kind of rectangle edge a ray exit landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitEdge {
    /// Left or right edge: the x coordinate is pinned to the boundary.
    Vertical,
    /// Top or bottom edge: the y coordinate is pinned to the boundary.
    Horizontal,
}

/// Exit point of a ray cast from the rectangle center along `dir`.
///
/// Zero direction resolves east; an exact corner hit reports the vertical
/// edge. A rectangle degenerate on both axes exits at its center.
fn ray_exit_rect(rect: Rect, dir: DVec2) -> (DVec2, ExitEdge) {
    let center = rect.center();
    let half = rect.half_size();
    if half.x <= 0.0 && half.y <= 0.0 {
        return (center, ExitEdge::Vertical);
    }

    let dir = if dir == DVec2::ZERO { dvec2(1.0, 0.0) } else { dir };
    let tx = if dir.x != 0.0 {
        half.x / dir.x.abs()
    } else {
        f64::INFINITY
    };
    let ty = if dir.y != 0.0 {
        half.y / dir.y.abs()
    } else {
        f64::INFINITY
    };

    if tx <= ty {
        (center + dir * tx, ExitEdge::Vertical)
    } else {
        (center + dir * ty, ExitEdge::Horizontal)
    }
}

/// Chop against a rectangle: ray from the grown box center toward `external`.
pub fn chop_rect(bounds: Rect, stroke: StrokeStyle, external: DVec2) -> DVec2 {
    let grown = bounds.grow(stroke_growth(stroke));
    ray_exit_rect(grown, external - grown.center()).0
}

/// Chop against an ellipse inscribed in the (grown) bounds.
///
/// The `1/sqrt((dx/a)^2 + (dy/b)^2)` scaling is the exact ray/ellipse
/// intersection and respects differing width and height; a plain polar point
/// would not.
pub fn chop_ellipse(bounds: Rect, stroke: StrokeStyle, external: DVec2) -> DVec2 {
    let grown = bounds.grow(stroke_growth(stroke));
    let center = grown.center();
    let half = grown.half_size();
    if half.x <= 0.0 || half.y <= 0.0 {
        return ray_exit_rect(grown, external - center).0;
    }

    let delta = external - center;
    if delta == DVec2::ZERO {
        return dvec2(center.x + half.x, center.y);
    }

    let denom = (delta.x * delta.x) / (half.x * half.x) + (delta.y * delta.y) / (half.y * half.y);
    center + delta / denom.sqrt()
}

/// The four diamond edges, named by the quadrant they close off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiamondEdge {
    NorthEast,
    NorthWest,
    SouthWest,
    SouthEast,
}

/// Quadrant selection for the diamond resolver.
///
/// Within `dead_zone` radians of an axis the quadrant is ambiguous and no
/// edge is reported; the caller falls back to the rectangle resolver, whose
/// axis exits coincide with the diamond vertices anyway.
fn diamond_edge(delta: DVec2, dead_zone: f64) -> Option<DiamondEdge> {
    use std::f64::consts::{FRAC_PI_2, PI};

    let angle = delta.y.atan2(delta.x);
    for axis in [0.0, FRAC_PI_2, -FRAC_PI_2, PI, -PI] {
        if (angle - axis).abs() < dead_zone {
            return None;
        }
    }

    // Screen coordinates: positive angles point downward.
    Some(if angle > 0.0 {
        if angle < FRAC_PI_2 {
            DiamondEdge::SouthEast
        } else {
            DiamondEdge::SouthWest
        }
    } else if angle > -FRAC_PI_2 {
        DiamondEdge::NorthEast
    } else {
        DiamondEdge::NorthWest
    })
}

/// Segment endpoints of a diamond edge, vertices at the box-side midpoints.
fn diamond_segment(rect: Rect, edge: DiamondEdge) -> (DVec2, DVec2) {
    let c = rect.center();
    let top = dvec2(c.x, rect.min.y);
    let right = dvec2(rect.max.x, c.y);
    let bottom = dvec2(c.x, rect.max.y);
    let left = dvec2(rect.min.x, c.y);
    match edge {
        DiamondEdge::NorthEast => (right, top),
        DiamondEdge::NorthWest => (top, left),
        DiamondEdge::SouthWest => (left, bottom),
        DiamondEdge::SouthEast => (bottom, right),
    }
}

/// Intersection of the infinite lines `p1..p2` and `p3..p4`.
fn line_intersection(p1: DVec2, p2: DVec2, p3: DVec2, p4: DVec2) -> Option<DVec2> {
    let r = p2 - p1;
    let s = p4 - p3;
    let denom = r.perp_dot(s);
    if denom.abs() < f64::EPSILON {
        return None;
    }
    let t = (p3 - p1).perp_dot(s) / denom;
    Some(p1 + r * t)
}

/// Chop against a diamond whose vertices sit at the box-side midpoints.
///
/// `quadratic` forces the box square (centered) before resolution. Growth is
/// weighted by `sqrt(w^2+h^2)/h` horizontally and `sqrt(w^2+h^2)/w`
/// vertically, which moves each slanted edge outward by exactly the growth
/// distance, so the visible stroke thickness stays constant.
pub fn chop_diamond(bounds: Rect, stroke: StrokeStyle, quadratic: bool, external: DVec2) -> DVec2 {
    let mut rect = bounds;
    if quadratic {
        let side = rect.width().max(rect.height());
        rect = Rect::around(rect.center(), side / 2.0);
    }

    let growth = stroke_growth(stroke);
    let (w, h) = (rect.width(), rect.height());
    let grown = if growth > 0.0 && w > 0.0 && h > 0.0 {
        let diag = (w * w + h * h).sqrt();
        rect.grow_xy(growth * diag / h, growth * diag / w)
    } else {
        rect
    };

    let center = grown.center();
    let half = grown.half_size();
    if half.x <= 0.0 || half.y <= 0.0 {
        return ray_exit_rect(grown, external - center).0;
    }

    let delta = external - center;

    // Inside the diamond there is no outgoing ray to intersect; pick the
    // nearer vertical extreme.
    if delta.x.abs() / half.x + delta.y.abs() / half.y <= 1.0 {
        return if delta.y <= 0.0 {
            dvec2(center.x, grown.min.y)
        } else {
            dvec2(center.x, grown.max.y)
        };
    }

    let hit = diamond_edge(delta, defaults::DIAMOND_DEAD_ZONE).and_then(|edge| {
        let (a, b) = diamond_segment(grown, edge);
        line_intersection(center, external, a, b)
    });
    match hit {
        Some(p) => p,
        None => ray_exit_rect(grown, delta).0,
    }
}

/// Chop against a rounded rectangle with corner arc radii `arc`.
///
/// Resolves on the grown outer rectangle, then clamps the coordinate that is
/// not pinned to the touched edge into the inner rectangle (bounds shrunk by
/// arc radius plus growth per axis), so the anchor never lands inside a
/// corner cut.
pub fn chop_rounded_rect(bounds: Rect, stroke: StrokeStyle, arc: DVec2, external: DVec2) -> DVec2 {
    let growth = stroke_growth(stroke);
    let outer = bounds.grow(growth);
    let (p, edge) = ray_exit_rect(outer, external - outer.center());

    let inner = bounds.grow_xy(-(arc.x + growth), -(arc.y + growth));
    let center = outer.center();
    match edge {
        ExitEdge::Vertical => dvec2(p.x, clamp_axis(p.y, inner.min.y, inner.max.y, center.y)),
        ExitEdge::Horizontal => dvec2(clamp_axis(p.x, inner.min.x, inner.max.x, center.x), p.y),
    }
}

/// Clamp `v` into `[lo, hi]`, collapsing to `fallback` when the range is
/// inverted (arc radii larger than the box).
fn clamp_axis(v: f64, lo: f64, hi: f64, fallback: f64) -> f64 {
    if lo > hi { fallback } else { v.clamp(lo, hi) }
}

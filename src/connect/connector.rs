//! Connector strategies: how a connection endpoint finds its anchor on the
//! owning figure.
//!
//! Two families exist. [`ChopConnector`] recomputes the boundary
//! intersection on every query; [`OffsetConnector`] and [`StickyConnector`]
//! snapshot position (an offset, an angle) at connect time and replay it.
//! The family is a closed set dispatched through the [`Connector`] enum.

use std::cell::Cell;
use std::rc::Rc;

use enum_dispatch::enum_dispatch;
use glam::{DVec2, dvec2};

use crate::errors::RestoreError;
use crate::types::{NumericError, Rect};

use super::connection::Connection;
use super::defaults;
use super::figure::Figure;

/// The figure a connector resolves against: its owner, or the owner's
/// decorator when redirect is enabled and a decorator is present.
fn connect_target(owner: &Rc<Figure>, redirect: bool) -> Rc<Figure> {
    if redirect {
        if let Some(decorator) = owner.decorator() {
            return decorator;
        }
    }
    Rc::clone(owner)
}

fn check_finite_point(p: DVec2) -> Result<DVec2, NumericError> {
    for v in [p.x, p.y] {
        if v.is_nan() {
            return Err(NumericError::NaN);
        }
        if v.is_infinite() {
            return Err(NumericError::Infinite);
        }
    }
    Ok(p)
}

/// Anchor resolution, the shared contract of every connector.
#[enum_dispatch]
pub trait Anchoring {
    /// The figure this connector is bound to, for its entire lifetime.
    fn owner(&self) -> &Rc<Figure>;

    /// Whether resolution goes against the owner's decorator.
    fn target_redirect(&self) -> bool;

    /// Resolve the anchor. `reference` is derived from the connection's
    /// other endpoint; snapshot connectors ignore it.
    fn find_point(&self, reference: DVec2) -> DVec2;

    /// The most recently resolved anchor.
    fn anchor(&self) -> DVec2;

    /// Anchor for the start of `connection`.
    fn find_start(&self, connection: &Connection) -> DVec2 {
        self.find_point(connection.start_reference())
    }

    /// Anchor for the end of `connection`.
    fn find_end(&self, connection: &Connection) -> DVec2 {
        self.find_point(connection.end_reference())
    }

    /// A small fixed hit region around the anchor, not the owner's box.
    fn bounding_area(&self) -> Rect {
        Rect::around(self.anchor(), defaults::CONNECTOR_HIT_EXTENT)
    }

    fn contains(&self, p: DVec2) -> bool {
        self.bounding_area().contains(p)
    }

    /// Hint that the connection's start moved. Resolvers may use this to
    /// stabilize later queries; the default does nothing.
    fn update_start_location(&self, _point: DVec2) {}

    /// Hint that the connection's end moved.
    fn update_end_location(&self, _point: DVec2) {}
}

/// The closed connector family.
#[enum_dispatch(Anchoring)]
#[derive(Debug, Clone)]
pub enum Connector {
    Chop(ChopConnector),
    Offset(OffsetConnector),
    Sticky(StickyConnector),
}

impl Connector {
    /// Whether this connector belongs to the fixed-offset family.
    pub fn is_offset(&self) -> bool {
        matches!(self, Connector::Offset(_))
    }
}

// ============================================================================
// ChopConnector: recomputed on every query
// ============================================================================

/// Resolves the anchor by chopping the target's boundary fresh on every
/// query, so the anchor always faces the other endpoint.
#[derive(Debug, Clone)]
pub struct ChopConnector {
    owner: Rc<Figure>,
    redirect: bool,
    hint: Cell<Option<DVec2>>,
    last_anchor: Cell<DVec2>,
}

impl ChopConnector {
    pub fn new(owner: Rc<Figure>) -> ChopConnector {
        ChopConnector::with_redirect(owner, false)
    }

    pub fn with_redirect(owner: Rc<Figure>, redirect: bool) -> ChopConnector {
        let last = owner.bounds().center();
        ChopConnector {
            owner,
            redirect,
            hint: Cell::new(None),
            last_anchor: Cell::new(last),
        }
    }
}

impl Anchoring for ChopConnector {
    fn owner(&self) -> &Rc<Figure> {
        &self.owner
    }

    fn target_redirect(&self) -> bool {
        self.redirect
    }

    fn find_point(&self, reference: DVec2) -> DVec2 {
        let target = connect_target(&self.owner, self.redirect);
        // A reference sitting on the target center carries no direction;
        // the last hinted location stabilizes direction-sensitive shapes.
        let reference = if reference == target.bounds().center() {
            self.hint.get().unwrap_or(reference)
        } else {
            reference
        };
        let p = target.chop(reference);
        self.last_anchor.set(p);
        p
    }

    fn anchor(&self) -> DVec2 {
        self.last_anchor.get()
    }

    fn update_start_location(&self, point: DVec2) {
        self.hint.set(Some(point));
    }

    fn update_end_location(&self, point: DVec2) {
        self.hint.set(Some(point));
    }
}

// ============================================================================
// OffsetConnector: fixed offset inside the owner's box
// ============================================================================

/// Anchors at a fixed offset from the target box origin.
///
/// While the box keeps its size the query is O(1): origin plus stored
/// offset, no ray casting. A resize rescales the offset proportionally
/// against the previous box, except that an offset pinned exactly to the min
/// or max edge stays pinned, and elliptical targets recompute through chop
/// space so the anchor stays on the curve.
#[derive(Debug, Clone)]
pub struct OffsetConnector {
    owner: Rc<Figure>,
    redirect: bool,
    offset: Cell<DVec2>,
    snapshot: Cell<Rect>,
}

impl OffsetConnector {
    /// Connector anchored at `point`, expressed relative to the target's
    /// current box.
    pub fn new(owner: Rc<Figure>, point: DVec2) -> OffsetConnector {
        let bounds = connect_target(&owner, false).bounds();
        OffsetConnector {
            owner,
            redirect: false,
            offset: Cell::new(point - bounds.min),
            snapshot: Cell::new(bounds),
        }
    }

    /// Connector with a pre-computed offset from the box origin.
    pub fn from_offset(owner: Rc<Figure>, offset: DVec2) -> OffsetConnector {
        let bounds = connect_target(&owner, false).bounds();
        OffsetConnector {
            owner,
            redirect: false,
            offset: Cell::new(offset),
            snapshot: Cell::new(bounds),
        }
    }

    /// Rebuild from persisted state. The stored offset is taken verbatim
    /// (no geometric re-derivation); only finiteness is validated.
    pub fn restore(owner: Rc<Figure>, offset: DVec2) -> Result<OffsetConnector, RestoreError> {
        let offset = check_finite_point(offset).map_err(RestoreError::InvalidOffset)?;
        Ok(OffsetConnector::from_offset(owner, offset))
    }

    pub fn with_redirect(mut self, redirect: bool) -> OffsetConnector {
        // Re-express the anchored point relative to the new target box.
        let anchor = self.snapshot.get().min + self.offset.get();
        self.redirect = redirect;
        let bounds = connect_target(&self.owner, redirect).bounds();
        self.offset.set(anchor - bounds.min);
        self.snapshot.set(bounds);
        self
    }

    /// The stored offset from the target box origin, for persistence.
    pub fn offset(&self) -> DVec2 {
        self.offset.get()
    }

    fn rescale(&self, target: &Figure, old: Rect, new: Rect) {
        let off = self.offset.get();
        let next = if target.is_elliptical() {
            // Chop space, not interpolation: keep the old anchor's direction
            // from the old center and re-intersect the new boundary.
            let dir = (old.min + off) - old.center();
            if dir == DVec2::ZERO {
                new.center() - new.min
            } else {
                target.chop(new.center() + dir) - new.min
            }
        } else {
            dvec2(
                rescale_axis(off.x, old.width(), new.width()),
                rescale_axis(off.y, old.height(), new.height()),
            )
        };
        self.offset.set(next);
    }
}

/// Proportional rescale of one offset axis, preserving exact edge pinning.
fn rescale_axis(v: f64, old: f64, new: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else if v == old {
        new
    } else if old > 0.0 {
        v * new / old
    } else {
        v.clamp(0.0, new.max(0.0))
    }
}

impl Anchoring for OffsetConnector {
    fn owner(&self) -> &Rc<Figure> {
        &self.owner
    }

    fn target_redirect(&self) -> bool {
        self.redirect
    }

    fn find_point(&self, _reference: DVec2) -> DVec2 {
        let target = connect_target(&self.owner, self.redirect);
        let bounds = target.bounds();
        let prev = self.snapshot.get();
        if bounds.size() != prev.size() {
            self.rescale(&target, prev, bounds);
        }
        self.snapshot.set(bounds);
        bounds.min + self.offset.get()
    }

    fn anchor(&self) -> DVec2 {
        self.snapshot.get().min + self.offset.get()
    }
}

// ============================================================================
// StickyConnector: fixed angle from the box center
// ============================================================================

/// Anchors at a fixed angle from the target box center, snapshotted at
/// connect time. Ignores the other endpoint entirely.
#[derive(Debug, Clone)]
pub struct StickyConnector {
    owner: Rc<Figure>,
    redirect: bool,
    angle: f64,
    last_anchor: Cell<DVec2>,
}

impl StickyConnector {
    /// Connector whose angle is taken from the direction of `point` out of
    /// the target box center.
    pub fn new(owner: Rc<Figure>, point: DVec2) -> StickyConnector {
        let center = connect_target(&owner, false).bounds().center();
        let delta = point - center;
        let angle = if delta == DVec2::ZERO {
            0.0
        } else {
            delta.y.atan2(delta.x)
        };
        StickyConnector {
            owner,
            redirect: false,
            angle,
            last_anchor: Cell::new(center),
        }
    }

    /// Rebuild from a persisted angle without re-deriving it.
    pub fn restore(owner: Rc<Figure>, angle: f64) -> Result<StickyConnector, RestoreError> {
        if angle.is_nan() {
            return Err(RestoreError::InvalidAngle(NumericError::NaN));
        }
        if angle.is_infinite() {
            return Err(RestoreError::InvalidAngle(NumericError::Infinite));
        }
        let center = connect_target(&owner, false).bounds().center();
        Ok(StickyConnector {
            owner,
            redirect: false,
            angle,
            last_anchor: Cell::new(center),
        })
    }

    pub fn with_redirect(mut self, redirect: bool) -> StickyConnector {
        self.redirect = redirect;
        self
    }

    /// The stored angle in radians, for persistence.
    pub fn angle(&self) -> f64 {
        self.angle
    }
}

impl Anchoring for StickyConnector {
    fn owner(&self) -> &Rc<Figure> {
        &self.owner
    }

    fn target_redirect(&self) -> bool {
        self.redirect
    }

    fn find_point(&self, _reference: DVec2) -> DVec2 {
        let target = connect_target(&self.owner, self.redirect);
        let bounds = target.bounds();
        // Project the stored angle safely past the boundary, then chop.
        let reach = bounds.half_size().length() * 2.0 + target.stroke().total_width + 1.0;
        let external = bounds.center() + DVec2::from_angle(self.angle) * reach;
        let p = target.chop(external);
        self.last_anchor.set(p);
        p
    }

    fn anchor(&self) -> DVec2 {
        self.last_anchor.get()
    }
}

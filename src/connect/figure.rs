//! Figures: the shapes connections attach to, and the notification channel
//! between a figure and whatever depends on its geometry.
//!
//! A figure is deliberately small: bounds, stroke policy, shape kind, an
//! optional decorator, and a listener registry. Everything a connector needs
//! is reachable from here; everything else (painting, selection, tool
//! handles) lives with the editor.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use glam::{DVec2, dvec2};

use crate::log::trace;
use crate::types::{Rect, StrokeStyle};

use super::chop;

/// The closed family of shapes that can own connection anchors.
///
/// Rectangle, ellipse, diamond and rounded rectangle resolve through the
/// generic resolvers in [`chop`]; the triangle carries its own geometry on
/// the figure (see [`Figure::chop`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    /// Diamond with vertices at the box-side midpoints. `quadratic` forces
    /// the box square before resolution.
    Diamond { quadratic: bool },
    /// Rounded rectangle with per-axis corner arc radii.
    RoundedRectangle { arc: DVec2 },
    Triangle { rotation: TriangleRotation },
}

/// Orientation of a triangle within its bounding box.
///
/// Cardinal rotations are isoceles triangles with the apex on that side's
/// midpoint; diagonal rotations are right triangles with the right angle in
/// that corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriangleRotation {
    #[default]
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl TriangleRotation {
    /// Triangle vertices for this rotation inside `rect`.
    fn vertices(self, rect: Rect) -> [DVec2; 3] {
        let c = rect.center();
        let (x1, y1) = (rect.min.x, rect.min.y);
        let (x2, y2) = (rect.max.x, rect.max.y);
        match self {
            TriangleRotation::North => [dvec2(c.x, y1), dvec2(x2, y2), dvec2(x1, y2)],
            TriangleRotation::East => [dvec2(x2, c.y), dvec2(x1, y2), dvec2(x1, y1)],
            TriangleRotation::South => [dvec2(c.x, y2), dvec2(x1, y1), dvec2(x2, y1)],
            TriangleRotation::West => [dvec2(x1, c.y), dvec2(x2, y1), dvec2(x2, y2)],
            TriangleRotation::NorthEast => [dvec2(x1, y1), dvec2(x2, y1), dvec2(x2, y2)],
            TriangleRotation::SouthEast => [dvec2(x2, y1), dvec2(x2, y2), dvec2(x1, y2)],
            TriangleRotation::SouthWest => [dvec2(x2, y2), dvec2(x1, y2), dvec2(x1, y1)],
            TriangleRotation::NorthWest => [dvec2(x1, y2), dvec2(x1, y1), dvec2(x2, y1)],
        }
    }
}

/// Identifier of a registered listener.
pub type ListenerId = u64;

/// Receiver side of figure change notifications.
///
/// Implementors are held weakly; a dropped listener is pruned on the next
/// notification pass.
pub trait FigureListener {
    fn figure_changed(&self, figure: &Figure);
}

/// Handle returned by [`Figure::subscribe`]. Pass it back to
/// [`Figure::unsubscribe`] to release the registration explicitly.
#[derive(Debug)]
pub struct Subscription {
    id: ListenerId,
}

/// A shape that connections can attach to.
pub struct Figure {
    bounds: Cell<Rect>,
    stroke: Cell<StrokeStyle>,
    kind: Cell<ShapeKind>,
    decorator: RefCell<Option<Rc<Figure>>>,
    listeners: RefCell<Vec<(ListenerId, Weak<dyn FigureListener>)>>,
    next_listener: Cell<ListenerId>,
}

impl Figure {
    pub fn new(kind: ShapeKind, bounds: Rect) -> Rc<Figure> {
        Figure::with_stroke(kind, bounds, StrokeStyle::default())
    }

    pub fn with_stroke(kind: ShapeKind, bounds: Rect, stroke: StrokeStyle) -> Rc<Figure> {
        Rc::new(Figure {
            bounds: Cell::new(bounds),
            stroke: Cell::new(stroke),
            kind: Cell::new(kind),
            decorator: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
        })
    }

    pub fn bounds(&self) -> Rect {
        self.bounds.get()
    }

    pub fn set_bounds(&self, bounds: Rect) {
        self.bounds.set(bounds);
        self.changed();
    }

    /// Shift the figure by a displacement.
    pub fn translate(&self, delta: DVec2) {
        self.bounds.set(self.bounds.get().translate(delta));
        self.changed();
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind.get()
    }

    pub fn set_kind(&self, kind: ShapeKind) {
        self.kind.set(kind);
        self.changed();
    }

    pub fn stroke(&self) -> StrokeStyle {
        self.stroke.get()
    }

    pub fn set_stroke(&self, stroke: StrokeStyle) {
        self.stroke.set(stroke);
        self.changed();
    }

    /// The decorator figure, when this figure is decorated. Connectors with
    /// target redirect resolve against it instead of the owner.
    pub fn decorator(&self) -> Option<Rc<Figure>> {
        self.decorator.borrow().clone()
    }

    pub fn set_decorator(&self, decorator: Option<Rc<Figure>>) {
        *self.decorator.borrow_mut() = decorator;
        self.changed();
    }

    pub fn is_elliptical(&self) -> bool {
        matches!(self.kind.get(), ShapeKind::Ellipse)
    }

    /// Register a change listener; the figure keeps only a weak reference.
    pub fn subscribe(&self, listener: Weak<dyn FigureListener>) -> Subscription {
        let id = self.next_listener.get();
        self.next_listener.set(id + 1);
        self.listeners.borrow_mut().push((id, listener));
        Subscription { id }
    }

    /// Release a registration. Unknown handles (already pruned) are ignored.
    pub fn unsubscribe(&self, sub: Subscription) {
        self.listeners.borrow_mut().retain(|(id, _)| *id != sub.id);
    }

    /// Notify listeners that geometry changed. Mutators call this
    /// themselves; it is public so callers batching several raw mutations
    /// can fire a single notification.
    pub fn changed(&self) {
        // Snapshot so listeners may subscribe/unsubscribe re-entrantly.
        let snapshot: Vec<(ListenerId, Weak<dyn FigureListener>)> =
            self.listeners.borrow().clone();
        trace!(listeners = snapshot.len(), "figure changed");
        let mut dead = false;
        for (_, weak) in &snapshot {
            match weak.upgrade() {
                Some(listener) => listener.figure_changed(self),
                None => dead = true,
            }
        }
        if dead {
            self.listeners
                .borrow_mut()
                .retain(|(_, weak)| weak.strong_count() > 0);
        }
    }

    /// Number of live listener registrations.
    pub fn listener_count(&self) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(_, weak)| weak.strong_count() > 0)
            .count()
    }

    /// Resolve the point where a straight line from this figure's interior
    /// toward `external` crosses its visible boundary.
    pub fn chop(&self, external: DVec2) -> DVec2 {
        let bounds = self.bounds.get();
        let stroke = self.stroke.get();
        match self.kind.get() {
            ShapeKind::Rectangle => chop::chop_rect(bounds, stroke, external),
            ShapeKind::Ellipse => chop::chop_ellipse(bounds, stroke, external),
            ShapeKind::Diamond { quadratic } => {
                chop::chop_diamond(bounds, stroke, quadratic, external)
            }
            ShapeKind::RoundedRectangle { arc } => {
                chop::chop_rounded_rect(bounds, stroke, arc, external)
            }
            ShapeKind::Triangle { rotation } => {
                chop_triangle(bounds, stroke, rotation, external)
            }
        }
    }
}

// Manual impl: the listener registry holds trait objects with no Debug bound.
impl fmt::Debug for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Figure")
            .field("kind", &self.kind.get())
            .field("bounds", &self.bounds.get())
            .field("stroke", &self.stroke.get())
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

/// Triangle chop: intersect the ray from the box center toward `external`
/// with the rotated triangle's edges, falling back to the vertex nearest the
/// external point when the ray crosses no edge.
fn chop_triangle(
    bounds: Rect,
    stroke: StrokeStyle,
    rotation: TriangleRotation,
    external: DVec2,
) -> DVec2 {
    let grown = bounds.grow(chop::stroke_growth(stroke));
    let verts = rotation.vertices(grown);
    let center = grown.center();
    let dir = external - center;
    if dir == DVec2::ZERO {
        return verts[0];
    }

    // Exit crossing: the valid intersection farthest along the ray. The
    // center can sit exactly on a diagonal hypotenuse, so the nearest
    // crossing may be at t == 0.
    let mut best: Option<(f64, DVec2)> = None;
    for i in 0..3 {
        let a = verts[i];
        let b = verts[(i + 1) % 3];
        if let Some((t, p)) = ray_segment_intersection(center, dir, a, b) {
            if best.is_none_or(|(bt, _)| t > bt) {
                best = Some((t, p));
            }
        }
    }
    match best {
        Some((_, p)) => p,
        None => nearest_vertex(&verts, external),
    }
}

/// Intersection of the ray `origin + t*dir` (t > 0) with segment `a..b`.
fn ray_segment_intersection(origin: DVec2, dir: DVec2, a: DVec2, b: DVec2) -> Option<(f64, DVec2)> {
    let seg = b - a;
    let denom = dir.perp_dot(seg);
    if denom.abs() < f64::EPSILON {
        return None;
    }
    let t = (a - origin).perp_dot(seg) / denom;
    let u = (a - origin).perp_dot(dir) / denom;
    if t > 1e-9 && (-1e-9..=1.0 + 1e-9).contains(&u) {
        Some((t, origin + dir * t))
    } else {
        None
    }
}

fn nearest_vertex(verts: &[DVec2; 3], toward: DVec2) -> DVec2 {
    let mut best = verts[0];
    let mut best_dist = f64::INFINITY;
    for &v in verts {
        let d = (v - toward).length_squared();
        if d < best_dist {
            best_dist = d;
            best = v;
        }
    }
    best
}

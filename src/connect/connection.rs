//! Live connections: an ordered point path whose first and last points track
//! connector anchors through figure changes.
//!
//! A connection becomes live once both ends are bound; at that moment it
//! subscribes to both endpoint figures and keeps its anchors current until
//! disconnected. Connecting a figure to itself switches routing to the
//! orthogonal self-loop algorithm, which owns all five path points.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use glam::{DVec2, dvec2};

use crate::log::debug;

use super::connector::{Anchoring, Connector};
use super::defaults;
use super::figure::{Figure, FigureListener, Subscription};

/// Tunable constants for self-loop routing (pixels).
///
/// These are presentation heuristics; the invariant is the loop shape, not
/// the exact values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopStyle {
    /// Exit distance for owners narrower than `small_width`.
    pub small_delta: f64,
    /// Exit distance between the width breakpoints.
    pub medium_delta: f64,
    /// Exit distance for owners wider than `large_width`.
    pub large_delta: f64,
    pub small_width: f64,
    pub large_width: f64,
}

impl Default for LoopStyle {
    fn default() -> Self {
        LoopStyle {
            small_delta: defaults::LOOP_DELTA_SMALL,
            medium_delta: defaults::LOOP_DELTA_MEDIUM,
            large_delta: defaults::LOOP_DELTA_LARGE,
            small_width: defaults::LOOP_WIDTH_SMALL,
            large_width: defaults::LOOP_WIDTH_LARGE,
        }
    }
}

impl LoopStyle {
    /// Exit distance for an owner of the given width, capped at the width.
    fn delta_for(&self, width: f64) -> f64 {
        let delta = if width < self.small_width {
            self.small_delta
        } else if width > self.large_width {
            self.large_delta
        } else {
            self.medium_delta
        };
        delta.min(width)
    }
}

struct Inner {
    points: Vec<DVec2>,
    start: Option<Connector>,
    end: Option<Connector>,
    start_sub: Option<(Rc<Figure>, Subscription)>,
    end_sub: Option<(Rc<Figure>, Subscription)>,
}

/// An ordered path of at least two points linking two figures.
///
/// `Rc`-based so it can register itself as a figure listener; create with
/// [`Connection::new`] or [`Connection::with_endpoints`].
pub struct Connection {
    inner: RefCell<Inner>,
    loop_style: Cell<LoopStyle>,
    // Registered with figures as the listener; set at construction.
    weak_self: Weak<Connection>,
}

impl Connection {
    pub fn new() -> Rc<Connection> {
        Connection::with_endpoints(DVec2::ZERO, DVec2::ZERO)
    }

    /// Connection with raw endpoints, both ends unbound.
    pub fn with_endpoints(start: DVec2, end: DVec2) -> Rc<Connection> {
        Rc::new_cyclic(|weak| Connection {
            inner: RefCell::new(Inner {
                points: vec![start, end],
                start: None,
                end: None,
                start_sub: None,
                end_sub: None,
            }),
            loop_style: Cell::new(LoopStyle::default()),
            weak_self: weak.clone(),
        })
    }

    pub fn loop_style(&self) -> LoopStyle {
        self.loop_style.get()
    }

    pub fn set_loop_style(&self, style: LoopStyle) {
        self.loop_style.set(style);
    }

    // ------------------------------------------------------------------
    // Path access
    // ------------------------------------------------------------------

    pub fn points(&self) -> Vec<DVec2> {
        self.inner.borrow().points.clone()
    }

    pub fn point_count(&self) -> usize {
        self.inner.borrow().points.len()
    }

    pub fn start_point(&self) -> DVec2 {
        self.inner.borrow().points[0]
    }

    pub fn end_point(&self) -> DVec2 {
        let inner = self.inner.borrow();
        inner.points[inner.points.len() - 1]
    }

    /// Raw start point, used while the start is unbound (dragging) and as
    /// the stored fallback after a disconnect.
    pub fn set_start_point(&self, p: DVec2) {
        self.inner.borrow_mut().points[0] = p;
    }

    /// Raw end point; see [`Connection::set_start_point`].
    pub fn set_end_point(&self, p: DVec2) {
        let mut inner = self.inner.borrow_mut();
        let last = inner.points.len() - 1;
        inner.points[last] = p;
    }

    /// Reference point used when resolving the start anchor: the adjacent
    /// path point, which is the other endpoint's current anchor (or raw
    /// stored point) on a two-point path and the first waypoint otherwise.
    pub fn start_reference(&self) -> DVec2 {
        self.inner.borrow().points[1]
    }

    /// Reference point used when resolving the end anchor.
    pub fn end_reference(&self) -> DVec2 {
        let inner = self.inner.borrow();
        inner.points[inner.points.len() - 2]
    }

    // ------------------------------------------------------------------
    // Waypoints
    // ------------------------------------------------------------------

    /// Insert an interior waypoint before `index` (clamped into the
    /// interior range), then re-layout.
    pub fn insert_point(&self, index: usize, p: DVec2) {
        {
            let mut inner = self.inner.borrow_mut();
            let last = inner.points.len() - 1;
            let index = index.clamp(1, last);
            inner.points.insert(index, p);
        }
        self.layout_connection();
    }

    /// Remove an interior waypoint; endpoints cannot be removed.
    pub fn remove_point(&self, index: usize) {
        {
            let mut inner = self.inner.borrow_mut();
            let last = inner.points.len() - 1;
            if index == 0 || index >= last {
                return;
            }
            inner.points.remove(index);
        }
        self.layout_connection();
    }

    /// Move an interior waypoint; endpoints are connector-owned.
    pub fn set_point(&self, index: usize, p: DVec2) {
        {
            let mut inner = self.inner.borrow_mut();
            let last = inner.points.len() - 1;
            if index == 0 || index >= last {
                return;
            }
            inner.points[index] = p;
        }
        self.layout_connection();
    }

    // ------------------------------------------------------------------
    // Endpoint binding
    // ------------------------------------------------------------------

    pub fn is_live(&self) -> bool {
        let inner = self.inner.borrow();
        inner.start.is_some() && inner.end.is_some()
    }

    pub fn start_figure(&self) -> Option<Rc<Figure>> {
        self.inner
            .borrow()
            .start
            .as_ref()
            .map(|c| Rc::clone(c.owner()))
    }

    pub fn end_figure(&self) -> Option<Rc<Figure>> {
        self.inner
            .borrow()
            .end
            .as_ref()
            .map(|c| Rc::clone(c.owner()))
    }

    /// A copy of the start connector, for tools that inspect or rewire
    /// endpoints.
    pub fn start_connector(&self) -> Option<Connector> {
        self.inner.borrow().start.clone()
    }

    /// A copy of the end connector.
    pub fn end_connector(&self) -> Option<Connector> {
        self.inner.borrow().end.clone()
    }

    /// Bind the start of the connection. Once both ends are bound the
    /// connection subscribes to both figures and updates itself.
    pub fn connect_start(&self, connector: Connector) {
        self.release_subscriptions();
        self.inner.borrow_mut().start = Some(connector);
        self.arm_if_live();
    }

    /// Bind the end of the connection; see [`Connection::connect_start`].
    pub fn connect_end(&self, connector: Connector) {
        self.release_subscriptions();
        self.inner.borrow_mut().end = Some(connector);
        self.arm_if_live();
    }

    /// Unbind the start. Both change subscriptions are released; the raw
    /// start point remains as the stored fallback.
    pub fn disconnect_start(&self) {
        self.release_subscriptions();
        self.inner.borrow_mut().start = None;
        debug!("start disconnected");
    }

    /// Unbind the end; see [`Connection::disconnect_start`].
    pub fn disconnect_end(&self) {
        self.release_subscriptions();
        self.inner.borrow_mut().end = None;
        debug!("end disconnected");
    }

    /// Unbind both ends, releasing subscriptions and connectors. Used on
    /// connection removal; the connectors are disposed with it.
    pub fn disconnect(&self) {
        self.release_subscriptions();
        let mut inner = self.inner.borrow_mut();
        inner.start = None;
        inner.end = None;
        debug!("connection disconnected");
    }

    fn arm_if_live(&self) {
        let (start_fig, end_fig) = {
            let inner = self.inner.borrow();
            match (&inner.start, &inner.end) {
                (Some(s), Some(e)) => (Rc::clone(s.owner()), Rc::clone(e.owner())),
                _ => return,
            }
        };
        let listener: Weak<dyn FigureListener> = self.weak_self.clone();
        let start_sub = start_fig.subscribe(listener.clone());
        let end_sub = end_fig.subscribe(listener);
        {
            let mut inner = self.inner.borrow_mut();
            inner.start_sub = Some((start_fig, start_sub));
            inner.end_sub = Some((end_fig, end_sub));
        }
        debug!("connection live");
        self.update_connection();
    }

    fn release_subscriptions(&self) {
        let (start_sub, end_sub) = {
            let mut inner = self.inner.borrow_mut();
            (inner.start_sub.take(), inner.end_sub.take())
        };
        if let Some((figure, sub)) = start_sub {
            figure.unsubscribe(sub);
        }
        if let Some((figure, sub)) = end_sub {
            figure.unsubscribe(sub);
        }
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    /// Public re-entry point used by geometry mutators.
    pub fn layout_connection(&self) {
        self.update_connection();
    }

    /// Recompute the endpoint anchors from the connectors.
    ///
    /// An unbound end keeps its raw stored point; nothing here resolves
    /// through a missing connector.
    pub fn update_connection(&self) {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        if is_self_loop(inner) {
            route_self_loop(inner, self.loop_style.get());
            return;
        }

        // Start first, so the end anchor sees the fresh start anchor.
        if let Some(start) = &inner.start {
            inner.points[0] = start.find_point(inner.points[1]);
        }
        let last = inner.points.len() - 1;
        if let Some(end) = &inner.end {
            inner.points[last] = end.find_point(inner.points[last - 1]);
        }

        // Location hints for direction-sensitive resolvers.
        let (first, final_point) = (inner.points[0], inner.points[last]);
        for connector in [inner.start.as_ref(), inner.end.as_ref()]
            .into_iter()
            .flatten()
        {
            connector.update_start_location(first);
            connector.update_end_location(final_point);
        }
    }
}

impl FigureListener for Connection {
    fn figure_changed(&self, _figure: &Figure) {
        self.update_connection();
    }
}

/// A connection loops when both ends are bound to the same figure and the
/// end is a fixed-offset connector (the family whose anchors the loop
/// algorithm can own).
fn is_self_loop(inner: &Inner) -> bool {
    match (&inner.start, &inner.end) {
        (Some(start), Some(end)) => Rc::ptr_eq(start.owner(), end.owner()) && end.is_offset(),
        _ => false,
    }
}

/// Reset the path to the five algorithm-owned points of an orthogonal
/// self-loop: start, up/down past the box, across beyond the opposite side,
/// back in, end.
//
// FIXME: the positional-ratio scaling is approximate; it balances the loop
// for anchors near corners but was tuned by eye.
fn route_self_loop(inner: &mut Inner, style: LoopStyle) {
    let Some(start) = &inner.start else { return };
    let bounds = start.owner().bounds();

    let previous_end = inner.points[inner.points.len() - 1];
    let p0 = start.find_point(previous_end);
    let delta = style.delta_for(bounds.width());

    // End anchor mirrored across the box: the horizontal side opposite the
    // one nearest p0, at p0's vertical ratio.
    let to_east = p0.x - bounds.min.x <= bounds.max.x - p0.x;
    let t = if bounds.height() > 0.0 {
        ((p0.y - bounds.min.y) / bounds.height()).clamp(0.0, 1.0)
    } else {
        0.5
    };
    let p4 = dvec2(
        if to_east { bounds.max.x } else { bounds.min.x },
        bounds.min.y + t * bounds.height(),
    );

    // Outward corner of the loop: past p4's side horizontally, past the
    // nearer vertical extreme, both scaled off the positional ratio.
    let outward = if to_east { 1.0 } else { -1.0 };
    let below = t >= 0.5;
    let ratio = if below { t } else { 1.0 - t };
    let p2 = dvec2(
        p4.x + outward * delta * (0.5 + ratio),
        if below {
            bounds.max.y + delta
        } else {
            bounds.min.y - delta
        },
    );

    let p1 = dvec2(p0.x, p2.y);
    let p3 = dvec2(p2.x, p4.y);

    debug!(?p0, ?p4, delta, "routed self-loop");
    inner.points.clear();
    inner.points.extend([p0, p1, p2, p3, p4]);
}

//! End-to-end lifecycle coverage: interactive gesture, live anchor
//! tracking, mixed shape families, self-loops and disconnect.

use glam::{DVec2, dvec2};
use tether::{
    Anchoring, ChopConnector, ConnectGesture, Connection, Figure, GridConstrainer, Rect,
    ShapeKind, StrokeStyle,
};

fn figure(kind: ShapeKind, x1: f64, y1: f64, x2: f64, y2: f64) -> std::rc::Rc<Figure> {
    Figure::with_stroke(
        kind,
        Rect::new(dvec2(x1, y1), dvec2(x2, y2)),
        StrokeStyle::inside_hairline(),
    )
}

#[test]
fn drag_finalize_connect_and_follow() {
    let a = figure(ShapeKind::Rectangle, 0.0, 0.0, 100.0, 100.0);
    let b = figure(ShapeKind::Rectangle, 300.0, 0.0, 400.0, 100.0);

    // Pointer drag: the tracked offset is re-derived on every move without
    // allocating new connectors.
    let mut gesture = ConnectGesture::new();
    let id = gesture.track_connector(&a, dvec2(90.0, 50.0));
    let id = {
        let again = gesture.track_connector(&a, dvec2(100.0, 50.0));
        assert_eq!(again, id);
        again
    };
    let start = gesture.finalize_connector(id, true).unwrap();

    // Drop the second endpoint 4 px off the first's y: finalization snaps
    // the axis so the connection comes out perfectly horizontal.
    let id = gesture.track_connector(&b, dvec2(300.0, 54.0));
    let end = gesture.finalize_connector(id, false).unwrap();

    let conn = Connection::with_endpoints(dvec2(100.0, 50.0), dvec2(300.0, 54.0));
    conn.connect_start(start);
    conn.connect_end(end);
    assert!(conn.is_live());
    assert_eq!(conn.start_point(), dvec2(100.0, 50.0));
    assert_eq!(conn.end_point(), dvec2(300.0, 50.0));

    // Anchors ride along with figure moves through the subscriptions.
    b.translate(dvec2(0.0, 100.0));
    assert_eq!(conn.end_point(), dvec2(300.0, 150.0));

    // A resize rescales the stored offset, preserving edge pinning.
    b.set_bounds(Rect::new(dvec2(300.0, 0.0), dvec2(500.0, 200.0)));
    assert_eq!(conn.end_point(), dvec2(300.0, 100.0));
}

#[test]
fn chop_connectors_track_mixed_shape_families() {
    let e = figure(ShapeKind::Ellipse, 0.0, 0.0, 100.0, 50.0);
    let d = figure(ShapeKind::Diamond { quadratic: false }, 200.0, 0.0, 300.0, 100.0);

    let conn = Connection::with_endpoints(dvec2(50.0, 25.0), dvec2(250.0, 50.0));
    conn.connect_start(ChopConnector::new(e.clone()).into());
    conn.connect_end(ChopConnector::new(d.clone()).into());

    // The start anchor sits on the ellipse boundary, on the side facing
    // the diamond.
    let s = conn.start_point() - e.bounds().center();
    let on_ellipse = (s.x / 50.0).powi(2) + (s.y / 25.0).powi(2);
    assert!((on_ellipse - 1.0).abs() < 1e-9, "{on_ellipse}");
    assert!(s.x > 0.0);

    // The end anchor sits on the diamond's northwest edge (x + y = 250).
    let p = conn.end_point();
    assert!((p.x + p.y - 250.0).abs() < 1e-9, "{p:?}");
    assert!(p.x >= 200.0 && p.x <= 250.0);
}

#[test]
fn gesture_loop_back_onto_the_same_figure() {
    let owner = figure(ShapeKind::Rectangle, 0.0, 0.0, 100.0, 100.0);

    let mut gesture = ConnectGesture::new();
    let id = gesture.track_connector(&owner, dvec2(25.0, 100.0));
    let start = gesture.finalize_connector(id, true).unwrap();
    let id = gesture.track_connector(&owner, dvec2(75.0, 100.0));
    let end = gesture.finalize_connector(id, false).unwrap();

    let conn = Connection::new();
    conn.connect_start(start);
    conn.connect_end(end);

    // Both ends on one figure with an offset end connector: the self-loop
    // router owns all five points.
    let p = conn.points();
    assert_eq!(p.len(), 5);
    assert_eq!(p[0], dvec2(25.0, 100.0));
    assert_eq!(p[1].x, p[0].x);
    assert_eq!(p[1].y, p[2].y);
    assert_eq!(p[3].x, p[2].x);
    assert_eq!(p[3].y, p[4].y);
    // The loop leaves the figure and comes back on the opposite side.
    assert!(p[2].x > 100.0);
    assert_eq!(p[4].x, 100.0);

    // Rerouting follows the owner.
    owner.translate(dvec2(10.0, 0.0));
    assert_eq!(conn.points()[0], dvec2(35.0, 100.0));
    assert_eq!(conn.point_count(), 5);
}

#[test]
fn constrained_gesture_snaps_tracked_points_to_the_grid() {
    let a = figure(ShapeKind::Rectangle, 0.0, 0.0, 100.0, 100.0);
    let mut gesture =
        ConnectGesture::with_constrainer(Box::new(GridConstrainer::new(25.0, 25.0)));

    let id = gesture.track_connector(&a, dvec2(63.0, 88.0));
    assert_eq!(gesture.tracked_point(id), Some(dvec2(75.0, 100.0)));

    let connector = gesture.finalize_connector(id, true).unwrap();
    assert_eq!(connector.find_point(DVec2::ZERO), dvec2(75.0, 100.0));
}

#[test]
fn disconnect_detaches_cleanly_and_aborted_drags_leak_nothing() {
    let a = figure(ShapeKind::Rectangle, 0.0, 0.0, 100.0, 100.0);
    let b = figure(ShapeKind::Rectangle, 300.0, 0.0, 400.0, 100.0);

    let conn = Connection::with_endpoints(dvec2(50.0, 50.0), dvec2(350.0, 50.0));
    conn.connect_start(ChopConnector::new(a.clone()).into());
    conn.connect_end(ChopConnector::new(b.clone()).into());
    assert_eq!(a.listener_count(), 1);
    assert_eq!(b.listener_count(), 1);

    conn.disconnect();
    assert_eq!(a.listener_count(), 0);
    assert_eq!(b.listener_count(), 0);
    let end_before = conn.end_point();
    b.translate(dvec2(0.0, 500.0));
    conn.update_connection();
    assert_eq!(conn.end_point(), end_before);

    // Aborting a drag mid-gesture discards tracking state wholesale.
    let mut gesture = ConnectGesture::new();
    gesture.track_connector(&a, dvec2(10.0, 10.0));
    gesture.reset();
    assert_eq!(a.listener_count(), 0);
}

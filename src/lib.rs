//! tether keeps connection lines attached to the shapes they link.
//!
//! Given figures that expose a bounding box and a stroke policy, this crate
//! computes where a line or arrow visually attaches to each shape (the
//! "chop" point), keeps those anchors correct while figures move and resize,
//! routes self-loops, and drives the interactive protocol used while a user
//! drags out a new connection.
//!
//! ```
//! use glam::dvec2;
//! use tether::{ChopConnector, Connection, Figure, Rect, ShapeKind};
//!
//! let a = Figure::new(ShapeKind::Rectangle, Rect::new(dvec2(0.0, 0.0), dvec2(100.0, 50.0)));
//! let b = Figure::new(ShapeKind::Ellipse, Rect::new(dvec2(300.0, 0.0), dvec2(400.0, 50.0)));
//!
//! let line = Connection::with_endpoints(dvec2(50.0, 25.0), dvec2(350.0, 25.0));
//! line.connect_start(ChopConnector::new(a.clone()).into());
//! line.connect_end(ChopConnector::new(b.clone()).into());
//!
//! // Anchors sit on the boundaries, facing each other; moving a figure
//! // re-anchors the connection through its change subscription.
//! a.translate(dvec2(0.0, 10.0));
//! assert_eq!(line.point_count(), 2);
//! ```

pub mod connect;
pub mod errors;
pub mod log;
pub mod types;

pub use connect::{
    Anchoring, ChopConnector, ConnectGesture, Connection, Connector, Constrain, Figure,
    FigureListener, GridConstrainer, ListenerId, LoopStyle, OffsetConnector, ShapeKind,
    StickyConnector, Subscription, TrackerId, TriangleRotation,
};
pub use errors::{GestureError, RestoreError};
pub use types::{NumericError, Rect, StrokePlacement, StrokeStyle};

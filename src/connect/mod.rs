//! The connector subsystem: boundary resolution, connector strategies,
//! live connections and the interactive connect gesture.
//!
//! This module is organized into submodules:
//! - `defaults`: tunable heuristic constants
//! - `chop`: pure shape-boundary resolvers
//! - `figure`: figures, shape kinds and change propagation
//! - `constrain`: point snapping collaborators
//! - `connector`: the closed connector family
//! - `connection`: live connections and self-loop routing
//! - `gesture`: the tracking/finalization protocol

pub mod chop;
pub mod connection;
pub mod connector;
pub mod constrain;
pub mod defaults;
pub mod figure;
pub mod gesture;

// Re-export commonly used items
pub use connection::{Connection, LoopStyle};
pub use connector::{Anchoring, ChopConnector, Connector, OffsetConnector, StickyConnector};
pub use constrain::{Constrain, GridConstrainer};
pub use figure::{Figure, FigureListener, ListenerId, ShapeKind, Subscription, TriangleRotation};
pub use gesture::{ConnectGesture, TrackerId};

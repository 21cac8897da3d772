//! Default sizes and tuning constants (all in pixels unless noted).
//!
//! These are presentation heuristics, not domain invariants; the gesture and
//! loop-routing APIs accept overrides.

/// Half-extent of the square hit region around a connector anchor.
pub const CONNECTOR_HIT_EXTENT: f64 = 4.0;

/// Axis alignment threshold when finalizing the second endpoint of a new
/// connection: within this distance the axis snaps to the first endpoint.
pub const AXIS_SNAP_THRESHOLD: f64 = 8.0;

/// Angular dead zone (radians) around the axes where diamond quadrant
/// selection reports no edge and falls back to the rectangle resolver.
pub const DIAMOND_DEAD_ZONE: f64 = 0.005;

/// Self-loop exit distance for narrow owners (width below [`LOOP_WIDTH_SMALL`]).
pub const LOOP_DELTA_SMALL: f64 = 12.0;
/// Self-loop exit distance for mid-sized owners.
pub const LOOP_DELTA_MEDIUM: f64 = 24.0;
/// Self-loop exit distance for wide owners (width above [`LOOP_WIDTH_LARGE`]).
pub const LOOP_DELTA_LARGE: f64 = 36.0;
/// Owner width below which the small loop delta applies.
pub const LOOP_WIDTH_SMALL: f64 = 100.0;
/// Owner width above which the large loop delta applies.
pub const LOOP_WIDTH_LARGE: f64 = 200.0;

/// Grid cell size used by the default grid constrainer.
pub const GRID_SIZE: f64 = 20.0;

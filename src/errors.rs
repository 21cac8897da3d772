//! Error types for protocol misuse.
//!
//! Geometry itself never fails: every resolver returns *some* point, falling
//! back to a corner or extreme when no clean intersection exists. Errors only
//! arise from driving the interactive protocol out of order, or from feeding
//! invalid persisted state back into the subsystem.

use thiserror::Error;

use crate::types::NumericError;

/// Errors from the interactive connect gesture.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureError {
    /// A tracking slot was finalized without an owner being tracked in it.
    #[error("connector slot is not tracking a figure")]
    NotTracking,
}

/// Errors from reconstructing connectors out of persisted state.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum RestoreError {
    /// A stored offset was NaN or infinite.
    #[error("stored offset is not a finite point: {0}")]
    InvalidOffset(#[source] NumericError),

    /// A stored angle was NaN or infinite.
    #[error("stored angle is not finite: {0}")]
    InvalidAngle(#[source] NumericError),
}

//! The interactive connect gesture: pooled tracking connectors and the
//! finalization protocol.
//!
//! While the user drags out a new connection, anchors are tracked through a
//! fixed pool of two slots so pointer-move events allocate nothing. The
//! gesture is a plain value owned by the tool layer; one gesture runs at a
//! time, and [`ConnectGesture::reset`] re-arms it for the next drag.

use std::rc::Rc;

use glam::DVec2;

use crate::errors::GestureError;
use crate::log::{debug, trace};

use super::connector::{Connector, OffsetConnector};
use super::constrain::Constrain;
use super::defaults;
use super::figure::Figure;

/// Handle to one of the gesture's tracking slots, returned by
/// [`ConnectGesture::track_connector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerId(usize);

#[derive(Default)]
struct TrackingSlot {
    owner: Option<Rc<Figure>>,
    offset: DVec2,
}

/// State machine for one interactive connect drag.
///
/// Tracking slots hold an owner and an offset that is re-derived on every
/// pointer move; finalization copies the slot into a real
/// [`OffsetConnector`] and frees the slot. Overlapping gestures are not
/// supported: start a new drag with [`ConnectGesture::reset`].
pub struct ConnectGesture {
    slots: [TrackingSlot; 2],
    first_anchor: Option<DVec2>,
    constrainer: Option<Box<dyn Constrain>>,
    snap_threshold: f64,
}

impl Default for ConnectGesture {
    fn default() -> Self {
        ConnectGesture::new()
    }
}

impl ConnectGesture {
    pub fn new() -> ConnectGesture {
        ConnectGesture {
            slots: [TrackingSlot::default(), TrackingSlot::default()],
            first_anchor: None,
            constrainer: None,
            snap_threshold: defaults::AXIS_SNAP_THRESHOLD,
        }
    }

    /// Gesture whose tracked points are run through `constrainer` before
    /// the offset is stored.
    pub fn with_constrainer(constrainer: Box<dyn Constrain>) -> ConnectGesture {
        ConnectGesture {
            constrainer: Some(constrainer),
            ..ConnectGesture::new()
        }
    }

    /// Override the axis-snap distance used at finalization.
    pub fn set_snap_threshold(&mut self, threshold: f64) {
        self.snap_threshold = threshold;
    }

    /// Clear both slots and the finalization history for a new drag.
    pub fn reset(&mut self) {
        self.slots = [TrackingSlot::default(), TrackingSlot::default()];
        self.first_anchor = None;
        debug!("gesture reset");
    }

    /// Track an anchor at `point` on `owner`, reusing slot 1 when it is
    /// free or already tracking the same owner, slot 2 otherwise. The
    /// offset is re-derived on every call; no allocation happens here.
    pub fn track_connector(&mut self, owner: &Rc<Figure>, point: DVec2) -> TrackerId {
        let point = match &self.constrainer {
            Some(c) => c.constrain_point(point),
            None => point,
        };
        let index = match &self.slots[0].owner {
            None => 0,
            Some(first) if Rc::ptr_eq(first, owner) => 0,
            _ => 1,
        };
        let slot = &mut self.slots[index];
        slot.owner = Some(Rc::clone(owner));
        slot.offset = point - owner.bounds().min;
        trace!(slot = index, "tracking connector");
        TrackerId(index)
    }

    /// The point a tracking slot currently resolves to, if it is tracking.
    pub fn tracked_point(&self, id: TrackerId) -> Option<DVec2> {
        let slot = &self.slots[id.0];
        slot.owner
            .as_ref()
            .map(|owner| owner.bounds().min + slot.offset)
    }

    /// The figure a tracking slot is bound to, if any.
    pub fn tracked_owner(&self, id: TrackerId) -> Option<Rc<Figure>> {
        self.slots[id.0].owner.clone()
    }

    /// Allocate a permanent connector from a tracking slot, freeing the
    /// slot.
    ///
    /// Finalizing the second endpoint of the drag within the snap threshold
    /// of the first on either axis aligns that axis exactly, so
    /// near-horizontal and near-vertical connections come out straight.
    pub fn finalize_connector(
        &mut self,
        id: TrackerId,
        is_start: bool,
    ) -> Result<Connector, GestureError> {
        let slot = &mut self.slots[id.0];
        let owner = slot.owner.take().ok_or(GestureError::NotTracking)?;
        let mut offset = slot.offset;

        let origin = owner.bounds().min;
        let anchor = origin + offset;
        match self.first_anchor {
            None => self.first_anchor = Some(anchor),
            Some(first) => {
                if (anchor.x - first.x).abs() <= self.snap_threshold {
                    offset.x = first.x - origin.x;
                }
                if (anchor.y - first.y).abs() <= self.snap_threshold {
                    offset.y = first.y - origin.y;
                }
            }
        }

        if is_start {
            debug!("finalized start connector");
        } else {
            debug!("finalized end connector");
        }
        Ok(OffsetConnector::from_offset(owner, offset).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connect::connector::Anchoring;
    use crate::connect::constrain::GridConstrainer;
    use crate::connect::figure::ShapeKind;
    use crate::types::{Rect, StrokeStyle};
    use glam::dvec2;

    fn fig(x1: f64, y1: f64, x2: f64, y2: f64) -> Rc<Figure> {
        Figure::with_stroke(
            ShapeKind::Rectangle,
            Rect::new(dvec2(x1, y1), dvec2(x2, y2)),
            StrokeStyle::inside_hairline(),
        )
    }

    // ==================== slot selection ====================

    #[test]
    fn same_owner_reuses_the_first_slot() {
        let a = fig(0.0, 0.0, 100.0, 100.0);
        let mut gesture = ConnectGesture::new();

        let id1 = gesture.track_connector(&a, dvec2(10.0, 10.0));
        let id2 = gesture.track_connector(&a, dvec2(60.0, 60.0));
        assert_eq!(id1, id2);
        // The offset is re-derived on every move.
        assert_eq!(gesture.tracked_point(id2), Some(dvec2(60.0, 60.0)));
    }

    #[test]
    fn second_owner_takes_the_second_slot() {
        let a = fig(0.0, 0.0, 100.0, 100.0);
        let b = fig(200.0, 0.0, 300.0, 100.0);
        let mut gesture = ConnectGesture::new();

        let id_a = gesture.track_connector(&a, dvec2(10.0, 10.0));
        let id_b = gesture.track_connector(&b, dvec2(250.0, 50.0));
        assert_ne!(id_a, id_b);
        assert!(Rc::ptr_eq(&gesture.tracked_owner(id_a).unwrap(), &a));
        assert!(Rc::ptr_eq(&gesture.tracked_owner(id_b).unwrap(), &b));
    }

    #[test]
    fn reset_frees_both_slots() {
        let a = fig(0.0, 0.0, 100.0, 100.0);
        let b = fig(200.0, 0.0, 300.0, 100.0);
        let mut gesture = ConnectGesture::new();

        gesture.track_connector(&a, dvec2(10.0, 10.0));
        gesture.reset();
        // After reset, a different owner lands in the first slot again.
        let id = gesture.track_connector(&b, dvec2(250.0, 50.0));
        assert_eq!(id, TrackerId(0));
    }

    // ==================== constrainer ====================

    #[test]
    fn tracked_offsets_are_constrained_before_storage() {
        let a = fig(0.0, 0.0, 100.0, 100.0);
        let mut gesture = ConnectGesture::with_constrainer(Box::new(GridConstrainer::new(10.0, 10.0)));
        let id = gesture.track_connector(&a, dvec2(14.0, 26.0));
        assert_eq!(gesture.tracked_point(id), Some(dvec2(10.0, 30.0)));
    }

    // ==================== finalization ====================

    #[test]
    fn finalize_copies_owner_and_offset_and_frees_the_slot() {
        let a = fig(0.0, 0.0, 100.0, 100.0);
        let mut gesture = ConnectGesture::new();
        let id = gesture.track_connector(&a, dvec2(30.0, 40.0));

        let connector = gesture.finalize_connector(id, true).unwrap();
        assert!(connector.is_offset());
        assert!(Rc::ptr_eq(connector.owner(), &a));
        assert_eq!(connector.find_point(DVec2::ZERO), dvec2(30.0, 40.0));

        // The slot is free again; finalizing it twice is a protocol error.
        assert!(matches!(
            gesture.finalize_connector(id, false),
            Err(GestureError::NotTracking)
        ));
    }

    #[test]
    fn second_finalize_snaps_nearby_axes_to_the_first() {
        let a = fig(0.0, 0.0, 100.0, 100.0);
        let mut gesture = ConnectGesture::new();

        let id = gesture.track_connector(&a, dvec2(20.0, 30.0));
        let start = gesture.finalize_connector(id, true).unwrap();

        // 5 px off on x (within the 8 px threshold), 50 px off on y.
        let id = gesture.track_connector(&a, dvec2(25.0, 80.0));
        let end = gesture.finalize_connector(id, false).unwrap();

        let p_start = start.find_point(DVec2::ZERO);
        let p_end = end.find_point(DVec2::ZERO);
        assert_eq!(p_start.x, p_end.x);
        assert_eq!(p_end.y, 80.0);
    }

    #[test]
    fn axes_beyond_the_threshold_do_not_snap() {
        let a = fig(0.0, 0.0, 100.0, 100.0);
        let mut gesture = ConnectGesture::new();

        let id = gesture.track_connector(&a, dvec2(20.0, 30.0));
        gesture.finalize_connector(id, true).unwrap();

        let id = gesture.track_connector(&a, dvec2(40.0, 36.0));
        let end = gesture.finalize_connector(id, false).unwrap();
        // y snapped (6 px), x untouched (20 px).
        assert_eq!(end.find_point(DVec2::ZERO), dvec2(40.0, 30.0));
    }

    #[test]
    fn reset_clears_the_snap_history() {
        let a = fig(0.0, 0.0, 100.0, 100.0);
        let mut gesture = ConnectGesture::new();

        let id = gesture.track_connector(&a, dvec2(20.0, 30.0));
        gesture.finalize_connector(id, true).unwrap();
        gesture.reset();

        let id = gesture.track_connector(&a, dvec2(25.0, 30.0));
        let end = gesture.finalize_connector(id, false).unwrap();
        // A fresh gesture: this is its first endpoint, nothing to snap to.
        assert_eq!(end.find_point(DVec2::ZERO), dvec2(25.0, 30.0));
    }
}

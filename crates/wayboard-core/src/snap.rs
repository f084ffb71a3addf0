//! Pin hit-testing and line endpoint snapping.

use crate::entities::{Pin, PinId};
use crate::geometry::hit_test_last;
use kurbo::Point;

/// Radius for clicking a pin (place/drag/select).
pub const PIN_CLICK_RADIUS: f64 = 20.0;

/// Radius for snapping a transit line to a pin.
pub const PIN_SNAP_RADIUS: f64 = 30.0;

/// Index of the most recently created pin within `radius` of `point`.
pub fn pin_at(pins: &[Pin], point: Point, radius: f64) -> Option<usize> {
    hit_test_last(pins.iter().map(|p| p.position), point, radius)
}

/// Live endpoint of an in-progress line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineEnd {
    /// Snapped to the center of a pin other than the start pin.
    Anchored { index: usize, pin: PinId, point: Point },
    /// Following the raw pointer.
    Free(Point),
}

impl LineEnd {
    pub fn point(&self) -> Point {
        match *self {
            LineEnd::Anchored { point, .. } | LineEnd::Free(point) => point,
        }
    }

    pub fn is_anchored(&self) -> bool {
        matches!(self, LineEnd::Anchored { .. })
    }

    pub fn pin(&self) -> Option<PinId> {
        match *self {
            LineEnd::Anchored { pin, .. } => Some(pin),
            LineEnd::Free(_) => None,
        }
    }
}

/// Resolve where a line starting at `start` ends for pointer position `raw`.
///
/// Hovering the start pin itself does not anchor.
pub fn snap_endpoint(pins: &[Pin], raw: Point, start: PinId) -> LineEnd {
    match pin_at(pins, raw, PIN_SNAP_RADIUS) {
        Some(index) if pins[index].id != start => LineEnd::Anchored {
            index,
            pin: pins[index].id,
            point: pins[index].position,
        },
        _ => LineEnd::Free(raw),
    }
}

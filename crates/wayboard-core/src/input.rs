//! Pointer events and container-to-surface coordinate translation.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pointer event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Leave,
}

/// A pointer event as delivered by the hosting page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    /// Position in client (page) coordinates.
    pub client: Point,
    /// Time since the session started.
    #[serde(default)]
    pub at: Duration,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, client: Point, at: Duration) -> Self {
        Self { kind, client, at }
    }

    pub fn down(client: Point, at: Duration) -> Self {
        Self::new(PointerKind::Down, client, at)
    }

    pub fn moved(client: Point, at: Duration) -> Self {
        Self::new(PointerKind::Move, client, at)
    }

    pub fn up(client: Point, at: Duration) -> Self {
        Self::new(PointerKind::Up, client, at)
    }

    pub fn leave(client: Point, at: Duration) -> Self {
        Self::new(PointerKind::Leave, client, at)
    }
}

/// Bounding box of the surface's container in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerBounds {
    pub origin: Point,
    pub size: Size,
}

impl ContainerBounds {
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Translate a client position into surface-local logical coordinates.
    pub fn to_local(&self, client: Point) -> Point {
        client - self.origin.to_vec2()
    }

    /// Translate a surface-local position back to client coordinates.
    pub fn to_client(&self, local: Point) -> Point {
        local + self.origin.to_vec2()
    }

    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_local_subtracts_origin() {
        let bounds = ContainerBounds::new(Point::new(40.0, 100.0), Size::new(800.0, 600.0));
        assert_eq!(bounds.to_local(Point::new(50.0, 130.0)), Point::new(10.0, 30.0));
        assert_eq!(bounds.to_client(Point::new(10.0, 30.0)), Point::new(50.0, 130.0));
    }

    #[test]
    fn test_event_deserializes_without_timestamp() {
        let event: PointerEvent =
            serde_json::from_str(r#"{"kind":"down","client":{"x":1.0,"y":2.0}}"#).unwrap();
        assert_eq!(event, PointerEvent::down(Point::new(1.0, 2.0), Duration::ZERO));
    }
}

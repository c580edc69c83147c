//! Pointer input.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Pointer event in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up { position: Point },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position } => *position,
        }
    }
}

/// Map a client-space pointer position into the surface's own coordinates,
/// given the surface's bounding box in client space.
pub fn to_surface_point(client: Point, surface_bounds: Rect) -> Point {
    Point::new(client.x - surface_bounds.x0, client.y - surface_bounds.y0)
}

//! Pending move transform.

use super::{Shape, ShapeTrait};
use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// A shape being dragged, with the offset accumulated so far.
///
/// Only the board builds these, and never around another move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveShape {
    shape: Shape,
    offset_x: f64,
    offset_y: f64,
}

impl MoveShape {
    /// Wrap a concrete shape with a zero offset. Returns the shape back if it
    /// is already a move.
    pub(crate) fn wrap(shape: Shape) -> Result<Self, Shape> {
        if shape.is_move() {
            return Err(shape);
        }
        Ok(Self {
            shape,
            offset_x: 0.0,
            offset_y: 0.0,
        })
    }

    pub(crate) fn into_original(self) -> Shape {
        self.shape
    }

    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.offset_x, self.offset_y)
    }

    pub(crate) fn set_offset(&mut self, offset: Vec2) {
        self.offset_x = offset.x;
        self.offset_y = offset.y;
    }

    /// The wrapped shape translated by the current offset.
    pub fn resolve(&self) -> Shape {
        let offset = self.offset();
        match &self.shape {
            Shape::Rect(r) => Shape::Rect(r.translated(offset)),
            Shape::Circle(c) => Shape::Circle(c.translated(offset)),
            Shape::Pencil(p) => Shape::Pencil(p.translated(offset)),
            // `wrap` refuses these; a decoded nested move is left as it is.
            Shape::Move(_) => {
                log::warn!("Nested move left unresolved");
                self.shape.clone()
            }
        }
    }
}

/// Resolve a pending move into a concrete shape.
pub fn resolve_move(pending: &MoveShape) -> Shape {
    pending.resolve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Circle, Pencil, Rectangle};
    use kurbo::Point;

    fn samples() -> Vec<Shape> {
        vec![
            Shape::Rect(Rectangle::new(10.0, 20.0, 30.0, 40.0)),
            Shape::Circle(Circle::new(Point::new(5.0, 5.0), 2.5)),
            Shape::Pencil(Pencil::from_points(vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 1.0),
                Point::new(2.0, 0.0),
            ])),
        ]
    }

    #[test]
    fn test_zero_offset_is_identity() {
        for shape in samples() {
            let pending = MoveShape::wrap(shape.clone()).unwrap();
            assert_eq!(resolve_move(&pending), shape);
        }
    }

    #[test]
    fn test_rect_offset_shifts_origin_only() {
        let mut pending = MoveShape::wrap(Shape::Rect(Rectangle::new(10.0, 20.0, 30.0, 40.0))).unwrap();
        pending.set_offset(Vec2::new(7.0, -12.0));
        assert_eq!(
            pending.resolve(),
            Shape::Rect(Rectangle::new(17.0, 8.0, 30.0, 40.0))
        );
    }

    #[test]
    fn test_circle_and_pencil_offsets() {
        let mut circle = MoveShape::wrap(Shape::Circle(Circle::new(Point::new(5.0, 5.0), 2.5))).unwrap();
        circle.set_offset(Vec2::new(5.0, -5.0));
        assert_eq!(
            circle.resolve(),
            Shape::Circle(Circle::new(Point::new(10.0, 0.0), 2.5))
        );

        let mut pencil = MoveShape::wrap(Shape::Pencil(Pencil::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
        ])))
        .unwrap();
        pencil.set_offset(Vec2::new(1.0, 2.0));
        assert_eq!(
            pencil.resolve(),
            Shape::Pencil(Pencil::from_points(vec![Point::new(1.0, 2.0), Point::new(2.0, 3.0)]))
        );
    }

    #[test]
    fn test_wrap_refuses_nested_move() {
        let inner = MoveShape::wrap(Shape::Rect(Rectangle::new(0.0, 0.0, 1.0, 1.0))).unwrap();
        let nested = MoveShape::wrap(Shape::Move(Box::new(inner)));
        assert!(nested.is_err());
    }

    #[test]
    fn test_decoded_nested_move_resolves_to_inner_unchanged() {
        let nested: MoveShape = serde_json::from_value(serde_json::json!({
            "shape": {
                "type": "move",
                "shape": {"type": "rect", "x": 0, "y": 0, "width": 1, "height": 1},
                "offsetX": 5,
                "offsetY": 5
            },
            "offsetX": 1,
            "offsetY": 1
        }))
        .unwrap();
        let resolved = nested.resolve();
        assert!(resolved.is_move());
        let Shape::Move(inner) = resolved else {
            panic!("expected the inner move");
        };
        assert_eq!(inner.offset(), Vec2::new(5.0, 5.0));
        assert!(Shape::Move(inner).validate().is_err());
    }

    #[test]
    fn test_move_wire_format() {
        let mut pending = MoveShape::wrap(Shape::Rect(Rectangle::new(0.0, 0.0, 1.0, 1.0))).unwrap();
        pending.set_offset(Vec2::new(2.0, 3.0));
        let value = serde_json::to_value(Shape::Move(Box::new(pending))).unwrap();
        assert_eq!(value["type"], "move");
        assert_eq!(value["shape"]["type"], "rect");
        assert_eq!(value["offsetX"], 2.0);
        assert_eq!(value["offsetY"], 3.0);
    }
}

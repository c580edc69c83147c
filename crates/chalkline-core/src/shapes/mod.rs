//! Shape definitions for the whiteboard.

mod circle;
mod moving;
mod pencil;
mod rectangle;

pub use circle::Circle;
pub use moving::{MoveShape, resolve_move};
pub use pencil::{MIN_PENCIL_POINTS, Pencil};
pub use rectangle::Rectangle;

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a shape may not enter the persisted set.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("shape has a non-finite coordinate")]
    NonFinite,
    #[error("rectangle has a negative extent ({width} x {height})")]
    NegativeExtent { width: f64, height: f64 },
    #[error("circle radius must be positive, got {0}")]
    NonPositiveRadius(f64),
    #[error("pencil stroke needs at least {min} points, got {got}")]
    TooFewPoints { min: usize, got: usize },
    #[error("pending move cannot be persisted")]
    UnresolvedMove,
}

/// Common trait for all concrete shapes.
pub trait ShapeTrait {
    /// Check if a point hits this shape.
    fn hit_test(&self, point: Point) -> bool;

    /// Return a copy of this shape translated by `offset`.
    fn translated(&self, offset: Vec2) -> Self
    where
        Self: Sized;

    /// Check the shape is fit to be persisted.
    fn validate(&self) -> Result<(), ShapeError>;
}

/// Enum wrapper for all shape types (for serialization).
///
/// The wire form is internally tagged: `{"type": "rect", "x": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Rect(Rectangle),
    Circle(Circle),
    Pencil(Pencil),
    Move(Box<MoveShape>),
}

impl Shape {
    /// Point containment. A pending move is never hit.
    pub fn hit_test(&self, point: Point) -> bool {
        match self {
            Shape::Rect(s) => s.hit_test(point),
            Shape::Circle(s) => s.hit_test(point),
            Shape::Pencil(s) => s.hit_test(point),
            Shape::Move(_) => false,
        }
    }

    pub fn validate(&self) -> Result<(), ShapeError> {
        match self {
            Shape::Rect(s) => s.validate(),
            Shape::Circle(s) => s.validate(),
            Shape::Pencil(s) => s.validate(),
            Shape::Move(_) => Err(ShapeError::UnresolvedMove),
        }
    }

    /// Flip rectangles with negative extents so that width and height are non-negative.
    pub fn normalized(self) -> Self {
        match self {
            Shape::Rect(r) => Shape::Rect(r.normalized()),
            other => other,
        }
    }

    /// Check if this shape is a pending move.
    pub fn is_move(&self) -> bool {
        matches!(self, Shape::Move(_))
    }

    /// Short name of the variant, matching the wire tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Rect(_) => "rect",
            Shape::Circle(_) => "circle",
            Shape::Pencil(_) => "pencil",
            Shape::Move(_) => "move",
        }
    }
}

impl From<Rectangle> for Shape {
    fn from(rect: Rectangle) -> Self {
        Shape::Rect(rect)
    }
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle(circle)
    }
}

impl From<Pencil> for Shape {
    fn from(pencil: Pencil) -> Self {
        Shape::Pencil(pencil)
    }
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rect_wire_format() {
        let shape = Shape::Rect(Rectangle::new(10.0, 10.0, 40.0, 30.0));
        let value = serde_json::to_value(&shape).unwrap();
        assert_eq!(
            value,
            json!({"type": "rect", "x": 10.0, "y": 10.0, "width": 40.0, "height": 30.0})
        );
    }

    #[test]
    fn test_circle_wire_format() {
        let shape = Shape::Circle(Circle::new(Point::new(5.0, 6.0), 7.0));
        let value = serde_json::to_value(&shape).unwrap();
        assert_eq!(
            value,
            json!({"type": "circle", "centerX": 5.0, "centerY": 6.0, "radius": 7.0})
        );
    }

    #[test]
    fn test_pencil_from_integer_json() {
        let shape: Shape = serde_json::from_value(json!({
            "type": "pencil",
            "points": [{"x": 1, "y": 2}, {"x": 3, "y": 4}]
        }))
        .unwrap();
        let Shape::Pencil(pencil) = shape else {
            panic!("expected pencil");
        };
        assert_eq!(pencil.points, vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
    }

    #[test]
    fn test_eraser_is_not_a_shape() {
        let result = serde_json::from_value::<Shape>(json!({"type": "eraser"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate() {
        assert!(Shape::Rect(Rectangle::new(0.0, 0.0, 0.0, 0.0)).validate().is_ok());
        assert_eq!(
            Shape::Circle(Circle::new(Point::ZERO, 0.0)).validate(),
            Err(ShapeError::NonPositiveRadius(0.0))
        );
        assert_eq!(
            Shape::Pencil(Pencil::from_points(vec![Point::ZERO])).validate(),
            Err(ShapeError::TooFewPoints { min: 2, got: 1 })
        );
        assert_eq!(
            Shape::Rect(Rectangle::new(f64::NAN, 0.0, 1.0, 1.0)).validate(),
            Err(ShapeError::NonFinite)
        );
    }

    #[test]
    fn test_pencil_point_minimum_is_exported() {
        assert_eq!(crate::MIN_PENCIL_POINTS, 2);
        let points = vec![Point::ZERO; crate::MIN_PENCIL_POINTS];
        assert!(Shape::Pencil(Pencil::from_points(points)).validate().is_ok());
    }

    #[test]
    fn test_normalized_flips_negative_rect() {
        let shape = Shape::Rect(Rectangle::new(50.0, 40.0, -40.0, -30.0)).normalized();
        assert_eq!(shape, Shape::Rect(Rectangle::new(10.0, 10.0, 40.0, 30.0)));
        assert!(shape.validate().is_ok());
    }
}

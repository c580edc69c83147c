//! Rectangle shape.

use super::{ShapeError, ShapeTrait, all_finite};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from two corner points.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let min_x = p1.x.min(p2.x);
        let min_y = p1.y.min(p2.y);
        let width = (p2.x - p1.x).abs();
        let height = (p2.y - p1.y).abs();

        Self::new(min_x, min_y, width, height)
    }

    /// Get the rectangle as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Same rectangle with non-negative extents.
    pub fn normalized(self) -> Self {
        Self::from_corners(
            Point::new(self.x, self.y),
            Point::new(self.x + self.width, self.y + self.height),
        )
    }
}

impl ShapeTrait for Rectangle {
    fn hit_test(&self, point: Point) -> bool {
        // Closed box: both edges count.
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    fn validate(&self) -> Result<(), ShapeError> {
        if !all_finite(&[self.x, self.y, self.width, self.height]) {
            return Err(ShapeError::NonFinite);
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(ShapeError::NegativeExtent {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_from_corners() {
        let rect = Rectangle::from_corners(Point::new(100.0, 100.0), Point::new(50.0, 50.0));
        assert!((rect.x - 50.0).abs() < f64::EPSILON);
        assert!((rect.y - 50.0).abs() < f64::EPSILON);
        assert!((rect.width - 50.0).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test_closed_corners() {
        let rect = Rectangle::new(10.0, 20.0, 30.0, 40.0);
        assert!(rect.hit_test(Point::new(10.0, 20.0)));
        assert!(rect.hit_test(Point::new(40.0, 60.0)));
        assert!(rect.hit_test(Point::new(25.0, 30.0)));
        assert!(!rect.hit_test(Point::new(40.1, 60.0)));
        assert!(!rect.hit_test(Point::new(9.9, 20.0)));
    }

    #[test]
    fn test_translated_keeps_extent() {
        let rect = Rectangle::new(10.0, 20.0, 30.0, 40.0);
        let moved = rect.translated(Vec2::new(-3.5, 7.0));
        assert_eq!(moved, Rectangle::new(6.5, 27.0, 30.0, 40.0));
    }

    #[test]
    fn test_as_rect() {
        let rect = Rectangle::new(10.0, 20.0, 100.0, 50.0);
        let bounds = rect.as_rect();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 20.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 110.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 70.0).abs() < f64::EPSILON);
    }
}

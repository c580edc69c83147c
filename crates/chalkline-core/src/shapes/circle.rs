//! Circle shape.

use super::{ShapeError, ShapeTrait, all_finite};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// A circle given by center and radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circle {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

impl Circle {
    /// Create a new circle.
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            center_x: center.x,
            center_y: center.y,
            radius,
        }
    }

    /// Circle inscribed in the drag box spanned by two points.
    ///
    /// The center sits at the middle of the box and the radius is half of the
    /// longer side.
    pub fn from_drag(start: Point, end: Point) -> Self {
        let radius = (end.x - start.x).abs().max((end.y - start.y).abs()) / 2.0;
        Self::new(start.midpoint(end), radius)
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    /// Get the circle as a kurbo Circle.
    pub fn as_circle(&self) -> kurbo::Circle {
        kurbo::Circle::new(self.center(), self.radius)
    }
}

impl ShapeTrait for Circle {
    fn hit_test(&self, point: Point) -> bool {
        self.center().distance(point) <= self.radius
    }

    fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.center() + offset, self.radius)
    }

    fn validate(&self) -> Result<(), ShapeError> {
        if !all_finite(&[self.center_x, self.center_y, self.radius]) {
            return Err(ShapeError::NonFinite);
        }
        if self.radius <= 0.0 {
            return Err(ShapeError::NonPositiveRadius(self.radius));
        }
        Ok(())
    }
}

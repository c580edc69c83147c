//! Freehand pencil stroke.

use super::{ShapeError, ShapeTrait};
use crate::hit_test::PENCIL_HIT_RADIUS;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Minimum number of points for a stroke to be persisted.
pub const MIN_PENCIL_POINTS: usize = 2;

/// A freehand drawing (series of points).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pencil {
    /// Points in the stroke, in drawing order.
    pub points: Vec<Point>,
}

impl Pencil {
    /// Create a new empty stroke.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from existing points.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Add a point to the stroke.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the stroke is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Check whether any recorded point lies within `radius` of `point`.
    ///
    /// Only the sampled points count, not the segments between them.
    pub fn any_point_within(&self, point: Point, radius: f64) -> bool {
        self.points.iter().any(|p| p.distance(point) <= radius)
    }
}

impl ShapeTrait for Pencil {
    fn hit_test(&self, point: Point) -> bool {
        self.any_point_within(point, PENCIL_HIT_RADIUS)
    }

    fn translated(&self, offset: Vec2) -> Self {
        Self::from_points(self.points.iter().map(|p| *p + offset).collect())
    }

    fn validate(&self) -> Result<(), ShapeError> {
        if self.points.len() < MIN_PENCIL_POINTS {
            return Err(ShapeError::TooFewPoints {
                min: MIN_PENCIL_POINTS,
                got: self.points.len(),
            });
        }
        if self.points.iter().any(|p| !p.is_finite()) {
            return Err(ShapeError::NonFinite);
        }
        Ok(())
    }
}

//! The persisted shape set and the operations allowed on it.

use crate::hit_test::{erases, pick_topmost};
use crate::shapes::{MoveShape, Shape, ShapeError};
use kurbo::{Point, Vec2};

/// Ordered set of committed shapes, back to front.
///
/// Holds at most one pending move, and only while a move gesture is running.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    shapes: Vec<Shape>,
    /// Index of the pending move wrapper.
    moving: Option<usize>,
}

impl Board {
    /// Create an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shapes in paint order (oldest first).
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Append a concrete shape on top of the others.
    pub fn append(&mut self, shape: Shape) -> Result<(), ShapeError> {
        shape.validate()?;
        self.shapes.push(shape);
        Ok(())
    }

    /// Replace every shape at once. Nothing changes if any shape is invalid.
    ///
    /// A move in progress is dropped along with the old set.
    pub fn replace_all(&mut self, shapes: Vec<Shape>) -> Result<(), ShapeError> {
        for shape in &shapes {
            shape.validate()?;
        }
        if self.moving.take().is_some() {
            log::info!("Pending move discarded by full-state replacement");
        }
        self.shapes = shapes;
        Ok(())
    }

    /// Remove the shape at `index`. The pending move cannot be removed this way.
    pub fn remove_at(&mut self, index: usize) -> Option<Shape> {
        if index >= self.shapes.len() || self.moving == Some(index) {
            return None;
        }
        if let Some(moving) = self.moving.as_mut() {
            if *moving > index {
                *moving -= 1;
            }
        }
        Some(self.shapes.remove(index))
    }

    /// Index of the topmost shape under `point`.
    pub fn pick(&self, point: Point) -> Option<usize> {
        pick_topmost(&self.shapes, point)
    }

    /// Remove every shape the eraser touches at `point`. Returns how many went.
    pub fn erase_at(&mut self, point: Point) -> usize {
        let before = self.shapes.len();
        let moving = self.moving;
        let mut index = 0;
        self.shapes.retain(|shape| {
            let keep = moving == Some(index) || !erases(point, shape);
            index += 1;
            keep
        });
        let removed = before - self.shapes.len();
        if removed > 0 && moving.is_some() {
            self.moving = self.shapes.iter().position(Shape::is_move);
        }
        removed
    }

    /// Whether a move is pending.
    pub fn is_moving(&self) -> bool {
        self.moving.is_some()
    }

    /// The pending move, if any.
    pub fn pending_move(&self) -> Option<&MoveShape> {
        match self.moving.map(|i| &self.shapes[i]) {
            Some(Shape::Move(pending)) => Some(pending.as_ref()),
            _ => None,
        }
    }

    /// Lift the shape at `index` into a pending move placed on top.
    ///
    /// Fails if a move is already pending or the index is out of range.
    pub fn begin_move(&mut self, index: usize) -> bool {
        if self.moving.is_some() || index >= self.shapes.len() {
            return false;
        }
        let shape = self.shapes.remove(index);
        match MoveShape::wrap(shape) {
            Ok(pending) => {
                self.shapes.push(Shape::Move(Box::new(pending)));
                self.moving = Some(self.shapes.len() - 1);
                true
            }
            Err(shape) => {
                self.shapes.insert(index, shape);
                false
            }
        }
    }

    /// Set the offset of the pending move.
    pub fn update_move(&mut self, offset: Vec2) {
        if let Some(Shape::Move(pending)) = self.moving.map(|i| &mut self.shapes[i]) {
            pending.set_offset(offset);
        }
    }

    /// Resolve the pending move, putting the moved shape on top.
    pub fn finish_move(&mut self) -> Option<Shape> {
        let pending = self.take_pending()?;
        let resolved = pending.resolve();
        self.shapes.push(resolved.clone());
        Some(resolved)
    }

    /// Drop the pending offset, putting the shape back unmoved on top.
    pub fn cancel_move(&mut self) -> bool {
        match self.take_pending() {
            Some(pending) => {
                self.shapes.push(pending.into_original());
                true
            }
            None => false,
        }
    }

    fn take_pending(&mut self) -> Option<MoveShape> {
        let index = self.moving.take()?;
        match self.shapes.remove(index) {
            Shape::Move(pending) => Some(*pending),
            other => {
                // Index went stale; put the shape back where it was.
                log::warn!("Pending move index pointed at a {}", other.kind());
                self.shapes.insert(index, other);
                None
            }
        }
    }
}

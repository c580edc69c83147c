//! Tool system for the whiteboard.

use crate::shapes::{Circle, MIN_PENCIL_POINTS, Pencil, Rectangle, Shape};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// A rectangle or circle drag must exceed this on both axes to be kept.
pub const MIN_SHAPE_EXTENT: f64 = 1.0;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Circle,
    #[default]
    Rect,
    Pencil,
    Eraser,
    Move,
}

impl ToolKind {
    /// Cursor the host should show while this tool is selected.
    pub fn cursor(self) -> CursorHint {
        match self {
            ToolKind::Move => CursorHint::Move,
            _ => CursorHint::Crosshair,
        }
    }
}

/// Cursor hint for the host surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorHint {
    Move,
    Crosshair,
}

/// State of a tool interaction.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    /// Waiting for a pointer press.
    #[default]
    Idle,
    /// Dragging out a rectangle or circle.
    Drawing { start: Point, current: Point },
    /// Recording a pencil stroke.
    Sketching { stroke: Pencil },
    /// Eraser held down.
    Erasing { removed: usize },
    /// Dragging a picked shape.
    Moving { start: Point },
}

/// What a pointer move means for the current gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureStep {
    /// No gesture is running.
    Nothing,
    /// Repaint, then overlay this uncommitted shape.
    Preview(Shape),
    /// Stroke one new pencil segment on top of what is already drawn.
    Segment(Point, Point),
    /// Run an eraser pass here.
    Erase(Point),
    /// Set the pending move offset.
    Drag(Vec2),
}

/// How a gesture ended.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureEnd {
    /// No gesture was running.
    Idle,
    /// A new shape passed the size gate.
    Committed(Shape),
    /// A drawing gesture was too small to keep.
    Discarded,
    /// An eraser gesture finished, having removed `removed` shapes.
    Erased { removed: usize },
    /// A move gesture finished.
    Moved,
}

/// Manages the current tool and its state.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Current state of the tool.
    pub state: GestureState,
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool, abandoning any gesture.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
        self.state = GestureState::Idle;
    }

    /// Begin a tool interaction.
    pub fn begin(&mut self, point: Point) {
        self.state = match self.current_tool {
            ToolKind::Rect | ToolKind::Circle => GestureState::Drawing {
                start: point,
                current: point,
            },
            ToolKind::Pencil => GestureState::Sketching {
                stroke: Pencil::from_points(vec![point]),
            },
            ToolKind::Eraser => GestureState::Erasing { removed: 0 },
            ToolKind::Move => GestureState::Moving { start: point },
        };
    }

    /// Update the current interaction.
    pub fn update(&mut self, point: Point) -> GestureStep {
        let tool = self.current_tool;
        match &mut self.state {
            GestureState::Idle => GestureStep::Nothing,
            GestureState::Drawing { start, current } => {
                *current = point;
                match create_shape(tool, *start, point) {
                    Some(shape) => GestureStep::Preview(shape),
                    None => GestureStep::Nothing,
                }
            }
            GestureState::Sketching { stroke } => {
                let previous = stroke.points.last().copied().unwrap_or(point);
                stroke.add_point(point);
                GestureStep::Segment(previous, point)
            }
            GestureState::Erasing { .. } => GestureStep::Erase(point),
            GestureState::Moving { start } => GestureStep::Drag(point - *start),
        }
    }

    /// Add to the count of shapes removed by the running eraser gesture.
    pub fn record_erased(&mut self, count: usize) {
        if let GestureState::Erasing { removed } = &mut self.state {
            *removed += count;
        }
    }

    /// End the current interaction.
    pub fn end(&mut self, point: Point) -> GestureEnd {
        let tool = self.current_tool;
        match std::mem::take(&mut self.state) {
            GestureState::Idle => GestureEnd::Idle,
            GestureState::Drawing { start, .. } => {
                if !passes_size_gate(start, point) {
                    return GestureEnd::Discarded;
                }
                create_shape(tool, start, point).map_or(GestureEnd::Discarded, GestureEnd::Committed)
            }
            GestureState::Sketching { stroke } => {
                if stroke.len() < MIN_PENCIL_POINTS {
                    return GestureEnd::Discarded;
                }
                GestureEnd::Committed(Shape::Pencil(stroke))
            }
            GestureState::Erasing { removed } => GestureEnd::Erased { removed },
            GestureState::Moving { .. } => GestureEnd::Moved,
        }
    }

    /// Cancel the current interaction.
    pub fn cancel(&mut self) {
        self.state = GestureState::Idle;
    }

    /// Check if a tool interaction is active.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, GestureState::Idle)
    }
}

fn passes_size_gate(start: Point, end: Point) -> bool {
    (end.x - start.x).abs() > MIN_SHAPE_EXTENT && (end.y - start.y).abs() > MIN_SHAPE_EXTENT
}

/// Create a rectangle or circle from start and end points.
fn create_shape(tool: ToolKind, start: Point, end: Point) -> Option<Shape> {
    match tool {
        ToolKind::Rect => Some(Shape::Rect(Rectangle::from_corners(start, end))),
        ToolKind::Circle => Some(Shape::Circle(Circle::from_drag(start, end))),
        ToolKind::Pencil | ToolKind::Eraser | ToolKind::Move => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_selection() {
        let mut tm = ToolManager::new();
        assert_eq!(tm.current_tool, ToolKind::Rect);

        tm.set_tool(ToolKind::Move);
        assert_eq!(tm.current_tool, ToolKind::Move);
        assert_eq!(tm.current_tool.cursor(), CursorHint::Move);
        assert_eq!(ToolKind::Eraser.cursor(), CursorHint::Crosshair);
    }

    #[test]
    fn test_tool_kind_wire_names() {
        let tool: ToolKind = serde_json::from_str("\"eraser\"").unwrap();
        assert_eq!(tool, ToolKind::Eraser);
        assert_eq!(serde_json::to_string(&ToolKind::Circle).unwrap(), "\"circle\"");
    }

    #[test]
    fn test_rect_preview_is_normalized() {
        let mut tm = ToolManager::new();
        tm.begin(Point::new(50.0, 50.0));
        assert!(tm.is_active());

        let step = tm.update(Point::new(10.0, 20.0));
        assert_eq!(
            step,
            GestureStep::Preview(Shape::Rect(Rectangle::new(10.0, 20.0, 40.0, 30.0)))
        );
    }

    #[test]
    fn test_rect_size_gate() {
        let mut tm = ToolManager::new();
        tm.begin(Point::new(0.0, 0.0));
        assert_eq!(tm.end(Point::new(1.0, 1.0)), GestureEnd::Discarded);
        assert!(!tm.is_active());

        tm.begin(Point::new(0.0, 0.0));
        assert_eq!(
            tm.end(Point::new(2.0, 2.0)),
            GestureEnd::Committed(Shape::Rect(Rectangle::new(0.0, 0.0, 2.0, 2.0)))
        );

        // Thin in one dimension is still discarded.
        tm.begin(Point::new(0.0, 0.0));
        assert_eq!(tm.end(Point::new(100.0, 0.5)), GestureEnd::Discarded);
    }

    #[test]
    fn test_circle_size_gate() {
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Circle);
        tm.begin(Point::new(10.0, 10.0));
        assert_eq!(tm.end(Point::new(11.0, 30.0)), GestureEnd::Discarded);

        tm.begin(Point::new(10.0, 10.0));
        match tm.end(Point::new(30.0, 20.0)) {
            GestureEnd::Committed(Shape::Circle(c)) => {
                assert_eq!(c.center(), Point::new(20.0, 15.0));
                assert!((c.radius - 10.0).abs() < f64::EPSILON);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_pencil_gate() {
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Pencil);

        tm.begin(Point::new(0.0, 0.0));
        assert_eq!(tm.end(Point::new(0.0, 0.0)), GestureEnd::Discarded);

        tm.begin(Point::new(0.0, 0.0));
        assert_eq!(
            tm.update(Point::new(3.0, 4.0)),
            GestureStep::Segment(Point::new(0.0, 0.0), Point::new(3.0, 4.0))
        );
        assert_eq!(
            tm.end(Point::new(3.0, 4.0)),
            GestureEnd::Committed(Shape::Pencil(Pencil::from_points(vec![
                Point::new(0.0, 0.0),
                Point::new(3.0, 4.0),
            ])))
        );
    }

    #[test]
    fn test_drag_offset_is_relative_to_start() {
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Move);
        tm.begin(Point::new(10.0, 10.0));
        assert_eq!(tm.update(Point::new(15.0, 5.0)), GestureStep::Drag(Vec2::new(5.0, -5.0)));
        assert_eq!(tm.end(Point::new(15.0, 5.0)), GestureEnd::Moved);
    }

    #[test]
    fn test_eraser_counts_removals() {
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Eraser);
        tm.begin(Point::ZERO);
        tm.record_erased(2);
        assert_eq!(tm.update(Point::new(1.0, 1.0)), GestureStep::Erase(Point::new(1.0, 1.0)));
        tm.record_erased(1);
        assert_eq!(tm.end(Point::new(1.0, 1.0)), GestureEnd::Erased { removed: 3 });
    }

    #[test]
    fn test_update_without_gesture() {
        let mut tm = ToolManager::new();
        assert_eq!(tm.update(Point::new(1.0, 1.0)), GestureStep::Nothing);
        assert_eq!(tm.end(Point::new(1.0, 1.0)), GestureEnd::Idle);
    }
}

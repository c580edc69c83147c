//! Render pass over a drawing surface.
//!
//! The surface is a capability supplied by the host (a canvas element, a
//! GPU scene, a test recorder). Every state change repaints the whole set;
//! only previews and pencil segments are drawn on top without clearing.

use crate::shapes::Shape;
use kurbo::{Circle, Point, Rect};
use peniko::Color;

/// Primitive stroking operations a host surface must provide.
pub trait Surface {
    /// Erase everything on the surface.
    fn clear(&mut self);

    /// Fill the whole surface with `color`.
    fn fill_background(&mut self, color: Color);

    /// Stroke the outline of an axis-aligned rectangle.
    fn stroke_rect(&mut self, rect: Rect, color: Color);

    /// Stroke connected line segments through `points`.
    fn stroke_polyline(&mut self, points: &[Point], color: Color);

    /// Stroke a full circle.
    fn stroke_circle(&mut self, circle: Circle, color: Color);
}

/// Colors used by the render pass.
#[derive(Debug, Clone, Copy)]
pub struct RenderStyle {
    pub background: Color,
    pub stroke: Color,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: Color::from_rgba8(0, 0, 0, 255),
            stroke: Color::from_rgba8(255, 255, 255, 255),
        }
    }
}

/// Clear the surface and paint every shape, oldest first.
pub fn redraw(surface: &mut dyn Surface, shapes: &[Shape], style: &RenderStyle) {
    surface.clear();
    surface.fill_background(style.background);
    for shape in shapes {
        draw_shape(surface, shape, style);
    }
}

/// Stroke a single shape. Pending moves are drawn where they will land.
pub fn draw_shape(surface: &mut dyn Surface, shape: &Shape, style: &RenderStyle) {
    match shape {
        Shape::Rect(r) => surface.stroke_rect(r.as_rect(), style.stroke),
        Shape::Circle(c) => surface.stroke_circle(c.as_circle(), style.stroke),
        Shape::Pencil(p) => surface.stroke_polyline(&p.points, style.stroke),
        Shape::Move(pending) => draw_shape(surface, &pending.resolve(), style),
    }
}

/// One call recorded by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Background([u8; 4]),
    Rect(Rect),
    Polyline(Vec<Point>),
    Circle { center: Point, radius: f64 },
}

/// Surface that remembers what was drawn. Useful for tests and headless hosts.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands issued since the last clear.
    pub fn since_clear(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| *c == DrawCommand::Clear)
            .map_or(0, |i| i + 1);
        &self.commands[start..]
    }

    /// Number of full clears seen so far.
    pub fn clear_count(&self) -> usize {
        self.commands.iter().filter(|c| **c == DrawCommand::Clear).count()
    }
}

fn rgba(color: Color) -> [u8; 4] {
    let rgba = color.to_rgba8();
    [rgba.r, rgba.g, rgba.b, rgba.a]
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_background(&mut self, color: Color) {
        self.commands.push(DrawCommand::Background(rgba(color)));
    }

    fn stroke_rect(&mut self, rect: Rect, _color: Color) {
        self.commands.push(DrawCommand::Rect(rect));
    }

    fn stroke_polyline(&mut self, points: &[Point], _color: Color) {
        self.commands.push(DrawCommand::Polyline(points.to_vec()));
    }

    fn stroke_circle(&mut self, circle: Circle, _color: Color) {
        self.commands.push(DrawCommand::Circle {
            center: circle.center,
            radius: circle.radius,
        });
    }
}

//! A participant's view of one room: board, tools, render pass and outbound queue.

use crate::board::Board;
use crate::input::PointerEvent;
use crate::render::{RenderStyle, Surface, draw_shape, redraw};
use crate::shapes::Shape;
use crate::storage::{ShapeLoader, StorageResult};
use crate::sync::{BoardMessage, RelayMessage, SyncError, SyncEvent, decode_inbound};
use crate::tools::{CursorHint, GestureEnd, GestureState, GestureStep, ToolKind, ToolManager};
use crate::transport::MessageChannel;
use kurbo::Point;

/// Drives one room: pointer events and relay frames in, repaints and relay frames out.
///
/// Outbound frames are queued; the host drains them with [`Session::take_outgoing`]
/// or hands them to a channel with [`Session::flush`].
#[derive(Debug)]
pub struct Session {
    room_id: String,
    board: Board,
    tools: ToolManager,
    style: RenderStyle,
    /// Pending outgoing messages (JSON strings).
    outgoing: Vec<String>,
}

impl Session {
    /// Create a session for `room_id` with an empty board and the rect tool.
    pub fn new(room_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            board: Board::new(),
            tools: ToolManager::new(),
            style: RenderStyle::default(),
            outgoing: Vec::new(),
        }
    }

    /// Use different colors for the render pass.
    pub fn with_style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn shapes(&self) -> &[Shape] {
        self.board.shapes()
    }

    pub fn tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    pub fn gesture(&self) -> &GestureState {
        &self.tools.state
    }

    /// Frame announcing this session to the relay.
    pub fn join_message(&self) -> Result<String, serde_json::Error> {
        RelayMessage::JoinRoom {
            room_id: self.room_id.clone(),
        }
        .to_json()
    }

    /// Seed the board with the room's existing shapes.
    ///
    /// Invalid entries are skipped. Replaces whatever arrived before the load finished.
    pub fn seed(&mut self, shapes: Vec<Shape>, surface: &mut dyn Surface) {
        let total = shapes.len();
        let valid: Vec<Shape> = shapes
            .into_iter()
            .map(Shape::normalized)
            .filter(|shape| match shape.validate() {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("Skipping stored {}: {}", shape.kind(), e);
                    false
                }
            })
            .collect();
        log::info!("Seeding room {} with {}/{} shapes", self.room_id, valid.len(), total);
        if let Err(e) = self.board.replace_all(valid) {
            log::warn!("Seed rejected: {}", e);
        }
        self.redraw(surface);
    }

    /// Fetch the room's existing shapes and seed the board with them.
    ///
    /// Returns how many shapes the board holds afterwards.
    pub async fn load(
        &mut self,
        loader: &dyn ShapeLoader,
        surface: &mut dyn Surface,
    ) -> StorageResult<usize> {
        let shapes = loader.load_shapes(&self.room_id).await?;
        self.seed(shapes, surface);
        Ok(self.board.len())
    }

    /// Select a tool. Any gesture in progress is abandoned and a pending move
    /// goes back unmoved.
    pub fn set_tool(&mut self, tool: ToolKind, surface: &mut dyn Surface) -> CursorHint {
        self.abort_gesture(surface);
        self.tools.set_tool(tool);
        tool.cursor()
    }

    /// Repaint every shape.
    pub fn redraw(&self, surface: &mut dyn Surface) {
        redraw(surface, self.board.shapes(), &self.style);
    }

    pub fn handle_pointer_event(&mut self, event: PointerEvent, surface: &mut dyn Surface) {
        match event {
            PointerEvent::Down { position } => self.pointer_down(position, surface),
            PointerEvent::Move { position } => self.pointer_move(position, surface),
            PointerEvent::Up { position } => self.pointer_up(position, surface),
        }
    }

    pub fn pointer_down(&mut self, point: Point, surface: &mut dyn Surface) {
        if self.tools.is_active() {
            log::debug!("Pointer down during a gesture; abandoning it");
            self.abort_gesture(surface);
        }

        match self.tools.current_tool {
            ToolKind::Eraser => {
                self.tools.begin(point);
                self.erase_pass(point, surface);
            }
            ToolKind::Move => {
                let Some(index) = self.board.pick(point) else {
                    log::debug!("Nothing to move at ({}, {})", point.x, point.y);
                    return;
                };
                if self.board.begin_move(index) {
                    self.tools.begin(point);
                    self.redraw(surface);
                }
            }
            ToolKind::Rect | ToolKind::Circle | ToolKind::Pencil => self.tools.begin(point),
        }
    }

    pub fn pointer_move(&mut self, point: Point, surface: &mut dyn Surface) {
        match self.tools.update(point) {
            GestureStep::Nothing => {}
            GestureStep::Preview(shape) => {
                self.redraw(surface);
                draw_shape(surface, &shape, &self.style);
            }
            GestureStep::Segment(from, to) => {
                surface.stroke_polyline(&[from, to], self.style.stroke);
            }
            GestureStep::Erase(at) => self.erase_pass(at, surface),
            GestureStep::Drag(offset) => {
                self.board.update_move(offset);
                self.redraw(surface);
            }
        }
    }

    pub fn pointer_up(&mut self, point: Point, surface: &mut dyn Surface) {
        match self.tools.end(point) {
            GestureEnd::Idle => {}
            GestureEnd::Discarded => log::debug!("Gesture below minimum size; discarded"),
            GestureEnd::Committed(shape) => {
                log::debug!("Committing {}", shape.kind());
                let message = BoardMessage::Shape(shape.clone());
                match self.board.append(shape) {
                    Ok(()) => {
                        self.queue(&message);
                        self.redraw(surface);
                    }
                    Err(e) => log::warn!("Dropping drawn shape: {}", e),
                }
            }
            GestureEnd::Erased { removed } => {
                if removed > 0 {
                    self.queue_full_state();
                }
            }
            GestureEnd::Moved => {
                if self.board.finish_move().is_some() {
                    self.queue_full_state();
                    self.redraw(surface);
                } else {
                    log::debug!("Move ended without a pending shape");
                }
            }
        }
    }

    /// Apply an inbound relay frame.
    ///
    /// Malformed frames leave the board untouched and come back as errors.
    pub fn handle_message(
        &mut self,
        json: &str,
        surface: &mut dyn Surface,
    ) -> Result<SyncEvent, SyncError> {
        let Some(message) = decode_inbound(json, &self.room_id)? else {
            return Ok(SyncEvent::Ignored);
        };
        let event = match message {
            BoardMessage::Update(shapes) => {
                let count = shapes.len();
                self.board.replace_all(shapes)?;
                SyncEvent::StateReplaced { count }
            }
            BoardMessage::Shape(shape) => {
                self.board.append(shape)?;
                SyncEvent::ShapeAppended
            }
        };
        self.redraw(surface);
        Ok(event)
    }

    /// Apply a batch of inbound frames, logging and dropping bad ones.
    pub fn receive_all<I>(&mut self, frames: I, surface: &mut dyn Surface)
    where
        I: IntoIterator<Item = String>,
    {
        for frame in frames {
            if let Err(e) = self.handle_message(&frame, surface) {
                log::warn!("Dropping inbound message: {}", e);
            }
        }
    }

    /// Take pending outgoing messages (drains the queue).
    pub fn take_outgoing(&mut self) -> Vec<String> {
        std::mem::take(&mut self.outgoing)
    }

    /// Check if there are pending outgoing messages.
    pub fn has_outgoing(&self) -> bool {
        !self.outgoing.is_empty()
    }

    /// Send every queued message. Failures are logged and the message dropped.
    pub fn flush(&mut self, channel: &dyn MessageChannel) -> usize {
        let mut sent = 0;
        for msg in self.take_outgoing() {
            match channel.send(&msg) {
                Ok(()) => sent += 1,
                Err(e) => log::warn!("Relay send failed: {}", e),
            }
        }
        sent
    }

    /// End the running gesture without committing it. Removals already made
    /// by the eraser are still broadcast; a pending move goes back unmoved.
    fn abort_gesture(&mut self, surface: &mut dyn Surface) {
        if let GestureState::Erasing { removed } = self.tools.state {
            if removed > 0 {
                self.queue_full_state();
            }
        }
        if self.board.cancel_move() {
            self.redraw(surface);
        }
        self.tools.cancel();
    }

    fn erase_pass(&mut self, point: Point, surface: &mut dyn Surface) {
        let removed = self.board.erase_at(point);
        if removed > 0 {
            log::debug!("Erased {} shapes at ({}, {})", removed, point.x, point.y);
            self.tools.record_erased(removed);
            self.redraw(surface);
        }
    }

    fn queue_full_state(&mut self) {
        let message = BoardMessage::Update(self.board.shapes().to_vec());
        self.queue(&message);
    }

    fn queue(&mut self, message: &BoardMessage) {
        match message.to_envelope(&self.room_id) {
            Ok(json) => self.outgoing.push(json),
            Err(e) => log::error!("Failed to encode outbound message: {}", e),
        }
    }
}

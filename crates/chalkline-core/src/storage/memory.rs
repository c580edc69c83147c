//! In-memory shape store.

use super::{BoxFuture, ShapeLoader, StorageError, StorageResult};
use crate::shapes::Shape;
use crate::sync::BoardMessage;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory store for testing and ephemeral use.
///
/// Unknown rooms load as empty, like a fresh room on the relay.
#[derive(Default)]
pub struct MemoryShapeStore {
    rooms: RwLock<HashMap<String, Vec<Shape>>>,
}

impl MemoryShapeStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a board change to a room's stored shapes.
    pub fn record(&self, room_id: &str, message: BoardMessage) -> StorageResult<()> {
        let mut rooms = self
            .rooms
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        message.apply_to(rooms.entry(room_id.to_string()).or_default());
        Ok(())
    }
}

impl ShapeLoader for MemoryShapeStore {
    fn load_shapes(&self, room_id: &str) -> BoxFuture<'_, StorageResult<Vec<Shape>>> {
        let room_id = room_id.to_string();
        Box::pin(async move {
            let rooms = self
                .rooms
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            Ok(rooms.get(&room_id).cloned().unwrap_or_default())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Rectangle;
    use crate::storage::block_on;

    fn rect(x: f64) -> Shape {
        Shape::Rect(Rectangle::new(x, 0.0, 5.0, 5.0))
    }

    #[test]
    fn test_unknown_room_is_empty() {
        let store = MemoryShapeStore::new();
        assert!(block_on(store.load_shapes("nowhere")).unwrap().is_empty());
    }

    #[test]
    fn test_record_and_load() {
        let store = MemoryShapeStore::new();
        store.record("a", BoardMessage::Shape(rect(1.0))).unwrap();
        store.record("a", BoardMessage::Shape(rect(2.0))).unwrap();
        store.record("b", BoardMessage::Shape(rect(3.0))).unwrap();

        assert_eq!(block_on(store.load_shapes("a")).unwrap(), vec![rect(1.0), rect(2.0)]);

        store.record("a", BoardMessage::Update(vec![rect(9.0)])).unwrap();
        assert_eq!(block_on(store.load_shapes("a")).unwrap(), vec![rect(9.0)]);
        assert_eq!(block_on(store.load_shapes("b")).unwrap(), vec![rect(3.0)]);
    }
}

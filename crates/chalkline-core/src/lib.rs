//! Chalkline Core Library
//!
//! Shape model, gesture state machine, hit testing and relay sync for the
//! Chalkline shared whiteboard. Hosts supply a drawing [`Surface`] and a
//! [`MessageChannel`]; everything else lives here.

pub mod board;
pub mod input;
pub mod render;
pub mod session;
pub mod shapes;
pub mod storage;
pub mod sync;
pub mod tools;
pub mod transport;

pub use board::Board;
pub use hit_test::{PENCIL_HIT_RADIUS, erases, hit_test, pick_topmost};
pub use input::{PointerEvent, to_surface_point};
pub use render::{DrawCommand, RecordingSurface, RenderStyle, Surface, redraw};
pub use session::Session;
pub use shapes::{
    Circle, MIN_PENCIL_POINTS, MoveShape, Pencil, Rectangle, Shape, ShapeError, resolve_move,
};
pub use storage::{MemoryShapeStore, ShapeLoader, ShapeSet, StorageError};
pub use sync::{BoardMessage, RelayMessage, SyncError, SyncEvent};
pub use tools::{CursorHint, GestureState, MIN_SHAPE_EXTENT, ToolKind, ToolManager};
pub use transport::{ConnectionState, MessageChannel, TransportError, TransportEvent};

#[cfg(all(feature = "native-client", not(target_arch = "wasm32")))]
pub use storage::HttpShapeLoader;
#[cfg(all(feature = "native-client", not(target_arch = "wasm32")))]
pub use transport::NativeWebSocket;

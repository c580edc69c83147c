//! Loading the shapes a room already has.

mod memory;

#[cfg(all(feature = "native-client", not(target_arch = "wasm32")))]
mod http;

pub use memory::MemoryShapeStore;

#[cfg(all(feature = "native-client", not(target_arch = "wasm32")))]
pub use http::HttpShapeLoader;

use crate::shapes::Shape;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Room not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Body of the history endpoint: `{"shapes": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeSet {
    pub shapes: Vec<Shape>,
}

/// Source of a room's existing shapes, queried once when a session starts.
#[cfg(not(target_arch = "wasm32"))]
pub trait ShapeLoader: Send + Sync {
    /// Load every shape currently in `room_id`.
    fn load_shapes(&self, room_id: &str) -> BoxFuture<'_, StorageResult<Vec<Shape>>>;
}

/// Source of a room's existing shapes (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait ShapeLoader {
    /// Load every shape currently in `room_id`.
    fn load_shapes(&self, room_id: &str) -> BoxFuture<'_, StorageResult<Vec<Shape>>>;
}

#[cfg(test)]
pub(crate) fn block_on<F: Future>(f: F) -> F::Output {
    // Simple blocking executor for tests
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => return result,
            Poll::Pending => {}
        }
    }
}

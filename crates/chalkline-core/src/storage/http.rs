//! Shape history fetched from the relay server over HTTP.

use super::{BoxFuture, ShapeLoader, ShapeSet, StorageError, StorageResult};
use crate::shapes::Shape;
use url::Url;

/// Loads `GET {base}/rooms/{room}/shapes`.
///
/// The request itself is blocking; the returned future resolves on first poll.
pub struct HttpShapeLoader {
    base: Url,
}

impl HttpShapeLoader {
    /// Create a loader for a server such as `http://localhost:3030`.
    pub fn new(base_url: &str) -> StorageResult<Self> {
        let base = Url::parse(base_url).map_err(|e| StorageError::Other(format!("Invalid URL: {}", e)))?;
        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(StorageError::Other(format!(
                "Invalid history URL scheme: {}",
                base.scheme()
            )));
        }
        Ok(Self { base })
    }

    /// URL of the history endpoint for `room_id`.
    pub fn shapes_url(&self, room_id: &str) -> StorageResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| StorageError::Other("Base URL cannot take a path".to_string()))?
            .pop_if_empty()
            .extend(["rooms", room_id, "shapes"]);
        Ok(url)
    }
}

impl ShapeLoader for HttpShapeLoader {
    fn load_shapes(&self, room_id: &str) -> BoxFuture<'_, StorageResult<Vec<Shape>>> {
        let room_id = room_id.to_string();
        Box::pin(async move {
            let url = self.shapes_url(&room_id)?;
            log::info!("Loading shapes from {}", url);
            let response = ureq::get(url.as_str()).call().map_err(|e| match e {
                ureq::Error::Status(404, _) => StorageError::NotFound(room_id.clone()),
                other => StorageError::Io(other.to_string()),
            })?;
            let set: ShapeSet = response
                .into_json()
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            log::debug!("Loaded {} shapes for room {}", set.shapes.len(), room_id);
            Ok(set.shapes)
        })
    }
}

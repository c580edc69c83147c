//! Room membership, fan-out and shape history.

use chalkline_core::{BoardMessage, Shape};
use dashmap::DashMap;
use std::collections::HashSet;
use tokio::sync::broadcast;

/// A frame queued for a room: sender peer id and the JSON text.
pub type Outbound = (String, String);

/// Room state
struct Room {
    /// Broadcast channel for this room
    tx: broadcast::Sender<Outbound>,
    /// Connected peer IDs
    peers: HashSet<String>,
}

impl Room {
    fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            peers: HashSet::new(),
        }
    }
}

/// Shared application state
pub struct AppState {
    /// Rooms with at least one peer
    rooms: DashMap<String, Room>,
    /// Last known shape set per room; outlives the room's peers
    boards: DashMap<String, Vec<Shape>>,
    channel_capacity: usize,
}

impl AppState {
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            rooms: DashMap::new(),
            boards: DashMap::new(),
            channel_capacity,
        }
    }

    /// Add peer to room and subscribe to its traffic
    pub fn join(&self, room_id: &str, peer_id: &str) -> broadcast::Receiver<Outbound> {
        let mut room = self
            .rooms
            .entry(room_id.to_string())
            .or_insert_with(|| Room::new(self.channel_capacity));
        room.peers.insert(peer_id.to_string());
        room.tx.subscribe()
    }

    /// Remove peer from room
    pub fn leave(&self, room_id: &str, peer_id: &str) {
        if let Some(mut room) = self.rooms.get_mut(room_id) {
            room.peers.remove(peer_id);
        }
        // Clean up empty rooms; a peer that joined meanwhile keeps the room alive
        self.rooms.remove_if(room_id, |_, room| room.peers.is_empty());
    }

    /// Number of peers currently in `room_id`
    pub fn peer_count(&self, room_id: &str) -> usize {
        self.rooms.get(room_id).map_or(0, |room| room.peers.len())
    }

    /// Broadcast a frame to everyone subscribed to the room
    pub fn broadcast(&self, room_id: &str, from: &str, json: String) {
        if let Some(room) = self.rooms.get(room_id) {
            let _ = room.tx.send((from.to_string(), json));
        }
    }

    /// Apply a relayed board change to the room's history
    pub fn record(&self, room_id: &str, message: BoardMessage) {
        let mut shapes = self.boards.entry(room_id.to_string()).or_default();
        message.apply_to(&mut shapes);
    }

    /// Last known shapes for `room_id` (empty for unknown rooms)
    pub fn shapes(&self, room_id: &str) -> Vec<Shape> {
        self.boards
            .get(room_id)
            .map(|shapes| shapes.clone())
            .unwrap_or_default()
    }
}

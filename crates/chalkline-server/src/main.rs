//! Chalkline WebSocket Relay Server
//!
//! Relays board payloads between clients in the same room and remembers each
//! room's last known shape set for late joiners.
//!
//! ## Protocol
//!
//! Messages are JSON with the following format:
//! ```json
//! { "type": "join_room", "roomId": "room-id" }
//! { "type": "leave_room", "roomId": "room-id" }
//! { "type": "chat", "roomId": "room-id", "message": "<board payload JSON>" }
//! { "type": "error", "message": "..." }
//! ```

mod config;
mod rooms;
mod ws;

use axum::{
    Json, Router,
    extract::{Path, State, ws::WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
};
use chalkline_core::ShapeSet;
use config::ServerConfig;
use rooms::AppState;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chalkline_server=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let state = Arc::new(AppState::new(config.channel_capacity));

    let app = Router::new()
        .route("/", get(index))
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .route("/rooms/{room}/shapes", get(room_shapes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Chalkline relay server listening on {}", config.addr);
    info!("WebSocket endpoint: ws://{}/ws", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Index page
async fn index() -> &'static str {
    "Chalkline Relay Server - Connect via WebSocket at /ws"
}

/// Health check
async fn health() -> &'static str {
    "ok"
}

/// Last known shapes of a room
async fn room_shapes(
    Path(room): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Json<ShapeSet> {
    Json(ShapeSet {
        shapes: state.shapes(&room),
    })
}

/// WebSocket upgrade handler
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| ws::handle_socket(socket, state))
}

use std::sync::Arc;

use letssee_tmdb::TmdbClient;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: every field is an `Arc`, a pool handle, or a pooled client.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: letssee_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// TMDB catalog client.
    pub tmdb: TmdbClient,
    /// WebSocket connection manager for realtime push.
    pub ws_manager: Arc<WsManager>,
}

//! WebSocket infrastructure for realtime push.
//!
//! Provides connection management, heartbeat monitoring, the event
//! envelope pushed to clients, and the authenticated upgrade handler.

pub mod events;
mod handler;
mod heartbeat;
pub mod manager;

pub use events::RealtimeEvent;
pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;

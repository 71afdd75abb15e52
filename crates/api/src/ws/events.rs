//! Events pushed to connected clients as `{ "type": ..., "data": ... }`.

use letssee_db::models::follow::{Connection, FollowRequest};
use letssee_db::models::message::Message;
use serde::Serialize;

/// A realtime event addressed to a single user.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum RealtimeEvent {
    /// A new direct message, pushed to the recipient.
    #[serde(rename = "message.created")]
    MessageCreated(Message),
    /// A new pending follow request, pushed to the target.
    #[serde(rename = "follow_request.created")]
    FollowRequestCreated(FollowRequest),
    /// A follow request was accepted, pushed to the requester.
    #[serde(rename = "follow_request.accepted")]
    FollowRequestAccepted(Connection),
}

impl RealtimeEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            RealtimeEvent::MessageCreated(_) => "message.created",
            RealtimeEvent::FollowRequestCreated(_) => "follow_request.created",
            RealtimeEvent::FollowRequestAccepted(_) => "follow_request.accepted",
        }
    }
}

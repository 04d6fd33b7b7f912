use std::fmt;

use axum::extract::ws::Message;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

/// Unique identifier of one connected player, generated at connection time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One connected player within a room.
///
/// The player owns the sending half of its connection channel; the
/// receiving half is drained into the WebSocket by the connection's
/// forwarding task. A closed channel means the peer is gone.
#[derive(Debug)]
pub struct Player {
    pub id: PlayerId,
    pub username: String,
    pub score: u32,
    pub sender: UnboundedSender<Message>,
}

impl Player {
    pub fn new(id: PlayerId, username: String, sender: UnboundedSender<Message>) -> Self {
        Self {
            id,
            username,
            score: 0,
            sender,
        }
    }
}

use axum::extract::ws::Message;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GameError;
use crate::room::PlayerId;

/// Messages sent from client to server, as a `{type, data}` envelope.
///
/// Unknown tags and payloads of the wrong shape fail to decode; the
/// session logs them and continues.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    /// A guess at the current word.
    Guess(String),
    /// A drawing stroke, relayed opaquely to the other players.
    Draw(Value),
}

impl ClientMessage {
    pub fn parse(text: &str) -> Result<Self, GameError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Messages sent from server to client, same envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent once after a successful join.
    Welcome {
        #[serde(rename = "playerId")]
        player_id: PlayerId,
        #[serde(rename = "roomId")]
        room_id: String,
    },
    /// Someone guessed the word.
    CorrectGuess {
        player: String,
        word: String,
        score: u32,
    },
    /// A new round (and word) is live.
    NewRound { message: String, word: String },
    /// A relayed drawing stroke.
    Draw(Value),
    /// A player's username, announced on departure.
    PlayerLeft(String),
}

impl ServerMessage {
    pub fn to_ws_message(&self) -> Result<Message, GameError> {
        Ok(Message::Text(serde_json::to_string(self)?))
    }
}

use axum::extract::ws::Message;

use crate::room::{PlayerId, Room};
use crate::websocket::message::ServerMessage;

/// Deliver `message` to every current player of `room` except `exclude`.
///
/// The player set is snapshotted under the shared lock and every send
/// happens after the lock is released, so one slow or dead peer never
/// blocks room mutation or delivery to the others. A send that fails
/// means the peer's channel is closed (the peer is permanently gone);
/// such players are pruned after the fan-out and their departure is
/// announced to the survivors.
pub async fn broadcast(room: &Room, message: &ServerMessage, exclude: Option<PlayerId>) {
    let text = match serde_json::to_string(message) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(room_id = %room.id(), "failed to encode broadcast: {}", e);
            return;
        }
    };

    let targets = room.snapshot(exclude).await;
    tracing::debug!(
        room_id = %room.id(),
        recipients = targets.len(),
        "broadcasting message"
    );

    let mut failed = Vec::new();
    for (id, sender) in targets {
        if sender.send(Message::Text(text.clone())).is_err() {
            tracing::warn!(room_id = %room.id(), player_id = %id, "failed to send, peer gone");
            failed.push(id);
        }
    }

    for id in failed {
        if let Some((player, _)) = room.leave(&id).await {
            tracing::info!(
                room_id = %room.id(),
                player_id = %id,
                "pruned disconnected player {}",
                player.username
            );
            Box::pin(broadcast(
                room,
                &ServerMessage::PlayerLeft(player.username),
                None,
            ))
            .await;
        }
    }
}

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, Query, State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::game;
use crate::room::{broadcaster, Player, PlayerId, Room};
use crate::websocket::message::{ClientMessage, ServerMessage};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct JoinParams {
    pub username: Option<String>,
}

/// WebSocket upgrade handler for `/ws/{room_id}`.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(room_id): Path<String>,
    Query(params): Query<JoinParams>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, room_id, params))
}

/// Manage the entire lifecycle of one player's connection.
async fn handle_socket(socket: WebSocket, state: AppState, room_id: String, params: JoinParams) {
    let (mut sender, mut receiver) = socket.split();

    // Channel for outgoing messages; the room only ever sees the
    // sending half.
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    let player_id = PlayerId::new();
    let username = params
        .username
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| state.registry.generate_username());

    let player = Player::new(player_id, username.clone(), tx);
    let (room, player_count) = state.registry.join(&room_id, player).await;

    tracing::info!(
        %player_id,
        room_id = %room.id(),
        players = player_count,
        "{} joined",
        username
    );

    // Confirm the connection before entering the receive loop.
    let welcome = ServerMessage::Welcome {
        player_id,
        room_id: room_id.clone(),
    };
    match welcome.to_ws_message() {
        Ok(msg) => {
            if sender.send(msg).await.is_err() {
                cleanup_player(&state, &room, player_id).await;
                return;
            }
        }
        Err(e) => {
            tracing::error!(%player_id, "failed to encode welcome message: {}", e);
            cleanup_player(&state, &room, player_id).await;
            return;
        }
    }

    // Forward queued outbound messages to the socket.
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    // Receive loop: one decoded message at a time, until the peer goes
    // away or the stream breaks.
    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                handle_text_message(&state, &room, player_id, &text).await;
            }
            Ok(Message::Close(_)) => {
                tracing::info!(%player_id, "player disconnected");
                break;
            }
            Ok(_) => {
                // Ignore binary, ping and pong frames.
            }
            Err(e) => {
                tracing::warn!(%player_id, "WebSocket error: {}", e);
                break;
            }
        }
    }

    cleanup_player(&state, &room, player_id).await;
    send_task.abort();
}

/// Decode one envelope and dispatch by tag. Malformed input is logged
/// and the session continues.
async fn handle_text_message(state: &AppState, room: &Arc<Room>, player_id: PlayerId, text: &str) {
    match ClientMessage::parse(text) {
        Ok(ClientMessage::Guess(guess)) => {
            // The round transition runs detached; its handle is only
            // needed by tests that await it.
            let _ = game::handle_guess(&state.words, room, player_id, &guess).await;
        }
        Ok(ClientMessage::Draw(stroke)) => {
            game::handle_draw(room, player_id, stroke).await;
        }
        Err(e) => {
            tracing::warn!(%player_id, "ignoring malformed message: {}", e);
        }
    }
}

/// Remove the player from their room, drop the room from the registry
/// if it emptied, and tell the remaining players who left. Registry
/// removal never runs while a room lock is held.
async fn cleanup_player(state: &AppState, room: &Arc<Room>, player_id: PlayerId) {
    let departed = room.leave(&player_id).await;
    state.registry.remove_if_empty(room.id()).await;

    if let Some((player, _)) = departed {
        tracing::info!(
            %player_id,
            room_id = %room.id(),
            "removed player {}",
            player.username
        );
        broadcaster::broadcast(room, &ServerMessage::PlayerLeft(player.username), None).await;
    }
}

//! Guess evaluation and the round lifecycle.
//!
//! A round is the period during which one secret word is active. A
//! correct guess awards scores, announces the result, and schedules the
//! next round as a detached task; the room's generation counter keeps
//! simultaneous correct guesses from advancing the round twice.

use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinHandle;

use crate::room::{broadcaster, PlayerId, Room};
use crate::websocket::message::ServerMessage;
use crate::words::WordStore;

/// Evaluate a guess against the room's current word.
///
/// An incorrect guess changes nothing. A correct one awards the guesser
/// (and the drawer, if distinct) in one critical section, broadcasts
/// `correct_guess`, and spawns the round transition. The handle of the
/// spawned transition is returned so callers (and tests) can await it.
pub async fn handle_guess(
    words: &Arc<WordStore>,
    room: &Arc<Room>,
    player_id: PlayerId,
    guess: &str,
) -> Option<JoinHandle<()>> {
    // Fast path under the shared lock; the authoritative comparison
    // happens again inside apply_correct_guess.
    if room.current_word().await != guess {
        tracing::debug!(room_id = %room.id(), %player_id, "incorrect guess");
        return None;
    }

    let reward = match room.apply_correct_guess(&player_id, guess).await {
        Some(reward) => reward,
        None => {
            // The round advanced between our read and the critical
            // section; the guess was against a word that is no longer live.
            tracing::debug!(room_id = %room.id(), %player_id, "guess arrived after round advanced");
            return None;
        }
    };

    tracing::info!(
        room_id = %room.id(),
        %player_id,
        word = %reward.word,
        score = reward.score,
        "correct guess by {}",
        reward.username
    );

    broadcaster::broadcast(
        room,
        &ServerMessage::CorrectGuess {
            player: reward.username.clone(),
            word: reward.word.clone(),
            score: reward.score,
        },
        None,
    )
    .await;

    let room = Arc::clone(room);
    let words = Arc::clone(words);
    Some(tokio::spawn(async move {
        start_new_round(&room, &words, reward.generation).await;
    }))
}

/// Begin the next round: store a fresh word from the word source and
/// announce it. No-op (returns false) when `generation` is no longer the
/// live round, so at most one transition applies per round.
pub async fn start_new_round(room: &Room, words: &WordStore, generation: u64) -> bool {
    let next_word = words.pick_excluding(&room.current_word().await);

    match room.advance_round(generation, next_word).await {
        Some(word) => {
            tracing::info!(room_id = %room.id(), "new round started");
            broadcaster::broadcast(
                room,
                &ServerMessage::NewRound {
                    message: "New round has started".to_string(),
                    word,
                },
                None,
            )
            .await;
            true
        }
        None => {
            tracing::debug!(room_id = %room.id(), "round already advanced");
            false
        }
    }
}

/// Relay a drawing stroke to everyone but the sender.
///
/// Only the current drawer may draw; anything else is a no-op. Strokes
/// never touch score or word state.
pub async fn handle_draw(room: &Room, player_id: PlayerId, stroke: Value) {
    if !room.is_drawer(&player_id).await {
        tracing::debug!(room_id = %room.id(), %player_id, "draw from non-drawer ignored");
        return;
    }

    broadcaster::broadcast(room, &ServerMessage::Draw(stroke), Some(player_id)).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::{Player, DRAWER_REWARD, GUESSER_REWARD};
    use axum::extract::ws::Message;
    use serde_json::Value;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    async fn join_probe(room: &Room, username: &str) -> (PlayerId, UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let player = Player::new(PlayerId::new(), username.to_string(), tx);
        let id = player.id;
        room.join(player).await;
        (id, rx)
    }

    fn recv_json(rx: &mut UnboundedReceiver<Message>) -> Value {
        match rx.try_recv() {
            Ok(Message::Text(text)) => serde_json::from_str(&text).unwrap(),
            other => panic!("expected text message, got {:?}", other),
        }
    }

    fn test_words() -> Arc<WordStore> {
        Arc::new(WordStore::from_words(&["apple", "banana"]).unwrap())
    }

    #[tokio::test]
    async fn test_correct_guess_scores_and_advances() {
        let words = test_words();
        let room = Arc::new(Room::new("abc", "apple".to_string()));
        let (drawer_id, mut drawer_rx) = join_probe(&room, "drawer").await;
        let (guesser_id, mut guesser_rx) = join_probe(&room, "guesser").await;

        let handle = handle_guess(&words, &room, guesser_id, "apple")
            .await
            .expect("correct guess should schedule a round");
        handle.await.unwrap();

        assert_eq!(room.player_score(&guesser_id).await, Some(GUESSER_REWARD));
        assert_eq!(room.player_score(&drawer_id).await, Some(DRAWER_REWARD));
        assert_eq!(room.current_word().await, "banana");
        assert_eq!(room.generation().await, 1);

        // Both players saw correct_guess then new_round, in order.
        for rx in [&mut drawer_rx, &mut guesser_rx] {
            let correct = recv_json(rx);
            assert_eq!(correct["type"], "correct_guess");
            assert_eq!(correct["data"]["player"], "guesser");
            assert_eq!(correct["data"]["word"], "apple");
            assert_eq!(correct["data"]["score"], 100);

            let new_round = recv_json(rx);
            assert_eq!(new_round["type"], "new_round");
            assert_eq!(new_round["data"]["word"], "banana");
            assert_eq!(new_round["data"]["message"], "New round has started");
        }
    }

    #[tokio::test]
    async fn test_incorrect_guess_is_logged_only() {
        let words = test_words();
        let room = Arc::new(Room::new("abc", "apple".to_string()));
        let (id, mut rx) = join_probe(&room, "p1").await;

        assert!(handle_guess(&words, &room, id, "wrong").await.is_none());

        assert_eq!(room.player_score(&id).await, Some(0));
        assert_eq!(room.generation().await, 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_guess_against_replaced_word_not_scored() {
        let words = test_words();
        let room = Arc::new(Room::new("abc", "apple".to_string()));
        let (id, _rx) = join_probe(&room, "p1").await;

        assert!(start_new_round(&room, &words, 0).await);
        assert_eq!(room.current_word().await, "banana");

        assert!(handle_guess(&words, &room, id, "apple").await.is_none());
        assert_eq!(room.player_score(&id).await, Some(0));
    }

    #[tokio::test]
    async fn test_simultaneous_correct_guesses_advance_once() {
        let words = test_words();
        let room = Arc::new(Room::new("abc", "apple".to_string()));
        let (_, _rx1) = join_probe(&room, "drawer").await;
        let (g1, _rx2) = join_probe(&room, "g1").await;
        let (g2, _rx3) = join_probe(&room, "g2").await;

        // Both guesses are evaluated against the same live word before
        // either transition runs: each scores exactly once.
        let r1 = room.apply_correct_guess(&g1, "apple").await.unwrap();
        let r2 = room.apply_correct_guess(&g2, "apple").await.unwrap();
        assert_eq!(r1.generation, r2.generation);
        assert_eq!(room.player_score(&g1).await, Some(GUESSER_REWARD));
        assert_eq!(room.player_score(&g2).await, Some(GUESSER_REWARD));

        // Both schedule a transition for the same round; only one wins.
        let first = start_new_round(&room, &words, r1.generation).await;
        let second = start_new_round(&room, &words, r2.generation).await;
        assert!(first);
        assert!(!second);
        assert_eq!(room.generation().await, 1);
    }

    #[tokio::test]
    async fn test_draw_relayed_to_everyone_but_sender() {
        let room = Room::new("abc", "apple".to_string());
        let (drawer_id, mut drawer_rx) = join_probe(&room, "drawer").await;
        let (_, mut other_rx) = join_probe(&room, "other").await;

        let stroke = serde_json::json!({"x1": 1.0, "y1": 2.0, "x2": 3.0, "y2": 4.0});
        handle_draw(&room, drawer_id, stroke.clone()).await;

        assert!(drawer_rx.try_recv().is_err());
        let relayed = recv_json(&mut other_rx);
        assert_eq!(relayed["type"], "draw");
        assert_eq!(relayed["data"], stroke);
    }

    #[tokio::test]
    async fn test_draw_from_non_drawer_is_rejected() {
        let room = Room::new("abc", "apple".to_string());
        let (_, mut drawer_rx) = join_probe(&room, "drawer").await;
        let (other_id, _other_rx) = join_probe(&room, "other").await;

        handle_draw(&room, other_id, serde_json::json!({"x1": 1})).await;

        assert!(drawer_rx.try_recv().is_err());
    }
}

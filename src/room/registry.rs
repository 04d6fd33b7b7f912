use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::room::{Player, Room};
use crate::words::WordStore;

/// Process-wide mapping from room id to room.
///
/// Rooms are created lazily on first join and removed the moment they
/// empty. The registry has its own lock, independent of any room's
/// lock; lock order is always registry before room, never the reverse.
pub struct RoomRegistry {
    rooms: RwLock<HashMap<String, Arc<Room>>>,
    words: Arc<WordStore>,
    next_guest_id: AtomicU64,
}

impl RoomRegistry {
    pub fn new(words: Arc<WordStore>) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            words,
            next_guest_id: AtomicU64::new(0),
        }
    }

    /// Generate a unique fallback username (Player0, Player1, ...).
    pub fn generate_username(&self) -> String {
        let id = self.next_guest_id.fetch_add(1, Ordering::SeqCst);
        format!("Player{}", id)
    }

    /// Return the room for `room_id`, creating it with a starting word
    /// from the word store if it does not exist. At most one room ever
    /// exists per id, no matter how many callers race here.
    pub async fn get_or_create(&self, room_id: &str) -> Arc<Room> {
        {
            let rooms = self.rooms.read().await;
            if let Some(room) = rooms.get(room_id) {
                return Arc::clone(room);
            }
        }

        let mut rooms = self.rooms.write().await;
        let room = rooms
            .entry(room_id.to_string())
            .or_insert_with(|| Arc::new(Room::new(room_id, self.words.pick())));
        Arc::clone(room)
    }

    /// Add `player` to the room `room_id`, creating the room if needed.
    /// Returns the room and its new player count.
    ///
    /// The insert happens while the registry's shared lock is held, so a
    /// concurrent `remove_if_empty` (which takes the exclusive lock)
    /// can never delete the room out from under an in-flight join.
    pub async fn join(&self, room_id: &str, player: Player) -> (Arc<Room>, usize) {
        loop {
            {
                let rooms = self.rooms.read().await;
                if let Some(room) = rooms.get(room_id) {
                    let count = room.join(player).await;
                    return (Arc::clone(room), count);
                }
            }

            let mut rooms = self.rooms.write().await;
            if !rooms.contains_key(room_id) {
                rooms.insert(
                    room_id.to_string(),
                    Arc::new(Room::new(room_id, self.words.pick())),
                );
                tracing::info!(room_id, "room created");
            }
            // Retry through the read path: the room may already have
            // been removed again by the time we get back there.
        }
    }

    /// Remove the room only if it currently has no players.
    /// Returns true if the room was removed.
    pub async fn remove_if_empty(&self, room_id: &str) -> bool {
        let mut rooms = self.rooms.write().await;
        let empty = match rooms.get(room_id) {
            Some(room) => room.player_count().await == 0,
            None => return false,
        };

        if empty {
            rooms.remove(room_id);
            tracing::info!(room_id, "room removed");
        }
        empty
    }

    pub async fn get(&self, room_id: &str) -> Option<Arc<Room>> {
        self.rooms.read().await.get(room_id).cloned()
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }
}

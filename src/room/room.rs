use std::collections::HashMap;

use axum::extract::ws::Message;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::RwLock;

use crate::room::{Player, PlayerId};

/// Points awarded to the player who guessed the word.
pub const GUESSER_REWARD: u32 = 100;

/// Points awarded to the drawer when someone else guesses their word.
pub const DRAWER_REWARD: u32 = 50;

/// Round state guarded as a single unit: a round transition replaces the
/// word and may replace the drawer, and both must be observed together
/// with the player set.
struct RoundState {
    players: HashMap<PlayerId, Player>,
    word: String,
    drawer: Option<PlayerId>,
    /// Incremented exactly once per round transition. A transition only
    /// applies if the generation it was scheduled against is still live,
    /// so simultaneous correct guesses cannot double-advance the round.
    generation: u64,
}

/// Everything a correct guess changed, captured inside the critical
/// section so the outgoing broadcast does not re-read shared state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessReward {
    pub username: String,
    pub word: String,
    pub score: u32,
    pub generation: u64,
}

/// An isolated game session: a set of players plus the current round.
///
/// Reads of the word/drawer and iteration over the players take the
/// shared lock; every mutation takes the exclusive lock. The lock is
/// never held across network I/O.
pub struct Room {
    id: String,
    state: RwLock<RoundState>,
}

impl Room {
    pub fn new(id: impl Into<String>, word: String) -> Self {
        Self {
            id: id.into(),
            state: RwLock::new(RoundState {
                players: HashMap::new(),
                word,
                drawer: None,
                generation: 0,
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Add a player and return the new player count.
    /// The first player to join an empty room becomes the drawer.
    pub async fn join(&self, player: Player) -> usize {
        let mut state = self.state.write().await;
        if state.drawer.is_none() {
            state.drawer = Some(player.id);
        }
        state.players.insert(player.id, player);
        state.players.len()
    }

    /// Remove a player. Returns the removed player and whether the room
    /// is now empty, or None if the player was not a member.
    ///
    /// When the departing player was the drawer, an arbitrary remaining
    /// player takes over so the room stays playable.
    pub async fn leave(&self, id: &PlayerId) -> Option<(Player, bool)> {
        let mut state = self.state.write().await;
        let player = state.players.remove(id)?;
        if state.drawer == Some(*id) {
            state.drawer = state.players.keys().next().copied();
        }
        Some((player, state.players.is_empty()))
    }

    pub async fn player_count(&self) -> usize {
        self.state.read().await.players.len()
    }

    pub async fn current_word(&self) -> String {
        self.state.read().await.word.clone()
    }

    pub async fn drawer(&self) -> Option<PlayerId> {
        self.state.read().await.drawer
    }

    pub async fn is_drawer(&self, id: &PlayerId) -> bool {
        self.state.read().await.drawer == Some(*id)
    }

    pub async fn generation(&self) -> u64 {
        self.state.read().await.generation
    }

    pub async fn player_score(&self, id: &PlayerId) -> Option<u32> {
        self.state.read().await.players.get(id).map(|p| p.score)
    }

    /// Score a guess against the live word, in one critical section.
    ///
    /// The word is re-read here rather than trusted from the caller's
    /// earlier read: another guess may have advanced the round since.
    /// Guesser and drawer rewards are applied together or not at all.
    /// A guesser who already left the room scores nothing.
    pub async fn apply_correct_guess(
        &self,
        guesser: &PlayerId,
        guess: &str,
    ) -> Option<GuessReward> {
        let mut state = self.state.write().await;
        if state.word != guess {
            return None;
        }

        let word = state.word.clone();
        let generation = state.generation;
        let drawer = state.drawer;

        let player = state.players.get_mut(guesser)?;
        player.score += GUESSER_REWARD;
        let username = player.username.clone();
        let score = player.score;

        if let Some(drawer_id) = drawer {
            if drawer_id != *guesser {
                if let Some(drawer) = state.players.get_mut(&drawer_id) {
                    drawer.score += DRAWER_REWARD;
                }
            }
        }

        Some(GuessReward {
            username,
            word,
            score,
            generation,
        })
    }

    /// Install the next round's word, if `generation` is still the live
    /// round. Returns the stored word on success, None when another
    /// transition for the same round already won.
    pub async fn advance_round(&self, generation: u64, new_word: String) -> Option<String> {
        let mut state = self.state.write().await;
        if state.generation != generation {
            return None;
        }
        state.generation += 1;
        state.word = new_word.clone();
        // TODO: rotate the drawer here once turn order is defined by the
        // game rules; word and drawer change in the same critical section.
        Some(new_word)
    }

    /// Copy the current player set for lock-free message delivery.
    /// The snapshot may be stale relative to concurrent joins/leaves.
    pub async fn snapshot(
        &self,
        exclude: Option<PlayerId>,
    ) -> Vec<(PlayerId, UnboundedSender<Message>)> {
        let state = self.state.read().await;
        state
            .players
            .values()
            .filter(|p| Some(p.id) != exclude)
            .map(|p| (p.id, p.sender.clone()))
            .collect()
    }
}

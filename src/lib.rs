pub mod api;
pub mod error;
pub mod game;
pub mod room;
pub mod websocket;
pub mod words;

use std::sync::Arc;

use room::RoomRegistry;
use words::WordStore;

/// Application state shared across all connections
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RoomRegistry>,
    pub words: Arc<WordStore>,
}

impl AppState {
    pub fn new(words: WordStore) -> Self {
        let words = Arc::new(words);
        Self {
            registry: Arc::new(RoomRegistry::new(Arc::clone(&words))),
            words,
        }
    }
}

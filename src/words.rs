use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// One candidate word with its usage weight from the word list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    pub count: u32,
}

/// The word source used to seed rooms and drive round transitions.
///
/// Loaded once at startup; guaranteed non-empty after construction so
/// picking a word can never fail at runtime.
pub struct WordStore {
    entries: Vec<WordEntry>,
}

impl WordStore {
    pub fn new(entries: Vec<WordEntry>) -> Result<Self, GameError> {
        if entries.is_empty() {
            return Err(GameError::EmptyWordSource);
        }
        Ok(Self { entries })
    }

    /// Load a word list from a CSV-like file of `word,count` records.
    /// Malformed records are skipped with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let contents = std::fs::read_to_string(path)?;
        Self::new(Self::parse(&contents))
    }

    fn parse(contents: &str) -> Vec<WordEntry> {
        let mut entries = Vec::new();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let Some((word, count)) = line.split_once(',') else {
                tracing::warn!("Skipping invalid record: {}", line);
                continue;
            };

            let word = word.trim();
            let count = match count.trim().parse::<u32>() {
                Ok(count) => count,
                Err(_) => {
                    tracing::warn!("Invalid count value in record: {}", line);
                    continue;
                }
            };

            if word.is_empty() {
                tracing::warn!("Skipping record with empty word: {}", line);
                continue;
            }

            entries.push(WordEntry {
                word: word.to_string(),
                count,
            });
        }

        entries
    }

    /// Build a store from plain words (count defaults to zero).
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Result<Self, GameError> {
        Self::new(
            words
                .iter()
                .map(|w| WordEntry {
                    word: w.as_ref().to_string(),
                    count: 0,
                })
                .collect(),
        )
    }

    /// Pick one random word.
    pub fn pick(&self) -> String {
        let mut rng = rand::thread_rng();
        self.entries[rng.gen_range(0..self.entries.len())].word.clone()
    }

    /// Pick one random word different from `current`, so consecutive
    /// rounds don't repeat the same word. Falls back to `current` when
    /// the store holds no other word.
    pub fn pick_excluding(&self, current: &str) -> String {
        let candidates: Vec<&WordEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.word != current)
            .collect();

        if candidates.is_empty() {
            return current.to_string();
        }

        let mut rng = rand::thread_rng();
        candidates[rng.gen_range(0..candidates.len())].word.clone()
    }

    /// Pick up to `n` distinct entries at random (no duplicate indices).
    /// Returns fewer than `n` when the store is smaller.
    pub fn pick_unique(&self, n: usize) -> Result<Vec<WordEntry>, GameError> {
        if self.entries.is_empty() {
            return Err(GameError::EmptyWordSource);
        }

        let n = n.min(self.entries.len());
        let mut rng = rand::thread_rng();
        let indices = rand::seq::index::sample(&mut rng, self.entries.len(), n);

        Ok(indices.iter().map(|i| self.entries[i].clone()).collect())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

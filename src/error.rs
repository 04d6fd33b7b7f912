use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Word source is empty")]
    EmptyWordSource,

    #[error("Malformed message: {0}")]
    MalformedMessage(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CardParseError {
    #[error("Empty card string")]
    Empty,
    #[error("Unknown rank `{0}`")]
    UnknownRank(String),
    #[error("Unknown suit `{0}`")]
    UnknownSuit(String),
}

#[derive(Debug, Error)]
pub enum LogError {
    #[error("Failed to write action log: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode action record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Action entry {entry} comes before any match header")]
    MissingHeader { entry: usize },
}

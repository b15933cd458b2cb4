use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Artifact unavailable: {0}")]
    ArtifactUnavailable(String),

    #[error("Invalid feature vector: expected {expected} fields, got {actual}")]
    InvalidFeatureCount { expected: usize, actual: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Similarity matrix dimension mismatch: index has {titles} titles, matrix is {rows}x{cols}")]
    DimensionMismatch {
        titles: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Label count mismatch: {labels} labels, {outputs} model outputs")]
    LabelCountMismatch { labels: usize, outputs: usize },

    #[error("Username already taken: {0}")]
    DuplicateUsername(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown relation kind: {kind} (expected prev, next or parallel)")]
    UnknownRelationKind { kind: String },

    #[error("invalid layout option `{name}`: {reason}")]
    InvalidOption { name: &'static str, reason: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

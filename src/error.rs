//! Error types, one enum per concern.

use std::path::PathBuf;

use crate::game::Phase;

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("player name must not be blank")]
    BlankName,

    #[error("cannot {action} while in {phase:?}")]
    IllegalTransition { phase: Phase, action: &'static str },
}

#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    #[error("leaderboard storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode leaderboard: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("leaderboard lock poisoned")]
    Poisoned,
}

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("no post matches {0}")]
    NotFound(String),

    #[error("slug '{0}' is already taken")]
    DuplicateSlug(String),

    #[error("content store lock poisoned")]
    Poisoned,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

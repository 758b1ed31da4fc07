//! Error types shared by the session, matchmaking and game modules.

use thiserror::Error;

/// Failures on a single player connection. None of these ever escape the
/// connection or match that produced them.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("connection rejected before a player name was received")]
    Rejected,
    #[error("connection closed")]
    Closed,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Why a submitted word was refused. The display text is sent to the player.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlayError {
    #[error("You don't have the necessary letters.")]
    InsufficientLetters,
    #[error("Invalid word.")]
    InvalidWord,
}

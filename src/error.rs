use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Color;

/// Rejections produced by the rules engine. These are expected outcomes,
/// reported back to the caller; the message text is what clients display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("Game is not ongoing")]
    NotOngoing,
    #[error("It is not your turn")]
    NotYourTurn,
    #[error("Invalid starting position or wrong player")]
    InvalidStart,
    #[error("You must take the jump")]
    MustJump,
    #[error("Invalid move")]
    InvalidMove,
    #[error("{} pawns can only move forward", capitalized(.0))]
    WrongDirection(Color),
    #[error("Game is already full")]
    GameFull,
    #[error("User ID to join is required")]
    MissingUser,
    #[error("User is already in the game")]
    AlreadyJoined,
}

fn capitalized(color: &Color) -> &'static str {
    match color {
        Color::Black => "Black",
        Color::Red => "Red",
    }
}

/// Faults raised by a game repository.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("game {game_id} was modified concurrently")]
    Conflict { game_id: String },
    #[error("game {game_id} already exists")]
    Duplicate { game_id: String },
    #[error("storage failure: {0}")]
    Backend(String),
}

/// Everything a game operation can fail with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Game not found")]
    NotFound,
    #[error("Game already exists")]
    AlreadyExists,
    #[error("Game was modified by another request, please retry")]
    Conflict,
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error("{0}")]
    Storage(String),
}

impl From<StoreError> for GameError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { .. } => GameError::Conflict,
            StoreError::Duplicate { .. } => GameError::AlreadyExists,
            StoreError::Backend(message) => GameError::Storage(message),
        }
    }
}

/// HTTP-style status class attached to a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStatus {
    NotFound,
    Forbidden,
    BadRequest,
    Conflict,
    ServerError,
}

impl ErrorStatus {
    pub fn http_code(self) -> u16 {
        match self {
            ErrorStatus::NotFound => 404,
            ErrorStatus::Forbidden => 403,
            ErrorStatus::BadRequest => 400,
            ErrorStatus::Conflict => 409,
            ErrorStatus::ServerError => 500,
        }
    }
}

impl GameError {
    pub fn status(&self) -> ErrorStatus {
        match self {
            GameError::NotFound => ErrorStatus::NotFound,
            GameError::Rule(RuleError::NotYourTurn) => ErrorStatus::Forbidden,
            GameError::Rule(_) | GameError::AlreadyExists => ErrorStatus::BadRequest,
            GameError::Conflict => ErrorStatus::Conflict,
            GameError::Storage(_) => ErrorStatus::ServerError,
        }
    }

    pub fn rejection(&self) -> Rejection {
        Rejection {
            message: self.to_string(),
            status: self.status(),
        }
    }
}

/// Structured rejection returned to clients in place of a game record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub message: String,
    pub status: ErrorStatus,
}

/// Failure decoding the wire form of a board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardParseError {
    #[error("board must have 8 rows, got {0}")]
    RowCount(usize),
    #[error("board row {row} must have 8 squares, got {len}")]
    ColumnCount { row: usize, len: usize },
    #[error("unknown piece token {token:?} at ({row}, {col})")]
    UnknownToken { row: usize, col: usize, token: String },
}

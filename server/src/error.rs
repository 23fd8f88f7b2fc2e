use thiserror::Error;
use ttt_shared::ErrorCode;

/// Rejections produced by the session state machine and the relay.
///
/// None of these are fatal: the request fails, nothing is mutated and
/// nothing is broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("not found")]
    NotFound,
    #[error("session is full")]
    SessionFull,
    #[error("participant has already joined this session")]
    AlreadyJoined,
    #[error("invalid move: position {0} is outside the board")]
    InvalidPosition(usize),
    #[error("invalid move: session is not in progress")]
    NotPlaying,
    #[error("invalid move: cell {0} is already occupied")]
    CellOccupied(usize),
    #[error("invalid move: participant is not playing in this session")]
    NotAPlayer,
    #[error("invalid move: not your turn")]
    NotYourTurn,
}

impl GameError {
    pub fn code(&self) -> ErrorCode {
        match self {
            GameError::NotFound => ErrorCode::NotFound,
            GameError::SessionFull => ErrorCode::SessionFull,
            GameError::AlreadyJoined => ErrorCode::AlreadyJoined,
            GameError::InvalidPosition(_) => ErrorCode::InvalidPosition,
            GameError::NotPlaying => ErrorCode::NotPlaying,
            GameError::CellOccupied(_) => ErrorCode::CellOccupied,
            GameError::NotAPlayer => ErrorCode::NotAPlayer,
            GameError::NotYourTurn => ErrorCode::NotYourTurn,
        }
    }
}

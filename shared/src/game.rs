//! Marks, session status, outcomes and the public session snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::player::{ParticipantId, PlayerPublic};

/// Number of cells on the board (3x3, row-major).
pub const BOARD_CELLS: usize = 9;

/// A player's symbol on the board
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// The mark of the opposing player.
    pub fn other(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

impl std::fmt::Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Lifecycle of a session. Transitions only move forward.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    AwaitingSecondPlayer,
    InProgress,
    Concluded,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AwaitingSecondPlayer => "awaiting-second-player",
            Self::InProgress => "in-progress",
            Self::Concluded => "concluded",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a concluded session ended.
///
/// Serialized as `{"winner": "X"}` or `"draw"`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Winner(Mark),
    Draw,
}

/// Opaque session identifier
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(v: String) -> Self {
        SessionId(v)
    }
}

impl From<&str> for SessionId {
    fn from(v: &str) -> Self {
        SessionId(v.to_string())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Board cells, `None` for empty.
pub type Board = [Option<Mark>; BOARD_CELLS];

/// Complete public view of one session, sent to clients on every change
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub board: Board,
    pub current_mark: Mark,
    pub players: Vec<PlayerPublic>,
    pub status: SessionStatus,
    pub outcome: Option<Outcome>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concluded_at: Option<DateTime<Utc>>,
}

impl SessionSnapshot {
    /// The seated player holding `participant`'s id, if any.
    pub fn player(&self, participant: &ParticipantId) -> Option<&PlayerPublic> {
        self.players.iter().find(|p| &p.id == participant)
    }

    /// The seated player whose mark is `mark`, if any.
    pub fn holder_of(&self, mark: Mark) -> Option<&PlayerPublic> {
        self.players.iter().find(|p| p.mark == mark)
    }
}

/// Aggregate counters over every session the relay currently holds
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameStatistics {
    pub total_games: usize,
    /// Sessions waiting for a second player or in progress.
    pub active_games: usize,
    pub completed_games: usize,
    /// Distinct participants seated in any held session.
    pub total_players: usize,
    /// Mean seconds from creation to conclusion; `None` before any game ends.
    pub average_game_duration: Option<f64>,
}

//! Participant identifiers, seated players and per-participant statistics.

use serde::{Deserialize, Serialize};

use crate::game::Mark;

/// Client-chosen identifier for a participant
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

impl From<String> for ParticipantId {
    fn from(v: String) -> Self {
        ParticipantId(v)
    }
}

impl From<&str> for ParticipantId {
    fn from(v: &str) -> Self {
        ParticipantId(v.to_string())
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A seated player as seen by every client
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPublic {
    pub id: ParticipantId,
    pub display_name: String,
    pub mark: Mark,
}

/// Result of a concluded session from one participant's point of view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

/// Lifetime counters for a participant
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl PlayerStats {
    pub fn record(&mut self, result: GameResult) {
        self.games_played += 1;
        match result {
            GameResult::Win => self.wins += 1,
            GameResult::Loss => self.losses += 1,
            GameResult::Draw => self.draws += 1,
        }
    }

    /// Fraction of played games won; 0.0 before the first game.
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.games_played)
        }
    }
}

/// One row of the leaderboard
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based position after sorting.
    pub rank: usize,
    pub participant_id: ParticipantId,
    pub display_name: String,
    pub stats: PlayerStats,
    pub win_rate: f64,
}

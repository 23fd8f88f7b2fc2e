//! Request and response bodies of the REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::{GameStatistics, SessionSnapshot, SessionStatus};
use crate::messages::ErrorCode;
use crate::player::{LeaderboardEntry, ParticipantId, PlayerStats};

/// Body of `POST /api/games` and `POST /api/games/:id/join`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatRequest {
    pub participant_id: ParticipantId,
    pub display_name: String,
}

/// Body of `POST /api/games/:id/move`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub participant_id: ParticipantId,
    pub position: usize,
}

/// Query string of `GET /api/games`. All filters are optional.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFilter {
    #[serde(default)]
    pub status: Option<SessionStatus>,
    #[serde(default)]
    pub participant_id: Option<ParticipantId>,
    /// Case-insensitive substring of any seated player's display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Keep only the `limit` most recently created sessions.
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub success: bool,
    pub session: SessionSnapshot,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionsResponse {
    pub success: bool,
    pub sessions: Vec<SessionSnapshot>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: PlayerStats,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub success: bool,
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub success: bool,
    pub statistics: GameStatistics,
}

/// Body of every failed request
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: ErrorCode,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

// HTTP handlers for the REST API.
//
// Handlers are thin: they decode the request, call into `game_ops` and wrap
// the result in the `{success, ...}` envelopes from `ttt_shared::api`.
// Decoding failures are answered like domain errors instead of axum's
// plain-text rejections.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use ttt_shared::{
    ErrorCode, ErrorResponse, HealthResponse, LeaderboardResponse, MoveRequest, ParticipantId,
    SeatRequest, SessionFilter, SessionId, SessionResponse, SessionsResponse, StatisticsResponse,
    StatsResponse,
};

use crate::error::GameError;
use crate::server::{game_ops, AppState};

const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

/// Everything an API handler can fail with.
#[derive(Debug)]
pub enum ApiError {
    Game(GameError),
    Malformed(String),
}

impl From<GameError> for ApiError {
    fn from(e: GameError) -> Self {
        ApiError::Game(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::Malformed(e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        ApiError::Malformed(e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, code) = match self {
            ApiError::Game(e) => {
                let status = match e {
                    GameError::NotFound => StatusCode::NOT_FOUND,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, e.to_string(), e.code())
            }
            ApiError::Malformed(detail) => (
                StatusCode::BAD_REQUEST,
                format!("malformed request: {}", detail),
                ErrorCode::Malformed,
            ),
        };
        let body = ErrorResponse {
            success: false,
            error,
            code,
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

fn session_ok(session: ttt_shared::SessionSnapshot) -> ApiResult<SessionResponse> {
    Ok(Json(SessionResponse {
        success: true,
        session,
    }))
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now(),
    })
}

/// `POST /api/games`
pub async fn create_handler(
    State(state): State<AppState>,
    payload: Result<Json<SeatRequest>, JsonRejection>,
) -> ApiResult<SessionResponse> {
    let Json(req) = payload?;
    let session = game_ops::create_session(&state, req.participant_id, req.display_name).await?;
    session_ok(session)
}

/// `GET /api/games`
pub async fn list_handler(
    State(state): State<AppState>,
    filter: Result<Query<SessionFilter>, QueryRejection>,
) -> ApiResult<SessionsResponse> {
    let Query(filter) = filter?;
    let sessions = game_ops::list_sessions(&state, &filter).await;
    Ok(Json(SessionsResponse {
        success: true,
        sessions,
    }))
}

/// `GET /api/games/:id`
pub async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> ApiResult<SessionResponse> {
    session_ok(game_ops::get_session(&state, &id).await?)
}

/// `POST /api/games/:id/join`
pub async fn join_handler(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    payload: Result<Json<SeatRequest>, JsonRejection>,
) -> ApiResult<SessionResponse> {
    let Json(req) = payload?;
    let session =
        game_ops::join_session(&state, &id, req.participant_id, req.display_name).await?;
    session_ok(session)
}

/// `POST /api/games/:id/move`
pub async fn move_handler(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    payload: Result<Json<MoveRequest>, JsonRejection>,
) -> ApiResult<SessionResponse> {
    let Json(req) = payload?;
    let session = game_ops::submit_move(&state, &id, &req.participant_id, req.position).await?;
    session_ok(session)
}

/// `GET /api/players/:id/stats`
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(participant): Path<ParticipantId>,
) -> Json<StatsResponse> {
    let stats = game_ops::player_stats(&state, &participant).await;
    Json(StatsResponse {
        success: true,
        stats,
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

/// `GET /api/leaderboard`
pub async fn leaderboard_handler(
    State(state): State<AppState>,
    query: Result<Query<LeaderboardQuery>, QueryRejection>,
) -> ApiResult<LeaderboardResponse> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT);
    let leaderboard = game_ops::leaderboard(&state, limit).await;
    Ok(Json(LeaderboardResponse {
        success: true,
        leaderboard,
    }))
}

/// `GET /api/statistics`
pub async fn statistics_handler(State(state): State<AppState>) -> Json<StatisticsResponse> {
    Json(StatisticsResponse {
        success: true,
        statistics: game_ops::statistics(&state).await,
    })
}

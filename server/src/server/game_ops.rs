//! Relay operations shared by every transport.
//!
//! Each mutating operation holds the session's lock from validation through
//! broadcast, so concurrent requests on one session are applied one after
//! the other and subscribers see updates in the order they happened.

use std::collections::HashSet;
use std::io::IsTerminal;

use chrono::Utc;
use tokio::sync::mpsc::UnboundedSender;
use ttt_shared::{
    ClientMsg, ErrorCode, GameStatistics, LeaderboardEntry, ParticipantId, PlayerStats, ServerMsg,
    SessionFilter, SessionId, SessionSnapshot, SessionStatus,
};
use uuid::Uuid;

use crate::error::GameError;
use crate::game::Session;
use crate::pretty;

use super::registry::SessionHandle;
use super::subscriptions::ConnectionId;
use super::AppState;

/// A live push connection as seen by the relay.
#[derive(Clone, Debug)]
pub struct Connection {
    pub id: ConnectionId,
    pub tx: UnboundedSender<ServerMsg>,
}

impl Connection {
    pub fn new(state: &AppState, tx: UnboundedSender<ServerMsg>) -> Self {
        Self {
            id: state.subscriptions.next_connection_id(),
            tx,
        }
    }
}

/// Create a session and seat its creator as X.
pub async fn create_session(
    state: &AppState,
    participant: ParticipantId,
    display_name: String,
) -> Result<SessionSnapshot, GameError> {
    let id = SessionId(Uuid::new_v4().to_string());
    let mut session = Session::create(id, Utc::now());
    session.join(participant.clone(), display_name)?;
    let snapshot = session.snapshot();
    state.registry.insert(session).await;
    tracing::info!(session = %snapshot.id, %participant, "created session");
    Ok(snapshot)
}

/// All sessions in creation order, narrowed by `filter`.
///
/// With a `limit`, only the most recent sessions are returned, newest first.
pub async fn list_sessions(state: &AppState, filter: &SessionFilter) -> Vec<SessionSnapshot> {
    let name_needle = filter.name.as_ref().map(|n| n.to_lowercase());
    let sessions = state
        .registry
        .snapshots()
        .await
        .into_iter()
        .filter(|s| filter.status.map_or(true, |status| s.status == status))
        .filter(|s| {
            filter
                .participant_id
                .as_ref()
                .map_or(true, |p| s.player(p).is_some())
        })
        .filter(|s| {
            name_needle.as_deref().map_or(true, |needle| {
                s.players
                    .iter()
                    .any(|p| p.display_name.to_lowercase().contains(needle))
            })
        });
    match filter.limit {
        Some(limit) => {
            let mut all: Vec<_> = sessions.collect();
            all.reverse();
            all.truncate(limit);
            all
        }
        None => sessions.collect(),
    }
}

pub async fn get_session(state: &AppState, id: &SessionId) -> Result<SessionSnapshot, GameError> {
    let handle = state.registry.get(id).await?;
    let session = handle.lock().await;
    Ok(session.snapshot())
}

/// Seat a second participant and broadcast the started game.
pub async fn join_session(
    state: &AppState,
    id: &SessionId,
    participant: ParticipantId,
    display_name: String,
) -> Result<SessionSnapshot, GameError> {
    let handle = state.registry.get(id).await?;
    let mut session = handle.lock().await;
    let mark = session.join(participant.clone(), display_name)?;
    let snapshot = session.snapshot();
    tracing::info!(session = %id, %participant, %mark, status = %snapshot.status, "participant joined");

    broadcast_update(state, &snapshot).await;
    Ok(snapshot)
}

/// Apply a move, record stats if it ended the game, and broadcast.
pub async fn submit_move(
    state: &AppState,
    id: &SessionId,
    participant: &ParticipantId,
    position: usize,
) -> Result<SessionSnapshot, GameError> {
    let handle = state.registry.get(id).await?;
    let mut session = handle.lock().await;
    let concluded = session.apply_move(participant, position, Utc::now())?;
    let snapshot = session.snapshot();
    tracing::debug!(session = %id, %participant, position, "move accepted");

    if let Some(outcome) = concluded {
        state.stats.record_outcome(session.players(), outcome).await;
        let line = pretty::format_session_human(&snapshot, std::io::stdout().is_terminal());
        tracing::info!(session = %id, ?outcome, "session concluded\n{}", line);
    }

    broadcast_update(state, &snapshot).await;
    Ok(snapshot)
}

/// Follow `id` on `conn`. The current snapshot is pushed immediately so the
/// subscriber starts from a consistent state.
pub async fn subscribe(
    state: &AppState,
    conn: &Connection,
    id: &SessionId,
) -> Result<SessionSnapshot, GameError> {
    let handle = state.registry.get(id).await?;
    attach_subscriber(state, conn, id, &handle).await
}

/// Register `conn` on a session whose handle was fetched earlier.
///
/// Eviction removes the id from the registry before dropping its
/// subscribers, so the registry is checked again after registering.
async fn attach_subscriber(
    state: &AppState,
    conn: &Connection,
    id: &SessionId,
    handle: &SessionHandle,
) -> Result<SessionSnapshot, GameError> {
    let session = handle.lock().await;
    let snapshot = session.snapshot();
    state
        .subscriptions
        .subscribe(conn.id, id.clone(), conn.tx.clone())
        .await;
    if state.registry.get(id).await.is_err() {
        state.subscriptions.unsubscribe(conn.id).await;
        return Err(GameError::NotFound);
    }
    let _ = conn.tx.send(ServerMsg::GameUpdate {
        session: snapshot.clone(),
    });
    tracing::debug!(conn = conn.id, session = %id, "subscribed");
    Ok(snapshot)
}

pub async fn unsubscribe(state: &AppState, conn: &Connection) -> Option<SessionId> {
    state.subscriptions.unsubscribe(conn.id).await
}

pub async fn player_stats(state: &AppState, participant: &ParticipantId) -> PlayerStats {
    state.stats.get(participant).await
}

pub async fn leaderboard(state: &AppState, limit: usize) -> Vec<LeaderboardEntry> {
    state.stats.leaderboard(limit).await
}

/// Counters over every session currently held.
pub async fn statistics(state: &AppState) -> GameStatistics {
    let sessions = state.registry.snapshots().await;
    let mut players = HashSet::new();
    let mut stats = GameStatistics {
        total_games: sessions.len(),
        ..GameStatistics::default()
    };
    let mut durations = Vec::new();

    for s in &sessions {
        players.extend(s.players.iter().map(|p| &p.id));
        if s.status != SessionStatus::Concluded {
            stats.active_games += 1;
            continue;
        }
        stats.completed_games += 1;
        if let Some(at) = s.concluded_at {
            durations.push((at - s.created_at).num_milliseconds() as f64 / 1000.0);
        }
    }
    stats.total_players = players.len();
    if !durations.is_empty() {
        let total: f64 = durations.iter().sum();
        stats.average_game_duration = Some(total / durations.len() as f64);
    }
    stats
}

/// Push the full snapshot to everyone following this session.
async fn broadcast_update(state: &AppState, snapshot: &SessionSnapshot) {
    let msg = ServerMsg::GameUpdate {
        session: snapshot.clone(),
    };
    let delivered = state.subscriptions.publish(&snapshot.id, &msg).await;
    tracing::debug!(session = %snapshot.id, delivered, "broadcast game update");
}

pub fn error_msg(err: &GameError) -> ServerMsg {
    ServerMsg::Error {
        error: err.to_string(),
        code: err.code(),
    }
}

pub fn malformed_msg(detail: impl std::fmt::Display) -> ServerMsg {
    ServerMsg::Error {
        error: format!("malformed request: {}", detail),
        code: ErrorCode::Malformed,
    }
}

/// Handle one push-channel request and produce the direct reply.
pub async fn handle_client_msg(state: &AppState, conn: &Connection, cm: ClientMsg) -> ServerMsg {
    let result = match cm {
        ClientMsg::Subscribe { session_id } => subscribe(state, conn, &session_id)
            .await
            .map(|_| ServerMsg::Subscribed { session_id }),
        ClientMsg::Unsubscribe => {
            unsubscribe(state, conn).await;
            Ok(ServerMsg::Unsubscribed)
        }
        ClientMsg::CreateSession {
            participant_id,
            display_name,
        } => create_session(state, participant_id, display_name)
            .await
            .map(|session| ServerMsg::Session { session }),
        ClientMsg::JoinSession {
            session_id,
            participant_id,
            display_name,
        } => join_session(state, &session_id, participant_id, display_name)
            .await
            .map(|session| ServerMsg::Session { session }),
        ClientMsg::SubmitMove {
            session_id,
            participant_id,
            position,
        } => submit_move(state, &session_id, &participant_id, position)
            .await
            .map(|session| ServerMsg::Session { session }),
        ClientMsg::ListSessions => Ok(ServerMsg::Sessions {
            sessions: list_sessions(state, &SessionFilter::default()).await,
        }),
        ClientMsg::GetSession { session_id } => get_session(state, &session_id)
            .await
            .map(|session| ServerMsg::Session { session }),
        ClientMsg::Ping => Ok(ServerMsg::Pong),
    };
    result.unwrap_or_else(|e| {
        tracing::debug!(error = %e, "request rejected");
        error_msg(&e)
    })
}

//! Push-channel protocol spoken over the `/ws` WebSocket.
//!
//! Frames are JSON objects tagged by a `type` field, e.g.
//! `{"type":"game_update","session":{...}}`.

use serde::{Deserialize, Serialize};

use crate::game::{SessionId, SessionSnapshot};
use crate::player::ParticipantId;

/// Messages that clients can send to the server
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ClientMsg {
    /// Receive `game_update` for this session. Replaces any earlier subscription.
    Subscribe {
        session_id: SessionId,
    },
    Unsubscribe,
    CreateSession {
        participant_id: ParticipantId,
        display_name: String,
    },
    JoinSession {
        session_id: SessionId,
        participant_id: ParticipantId,
        display_name: String,
    },
    SubmitMove {
        session_id: SessionId,
        participant_id: ParticipantId,
        position: usize,
    },
    ListSessions,
    GetSession {
        session_id: SessionId,
    },
    Ping,
}

/// Messages that the server can send to clients
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServerMsg {
    /// Pushed to every subscriber after a successful join or move.
    GameUpdate {
        session: SessionSnapshot,
    },
    /// Direct reply carrying one session.
    Session {
        session: SessionSnapshot,
    },
    Sessions {
        sessions: Vec<SessionSnapshot>,
    },
    Subscribed {
        session_id: SessionId,
    },
    Unsubscribed,
    Error {
        error: String,
        code: ErrorCode,
    },
    Pong,
}

/// Stable machine-readable error codes
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    SessionFull,
    AlreadyJoined,
    InvalidPosition,
    NotPlaying,
    CellOccupied,
    NotAPlayer,
    NotYourTurn,
    Malformed,
}

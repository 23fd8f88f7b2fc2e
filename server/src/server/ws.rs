// WebSocket handlers and websocket-specific helpers.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::StreamExt;
use tokio::sync::mpsc;
use ttt_shared::{ClientMsg, ServerMsg};

use crate::server::game_ops::{self, Connection};
use crate::server::state::AppState;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    // Pushes for this connection arrive on `rx`; the subscription registry
    // only ever holds the sender half.
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMsg>();
    let conn = Connection::new(&state, tx);
    tracing::info!(conn = conn.id, "client connected");

    loop {
        tokio::select! {
            biased;

            pushed = rx.recv() => {
                match pushed {
                    Some(sm) => {
                        if !send_ws(&mut socket, &sm).await {
                            break;
                        }
                    }
                    // We hold a sender in `conn`, so this never closes first.
                    None => break,
                }
            }

            msg = socket.next() => {
                match msg {
                    Some(Ok(Message::Text(txt))) => {
                        let reply = match serde_json::from_str::<ClientMsg>(&txt) {
                            Ok(cm) => {
                                tracing::debug!(conn = conn.id, ws_received_client_msg = ?cm);
                                game_ops::handle_client_msg(&state, &conn, cm).await
                            }
                            Err(e) => {
                                tracing::warn!(conn = conn.id, error = %e, "failed to parse incoming ClientMsg JSON");
                                tracing::debug!(raw_in = %txt);
                                game_ops::malformed_msg(e)
                            }
                        };
                        if !send_ws(&mut socket, &reply).await {
                            break;
                        }
                    }
                    Some(Ok(Message::Binary(_))) => {
                        tracing::warn!(conn = conn.id, "rejected binary frame");
                        let reply = game_ops::malformed_msg("binary frames are not supported");
                        if !send_ws(&mut socket, &reply).await {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
        }
    }

    game_ops::unsubscribe(&state, &conn).await;
    tracing::info!(conn = conn.id, "client disconnected");
}

/// Serialize and send one message. Returns false once the socket is gone.
async fn send_ws(socket: &mut WebSocket, msg: &ServerMsg) -> bool {
    match serde_json::to_string(msg) {
        Ok(txt) => socket.send(Message::Text(txt)).await.is_ok(),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize ServerMsg for websocket send");
            true
        }
    }
}

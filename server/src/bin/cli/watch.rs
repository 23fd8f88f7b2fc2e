use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

use ttt_shared::{ClientMsg, ServerMsg, SessionId};

use super::utils::MessagePrinter;

/// Follow one session over the websocket and print every update as it arrives.
/// Accepts an address string (e.g. "ws://host:port/ws" or "http://host:port") and builds the ws URL internally.
pub async fn watch_ws(addr: &str, session_id: SessionId, json: bool) -> anyhow::Result<()> {
    let ws_url = super::transport::build_ws_url(addr)?;
    let (ws_stream, _resp) = tokio_tungstenite::connect_async(ws_url.as_str()).await?;
    let (mut write, mut read) = ws_stream.split();

    let subscribe_txt = serde_json::to_string(&ClientMsg::Subscribe { session_id })?;
    write.send(Message::Text(subscribe_txt)).await?;

    if json {
        eprintln!("Connected to WebSocket {}", ws_url);
    } else {
        println!("Connected to WebSocket {}", ws_url);
    }

    let printer = MessagePrinter::new(json);
    loop {
        match read.next().await {
            Some(Ok(Message::Text(txt))) => match serde_json::from_str::<ServerMsg>(&txt) {
                Ok(ServerMsg::Error { error, code }) => {
                    // A failed subscribe leaves nothing to watch.
                    anyhow::bail!("server rejected subscription ({:?}): {}", code, error);
                }
                Ok(sm) => printer.handle(&sm),
                Err(e) => eprintln!("Invalid JSON from server: {}", e),
            },
            Some(Ok(_other)) => { /* ignore non-text frames */ }
            Some(Err(e)) => {
                eprintln!("WebSocket error: {}", e);
                break;
            }
            None => break, // closed
        }
    }

    Ok(())
}

//! WebSocket upgrade handler.

use std::time::Duration;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use carehub_realtime::connection::heartbeat::run_heartbeat;

use crate::state::AppState;

/// How long queued frames may take to flush after the socket loop ends.
const FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

/// GET /api/ws: WebSocket upgrade
///
/// Connections start anonymous and in no rooms; clients opt in with
/// `join_user_room`/`join_conversation` frames.
pub async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_ws_connection(state, socket))
}

/// Handles an established WebSocket connection.
async fn handle_ws_connection(state: AppState, socket: WebSocket) {
    let engine = state.realtime.clone();
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (handle, mut outbound_rx) = engine.connections.register();
    let conn_id = handle.id;

    // Outbound frame forwarder
    let mut outbound_task = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    let heartbeat_task = tokio::spawn(run_heartbeat(handle.clone(), engine.heartbeat()));

    // Process inbound frames until the client leaves or the server closes us
    loop {
        tokio::select! {
            _ = handle.closed() => {
                debug!(conn_id = %conn_id, "Connection closed server-side");
                break;
            }
            incoming = ws_rx.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    engine.connections.handle_inbound(conn_id, text.as_str());
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                    break;
                }
            }
        }
    }

    // Cleanup
    heartbeat_task.abort();
    engine.connections.unregister(conn_id);
    drop(handle);
    if tokio::time::timeout(FLUSH_TIMEOUT, &mut outbound_task)
        .await
        .is_err()
    {
        outbound_task.abort();
    }

    info!(conn_id = %conn_id, "WebSocket connection closed");
}

//! Per-connection supervisor for the push channel.
//!
//! Splits the WebSocket into reader and writer halves:
//! - Writer task: owns the sink, forwards messages from an mpsc channel
//! - Supervisor loop: races the session deadline against incoming frames
//!
//! The mpsc channel allows the broadcast path to push messages to this
//! client by cloning the sender held in the connection registry.

use axum::extract::ws::{CloseFrame, Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

use crate::state::AppState;
use crate::ws::{self, CLOSE_GOING_AWAY};

/// Grace period for the writer task to flush the final close frame.
const WRITER_FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

/// Run the supervisor for one push connection.
///
/// The session deadline is armed once at open and raced against the
/// client's frames; no liveness is required from the client. On every
/// exit path the connection is unregistered before the writer is drained.
pub async fn run_connection(socket: WebSocket, state: AppState) {
    let (ws_sender, mut ws_receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel::<Message>();

    let conn_id = ws::register(&state.connections, tx.clone());
    tracing::info!(conn_id, "Push connection opened");

    // Writer task: forwards mpsc messages to the WebSocket sink
    let writer_handle = tokio::spawn(writer_task(ws_sender, rx));

    let deadline = Instant::now() + Duration::from_secs(state.session_timeout_secs);
    let expiry = sleep_until(deadline);
    tokio::pin!(expiry);

    loop {
        tokio::select! {
            _ = &mut expiry => {
                let reason = format!(
                    "Session timed out after {}s",
                    state.session_timeout_secs
                );
                let _ = tx.send(Message::Close(Some(CloseFrame {
                    code: CLOSE_GOING_AWAY,
                    reason: reason.into(),
                })));
                tracing::info!(conn_id, "Push connection reached session timeout");
                break;
            }
            incoming = ws_receiver.next() => match incoming {
                Some(Ok(Message::Text(_))) => {
                    // The channel is push-only; client text keeps the
                    // connection alive but its content is discarded.
                }
                Some(Ok(Message::Ping(data))) => {
                    let _ = tx.send(Message::Pong(data));
                }
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!(conn_id, reason = ?frame, "Client initiated close");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!(conn_id, error = %e, "WebSocket receive error");
                    break;
                }
                None => {
                    tracing::info!(conn_id, "WebSocket stream ended");
                    break;
                }
            }
        }
    }

    // Runs on every exit path, including receive errors
    ws::unregister(&state.connections, conn_id);

    // Dropping our sender lets the writer drain queued frames (the close
    // frame included) and exit once the registry clone is gone too.
    drop(tx);
    let _ = tokio::time::timeout(WRITER_FLUSH_TIMEOUT, writer_handle).await;

    tracing::info!(conn_id, "Push connection closed");
}

/// Writer task: receives messages from the mpsc channel and forwards them
/// to the WebSocket sink.
async fn writer_task(
    mut ws_sender: futures_util::stream::SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<Message>,
) {
    while let Some(msg) = rx.recv().await {
        if ws_sender.send(msg).await.is_err() {
            // WebSocket send failed — connection is broken
            break;
        }
    }
}

//! WebSocket client that keeps its room memberships across reconnects.

use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use carehub_core::config::ClientConfig;
use carehub_core::error::{AppError, ErrorKind};
use carehub_core::result::AppResult;
use carehub_core::types::{ConversationId, UserId};
use carehub_entity::realtime::{ClientEvent, ServerEvent};

use super::membership::RoomMembership;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const COMMAND_BUFFER: usize = 64;
const EVENT_BUFFER: usize = 256;

/// How a single connection ended.
#[derive(Debug, PartialEq, Eq)]
enum SessionEnd {
    Dropped,
    Shutdown,
}

/// Handle to the background connection task.
///
/// Server events arrive on the receiver returned by [`spawn`](Self::spawn).
/// Pings are answered internally.
#[derive(Debug)]
pub struct RealtimeClient {
    commands: mpsc::Sender<ClientEvent>,
    membership: Arc<Mutex<RoomMembership>>,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl RealtimeClient {
    /// Start connecting to `config.ws_url`.
    pub fn spawn(config: &ClientConfig) -> (Self, mpsc::Receiver<ServerEvent>) {
        let (commands, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let membership = Arc::new(Mutex::new(RoomMembership::new()));
        let shutdown = CancellationToken::new();

        let connection = Connection {
            url: config.ws_url.clone(),
            reconnect_delay: Duration::from_millis(config.reconnect_delay_ms),
            membership: membership.clone(),
            commands: command_rx,
            events: event_tx,
            shutdown: shutdown.clone(),
        };
        let task = tokio::spawn(connection.run());

        (
            Self {
                commands,
                membership,
                shutdown,
                task,
            },
            event_rx,
        )
    }

    /// Join the personal room now and on every reconnect.
    pub async fn join_user_room(&self, user_id: UserId) -> AppResult<()> {
        if self.membership.lock().await.join_user_room(user_id) {
            self.emit(ClientEvent::JoinUserRoom(user_id)).await?;
        }
        Ok(())
    }

    /// Join a conversation room now and on every reconnect.
    pub async fn join_conversation(&self, conversation_id: ConversationId) -> AppResult<()> {
        if self.membership.lock().await.join_conversation(conversation_id) {
            self.emit(ClientEvent::JoinConversation(conversation_id))
                .await?;
        }
        Ok(())
    }

    pub async fn leave_conversation(&self, conversation_id: ConversationId) -> AppResult<()> {
        if self.membership.lock().await.leave_conversation(conversation_id) {
            self.emit(ClientEvent::LeaveConversation(conversation_id))
                .await?;
        }
        Ok(())
    }

    /// Rooms currently tracked for replay.
    pub async fn membership(&self) -> RoomMembership {
        self.membership.lock().await.clone()
    }

    /// Queue an event. Events queued while disconnected are sent after the
    /// next successful connect.
    pub async fn emit(&self, event: ClientEvent) -> AppResult<()> {
        self.commands
            .send(event)
            .await
            .map_err(|_| AppError::transport("Real-time client has shut down"))
    }

    /// Close the connection and stop reconnecting.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        if let Err(e) = self.task.await {
            warn!(error = %e, "Real-time client task failed");
        }
    }
}

struct Connection {
    url: String,
    reconnect_delay: Duration,
    membership: Arc<Mutex<RoomMembership>>,
    commands: mpsc::Receiver<ClientEvent>,
    events: mpsc::Sender<ServerEvent>,
    shutdown: CancellationToken,
}

impl Connection {
    async fn run(mut self) {
        let mut attempt: u64 = 0;
        loop {
            attempt += 1;
            let connected = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                result = connect_async(self.url.as_str()) => result,
            };

            match connected {
                Ok((stream, _)) => {
                    info!(url = %self.url, attempt, "Real-time connection established");
                    if self.session(stream).await == SessionEnd::Shutdown {
                        break;
                    }
                    warn!(url = %self.url, "Real-time connection dropped");
                }
                Err(e) => {
                    warn!(url = %self.url, attempt, error = %e, "Real-time connect failed");
                }
            }

            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.reconnect_delay) => {}
            }
        }
        debug!("Real-time client stopped");
    }

    async fn session(&mut self, stream: WsStream) -> SessionEnd {
        let (mut sink, mut source) = stream.split();

        let replay = self.membership.lock().await.replay_events();
        debug!(rooms = replay.len(), "Re-joining rooms");
        for event in &replay {
            if let Err(e) = send_event(&mut sink, event).await {
                warn!(error = %e, "Failed to re-join room");
                return SessionEnd::Dropped;
            }
        }

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    let _ = sink.send(Message::Close(None)).await;
                    return SessionEnd::Shutdown;
                }
                command = self.commands.recv() => {
                    let Some(event) = command else {
                        let _ = sink.send(Message::Close(None)).await;
                        return SessionEnd::Shutdown;
                    };
                    if let Err(e) = send_event(&mut sink, &event).await {
                        warn!(event = event.name(), error = %e, "Failed to send event");
                        return SessionEnd::Dropped;
                    }
                }
                frame = source.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ServerEvent>(text.as_str()) {
                            Ok(ServerEvent::Ping { timestamp }) => {
                                if let Err(e) = send_event(&mut sink, &ClientEvent::Pong { timestamp }).await {
                                    warn!(error = %e, "Failed to answer ping");
                                    return SessionEnd::Dropped;
                                }
                            }
                            Ok(event) => {
                                if self.events.send(event).await.is_err() {
                                    debug!("Event receiver dropped");
                                }
                            }
                            Err(e) => debug!(error = %e, "Ignoring unrecognised frame"),
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => return SessionEnd::Dropped,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "Real-time read error");
                        return SessionEnd::Dropped;
                    }
                },
            }
        }
    }
}

async fn send_event<S>(sink: &mut S, event: &ClientEvent) -> AppResult<()>
where
    S: futures::Sink<Message, Error = tokio_tungstenite::tungstenite::Error> + Unpin,
{
    let payload = serde_json::to_string(event).map_err(|e| {
        AppError::with_source(ErrorKind::Serialization, "Failed to encode event", e)
    })?;
    sink.send(Message::text(payload))
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Transport, "WebSocket send failed", e))
}

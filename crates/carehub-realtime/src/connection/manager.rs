//! Connection manager: connection lifecycle and event routing.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use carehub_core::config::RealtimeConfig;
use carehub_core::types::{ConnectionId, UserId};
use carehub_entity::presence::PresenceStatus;
use carehub_entity::realtime::{ClientEvent, ServerEvent, TypingPayload, TypingUpdate};

use crate::metrics::RealtimeMetrics;
use crate::presence::tracker::PresenceTracker;
use crate::room::registry::RoomRegistry;
use crate::room::types::RoomName;

use super::handle::ConnectionHandle;
use super::pool::ConnectionPool;

/// Manages all active WebSocket connections.
#[derive(Debug)]
pub struct ConnectionManager {
    /// Connection pool.
    pool: ConnectionPool,
    /// Room registry.
    rooms: Arc<RoomRegistry>,
    /// Presence tracker.
    presence: Arc<PresenceTracker>,
    /// Metrics.
    metrics: Arc<RealtimeMetrics>,
    /// Configuration.
    config: RealtimeConfig,
    /// Parent of every connection's shutdown token.
    shutdown: CancellationToken,
}

impl ConnectionManager {
    /// Creates a new connection manager.
    pub fn new(
        config: RealtimeConfig,
        rooms: Arc<RoomRegistry>,
        presence: Arc<PresenceTracker>,
        metrics: Arc<RealtimeMetrics>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            pool: ConnectionPool::new(),
            rooms,
            presence,
            metrics,
            config,
            shutdown,
        }
    }

    /// Registers a new connection with no room membership.
    ///
    /// Returns the connection handle and a receiver for outbound frames.
    pub fn register(&self) -> (Arc<ConnectionHandle>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size.max(1));
        let handle = Arc::new(ConnectionHandle::new(
            tx,
            self.shutdown.child_token(),
            Utc::now(),
        ));

        self.pool.add(handle.clone());
        self.metrics.connection_opened();

        info!(conn_id = %handle.id, "WebSocket connection registered");
        (handle, rx)
    }

    /// Unregisters a connection and leaves all its rooms.
    ///
    /// When the connection had claimed a user and no other connection still
    /// claims that user, everyone is told the user went offline.
    pub fn unregister(&self, conn_id: ConnectionId) {
        let Some((handle, claimed)) = self.pool.remove(conn_id) else {
            return;
        };
        handle.mark_dead();
        self.rooms.leave_all(conn_id);
        self.metrics.connection_closed();

        if let Some(user_id) = claimed {
            self.offline_if_unclaimed(user_id);
        }

        info!(
            conn_id = %conn_id,
            user_id = ?claimed,
            "WebSocket connection unregistered"
        );
    }

    /// Processes an inbound frame from a client.
    pub fn handle_inbound(&self, conn_id: ConnectionId, raw: &str) {
        let Some(handle) = self.pool.get(conn_id) else {
            warn!(conn_id = %conn_id, "Frame from unknown connection");
            return;
        };

        let event: ClientEvent = match serde_json::from_str(raw) {
            Ok(event) => event,
            Err(e) => {
                self.metrics.invalid_frame();
                debug!(conn_id = %conn_id, error = %e, "Invalid frame");
                self.send_to(
                    &handle,
                    &ServerEvent::error("invalid_event", format!("Failed to parse event: {e}")),
                );
                return;
            }
        };

        self.metrics.event_received();
        debug!(conn_id = %conn_id, event = event.name(), "Inbound event");

        match event {
            ClientEvent::JoinUserRoom(user_id) => {
                self.join(&handle, RoomName::User(user_id));
            }
            ClientEvent::JoinConversation(conversation_id) => {
                self.join(&handle, RoomName::Conversation(conversation_id));
            }
            ClientEvent::LeaveConversation(conversation_id) => {
                self.rooms
                    .leave(RoomName::Conversation(conversation_id), conn_id);
            }
            ClientEvent::TypingStart(payload) => self.relay_typing(conn_id, payload, true),
            ClientEvent::TypingStop(payload) => self.relay_typing(conn_id, payload, false),
            ClientEvent::UserOnline(user_id) => {
                self.announce(conn_id, user_id, PresenceStatus::Online);
            }
            ClientEvent::UserAway(user_id) => {
                self.announce(conn_id, user_id, PresenceStatus::Away);
            }
            ClientEvent::MessageReaction(payload) => {
                let room = RoomName::Conversation(payload.conversation_id);
                self.emit_to_room(room, &ServerEvent::MessageReactionUpdate(payload), None);
            }
            ClientEvent::InitiateCall(offer) => {
                let target = offer.target_user_id;
                self.emit_to_user(target, &ServerEvent::IncomingCall(offer));
            }
            ClientEvent::AnswerCall(reply) => {
                let target = reply.target_user_id;
                self.emit_to_user(target, &ServerEvent::CallAnswered(reply));
            }
            ClientEvent::RejectCall(reply) => {
                let target = reply.target_user_id;
                self.emit_to_user(target, &ServerEvent::CallRejected(reply));
            }
            ClientEvent::EndCall(reply) => {
                let target = reply.target_user_id;
                self.emit_to_user(target, &ServerEvent::CallEnded(reply));
            }
            ClientEvent::WebrtcOffer(signal) => {
                let target = signal.target_user_id;
                self.emit_to_user(target, &ServerEvent::WebrtcOffer(signal));
            }
            ClientEvent::WebrtcAnswer(signal) => {
                let target = signal.target_user_id;
                self.emit_to_user(target, &ServerEvent::WebrtcAnswer(signal));
            }
            ClientEvent::WebrtcIceCandidate(signal) => {
                let target = signal.target_user_id;
                self.emit_to_user(target, &ServerEvent::WebrtcIceCandidate(signal));
            }
            ClientEvent::Pong { .. } => handle.record_pong(Utc::now()),
        }
    }

    fn join(&self, handle: &ConnectionHandle, room: RoomName) {
        let max = self.config.max_rooms_per_connection;
        if !self.rooms.is_member(&room, handle.id) && self.rooms.room_count_for(handle.id) >= max {
            self.send_to(
                handle,
                &ServerEvent::error("max_rooms", format!("Maximum rooms ({max}) reached")),
            );
            return;
        }
        if self.rooms.join(room, handle.id) {
            debug!(conn_id = %handle.id, room = %room, "Joined room");
        }
    }

    fn relay_typing(&self, conn_id: ConnectionId, payload: TypingPayload, is_typing: bool) {
        let room = RoomName::Conversation(payload.conversation_id);
        let update = TypingUpdate {
            conversation_id: payload.conversation_id,
            user_id: payload.user_id,
            user_name: payload.user_name,
            is_typing,
        };
        self.emit_to_room(room, &ServerEvent::UserTyping(update), Some(conn_id));
    }

    fn announce(&self, conn_id: ConnectionId, user_id: UserId, status: PresenceStatus) {
        if let Some(previous) = self.pool.claim(conn_id, user_id) {
            self.offline_if_unclaimed(previous);
        }
        let change = self.presence.set(user_id, status, Utc::now());
        self.broadcast_all(&ServerEvent::UserStatusChange(change));
    }

    /// Broadcast `offline` once no connection speaks for `user_id`.
    fn offline_if_unclaimed(&self, user_id: UserId) {
        if self.pool.is_user_connected(user_id) {
            return;
        }
        let change = self
            .presence
            .set(user_id, PresenceStatus::Offline, Utc::now());
        self.broadcast_all(&ServerEvent::UserStatusChange(change));
    }

    fn send_to(&self, handle: &ConnectionHandle, event: &ServerEvent) {
        if let Some(frame) = encode(event) {
            if handle.send(frame) {
                self.metrics.events_sent(1);
            }
        }
    }

    /// Sends an event to every connection in `room`, optionally skipping one.
    ///
    /// Returns the number of connections the frame was queued for.
    pub fn emit_to_room(
        &self,
        room: RoomName,
        event: &ServerEvent,
        except: Option<ConnectionId>,
    ) -> usize {
        let Some(frame) = encode(event) else {
            return 0;
        };

        let mut sent = 0;
        for conn_id in self.rooms.members(&room) {
            if Some(conn_id) == except {
                continue;
            }
            if let Some(handle) = self.pool.get(conn_id) {
                if handle.send(frame.clone()) {
                    sent += 1;
                }
            }
        }

        self.metrics.events_sent(sent as u64);
        sent
    }

    /// Sends an event to every tab and device of a user.
    pub fn emit_to_user(&self, user_id: UserId, event: &ServerEvent) -> usize {
        self.emit_to_room(RoomName::User(user_id), event, None)
    }

    /// Broadcasts an event to all connected clients.
    pub fn broadcast_all(&self, event: &ServerEvent) -> usize {
        let Some(frame) = encode(event) else {
            return 0;
        };

        let sent = self
            .pool
            .all_connections()
            .iter()
            .filter(|conn| conn.send(frame.clone()))
            .count();

        self.metrics.events_sent(sent as u64);
        sent
    }

    /// Closes all connections.
    pub fn close_all(&self) {
        let all = self.pool.all_connections();
        for conn in &all {
            conn.mark_dead();
            self.pool.remove(conn.id);
            self.rooms.leave_all(conn.id);
            self.metrics.connection_closed();
        }
        info!(count = all.len(), "All connections closed");
    }

    /// Returns the total connection count.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// Returns the number of users claimed by live connections.
    pub fn user_count(&self) -> usize {
        self.pool.user_count()
    }

    /// Heartbeat settings for new connections.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }
}

fn encode(event: &ServerEvent) -> Option<String> {
    serde_json::to_string(event)
        .inspect_err(|e| error!(event = event.name(), error = %e, "Failed to serialize event"))
        .ok()
}

#[cfg(test)]
mod tests {
    use carehub_core::types::{ConversationId, MessageId};
    use carehub_entity::notification::ActorSnapshot;
    use serde_json::{Value, json};

    use super::*;

    struct Fixture {
        manager: ConnectionManager,
        rooms: Arc<RoomRegistry>,
        presence: Arc<PresenceTracker>,
    }

    fn fixture(max_rooms: usize) -> Fixture {
        let rooms = Arc::new(RoomRegistry::new());
        let config = RealtimeConfig {
            max_rooms_per_connection: max_rooms,
            ..RealtimeConfig::default()
        };
        let presence = Arc::new(PresenceTracker::new());
        let manager = ConnectionManager::new(
            config,
            rooms.clone(),
            presence.clone(),
            Arc::new(RealtimeMetrics::new()),
            CancellationToken::new(),
        );
        Fixture {
            manager,
            rooms,
            presence,
        }
    }

    fn send(manager: &ConnectionManager, conn: ConnectionId, frame: Value) {
        manager.handle_inbound(conn, &frame.to_string());
    }

    fn next(rx: &mut mpsc::Receiver<String>) -> Option<Value> {
        rx.try_recv()
            .ok()
            .map(|frame| serde_json::from_str(&frame).expect("valid json"))
    }

    #[test]
    fn test_new_connection_has_no_rooms() {
        let f = fixture(8);
        let (handle, _rx) = f.manager.register();
        assert_eq!(f.rooms.room_count_for(handle.id), 0);
        assert_eq!(f.manager.connection_count(), 1);
    }

    #[test]
    fn test_typing_reaches_room_except_sender() {
        let f = fixture(8);
        let conv = ConversationId::new();
        let (alice, mut alice_rx) = f.manager.register();
        let (bob, mut bob_rx) = f.manager.register();
        let (_carol, mut carol_rx) = f.manager.register();
        send(&f.manager, alice.id, json!({"event": "join_conversation", "data": conv}));
        send(&f.manager, bob.id, json!({"event": "join_conversation", "data": conv}));

        send(
            &f.manager,
            alice.id,
            json!({
                "event": "typing_start",
                "data": {"conversationId": conv, "userId": UserId::new(), "userName": "Alice"}
            }),
        );

        let frame = next(&mut bob_rx).expect("bob sees typing");
        assert_eq!(frame["event"], "user_typing");
        assert_eq!(frame["data"]["isTyping"], true);
        assert_eq!(frame["data"]["userName"], "Alice");
        assert!(next(&mut alice_rx).is_none());
        assert!(next(&mut carol_rx).is_none());
    }

    #[test]
    fn test_reaction_reaches_whole_room() {
        let f = fixture(8);
        let conv = ConversationId::new();
        let (alice, mut alice_rx) = f.manager.register();
        let (bob, mut bob_rx) = f.manager.register();
        send(&f.manager, alice.id, json!({"event": "join_conversation", "data": conv}));
        send(&f.manager, bob.id, json!({"event": "join_conversation", "data": conv}));

        send(
            &f.manager,
            alice.id,
            json!({
                "event": "message_reaction",
                "data": {
                    "messageId": MessageId::new(),
                    "conversationId": conv,
                    "reaction": "+1",
                    "userId": UserId::new(),
                    "userName": "Alice"
                }
            }),
        );

        for rx in [&mut alice_rx, &mut bob_rx] {
            let frame = next(rx).expect("reaction update");
            assert_eq!(frame["event"], "message_reaction_update");
            assert_eq!(frame["data"]["reaction"], "+1");
        }
    }

    #[test]
    fn test_leave_conversation_stops_delivery() {
        let f = fixture(8);
        let conv = ConversationId::new();
        let (alice, mut alice_rx) = f.manager.register();
        send(&f.manager, alice.id, json!({"event": "join_conversation", "data": conv}));
        send(&f.manager, alice.id, json!({"event": "leave_conversation", "data": conv}));

        let delivered = f.manager.emit_to_room(
            RoomName::Conversation(conv),
            &ServerEvent::Ping { timestamp: 0 },
            None,
        );
        assert_eq!(delivered, 0);
        assert!(next(&mut alice_rx).is_none());
    }

    #[test]
    fn test_presence_reaches_every_connection() {
        let f = fixture(8);
        let user = UserId::new();
        let (alice, mut alice_rx) = f.manager.register();
        let (_bob, mut bob_rx) = f.manager.register();

        send(&f.manager, alice.id, json!({"event": "user_away", "data": user}));

        for rx in [&mut alice_rx, &mut bob_rx] {
            let frame = next(rx).expect("status change");
            assert_eq!(frame["event"], "user_status_change");
            assert_eq!(frame["data"]["status"], "away");
            assert_eq!(frame["data"]["userId"], json!(user));
        }
    }

    #[test]
    fn test_disconnect_broadcasts_offline_for_claimed_user() {
        let f = fixture(8);
        let user = UserId::new();
        let (alice, mut alice_rx) = f.manager.register();
        let (_bob, mut bob_rx) = f.manager.register();
        send(&f.manager, alice.id, json!({"event": "user_online", "data": user}));
        let _ = next(&mut alice_rx);
        let _ = next(&mut bob_rx);

        f.manager.unregister(alice.id);

        let frame = next(&mut bob_rx).expect("offline broadcast");
        assert_eq!(frame["event"], "user_status_change");
        assert_eq!(frame["data"]["status"], "offline");
        assert_eq!(f.manager.connection_count(), 1);
    }

    #[test]
    fn test_disconnect_keeps_user_online_while_another_tab_remains() {
        let f = fixture(8);
        let user = UserId::new();
        let (tab1, _rx1) = f.manager.register();
        let (tab2, _rx2) = f.manager.register();
        let (_observer, mut observer_rx) = f.manager.register();
        send(&f.manager, tab1.id, json!({"event": "user_online", "data": user}));
        send(&f.manager, tab2.id, json!({"event": "user_online", "data": user}));
        while next(&mut observer_rx).is_some() {}

        f.manager.unregister(tab1.id);
        assert!(next(&mut observer_rx).is_none());
    }

    #[test]
    fn test_switching_user_takes_previous_user_offline() {
        let f = fixture(8);
        let (first, second) = (UserId::new(), UserId::new());
        let (conn, _rx) = f.manager.register();
        let (_observer, mut observer_rx) = f.manager.register();
        send(&f.manager, conn.id, json!({"event": "user_online", "data": first}));
        while next(&mut observer_rx).is_some() {}

        send(&f.manager, conn.id, json!({"event": "user_online", "data": second}));

        let offline = next(&mut observer_rx).expect("offline for previous user");
        assert_eq!(offline["data"]["userId"], json!(first));
        assert_eq!(offline["data"]["status"], "offline");
        let online = next(&mut observer_rx).expect("online for new user");
        assert_eq!(online["data"]["userId"], json!(second));
        assert_eq!(f.presence.status(first), PresenceStatus::Offline);
        assert_eq!(f.presence.status(second), PresenceStatus::Online);
    }

    #[test]
    fn test_switching_user_keeps_previous_online_on_other_tab() {
        let f = fixture(8);
        let (first, second) = (UserId::new(), UserId::new());
        let (tab1, _rx1) = f.manager.register();
        let (tab2, _rx2) = f.manager.register();
        send(&f.manager, tab1.id, json!({"event": "user_online", "data": first}));
        send(&f.manager, tab2.id, json!({"event": "user_online", "data": first}));

        send(&f.manager, tab1.id, json!({"event": "user_online", "data": second}));

        assert_eq!(f.presence.status(first), PresenceStatus::Online);
    }

    #[test]
    fn test_anonymous_disconnect_is_silent() {
        let f = fixture(8);
        let (anon, _rx) = f.manager.register();
        let (_bob, mut bob_rx) = f.manager.register();
        f.manager.unregister(anon.id);
        assert!(next(&mut bob_rx).is_none());
    }

    #[test]
    fn test_call_reaches_target_user_room() {
        let f = fixture(8);
        let callee = UserId::new();
        let (caller, mut caller_rx) = f.manager.register();
        let (phone, mut phone_rx) = f.manager.register();
        let (laptop, mut laptop_rx) = f.manager.register();
        send(&f.manager, phone.id, json!({"event": "join_user_room", "data": callee}));
        send(&f.manager, laptop.id, json!({"event": "join_user_room", "data": callee}));

        let caller_snapshot = ActorSnapshot::new(UserId::new(), "Caller");
        send(
            &f.manager,
            caller.id,
            json!({
                "event": "initiate_call",
                "data": {
                    "targetUserId": callee,
                    "caller": caller_snapshot,
                    "callType": "video"
                }
            }),
        );

        for rx in [&mut phone_rx, &mut laptop_rx] {
            let frame = next(rx).expect("incoming call");
            assert_eq!(frame["event"], "incoming_call");
            assert_eq!(frame["data"]["callType"], "video");
        }
        assert!(next(&mut caller_rx).is_none());
    }

    #[test]
    fn test_webrtc_signal_is_forwarded_verbatim() {
        let f = fixture(8);
        let target = UserId::new();
        let (sender, _sender_rx) = f.manager.register();
        let (receiver, mut receiver_rx) = f.manager.register();
        send(&f.manager, receiver.id, json!({"event": "join_user_room", "data": target}));

        let candidate = json!({"candidate": "candidate:1 1 UDP 2122 10.0.0.1 5000 typ host"});
        send(
            &f.manager,
            sender.id,
            json!({
                "event": "webrtc_ice_candidate",
                "data": {"targetUserId": target, "fromUserId": UserId::new(), "signal": candidate}
            }),
        );

        let frame = next(&mut receiver_rx).expect("ice candidate");
        assert_eq!(frame["event"], "webrtc_ice_candidate");
        assert_eq!(frame["data"]["signal"], candidate);
    }

    #[test]
    fn test_invalid_frame_gets_error_event() {
        let f = fixture(8);
        let (conn, mut rx) = f.manager.register();
        f.manager.handle_inbound(conn.id, "not json at all");

        let frame = next(&mut rx).expect("error event");
        assert_eq!(frame["event"], "error");
        assert_eq!(frame["data"]["code"], "invalid_event");
    }

    #[test]
    fn test_room_limit_is_enforced() {
        let f = fixture(1);
        let (conn, mut rx) = f.manager.register();
        send(&f.manager, conn.id, json!({"event": "join_user_room", "data": UserId::new()}));
        send(
            &f.manager,
            conn.id,
            json!({"event": "join_conversation", "data": ConversationId::new()}),
        );

        let frame = next(&mut rx).expect("limit error");
        assert_eq!(frame["data"]["code"], "max_rooms");
        assert_eq!(f.rooms.room_count_for(conn.id), 1);
    }

    #[test]
    fn test_pong_updates_last_pong() {
        let f = fixture(8);
        let (conn, _rx) = f.manager.register();
        let before = conn.last_pong();
        std::thread::sleep(std::time::Duration::from_millis(5));
        send(&f.manager, conn.id, json!({"event": "pong", "data": {"timestamp": 1}}));
        assert!(conn.last_pong() > before);
    }

    #[test]
    fn test_close_all_marks_connections_dead() {
        let f = fixture(8);
        let (a, _ra) = f.manager.register();
        let (b, _rb) = f.manager.register();
        f.manager.close_all();
        assert!(!a.is_alive());
        assert!(!b.is_alive());
        assert_eq!(f.manager.connection_count(), 0);
    }
}

//! The hub registry and broadcaster.
//!
//! The [`Hub`] owns the mapping from group keys to their current members,
//! reacts to transport lifecycle events, and fans each relayed message out
//! to the sender's group.

use std::collections::HashMap;

use huddle_protocol::{codec, ServerMessage};
use tracing::{debug, trace, warn};

use crate::client::{Client, SessionId};
use crate::event::{FramePayload, HubEvent};
use crate::group::GroupKey;

/// The session registry and broadcast engine.
///
/// The hub holds no locks of its own: the caller must serialize every
/// [`dispatch`](Hub::dispatch) call. The server keeps the hub behind a
/// mutex and delivers one event at a time.
#[derive(Debug, Default)]
pub struct Hub {
    /// Every live session, addressable or not.
    clients: HashMap<SessionId, Client>,
    /// Group members in join order. A key is present only while its member
    /// list is non-empty.
    groups: HashMap<GroupKey, Vec<SessionId>>,
}

impl Hub {
    /// Create an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle one transport lifecycle event.
    pub fn dispatch(&mut self, event: HubEvent) {
        match event {
            HubEvent::SessionStarted {
                session,
                outbound,
                path,
                ready,
            } => self.session_started(session, Client::new(outbound, path), ready),
            HubEvent::HandshakeCompleted { session } => self.try_join(session),
            HubEvent::MessageReceived { session, frame } => {
                self.message_received(session, &frame);
            }
            HubEvent::SessionEnded { session } => self.session_ended(session),
        }
    }

    fn session_started(&mut self, session: SessionId, client: Client, ready: bool) {
        debug!(session = %session, ready, "Session started");
        self.clients.insert(session, client);
        if ready {
            self.try_join(session);
        }
    }

    /// The join transition: resolve the session's group key and register it.
    ///
    /// Reachable from both an already-ready session start and a later
    /// handshake completion; the group-key check makes the second arrival a
    /// no-op, so a session is appended to its group at most once.
    fn try_join(&mut self, session: SessionId) {
        let Some(client) = self.clients.get_mut(&session) else {
            return;
        };
        if client.group_key().is_some() {
            return;
        }
        let Some(key) = client.path().and_then(GroupKey::from_path) else {
            debug!(session = %session, "Path carries no group key, session stays unaddressable");
            return;
        };
        client.set_group_key(key.clone());

        let members = self.groups.entry(key.clone()).or_default();
        members.push(session);
        let peer_count = members.len();

        debug!(session = %session, group = %key, peer_count, "Session joined group");
        client.send_json(&ServerMessage::init_connection(peer_count));
    }

    /// Relay one inbound frame to the rest of the sender's group.
    fn message_received(&mut self, session: SessionId, frame: &FramePayload) {
        let text = match frame {
            FramePayload::Text(text) => text,
            FramePayload::Binary(data) => {
                trace!(session = %session, bytes = data.len(), "Dropping unsupported binary frame");
                return;
            }
        };

        let Some(sender) = self.clients.get(&session) else {
            return;
        };
        let Some(key) = sender.group_key() else {
            debug!(session = %session, "Dropping message from session with no group yet");
            return;
        };

        let echo = match codec::echo_requested(text) {
            Ok(echo) => echo,
            Err(err) => {
                warn!(session = %session, error = %err, "Abandoning relay of malformed document");
                return;
            }
        };

        // A group missing here means zero recipients, never an error.
        let Some(members) = self.groups.get(key) else {
            return;
        };

        let mut recipients = 0usize;
        for member in members {
            if *member == session && !echo {
                continue;
            }
            if let Some(peer) = self.clients.get(member) {
                peer.send_raw(text.as_str());
                recipients += 1;
            }
        }
        trace!(session = %session, group = %key, recipients, "Relayed message");
    }

    /// The leave transition: drop the session and prune its group.
    fn session_ended(&mut self, session: SessionId) {
        let Some(client) = self.clients.remove(&session) else {
            return;
        };
        let Some(key) = client.group_key() else {
            debug!(session = %session, "Session ended before joining any group");
            return;
        };

        if let Some(members) = self.groups.get_mut(key) {
            members.retain(|member| *member != session);
            if members.is_empty() {
                self.groups.remove(key);
                debug!(group = %key, "Removed empty group");
            }
        }
        debug!(session = %session, group = %key, "Session left group");
    }

    /// Whether a group currently has any members.
    #[must_use]
    pub fn group_exists(&self, key: &GroupKey) -> bool {
        self.groups.contains_key(key)
    }

    /// Number of members currently in a group.
    #[must_use]
    pub fn member_count(&self, key: &GroupKey) -> usize {
        self.groups.get(key).map(Vec::len).unwrap_or(0)
    }

    /// Hub statistics.
    #[must_use]
    pub fn stats(&self) -> HubStats {
        HubStats {
            group_count: self.groups.len(),
            connection_count: self.clients.len(),
            total_members: self.groups.values().map(Vec::len).sum(),
        }
    }
}

/// Hub statistics.
#[derive(Debug, Clone)]
pub struct HubStats {
    /// Number of non-empty groups.
    pub group_count: usize,
    /// Number of live sessions, addressable or not.
    pub connection_count: usize,
    /// Total group memberships.
    pub total_members: usize,
}

//! Per-connection state for the huddle hub.
//!
//! A [`Client`] wraps one transport session: the handle used to push text
//! frames back to the peer, the request path observed at session start, and
//! the group identity slot that is filled in once the connection becomes
//! addressable.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::group::GroupKey;

/// Counter backing [`SessionId::next`].
static SESSION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Process-unique identifier for one transport session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    /// Mint the next session identifier.
    #[must_use]
    pub fn next() -> Self {
        Self(SESSION_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sess_{:x}", self.0)
    }
}

/// One client's channel into the hub.
#[derive(Debug)]
pub struct Client {
    /// Outbound text frames; the transport task drains these to the peer.
    outbound: UnboundedSender<String>,
    /// Request path observed when the session started.
    path: Option<String>,
    /// Group identity, absent until the join transition assigns it.
    group: Option<GroupKey>,
}

impl Client {
    /// Wrap a transport session.
    #[must_use]
    pub fn new(outbound: UnboundedSender<String>, path: Option<String>) -> Self {
        Self {
            outbound,
            path,
            group: None,
        }
    }

    /// Request path observed at session start, if any.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Group identity, once the connection is addressable.
    #[must_use]
    pub fn group_key(&self) -> Option<&GroupKey> {
        self.group.as_ref()
    }

    /// Assign the group identity.
    ///
    /// Called at most once per connection; the hub's join guard keeps a
    /// second assignment from ever being reached.
    pub fn set_group_key(&mut self, key: GroupKey) {
        debug_assert!(self.group.is_none(), "group key assigned twice");
        self.group = Some(key);
    }

    /// Serialize `value` to JSON and send it as a text frame.
    ///
    /// Sends are fire-and-forget; a failed transport is the transport
    /// layer's concern, not the hub's.
    pub fn send_json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string(value) {
            Ok(text) => self.send_raw(text),
            Err(err) => warn!(error = %err, "Failed to serialize outbound message"),
        }
    }

    /// Send an already-encoded text payload verbatim.
    ///
    /// Used to relay a sender's original document unchanged, preserving its
    /// field order and formatting.
    pub fn send_raw(&self, text: impl Into<String>) {
        if self.outbound.send(text.into()).is_err() {
            debug!("Dropped outbound frame for closed session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_session_ids_are_unique() {
        let a = SessionId::next();
        let b = SessionId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_group_key_slot() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut client = Client::new(tx, Some("/hub/room1".to_string()));

        assert_eq!(client.path(), Some("/hub/room1"));
        assert!(client.group_key().is_none());

        client.set_group_key(GroupKey::from("room1"));
        assert_eq!(client.group_key(), Some(&GroupKey::from("room1")));
    }

    #[test]
    fn test_send_raw_is_verbatim() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let client = Client::new(tx, None);

        client.send_raw(r#"{ "b": 2,  "a": 1 }"#);
        assert_eq!(rx.try_recv().unwrap(), r#"{ "b": 2,  "a": 1 }"#);
    }

    #[test]
    fn test_send_json_encodes() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let client = Client::new(tx, None);

        client.send_json(&serde_json::json!({"type": "init-connection", "peerCount": 1}));
        assert_eq!(
            rx.try_recv().unwrap(),
            r#"{"peerCount":1,"type":"init-connection"}"#
        );
    }

    #[test]
    fn test_send_to_closed_transport_is_ignored() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        let client = Client::new(tx, None);
        client.send_raw("lost");
    }
}

//! Transport lifecycle events consumed by the hub.
//!
//! The transport layer reports each connection's lifecycle as a tagged
//! event; [`Hub::dispatch`](crate::hub::Hub::dispatch) handles every variant
//! exhaustively.

use bytes::Bytes;
use tokio::sync::mpsc::UnboundedSender;

use crate::client::SessionId;

/// One inbound frame, as the transport saw it.
#[derive(Debug, Clone)]
pub enum FramePayload {
    /// A text frame carrying a JSON document.
    Text(String),
    /// A binary frame. The hub protocol does not use these.
    Binary(Bytes),
}

/// A lifecycle event for one transport session.
#[derive(Debug)]
pub enum HubEvent {
    /// A new transport session exists.
    SessionStarted {
        session: SessionId,
        /// Handle for pushing text frames back to the peer.
        outbound: UnboundedSender<String>,
        /// Request path of the upgrade, used to derive the group key.
        path: Option<String>,
        /// Whether the handshake had already completed when the session was
        /// reported. If so, the join transition runs immediately instead of
        /// waiting for [`HubEvent::HandshakeCompleted`].
        ready: bool,
    },
    /// The connection upgrade handshake finished.
    HandshakeCompleted { session: SessionId },
    /// The peer sent a frame.
    MessageReceived {
        session: SessionId,
        frame: FramePayload,
    },
    /// The transport session is gone. The transport layer must deliver this
    /// exactly once per connection.
    SessionEnded { session: SessionId },
}

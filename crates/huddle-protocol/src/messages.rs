//! Message shapes for the huddle wire protocol.

use serde::{Deserialize, Serialize};

/// A message originated by the hub itself.
///
/// Hub-originated messages carry a `"type"` tag; client documents never
/// pass through this type because relaying forwards the sender's original
/// text, not a re-serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Sent to a connection right after it is registered in a group.
    #[serde(rename = "init-connection")]
    InitConnection {
        /// Number of group members after the joiner was appended,
        /// including the joiner itself.
        #[serde(rename = "peerCount")]
        peer_count: usize,
    },
}

impl ServerMessage {
    /// Create a new `init-connection` message.
    #[must_use]
    pub fn init_connection(peer_count: usize) -> Self {
        ServerMessage::InitConnection { peer_count }
    }
}

/// The hub-recognized portion of a relayed client document.
///
/// Every other field passes through unexamined and unmodified.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RelayEnvelope {
    /// When true, the sender also receives its own message back.
    #[serde(rename = "server-echo", default)]
    pub server_echo: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_connection_roundtrip() {
        let message = ServerMessage::init_connection(3);
        let text = serde_json::to_string(&message).unwrap();
        let decoded: ServerMessage = serde_json::from_str(&text).unwrap();
        assert_eq!(message, decoded);
    }

    #[test]
    fn test_envelope_defaults_to_no_echo() {
        let envelope: RelayEnvelope = serde_json::from_str(r#"{"x":1}"#).unwrap();
        assert!(!envelope.server_echo);
    }

    #[test]
    fn test_envelope_ignores_unknown_fields() {
        let envelope: RelayEnvelope =
            serde_json::from_str(r#"{"a":[1,2],"b":{"c":null},"server-echo":true}"#).unwrap();
        assert!(envelope.server_echo);
    }
}

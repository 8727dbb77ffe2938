//! Encoding and decoding of huddle wire messages.

use thiserror::Error;

use crate::messages::{RelayEnvelope, ServerMessage};

/// Protocol errors that can occur during encoding/decoding.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The document is not valid JSON, or a recognized field carries the
    /// wrong type.
    #[error("Malformed document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Encode a hub-originated message to its JSON text form.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(message: &ServerMessage) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(message)?)
}

/// Decode the hub-recognized envelope from a relayed client document.
///
/// # Errors
///
/// Returns an error if the document is malformed. A present but non-boolean
/// `"server-echo"` field counts as malformed.
pub fn decode_envelope(text: &str) -> Result<RelayEnvelope, ProtocolError> {
    Ok(serde_json::from_str(text)?)
}

/// Whether a relayed document asks to be echoed back to its sender.
///
/// # Errors
///
/// Returns an error if the document is malformed; the caller abandons the
/// relay of that message only.
pub fn echo_requested(text: &str) -> Result<bool, ProtocolError> {
    Ok(decode_envelope(text)?.server_echo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_init_connection_shape() {
        let text = encode(&ServerMessage::init_connection(2)).unwrap();
        assert_eq!(text, r#"{"type":"init-connection","peerCount":2}"#);
    }

    #[test]
    fn test_echo_defaults_to_false() {
        assert!(!echo_requested(r#"{"x":1}"#).unwrap());
    }

    #[test]
    fn test_echo_flag_true() {
        assert!(echo_requested(r#"{"x":2,"server-echo":true}"#).unwrap());
    }

    #[test]
    fn test_echo_flag_false() {
        assert!(!echo_requested(r#"{"server-echo":false}"#).unwrap());
    }

    #[test]
    fn test_malformed_document() {
        assert!(echo_requested("not json").is_err());
    }

    #[test]
    fn test_malformed_flag_is_an_error() {
        assert!(echo_requested(r#"{"server-echo":"yes"}"#).is_err());
    }
}

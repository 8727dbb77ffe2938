//! # huddle-protocol
//!
//! Wire protocol definitions for the huddle relay hub.
//!
//! Everything on the wire is a JSON text frame. The hub itself only ever
//! originates one message shape (`init-connection`); client documents are
//! opaque and are relayed verbatim, except for the single recognized
//! `"server-echo"` flag that controls self-delivery.
//!
//! ## Example
//!
//! ```rust
//! use huddle_protocol::{codec, ServerMessage};
//!
//! let text = codec::encode(&ServerMessage::init_connection(2)).unwrap();
//! assert_eq!(text, r#"{"type":"init-connection","peerCount":2}"#);
//!
//! assert!(codec::echo_requested(r#"{"x":1,"server-echo":true}"#).unwrap());
//! ```

pub mod codec;
pub mod messages;

pub use codec::{decode_envelope, echo_requested, encode, ProtocolError};
pub use messages::{RelayEnvelope, ServerMessage};

//! # huddle-core
//!
//! Session registry and broadcast engine for the huddle relay hub.
//!
//! This crate provides the fundamental building blocks:
//!
//! - **GroupKey** - Path-derived identity of one broadcast group
//! - **Client** - Wrapper binding a transport session to its group slot
//! - **Hub** - Registry mapping groups to members, with relay fan-out
//! - **HubEvent** - Tagged transport lifecycle events the hub consumes
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   HubEvent   ┌───────────┐   send_raw   ┌───────────┐
//! │ Transport │─────────────▶│    Hub    │─────────────▶│  Client   │
//! └───────────┘              └───────────┘              └───────────┘
//! ```
//!
//! The hub has no internal locking: the caller serializes every
//! [`Hub::dispatch`](hub::Hub::dispatch) call, one event at a time.

pub mod client;
pub mod event;
pub mod group;
pub mod hub;

pub use client::{Client, SessionId};
pub use event::{FramePayload, HubEvent};
pub use group::{GroupKey, HUB_PATH_PREFIX};
pub use hub::{Hub, HubStats};

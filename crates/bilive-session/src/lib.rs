//! Chat session driver for bilive.
//!
//! This crate handles the lifecycle of one chat connection:
//!
//! 1. **Credentials**: resolving a room id and token ([`TokenProvider`])
//! 2. **Authentication**: sending the auth frame built from a
//!    [`SessionConfig`]
//! 3. **Keep-alive**: a cancellable heartbeat task on a
//!    [`TickScheduler`](bilive_tick::TickScheduler)
//! 4. **Delivery**: turning received chunks into decoded
//!    [`Body`](bilive_protocol::Body) values, paced by the consumer
//!    ([`Session::next_body`], [`Session::into_stream`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Client facade (above)  ← connects and configures sessions
//!     ↕
//! Session Layer (this crate)  ← auth, heartbeat, frame delivery
//!     ↕
//! Protocol Layer (below)  ← frame codec, Body / Message types
//! Transport Layer (below) ← Connection trait, WebSocket
//! ```

mod config;
mod error;
mod session;
mod token;

pub use config::{SessionConfig, DEFAULT_ENDPOINT};
pub use error::SessionError;
pub use session::{Session, SessionState};
pub use token::{RoomCredentials, StaticCredentials, TokenProvider};

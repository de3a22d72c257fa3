//! Wire protocol for the bilibili live chat service.
//!
//! This crate turns the bytes of a chat connection into typed values and
//! back:
//!
//! - **Frames** ([`Frame`], [`debatch`]): the 16-byte big-endian header,
//!   body decompression, and splitting compressed batches into their
//!   nested frames.
//! - **Registries** ([`Protocol`], [`Operation`], [`Command`]): the closed
//!   sets of compression tags, opcodes and event names.
//! - **Bodies** ([`Body`], [`Message`]): what a frame means once its
//!   operation and `cmd` are known, including the shared entities
//!   ([`User`], [`Medal`], [`UserLevel`]).
//! - **Errors** ([`ProtocolError`]): what can go wrong, classified by
//!   whether a session can survive it.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw chunks) and session
//! (authentication, heartbeat). It has no I/O; everything here is a pure
//! function of its input and a [`JsonConfig`].
//!
//! ```text
//! Transport (chunk) → debatch → Frame → Body::decode → Body / Message
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod body;
mod command;
mod compression;
mod error;
pub mod frame;
mod json;
mod message;
mod operation;
mod value;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use body::{heartbeat_frame, AuthCode, Authentication, Body, CLIENT_VERSION};
pub use command::Command;
pub use compression::{Brotli, Compression, Identity, Protocol, Zlib};
pub use error::ProtocolError;
pub use frame::{debatch, Frame};
pub use json::{FieldError, JsonConfig};
pub use message::{
    CoinType, Danmu, GuardBuy, InteractKind, InteractWord, Live, Message, OnlineRankCount,
    Preparing, RoomStats, SendGift, SuperChat, SuperChatBackground, SuperChatDelete,
};
pub use operation::Operation;
pub use value::{Color, GuardType, Medal, Timestamp, User, UserLevel};

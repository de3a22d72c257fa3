//! # bilive
//!
//! Client for the Bilibili live chat ("danmaku") protocol.
//!
//! bilive joins a live room over WebSocket, authenticates, keeps the
//! connection alive with heartbeats, and turns the server's pushes into
//! typed events: chat messages, gifts, super chats, guard purchases and
//! room status changes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bilive::prelude::*;
//!
//! # async fn run() -> Result<(), BiliveError> {
//! let mut session = BiliveClient::builder().room(5_050).connect().await?;
//!
//! while let Some(body) = session.next_body().await {
//!     match body {
//!         Ok(Body::Message(Message::Danmu(danmu))) => {
//!             println!("{}: {}", danmu.sender.name, danmu.content);
//!         }
//!         Ok(_) => {}
//!         Err(e) if e.is_fatal() => return Err(e.into()),
//!         Err(e) => eprintln!("skipped: {e}"),
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Layers
//!
//! | Crate              | Provides                                          |
//! |--------------------|---------------------------------------------------|
//! | `bilive-transport` | [`Connection`](bilive_transport::Connection), WebSocket client |
//! | `bilive-protocol`  | Frame codec, compression, [`Body`], [`Message`]   |
//! | `bilive-tick`      | Heartbeat scheduler                               |
//! | `bilive-session`   | [`Session`], [`SessionConfig`], [`TokenProvider`] |

mod client;
mod error;
pub mod logging;

pub use client::{BiliveClient, BiliveClientBuilder};
pub use error::BiliveError;

pub use bilive_protocol as protocol;
pub use bilive_session as session;
pub use bilive_tick as tick;
pub use bilive_transport as transport;

pub use bilive_protocol::{Body, Message};
pub use bilive_session::{Session, SessionConfig, TokenProvider};

/// Everything needed to join a room and handle its events.
pub mod prelude {
    pub use crate::{BiliveClient, BiliveClientBuilder, BiliveError};
    pub use bilive_protocol::{
        AuthCode, Body, Color, Command, CoinType, Danmu, GuardBuy, GuardType, InteractKind,
        InteractWord, JsonConfig, Live, Medal, Message, OnlineRankCount, Preparing, Protocol,
        RoomStats, SendGift, SuperChat, SuperChatDelete, User, UserLevel,
    };
    pub use bilive_session::{
        RoomCredentials, Session, SessionConfig, SessionError, SessionState, StaticCredentials,
        TokenProvider,
    };
}

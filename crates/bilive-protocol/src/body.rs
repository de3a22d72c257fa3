//! Frame bodies: what a frame means once its operation is known.

use std::borrow::Cow;

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

use crate::{Frame, JsonConfig, Message, Operation, Protocol, ProtocolError};

/// Client version string the web player reports.
pub const CLIENT_VERSION: &str = "2.0.11";

/// The first frame a client sends: which room to join and as whom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Authentication {
    #[serde(rename = "clientver")]
    pub client_version: String,
    /// Viewer uid, `0` for anonymous.
    pub uid: u64,
    #[serde(rename = "roomid")]
    pub room_id: u64,
    /// Compression the server should use for pushes.
    #[serde(rename = "protover")]
    pub protocol_version: Protocol,
    pub platform: String,
    #[serde(rename = "type")]
    pub auth_type: u32,
    /// Token issued for this room, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl Authentication {
    /// Anonymous web-client authentication for `room_id`.
    pub fn new(room_id: u64) -> Self {
        Self {
            client_version: CLIENT_VERSION.to_owned(),
            uid: 0,
            room_id,
            protocol_version: Protocol::Brotli,
            platform: "web".to_owned(),
            auth_type: 2,
            key: None,
        }
    }

    /// The outbound `AUTH` frame, always sent as plain text.
    pub fn to_frame(&self) -> Result<Frame, ProtocolError> {
        let json = serde_json::to_vec(self)?;
        Ok(Frame::new(Protocol::PlainText, Operation::Auth, json))
    }
}

/// Result code of an [`AUTH_REPLY`](Operation::AuthReply).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthCode {
    Success,
    TokenError,
}

impl AuthCode {
    /// # Errors
    /// [`ProtocolError::InvalidValue`] for codes other than `0` and `-101`.
    pub fn from_code(code: i64) -> Result<Self, ProtocolError> {
        match code {
            0 => Ok(Self::Success),
            -101 => Ok(Self::TokenError),
            other => Err(ProtocolError::InvalidValue {
                kind: "auth reply code",
                value: other.to_string(),
            }),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Success => 0,
            Self::TokenError => -101,
        }
    }
}

/// The interpreted body of one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Outbound only.
    Authentication(Authentication),
    AuthenticationReply(AuthCode),
    /// Outbound only, empty.
    Heartbeat,
    HeartbeatReply { popularity: u32 },
    Message(Message),
    /// Anything not decoded into a typed variant, as received.
    Unknown(Bytes),
}

impl Body {
    /// Interprets a decompressed frame.
    ///
    /// # Errors
    /// [`ProtocolError::InvalidValue`] when a recognised payload carries
    /// an out-of-domain enum value. Shape problems yield [`Body::Unknown`].
    pub fn decode(frame: &Frame, config: &JsonConfig) -> Result<Self, ProtocolError> {
        let body = &frame.body;
        match frame.operation {
            Operation::HeartbeatReply => Ok(match body.first_chunk::<4>() {
                Some(bytes) => Body::HeartbeatReply {
                    popularity: u32::from_be_bytes(*bytes),
                },
                None => Body::Unknown(body.clone()),
            }),
            Operation::AuthReply => Self::decode_auth_reply(body, config),
            Operation::SendMsgReply => Ok(match Message::decode(body, config)? {
                Some(message) => Body::Message(message),
                None => Body::Unknown(body.clone()),
            }),
            Operation::Heartbeat if body.is_empty() => Ok(Body::Heartbeat),
            _ => Ok(Body::Unknown(body.clone())),
        }
    }

    fn decode_auth_reply(body: &Bytes, config: &JsonConfig) -> Result<Self, ProtocolError> {
        let Ok(value) = serde_json::from_slice::<Value>(body) else {
            return Ok(Body::Unknown(body.clone()));
        };
        match config.root(&value).get("code").and_then(|n| n.i64()) {
            Ok(code) => AuthCode::from_code(code).map(Body::AuthenticationReply),
            Err(_) => Ok(Body::Unknown(body.clone())),
        }
    }

    /// The frame that carries this body to the server.
    ///
    /// # Errors
    /// [`ProtocolError::NotSendable`] for server-to-client bodies.
    pub fn to_frame(&self) -> Result<Frame, ProtocolError> {
        match self {
            Body::Authentication(auth) => auth.to_frame(),
            Body::Heartbeat => Ok(heartbeat_frame()),
            Body::AuthenticationReply(_) => Err(ProtocolError::NotSendable("authentication reply")),
            Body::HeartbeatReply { .. } => Err(ProtocolError::NotSendable("heartbeat reply")),
            Body::Message(_) => Err(ProtocolError::NotSendable("message")),
            Body::Unknown(_) => Err(ProtocolError::NotSendable("unknown body")),
        }
    }

    /// Raw bytes of an [`Unknown`](Body::Unknown) body.
    pub fn raw(&self) -> Option<&Bytes> {
        match self {
            Body::Unknown(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// An [`Unknown`](Body::Unknown) body as (lossy) UTF-8 text.
    pub fn raw_text(&self) -> Option<Cow<'_, str>> {
        self.raw().map(|bytes| String::from_utf8_lossy(bytes))
    }

    /// An [`Unknown`](Body::Unknown) body parsed as JSON, if it is JSON.
    pub fn raw_json(&self) -> Option<Value> {
        self.raw().and_then(|bytes| serde_json::from_slice(bytes).ok())
    }
}

/// The empty keep-alive frame.
pub fn heartbeat_frame() -> Frame {
    Frame::new(Protocol::PlainText, Operation::Heartbeat, Bytes::new())
}

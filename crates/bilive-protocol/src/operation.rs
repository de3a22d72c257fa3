//! Operation registry: the closed opcode space of the frame header.

use std::fmt;

use crate::ProtocolError;

/// What a frame means, independent of its payload.
///
/// The wire value is the ordinal. Only [`HeartbeatReply`],
/// [`SendMsgReply`] and [`AuthReply`] carry payloads this client
/// interprets; everything else is passed through opaque.
///
/// [`HeartbeatReply`]: Operation::HeartbeatReply
/// [`SendMsgReply`]: Operation::SendMsgReply
/// [`AuthReply`]: Operation::AuthReply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Handshake,
    HandshakeReply,
    /// Client keep-alive, empty body.
    Heartbeat,
    /// Server answer to a heartbeat: 4-byte popularity count.
    HeartbeatReply,
    SendMsg,
    /// Server push of one JSON event (or a compressed batch of frames).
    SendMsgReply,
    DisconnectReply,
    /// First client frame: room id and credentials.
    Auth,
    /// Server answer to [`Auth`](Operation::Auth): `{"code": 0}`.
    AuthReply,
    Raw,
    ProtoReady,
    ProtoFinish,
    ChangeRoom,
    ChangeRoomReply,
    Register,
    RegisterReply,
    Unregister,
    UnregisterReply,
}

impl Operation {
    /// Every operation, indexed by wire value.
    pub const ALL: [Operation; 18] = [
        Operation::Handshake,
        Operation::HandshakeReply,
        Operation::Heartbeat,
        Operation::HeartbeatReply,
        Operation::SendMsg,
        Operation::SendMsgReply,
        Operation::DisconnectReply,
        Operation::Auth,
        Operation::AuthReply,
        Operation::Raw,
        Operation::ProtoReady,
        Operation::ProtoFinish,
        Operation::ChangeRoom,
        Operation::ChangeRoomReply,
        Operation::Register,
        Operation::RegisterReply,
        Operation::Unregister,
        Operation::UnregisterReply,
    ];

    /// Looks up an operation by wire value.
    ///
    /// # Errors
    /// [`ProtocolError::UnknownOperation`] outside `0..=17`.
    pub fn from_u32(code: u32) -> Result<Self, ProtocolError> {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(ProtocolError::UnknownOperation(code))
    }

    /// The wire value of this operation.
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    /// Upper-case protocol name, as used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Handshake => "HANDSHAKE",
            Self::HandshakeReply => "HANDSHAKE_REPLY",
            Self::Heartbeat => "HEARTBEAT",
            Self::HeartbeatReply => "HEARTBEAT_REPLY",
            Self::SendMsg => "SEND_MSG",
            Self::SendMsgReply => "SEND_MSG_REPLY",
            Self::DisconnectReply => "DISCONNECT_REPLY",
            Self::Auth => "AUTH",
            Self::AuthReply => "AUTH_REPLY",
            Self::Raw => "RAW",
            Self::ProtoReady => "PROTO_READY",
            Self::ProtoFinish => "PROTO_FINISH",
            Self::ChangeRoom => "CHANGE_ROOM",
            Self::ChangeRoomReply => "CHANGE_ROOM_REPLY",
            Self::Register => "REGISTER",
            Self::RegisterReply => "REGISTER_REPLY",
            Self::Unregister => "UNREGISTER",
            Self::UnregisterReply => "UNREGISTER_REPLY",
        }
    }
}

impl TryFrom<u32> for Operation {
    type Error = ProtocolError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Self::from_u32(code)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//! Error types for the protocol layer.
//!
//! Errors fall into classes with different consequences for a session:
//!
//! - **Transport-fatal**: the frame header itself cannot be understood
//!   ([`MalformedHeader`](ProtocolError::MalformedHeader),
//!   [`UnknownOperation`](ProtocolError::UnknownOperation),
//!   [`UnknownProtocol`](ProtocolError::UnknownProtocol), ...). Client and
//!   server disagree on the protocol revision and the session should end.
//! - **Frame-local**: a body failed to decompress. Never surfaced from
//!   frame decoding; the raw bytes are kept instead.
//! - **Data-invalid**: a recognised payload carried an enum value outside
//!   its documented domain ([`InvalidValue`](ProtocolError::InvalidValue)).
//!   Only that one message fails.
//!
//! Payload-shape problems (bad JSON, unknown `cmd`, missing fields) are
//! not errors at all: they decode to [`Body::Unknown`](crate::Body::Unknown).

use crate::Protocol;

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Fewer than 16 bytes were available for a frame header.
    #[error("malformed header: need 16 bytes, got {received}")]
    MalformedHeader { received: usize },

    /// The header declared a total length smaller than its own header.
    #[error("invalid frame length: total {total} < header {header}")]
    InvalidLength { total: u32, header: u16 },

    /// The header declared more body bytes than the buffer holds.
    #[error("truncated frame: body declares {declared} bytes, {available} available")]
    Truncated { declared: usize, available: usize },

    /// The protocol (compression) tag is not one this client understands.
    #[error("unknown protocol version {0}")]
    UnknownProtocol(u16),

    /// The operation code is outside the closed opcode space.
    #[error("unknown operation {0}")]
    UnknownOperation(u32),

    /// A compressed body could not be decoded.
    #[error("{protocol} decode failed: {source}")]
    DecodeFailed {
        protocol: Protocol,
        #[source]
        source: std::io::Error,
    },

    /// A body could not be compressed.
    #[error("{protocol} encode failed: {source}")]
    EncodeFailed {
        protocol: Protocol,
        #[source]
        source: std::io::Error,
    },

    /// An encoded frame would not fit the 32-bit length field.
    #[error("frame of {size} bytes exceeds the u32 length field")]
    TooLarge { size: usize },

    /// The body is inbound-only and has no outbound frame form.
    #[error("{0} cannot be sent")]
    NotSendable(&'static str),

    /// JSON serialization or parsing of a control payload failed.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// A recognised payload carried a value outside its documented domain.
    #[error("invalid {kind} value: {value}")]
    InvalidValue { kind: &'static str, value: String },
}

impl ProtocolError {
    /// Whether this error means the session can no longer continue.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MalformedHeader { .. }
                | Self::InvalidLength { .. }
                | Self::Truncated { .. }
                | Self::UnknownProtocol(_)
                | Self::UnknownOperation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_errors_are_fatal() {
        assert!(ProtocolError::MalformedHeader { received: 3 }.is_fatal());
        assert!(ProtocolError::UnknownOperation(99).is_fatal());
        assert!(ProtocolError::UnknownProtocol(7).is_fatal());
        assert!(
            ProtocolError::Truncated {
                declared: 10,
                available: 2
            }
            .is_fatal()
        );
    }

    #[test]
    fn test_payload_errors_are_not_fatal() {
        let err = ProtocolError::InvalidValue {
            kind: "guard type",
            value: "9".into(),
        };
        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "invalid guard type value: 9");

        let err = ProtocolError::DecodeFailed {
            protocol: Protocol::Deflate,
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, "bad"),
        };
        assert!(!err.is_fatal());
    }
}

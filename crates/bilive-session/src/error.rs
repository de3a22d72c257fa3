//! Error types for the session layer.

use bilive_protocol::ProtocolError;
use bilive_transport::TransportError;

/// Errors that can occur while running a chat session.
///
/// Whether the session survives an error is decided by
/// [`is_fatal`](SessionError::is_fatal): fatal errors are yielded once
/// and then the session ends.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The channel failed to send or receive.
    #[error("transport: {0}")]
    Transport(#[from] TransportError),

    /// A frame or payload could not be decoded.
    #[error("protocol: {0}")]
    Protocol(#[from] ProtocolError),

    /// A [`TokenProvider`](crate::TokenProvider) could not issue
    /// credentials.
    #[error("token lookup failed: {0}")]
    Token(String),
}

impl SessionError {
    /// Whether the session can no longer continue after this error.
    ///
    /// Transport failures and header-level protocol errors are fatal; a
    /// single invalid payload is not.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Token(_) => true,
            Self::Protocol(e) => e.is_fatal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatality_follows_protocol_class() {
        let header = SessionError::from(ProtocolError::MalformedHeader { received: 2 });
        assert!(header.is_fatal());

        let payload = SessionError::from(ProtocolError::InvalidValue {
            kind: "coin type",
            value: "bronze".into(),
        });
        assert!(!payload.is_fatal());
        assert_eq!(
            payload.to_string(),
            "protocol: invalid coin type value: bronze"
        );

        let transport = SessionError::from(TransportError::ConnectionClosed("eof".into()));
        assert!(transport.is_fatal());
    }
}

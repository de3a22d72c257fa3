//! Unified error type for the bilive client.

use bilive_protocol::ProtocolError;
use bilive_session::SessionError;
use bilive_transport::TransportError;

use crate::logging::LoggingError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `bilive` facade you deal with this single error type
/// instead of importing errors from each layer. The `#[from]` attribute
/// on each variant lets `?` convert layer errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum BiliveError {
    /// Dialing, sending or receiving failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame or payload could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The session could not be started or ended abnormally.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The global subscriber could not be installed.
    #[error(transparent)]
    Logging(#[from] LoggingError),

    /// The builder was asked to connect without a room.
    #[error("no room id configured")]
    MissingRoom,
}

impl BiliveError {
    /// Whether the error ends the session it came from.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Transport(_) | Self::MissingRoom | Self::Logging(_) => true,
            Self::Protocol(e) => e.is_fatal(),
            Self::Session(e) => e.is_fatal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let bilive_err: BiliveError = err.into();
        assert!(matches!(bilive_err, BiliveError::Transport(_)));
        assert!(bilive_err.to_string().contains("gone"));
        assert!(bilive_err.is_fatal());
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidValue {
            kind: "guard type",
            value: "9".into(),
        };
        let bilive_err: BiliveError = err.into();
        assert!(matches!(bilive_err, BiliveError::Protocol(_)));
        assert!(!bilive_err.is_fatal());
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::Token("lookup refused".into());
        let bilive_err: BiliveError = err.into();
        assert!(matches!(bilive_err, BiliveError::Session(_)));
        assert_eq!(bilive_err.to_string(), "token lookup failed: lookup refused");
    }
}

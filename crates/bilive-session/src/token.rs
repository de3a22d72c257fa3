//! Room credential lookup.
//!
//! Before connecting, the web client asks an HTTP service to resolve the
//! room id a user typed (often a short vanity id) to the real room id and
//! to issue a token for the chat server. This crate does not speak HTTP;
//! it defines the [`TokenProvider`] hook instead, and callers plug in
//! whatever lookup they have.

use std::future::Future;

use crate::SessionError;

/// What a [`TokenProvider`] returns for a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomCredentials {
    /// The real room id to join.
    pub room_id: u64,
    /// Token to send as the auth `key`, if one was issued.
    pub token: Option<String>,
}

/// Resolves a room id to the credentials used to join it.
///
/// # Trait bounds
///
/// `Send + Sync + 'static` so a provider can live in a shared client and
/// be called from any task.
///
/// # Example
///
/// ```rust
/// use bilive_session::{RoomCredentials, SessionError, TokenProvider};
///
/// /// Maps one vanity id to its real room.
/// struct VanityRooms;
///
/// impl TokenProvider for VanityRooms {
///     async fn issue(&self, room_id: u64) -> Result<RoomCredentials, SessionError> {
///         let room_id = if room_id == 1 { 5_050 } else { room_id };
///         Ok(RoomCredentials { room_id, token: None })
///     }
/// }
/// ```
pub trait TokenProvider: Send + Sync + 'static {
    /// Looks up the credentials for `room_id`.
    ///
    /// # Returns
    /// - `Ok(RoomCredentials)` to join with.
    /// - `Err(SessionError::Token)` if the lookup failed.
    fn issue(
        &self,
        room_id: u64,
    ) -> impl Future<Output = Result<RoomCredentials, SessionError>> + Send;
}

/// A provider that ignores the requested room and always returns the
/// same credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticCredentials(pub RoomCredentials);

impl StaticCredentials {
    pub fn new(room_id: u64, token: Option<String>) -> Self {
        Self(RoomCredentials { room_id, token })
    }
}

impl TokenProvider for StaticCredentials {
    async fn issue(&self, room_id: u64) -> Result<RoomCredentials, SessionError> {
        tracing::debug!(
            requested = room_id,
            resolved = self.0.room_id,
            "issuing static room credentials"
        );
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_credentials_ignore_request() {
        let provider = StaticCredentials::new(5_050, Some("key".into()));
        let creds = provider.issue(1).await.unwrap();
        assert_eq!(creds.room_id, 5_050);
        assert_eq!(creds.token.as_deref(), Some("key"));
    }
}

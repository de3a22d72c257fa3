//! `BiliveClient` builder: resolve credentials, dial, authenticate.
//!
//! This is the entry point for joining a room. It ties together all the
//! layers: token lookup → transport → session.

use std::time::Duration;

use bilive_protocol::{JsonConfig, Protocol};
use bilive_session::{Session, SessionConfig, StaticCredentials, TokenProvider};
use bilive_transport::{
    Connection, Connector, TransportError, WebSocketConnection, WebSocketConnector,
};

use crate::BiliveError;

/// Entry point for connecting to a live room.
///
/// # Example
///
/// ```rust,no_run
/// use bilive::prelude::*;
///
/// # async fn run() -> Result<(), BiliveError> {
/// let mut session = BiliveClient::builder().room(5_050).connect().await?;
/// while let Some(body) = session.next_body().await {
///     println!("{:?}", body?);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BiliveClient;

impl BiliveClient {
    /// Creates a new builder.
    pub fn builder() -> BiliveClientBuilder {
        BiliveClientBuilder::new()
    }
}

/// Builder for configuring and starting a chat session.
///
/// Without a [`TokenProvider`], the room id and token set on the builder
/// are sent as-is.
pub struct BiliveClientBuilder<P = StaticCredentials> {
    config: SessionConfig,
    provider: Option<P>,
}

impl BiliveClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            provider: None,
        }
    }
}

impl Default for BiliveClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: TokenProvider> BiliveClientBuilder<P> {
    /// Sets the room to join.
    pub fn room(mut self, room_id: u64) -> Self {
        self.config.room_id = room_id;
        self
    }

    /// Sets the user id advertised in the auth frame (0 = anonymous).
    pub fn uid(mut self, uid: u64) -> Self {
        self.config = self.config.with_uid(uid);
        self
    }

    /// Sets the token sent as the auth `key`.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config = self.config.with_token(token);
        self
    }

    /// Sets the chat server URL.
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config = self.config.with_endpoint(url);
        self
    }

    pub fn heartbeat_interval(mut self, interval: Duration) -> Self {
        self.config = self.config.with_heartbeat_interval(interval);
        self
    }

    /// Delays the first heartbeat by a random amount below `jitter`.
    pub fn heartbeat_jitter(mut self, jitter: Duration) -> Self {
        self.config = self.config.with_heartbeat_jitter(jitter);
        self
    }

    /// Sets the compression the server is asked to use.
    pub fn protocol_version(mut self, protocol: Protocol) -> Self {
        self.config = self.config.with_protocol_version(protocol);
        self
    }

    pub fn json(mut self, json: JsonConfig) -> Self {
        self.config = self.config.with_json(json);
        self
    }

    /// Replaces the whole session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolves the room and token through `provider` before connecting.
    pub fn token_provider<Q: TokenProvider>(self, provider: Q) -> BiliveClientBuilder<Q> {
        BiliveClientBuilder {
            config: self.config,
            provider: Some(provider),
        }
    }

    /// Dials the configured endpoint over WebSocket and starts a session.
    ///
    /// # Errors
    /// - [`BiliveError::MissingRoom`] if no room was set (room id 0).
    /// - [`BiliveError::Session`] if the token lookup fails.
    /// - [`BiliveError::Transport`] if the endpoint cannot be reached.
    pub async fn connect(self) -> Result<Session<WebSocketConnection>, BiliveError> {
        self.connect_with(&WebSocketConnector::new()).await
    }

    /// Like [`connect`](Self::connect), over a caller-supplied connector.
    pub async fn connect_with<K>(
        self,
        connector: &K,
    ) -> Result<Session<K::Connection>, BiliveError>
    where
        K: Connector<Error = TransportError>,
        K::Connection: Connection<Error = TransportError>,
    {
        if self.config.room_id == 0 {
            return Err(BiliveError::MissingRoom);
        }
        let config = self.resolve().await?;

        tracing::info!(room_id = config.room_id, endpoint = %config.endpoint, "connecting");
        let conn = connector.connect(&config.endpoint).await?;
        let session = Session::start(conn, config).await?;
        Ok(session)
    }

    async fn resolve(self) -> Result<SessionConfig, BiliveError> {
        let Some(provider) = self.provider else {
            return Ok(self.config);
        };
        let requested = self.config.room_id;
        let credentials = provider.issue(requested).await?;
        if credentials.room_id != requested {
            tracing::debug!(requested, resolved = credentials.room_id, "room id resolved");
        }

        let mut config = self.config;
        config.room_id = credentials.room_id;
        if let Some(token) = credentials.token {
            config = config.with_token(token);
        }
        Ok(config)
    }
}

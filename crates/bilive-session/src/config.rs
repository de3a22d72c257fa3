//! Session configuration: which room to join, how to authenticate, and
//! how often to keep the connection alive.

use std::time::Duration;

use bilive_protocol::{Authentication, JsonConfig, Protocol, CLIENT_VERSION};
use bilive_tick::TickConfig;

/// Default chat endpoint of the live service.
pub const DEFAULT_ENDPOINT: &str = "wss://broadcastlv.chat.bilibili.com/sub";

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for one chat session.
///
/// Build one with [`SessionConfig::new`] and override fields with the
/// `with_*` methods. [`Session::start`](crate::Session::start) calls
/// [`validated`](Self::validated) before using it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Real (long) room id to join.
    pub room_id: u64,
    /// Viewer uid; `0` joins anonymously.
    pub uid: u64,
    /// Token issued for the room, sent as the auth `key`.
    pub token: Option<String>,
    /// Compression the server should use for pushes.
    pub protocol_version: Protocol,
    pub client_version: String,
    pub platform: String,
    pub auth_type: u32,
    /// Time between heartbeats. Default: 30 seconds.
    pub heartbeat_interval: Duration,
    /// Upper bound of a random delay before the first heartbeat, so many
    /// sessions opened together do not beat in lock-step. Default: none.
    pub heartbeat_jitter: Duration,
    /// WebSocket URL to connect to.
    pub endpoint: String,
    /// Payload decoding rules.
    pub json: JsonConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            room_id: 0,
            uid: 0,
            token: None,
            protocol_version: Protocol::Brotli,
            client_version: CLIENT_VERSION.to_owned(),
            platform: "web".to_owned(),
            auth_type: 2,
            heartbeat_interval: TickConfig::HEARTBEAT_INTERVAL,
            heartbeat_jitter: Duration::ZERO,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            json: JsonConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Anonymous defaults for `room_id`.
    pub fn new(room_id: u64) -> Self {
        Self {
            room_id,
            ..Default::default()
        }
    }

    pub fn with_uid(mut self, uid: u64) -> Self {
        self.uid = uid;
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_protocol_version(mut self, protocol: Protocol) -> Self {
        self.protocol_version = protocol;
        self
    }

    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    pub fn with_heartbeat_jitter(mut self, jitter: Duration) -> Self {
        self.heartbeat_jitter = jitter;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_json(mut self, json: JsonConfig) -> Self {
        self.json = json;
        self
    }

    /// Fix values that would break the session.
    ///
    /// - `heartbeat_interval` raised to [`TickConfig::MIN_INTERVAL`].
    /// - An empty `token` is treated as no token.
    ///
    /// `protocol_version` is left as given: a plain tag asks the server
    /// for uncompressed pushes.
    pub fn validated(mut self) -> Self {
        if self.heartbeat_interval < TickConfig::MIN_INTERVAL {
            tracing::warn!(
                interval_ms = u64::try_from(self.heartbeat_interval.as_millis()).unwrap_or(u64::MAX),
                "heartbeat interval below minimum, clamping"
            );
            self.heartbeat_interval = TickConfig::MIN_INTERVAL;
        }
        if self.token.as_deref().is_some_and(str::is_empty) {
            self.token = None;
        }
        self
    }

    /// The authentication body this config sends.
    pub fn authentication(&self) -> Authentication {
        Authentication {
            client_version: self.client_version.clone(),
            uid: self.uid,
            room_id: self.room_id,
            protocol_version: self.protocol_version,
            platform: self.platform.clone(),
            auth_type: self.auth_type,
            key: self.token.clone(),
        }
    }

    /// Heartbeat schedule: first beat right after auth (plus up to
    /// `heartbeat_jitter`), then every `heartbeat_interval`.
    pub fn heartbeat(&self) -> TickConfig {
        TickConfig {
            initial_jitter: self.heartbeat_jitter,
            fire_immediately: true,
            ..TickConfig::every(self.heartbeat_interval)
        }
    }
}

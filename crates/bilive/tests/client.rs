//! Integration tests for the client builder.
//!
//! A [`MockConnector`] records the URL it is asked to dial and hands out
//! an in-memory connection whose sent frames can be inspected.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bilive::prelude::*;
use bilive::protocol::{Frame, Operation};
use bilive::transport::{Connection, ConnectionId, Connector, TransportError};

// =========================================================================
// Mock transport
// =========================================================================

#[derive(Default)]
struct Wire {
    dialed: Mutex<Vec<String>>,
    sent: Mutex<Vec<Vec<u8>>>,
}

impl Wire {
    fn auth_json(&self) -> serde_json::Value {
        let sent = self.sent.lock().unwrap();
        let frame = Frame::decode(&mut sent[0].as_slice()).unwrap();
        assert_eq!(frame.operation, Operation::Auth);
        serde_json::from_slice(&frame.body).unwrap()
    }
}

struct MockConnector {
    wire: Arc<Wire>,
    refuse: bool,
}

struct MockConnection {
    wire: Arc<Wire>,
}

impl Connector for MockConnector {
    type Connection = MockConnection;
    type Error = TransportError;

    async fn connect(&self, url: &str) -> Result<MockConnection, TransportError> {
        self.wire.dialed.lock().unwrap().push(url.to_owned());
        if self.refuse {
            return Err(TransportError::ConnectFailed(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "refused",
            )));
        }
        Ok(MockConnection {
            wire: Arc::clone(&self.wire),
        })
    }
}

impl Connection for MockConnection {
    type Error = TransportError;

    async fn send(&self, data: &[u8]) -> Result<(), TransportError> {
        self.wire.sent.lock().unwrap().push(data.to_vec());
        Ok(())
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, TransportError> {
        Ok(None)
    }

    async fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }

    fn id(&self) -> ConnectionId {
        ConnectionId::new(9)
    }
}

fn connector(refuse: bool) -> (MockConnector, Arc<Wire>) {
    let wire = Arc::new(Wire::default());
    (
        MockConnector {
            wire: Arc::clone(&wire),
            refuse,
        },
        wire,
    )
}

/// Resolves vanity id 1 to room 5050 with a fixed token.
struct VanityRooms;

impl TokenProvider for VanityRooms {
    async fn issue(&self, room_id: u64) -> Result<RoomCredentials, SessionError> {
        match room_id {
            1 => Ok(RoomCredentials {
                room_id: 5_050,
                token: Some("issued".into()),
            }),
            other => Err(SessionError::Token(format!("unknown room {other}"))),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_connect_sends_configured_auth() {
    let (connector, wire) = connector(false);

    let mut session = BiliveClient::builder()
        .room(5_050)
        .uid(42)
        .token("tok")
        .endpoint("wss://chat.example/sub")
        .heartbeat_interval(Duration::from_secs(20))
        .connect_with(&connector)
        .await
        .expect("connect should succeed");

    assert_eq!(*wire.dialed.lock().unwrap(), ["wss://chat.example/sub"]);
    let auth = wire.auth_json();
    assert_eq!(auth["roomid"], 5_050);
    assert_eq!(auth["uid"], 42);
    assert_eq!(auth["key"], "tok");
    assert_eq!(session.config().heartbeat_interval, Duration::from_secs(20));

    session.close().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_token_provider_resolves_room() {
    let (connector, wire) = connector(false);

    let session = BiliveClient::builder()
        .room(1)
        .token_provider(VanityRooms)
        .connect_with(&connector)
        .await
        .expect("connect should succeed");

    let auth = wire.auth_json();
    assert_eq!(auth["roomid"], 5_050);
    assert_eq!(auth["key"], "issued");
    assert_eq!(session.config().room_id, 5_050);
}

#[tokio::test(start_paused = true)]
async fn test_token_failure_skips_dial() {
    let (connector, wire) = connector(false);

    let result = BiliveClient::builder()
        .room(2)
        .token_provider(VanityRooms)
        .connect_with(&connector)
        .await;

    assert!(matches!(
        result,
        Err(BiliveError::Session(SessionError::Token(_)))
    ));
    assert!(wire.dialed.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_missing_room_is_rejected() {
    let (connector, _wire) = connector(false);
    let result = BiliveClient::builder().connect_with(&connector).await;
    assert!(matches!(result, Err(BiliveError::MissingRoom)));
}

#[tokio::test(start_paused = true)]
async fn test_refused_dial_is_transport_error() {
    let (connector, _wire) = connector(true);
    let result = BiliveClient::builder()
        .room(5_050)
        .connect_with(&connector)
        .await;

    let err = result.err().expect("dial should fail");
    assert!(matches!(err, BiliveError::Transport(_)));
    assert!(err.is_fatal());
}

#[tokio::test(start_paused = true)]
async fn test_server_close_ends_session() {
    let (connector, _wire) = connector(false);
    let mut session = BiliveClient::builder()
        .room(5_050)
        .connect_with(&connector)
        .await
        .unwrap();

    assert!(session.next_body().await.is_none());
    assert_eq!(session.state(), SessionState::Closed);
}

//! The session driver: one authenticated chat connection.
//!
//! A [`Session`] owns the channel and the heartbeat task. It is driven by
//! its caller: each call to [`Session::next_body`] yields one decoded
//! body, and a new transport chunk is only read once every frame of the
//! previous chunk has been handed out. A slow consumer therefore slows the
//! reader down instead of growing a buffer.
//!
//! ```text
//!            ┌──────────── heartbeat task ────────────┐
//!            │ TickScheduler ──tick──→ conn.send(hb)  │
//!            └──────────────────────┬─────────────────┘
//!                                   │ Arc<C>
//! caller ──next_body()──→ Session ──┴──→ conn.recv() ──→ debatch ──→ Body
//! ```
//!
//! Both paths share the connection through an [`Arc`]; the connection
//! itself serializes concurrent writes.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use bilive_protocol::{debatch, heartbeat_frame, AuthCode, Body, Frame};
use bilive_tick::{TickConfig, TickScheduler};
use bilive_transport::{Connection, TransportError};
use futures_util::Stream;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{SessionConfig, SessionError};

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Lifecycle of a [`Session`].
///
/// ```text
///   Open ──(close / fatal error / server close / heartbeat failure)──→ Closed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Authenticated; heartbeats running and bodies flowing.
    Open,
    /// Finished. [`Session::next_body`] returns `None`.
    Closed,
}

/// Counters shared between the reader and the heartbeat task.
#[derive(Debug, Default)]
struct SessionStats {
    heartbeats_sent: AtomicU64,
    popularity: AtomicU32,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// An authenticated chat session over connection `C`.
///
/// Dropping a session cancels its heartbeat task.
pub struct Session<C: Connection> {
    conn: Arc<C>,
    config: SessionConfig,
    /// Decoded frames of the last chunk not yet handed out.
    pending: VecDeque<Frame>,
    cancel: CancellationToken,
    heartbeat: Option<JoinHandle<()>>,
    stats: Arc<SessionStats>,
    state: SessionState,
}

impl<C> Session<C>
where
    C: Connection<Error = TransportError>,
{
    /// Authenticates on `conn` and starts the heartbeat.
    ///
    /// Sends the auth frame for `config`, then spawns the heartbeat task,
    /// whose first beat goes out immediately.
    ///
    /// # Errors
    /// [`SessionError::Transport`] if the auth frame cannot be sent.
    pub async fn start(conn: C, config: SessionConfig) -> Result<Self, SessionError> {
        let config = config.validated();
        let conn = Arc::new(conn);

        let auth = config.authentication().to_frame()?.encode()?;
        conn.send(&auth).await?;
        tracing::info!(
            conn = %conn.id(),
            room_id = config.room_id,
            uid = config.uid,
            protocol = %config.protocol_version,
            "authentication sent"
        );

        let cancel = CancellationToken::new();
        let stats = Arc::new(SessionStats::default());
        let heartbeat = tokio::spawn(run_heartbeat(
            Arc::clone(&conn),
            config.heartbeat(),
            cancel.clone(),
            Arc::clone(&stats),
        ));

        Ok(Self {
            conn,
            config,
            pending: VecDeque::new(),
            cancel,
            heartbeat: Some(heartbeat),
            stats,
            state: SessionState::Open,
        })
    }

    /// The next decoded body, or `None` once the session has ended.
    ///
    /// Non-fatal errors (an invalid value in one payload) are yielded and
    /// the session continues. A fatal error is yielded once, after which
    /// the session is closed and this returns `None`.
    ///
    /// Cancel-safe: a chunk is only taken from the connection when the
    /// receive completes.
    pub async fn next_body(&mut self) -> Option<Result<Body, SessionError>> {
        loop {
            if self.state == SessionState::Closed {
                return None;
            }
            if self.cancel.is_cancelled() {
                self.finish("session cancelled");
                return None;
            }
            if let Some(frame) = self.pending.pop_front() {
                return Some(self.decode(&frame));
            }

            let received = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                received = self.conn.recv() => Some(received),
            };

            match received {
                None => {
                    self.finish("session cancelled");
                    return None;
                }
                Some(Ok(Some(chunk))) => match debatch(&chunk) {
                    Ok(frames) => {
                        tracing::trace!(len = chunk.len(), frames = frames.len(), "chunk received");
                        self.pending.extend(frames);
                    }
                    Err(e) => {
                        tracing::error!(conn = %self.conn.id(), error = %e, "undecodable chunk");
                        self.finish("protocol error");
                        return Some(Err(e.into()));
                    }
                },
                Some(Ok(None)) => {
                    self.finish("closed by server");
                    return None;
                }
                Some(Err(e)) => {
                    tracing::error!(conn = %self.conn.id(), error = %e, "receive failed");
                    self.finish("transport error");
                    return Some(Err(e.into()));
                }
            }
        }
    }

    fn decode(&self, frame: &Frame) -> Result<Body, SessionError> {
        let body = Body::decode(frame, &self.config.json).inspect_err(|e| {
            tracing::warn!(operation = %frame.operation, error = %e, "dropping invalid payload");
        })?;
        match &body {
            Body::HeartbeatReply { popularity } => {
                self.stats.popularity.store(*popularity, Ordering::Relaxed);
                tracing::trace!(popularity, "heartbeat reply");
            }
            Body::AuthenticationReply(AuthCode::Success) => {
                tracing::info!(conn = %self.conn.id(), room_id = self.config.room_id, "joined room");
            }
            Body::AuthenticationReply(AuthCode::TokenError) => {
                tracing::warn!(conn = %self.conn.id(), room_id = self.config.room_id, "token rejected");
            }
            _ => {}
        }
        Ok(body)
    }

    /// Turns the session into a stream of bodies.
    pub fn into_stream(self) -> impl Stream<Item = Result<Body, SessionError>> + Send {
        futures_util::stream::unfold(self, |mut session| async move {
            let item = session.next_body().await?;
            Some((item, session))
        })
    }

    /// Stops the heartbeat, waits for its task to finish, and closes the
    /// connection. Idempotent.
    ///
    /// # Errors
    /// [`SessionError::Transport`] if closing an open connection fails.
    /// Close errors after the session already ended are only logged.
    pub async fn close(&mut self) -> Result<(), SessionError> {
        let Some(heartbeat) = self.heartbeat.take() else {
            return Ok(());
        };
        let was_open = self.state == SessionState::Open && !self.cancel.is_cancelled();
        self.finish("closed by caller");
        if let Err(e) = heartbeat.await {
            tracing::warn!(error = %e, "heartbeat task did not exit cleanly");
        }
        match self.conn.close().await {
            Err(e) if was_open => Err(e.into()),
            Err(e) => {
                tracing::debug!(error = %e, "closing an ended session");
                Ok(())
            }
            Ok(()) => Ok(()),
        }
    }

    fn finish(&mut self, reason: &'static str) {
        if self.state == SessionState::Closed {
            return;
        }
        self.state = SessionState::Closed;
        self.pending.clear();
        self.cancel.cancel();
        tracing::info!(
            conn = %self.conn.id(),
            room_id = self.config.room_id,
            heartbeats = self.heartbeats_sent(),
            reason,
            "session ended"
        );
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Heartbeat frames sent so far.
    pub fn heartbeats_sent(&self) -> u64 {
        self.stats.heartbeats_sent.load(Ordering::Relaxed)
    }

    /// Popularity from the most recent heartbeat reply (0 before the first).
    pub fn popularity(&self) -> u32 {
        self.stats.popularity.load(Ordering::Relaxed)
    }
}

impl<C: Connection> Drop for Session<C> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ---------------------------------------------------------------------------
// Heartbeat task
// ---------------------------------------------------------------------------

/// Sends a heartbeat on every tick until `cancel` fires.
///
/// A failed send means the channel is gone: the task cancels the session
/// and exits. A send still in flight is abandoned on cancellation.
async fn run_heartbeat<C>(
    conn: Arc<C>,
    tick: TickConfig,
    cancel: CancellationToken,
    stats: Arc<SessionStats>,
) where
    C: Connection<Error = TransportError>,
{
    let frame = match heartbeat_frame().encode() {
        Ok(frame) => frame,
        Err(e) => {
            tracing::error!(error = %e, "cannot encode heartbeat");
            cancel.cancel();
            return;
        }
    };
    let mut scheduler = TickScheduler::new(tick);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            info = scheduler.wait_for_tick() => {
                let sent = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    sent = conn.send(&frame) => sent,
                };
                if let Err(e) = sent {
                    tracing::warn!(conn = %conn.id(), error = %e, "heartbeat failed, ending session");
                    cancel.cancel();
                    break;
                }
                stats.heartbeats_sent.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(conn = %conn.id(), tick = info.tick, "heartbeat sent");
            }
        }
    }
    tracing::debug!(conn = %conn.id(), "heartbeat stopped");
}

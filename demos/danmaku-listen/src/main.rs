//! Joins a live room and logs every decoded event.
//!
//! ```text
//! danmaku-listen <room-id> [--json]
//! ```
//!
//! `BILIVE_TOKEN` and `BILIVE_UID` are sent with the auth frame when set.

use bilive::logging::{init_tracing, LogConfig, LogFormat};
use bilive::prelude::*;

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

struct Args {
    room_id: u64,
    json: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut room_id = None;
    let mut json = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            other => {
                let id = other
                    .parse()
                    .map_err(|_| format!("not a room id: {other}"))?;
                room_id = Some(id);
            }
        }
    }
    let room_id = room_id.ok_or("usage: danmaku-listen <room-id> [--json]")?;
    Ok(Args { room_id, json })
}

// ---------------------------------------------------------------------------
// Event output
// ---------------------------------------------------------------------------

fn log_body(body: &Body, json: bool) {
    match body {
        Body::Message(message) if json => match serde_json::to_string(message) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!(error = %e, "cannot serialize event"),
        },
        Body::Message(Message::Danmu(danmu)) => {
            tracing::info!(user = %danmu.sender.name, color = %danmu.color, "{}", danmu.content);
        }
        Body::Message(Message::SendGift(gift)) => {
            tracing::info!(
                user = %gift.sender.name,
                gift = %gift.gift_name,
                quantity = gift.quantity,
                "gift"
            );
        }
        Body::Message(Message::SuperChat(sc)) => {
            tracing::info!(user = %sc.sender.name, price = sc.price, "super chat: {}", sc.message);
        }
        Body::Message(other) => tracing::info!(command = %other.command(), "event"),
        Body::HeartbeatReply { popularity } => tracing::debug!(popularity, "popularity"),
        Body::AuthenticationReply(code) => tracing::info!(?code, "auth reply"),
        Body::Unknown(raw) => tracing::trace!(len = raw.len(), "unhandled payload"),
        Body::Authentication(_) | Body::Heartbeat => {}
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_args()?;
    let format = if args.json {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    init_tracing(LogConfig::default().with_format(format))?;

    let mut builder = BiliveClient::builder().room(args.room_id);
    if let Ok(token) = std::env::var("BILIVE_TOKEN") {
        builder = builder.token(token);
    }
    if let Some(uid) = std::env::var("BILIVE_UID").ok().and_then(|v| v.parse().ok()) {
        builder = builder.uid(uid);
    }
    let mut session = builder.connect().await?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
            body = session.next_body() => match body {
                Some(Ok(body)) => log_body(&body, args.json),
                Some(Err(e)) if e.is_fatal() => return Err(e.into()),
                Some(Err(e)) => tracing::warn!(error = %e, "skipped payload"),
                None => break,
            },
        }
    }

    session.close().await?;
    Ok(())
}

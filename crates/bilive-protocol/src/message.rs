//! Typed event payloads and the `cmd` dispatcher.
//!
//! [`Message::decode`] parses a `SEND_MSG_REPLY` body, resolves its `cmd`
//! through [`Command`] and runs the matching decoder. Anything the
//! dispatcher cannot turn into a typed message (invalid JSON, missing or
//! unknown `cmd`, a known command without a decoder, a field that is
//! missing or mistyped) is reported as `Ok(None)` so the caller can keep
//! the raw bytes. Only an enum value outside its domain is an error.

use serde::Serialize;
use serde_json::Value;

use crate::json::{FieldError, Node};
use crate::value::{self, Color, GuardType, Medal, Timestamp, User, UserLevel};
use crate::{Command, JsonConfig, ProtocolError};

/// One decoded server event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    Danmu(Danmu),
    SendGift(SendGift),
    SuperChat(SuperChat),
    SuperChatDelete(SuperChatDelete),
    GuardBuy(GuardBuy),
    InteractWord(InteractWord),
    Live(Live),
    Preparing(Preparing),
    RoomStats(RoomStats),
    OnlineRankCount(OnlineRankCount),
}

impl Message {
    /// Decodes a JSON event body.
    ///
    /// Returns `Ok(None)` when the body is not a decodable event.
    ///
    /// # Errors
    /// [`ProtocolError::InvalidValue`] when a recognised event carries an
    /// enum value (guard tier, coin type, interaction kind) outside its
    /// domain.
    pub fn decode(json: &[u8], config: &JsonConfig) -> Result<Option<Self>, ProtocolError> {
        let Ok(value) = serde_json::from_slice::<Value>(json) else {
            tracing::trace!(len = json.len(), "event body is not json");
            return Ok(None);
        };
        let root = config.root(&value);
        let Some(command) = command_of(&root) else {
            return Ok(None);
        };

        let decoded = match command {
            Command::DanmuMsg => decode::<Danmu>(&root).map(Message::Danmu),
            Command::SendGift => decode::<SendGift>(&root).map(Message::SendGift),
            Command::SuperChatMessage => decode::<SuperChat>(&root).map(Message::SuperChat),
            Command::SuperChatMessageDelete => {
                decode::<SuperChatDelete>(&root).map(Message::SuperChatDelete)
            }
            Command::GuardBuy => decode::<GuardBuy>(&root).map(Message::GuardBuy),
            Command::InteractWord => decode::<InteractWord>(&root).map(Message::InteractWord),
            Command::Live => decode::<Live>(&root).map(Message::Live),
            Command::Preparing => decode::<Preparing>(&root).map(Message::Preparing),
            Command::RoomRealTimeMessageUpdate => decode::<RoomStats>(&root).map(Message::RoomStats),
            Command::OnlineRankCount => {
                decode::<OnlineRankCount>(&root).map(Message::OnlineRankCount)
            }
            other => {
                tracing::trace!(command = %other, "no decoder for command");
                return Ok(None);
            }
        };

        match decoded {
            Ok(message) => Ok(Some(message)),
            Err(FieldError::OutOfRange { kind, value }) => {
                Err(ProtocolError::InvalidValue { kind, value })
            }
            Err(e) => {
                tracing::debug!(%command, error = %e, "event did not match its decoder");
                Ok(None)
            }
        }
    }

    /// The command this message was decoded from.
    pub fn command(&self) -> Command {
        match self {
            Self::Danmu(_) => Danmu::COMMAND,
            Self::SendGift(_) => SendGift::COMMAND,
            Self::SuperChat(_) => SuperChat::COMMAND,
            Self::SuperChatDelete(_) => SuperChatDelete::COMMAND,
            Self::GuardBuy(_) => GuardBuy::COMMAND,
            Self::InteractWord(_) => InteractWord::COMMAND,
            Self::Live(_) => Live::COMMAND,
            Self::Preparing(_) => Preparing::COMMAND,
            Self::RoomStats(_) => RoomStats::COMMAND,
            Self::OnlineRankCount(_) => OnlineRankCount::COMMAND,
        }
    }

    /// The viewer who caused the event, for viewer-originated events.
    pub fn sender(&self) -> Option<&User> {
        match self {
            Self::Danmu(m) => Some(&m.sender),
            Self::SendGift(m) => Some(&m.sender),
            Self::SuperChat(m) => Some(&m.sender),
            Self::GuardBuy(m) => Some(&m.sender),
            Self::InteractWord(m) => Some(&m.sender),
            Self::SuperChatDelete(_)
            | Self::Live(_)
            | Self::Preparing(_)
            | Self::RoomStats(_)
            | Self::OnlineRankCount(_) => None,
        }
    }
}

fn command_of(root: &Node<'_>) -> Option<Command> {
    let cmd = root.get("cmd").ok()?;
    Command::parse(cmd.str().ok()?, root.config())
}

/// A per-command payload decoder.
trait Decode: Sized {
    const COMMAND: Command;

    fn decode_fields(root: &Node<'_>) -> Result<Self, FieldError>;
}

/// Runs `T`'s decoder after re-checking that `cmd` names `T`.
fn decode<T: Decode>(root: &Node<'_>) -> Result<T, FieldError> {
    if command_of(root) != Some(T::COMMAND) {
        return Err(FieldError::Mismatch {
            field: "$.cmd".to_owned(),
            expected: T::COMMAND.name(),
        });
    }
    T::decode_fields(root)
}

fn user_from_object(data: &Node<'_>, id_key: &str, name_key: &str) -> Result<User, FieldError> {
    let mut user = User::new(data.get(id_key)?.u64()?, data.get(name_key)?.string()?);
    user.avatar = data.opt("face").and_then(|n| n.string().ok());
    Ok(user)
}

fn medal_at(data: &Node<'_>, key: &str) -> Result<Option<Medal>, FieldError> {
    data.opt(key)
        .map(|n| Medal::decode(&n))
        .transpose()
        .map(Option::flatten)
}

// ---------------------------------------------------------------------------
// Danmu
// ---------------------------------------------------------------------------

/// A chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Danmu {
    pub content: String,
    pub color: Color,
    pub timestamp: Timestamp,
    /// Without avatar; the compact form does not carry one.
    pub sender: User,
}

impl Decode for Danmu {
    const COMMAND: Command = Command::DanmuMsg;

    /// `info`: `[meta, text, user, medal, level, title, ...]` where
    /// `meta[3]` is the packed color and `meta[4]` the send time in ms.
    fn decode_fields(root: &Node<'_>) -> Result<Self, FieldError> {
        let info = root.get("info")?;
        let meta = info.at(0)?;
        let user = info.at(2)?;

        let mut sender = User::new(user.at(0)?.u64()?, user.at(1)?.string()?);
        sender.medal = Medal::decode(&info.at(3)?)?;
        sender.level = Some(UserLevel::decode(&info.at(4)?)?);
        sender.title = value::title(info.at(5).ok());

        Ok(Self {
            content: info.at(1)?.string()?,
            color: Color::decode(&meta.at(3)?)?,
            timestamp: value::timestamp_millis(&meta.at(4)?)?,
            sender,
        })
    }
}

// ---------------------------------------------------------------------------
// SendGift
// ---------------------------------------------------------------------------

/// Currency a gift was paid in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CoinType {
    /// Free currency.
    Silver,
    /// Paid currency.
    Gold,
}

impl CoinType {
    fn decode(node: &Node<'_>) -> Result<Self, FieldError> {
        let raw = node.str()?;
        if raw.eq_ignore_ascii_case("silver") {
            Ok(Self::Silver)
        } else if raw.eq_ignore_ascii_case("gold") {
            Ok(Self::Gold)
        } else {
            Err(FieldError::out_of_range("coin type", raw))
        }
    }
}

/// A gift sent to the streamer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendGift {
    /// Transaction id; exceeds `i32` on the live service.
    pub id: u64,
    /// Without title or level.
    pub sender: User,
    pub timestamp: Timestamp,
    pub quantity: u32,
    pub gift_id: u64,
    pub gift_name: String,
    /// Running total of a combo.
    pub total: u32,
    /// Unit price in the coin's smallest denomination.
    pub price: u64,
    pub coin_type: CoinType,
    pub first: bool,
}

impl Decode for SendGift {
    const COMMAND: Command = Command::SendGift;

    fn decode_fields(root: &Node<'_>) -> Result<Self, FieldError> {
        let data = root.get("data")?;
        let mut sender = user_from_object(&data, "uid", "uname")?;
        sender.medal = medal_at(&data, "medal_info")?;

        let quantity = data.get("num")?.u32()?;
        Ok(Self {
            id: data.get("tid")?.u64()?,
            sender,
            timestamp: value::timestamp_secs(&data.get("timestamp")?)?,
            quantity,
            gift_id: data.get("giftId")?.u64()?,
            gift_name: data.get("giftName")?.string()?,
            total: data
                .opt("super_gift_num")
                .map(|n| n.u32())
                .transpose()?
                .unwrap_or(quantity),
            price: data.get("price")?.u64()?,
            coin_type: CoinType::decode(&data.get("coin_type")?)?,
            first: data.opt("is_first").map(|n| n.bool()).transpose()?.unwrap_or(false),
        })
    }
}

// ---------------------------------------------------------------------------
// SuperChat
// ---------------------------------------------------------------------------

/// Styling of a super chat card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuperChatBackground {
    pub color: Color,
    pub bottom_color: Color,
    pub color_start: Color,
    pub color_end: Color,
    /// Image URL, not a color.
    pub image: String,
    pub price_color: Color,
}

impl SuperChatBackground {
    fn decode(data: &Node<'_>) -> Result<Self, FieldError> {
        let color = |key: &str| Color::decode(&data.get(key)?);
        Ok(Self {
            color: color("background_color")?,
            bottom_color: color("background_bottom_color")?,
            color_start: color("background_color_start")?,
            color_end: color("background_color_end")?,
            image: data.get("background_image")?.string()?,
            price_color: color("background_price_color")?,
        })
    }
}

/// A paid, pinned chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuperChat {
    pub id: u64,
    pub sender: User,
    pub message: String,
    pub color: Color,
    /// Price in CNY.
    pub price: u64,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub background: SuperChatBackground,
}

impl Decode for SuperChat {
    const COMMAND: Command = Command::SuperChatMessage;

    fn decode_fields(root: &Node<'_>) -> Result<Self, FieldError> {
        let data = root.get("data")?;
        let info = data.get("user_info")?;

        let mut sender = User::new(data.get("uid")?.u64()?, info.get("uname")?.string()?);
        sender.avatar = info.opt("face").and_then(|n| n.string().ok());
        sender.level = Some(UserLevel::decode(&info)?);
        sender.title = value::title(info.opt("title"));
        sender.medal = medal_at(&data, "medal_info")?;

        Ok(Self {
            id: data.get("id")?.u64()?,
            sender,
            message: data.get("message")?.string()?,
            color: Color::decode(&data.get("message_font_color")?)?,
            price: data.get("price")?.u64()?,
            start_time: value::timestamp_secs(&data.get("start_time")?)?,
            end_time: value::timestamp_secs(&data.get("end_time")?)?,
            background: SuperChatBackground::decode(&data)?,
        })
    }
}

/// Super chats removed by the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuperChatDelete {
    pub ids: Vec<u64>,
}

impl Decode for SuperChatDelete {
    const COMMAND: Command = Command::SuperChatMessageDelete;

    fn decode_fields(root: &Node<'_>) -> Result<Self, FieldError> {
        let ids = root
            .get("data")?
            .get("ids")?
            .items()?
            .iter()
            .map(|n| n.u64())
            .collect::<Result<_, _>>()?;
        Ok(Self { ids })
    }
}

// ---------------------------------------------------------------------------
// GuardBuy
// ---------------------------------------------------------------------------

/// A guard membership purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuardBuy {
    pub sender: User,
    pub guard_type: GuardType,
    /// Months bought.
    pub quantity: u32,
    pub price: u64,
    pub gift_id: u64,
    pub gift_name: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

impl Decode for GuardBuy {
    const COMMAND: Command = Command::GuardBuy;

    fn decode_fields(root: &Node<'_>) -> Result<Self, FieldError> {
        let data = root.get("data")?;
        Ok(Self {
            sender: user_from_object(&data, "uid", "username")?,
            guard_type: GuardType::decode(&data.get("guard_level")?)?,
            quantity: data.get("num")?.u32()?,
            price: data.get("price")?.u64()?,
            gift_id: data.get("gift_id")?.u64()?,
            gift_name: data.get("gift_name")?.string()?,
            start_time: value::timestamp_secs(&data.get("start_time")?)?,
            end_time: value::timestamp_secs(&data.get("end_time")?)?,
        })
    }
}

// ---------------------------------------------------------------------------
// InteractWord
// ---------------------------------------------------------------------------

/// What a viewer did in an [`InteractWord`] event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractKind {
    Enter,
    Follow,
    Share,
    SpecialFollow,
    MutualFollow,
}

impl InteractKind {
    fn decode(node: &Node<'_>) -> Result<Self, FieldError> {
        match node.i64()? {
            1 => Ok(Self::Enter),
            2 => Ok(Self::Follow),
            3 => Ok(Self::Share),
            4 => Ok(Self::SpecialFollow),
            5 => Ok(Self::MutualFollow),
            other => Err(FieldError::out_of_range("interact kind", other)),
        }
    }
}

/// A viewer entered, followed or shared the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractWord {
    pub sender: User,
    pub kind: InteractKind,
    pub timestamp: Timestamp,
}

impl Decode for InteractWord {
    const COMMAND: Command = Command::InteractWord;

    fn decode_fields(root: &Node<'_>) -> Result<Self, FieldError> {
        let data = root.get("data")?;
        let mut sender = user_from_object(&data, "uid", "uname")?;
        sender.medal = medal_at(&data, "fans_medal")?;
        Ok(Self {
            sender,
            kind: InteractKind::decode(&data.get("msg_type")?)?,
            timestamp: value::timestamp_secs(&data.get("timestamp")?)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Room status
// ---------------------------------------------------------------------------

/// The stream went live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Live {
    pub room_id: u64,
}

impl Decode for Live {
    const COMMAND: Command = Command::Live;

    fn decode_fields(root: &Node<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            room_id: root.get("roomid")?.u64()?,
        })
    }
}

/// The stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Preparing {
    pub room_id: u64,
}

impl Decode for Preparing {
    const COMMAND: Command = Command::Preparing;

    fn decode_fields(root: &Node<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            room_id: root.get("roomid")?.u64()?,
        })
    }
}

/// Periodic follower statistics (`ROOM_REAL_TIME_MESSAGE_UPDATE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoomStats {
    pub room_id: u64,
    pub followers: u64,
    pub fans_club: u64,
}

impl Decode for RoomStats {
    const COMMAND: Command = Command::RoomRealTimeMessageUpdate;

    fn decode_fields(root: &Node<'_>) -> Result<Self, FieldError> {
        let data = root.get("data")?;
        Ok(Self {
            room_id: data.get("roomid")?.u64()?,
            followers: data.get("fans")?.u64()?,
            fans_club: data.get("fans_club")?.u64()?,
        })
    }
}

/// Number of viewers on the online rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OnlineRankCount {
    pub count: u64,
}

impl Decode for OnlineRankCount {
    const COMMAND: Command = Command::OnlineRankCount;

    fn decode_fields(root: &Node<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            count: root.get("data")?.get("count")?.u64()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode_json(value: serde_json::Value) -> Result<Option<Message>, ProtocolError> {
        Message::decode(value.to_string().as_bytes(), &JsonConfig::default())
    }

    fn danmu_payload() -> serde_json::Value {
        json!({
            "cmd": "DANMU_MSG:4:0:2:2:2:0",
            "info": [
                [0, 1, 25, 16_777_215, 1_700_000_000_123i64, 1_948_207_328, 0, "c1a3", 0, 0, 0, ""],
                "hello world",
                [4_242, "viewer", 0, 0, 0, 10_000, 1, ""],
                [12, "欧皇", "某主播", 5_050, 6_126_494, "", 0, 6_126_494, 6_126_494, 6_126_494, 0, 1, 99],
                [21, 0, 5_805_790, ">50000", 0],
                ["title-111-1", "title-111-1"],
                0, 0, null
            ]
        })
    }

    #[test]
    fn test_danmu_fields() {
        let Some(Message::Danmu(danmu)) = decode_json(danmu_payload()).unwrap() else {
            panic!("expected danmu");
        };
        assert_eq!(danmu.content, "hello world");
        assert_eq!(danmu.color, Color::WHITE);
        assert_eq!(danmu.timestamp.timestamp_millis(), 1_700_000_000_123);
        assert_eq!(danmu.sender.id, 4_242);
        assert_eq!(danmu.sender.name, "viewer");
        assert_eq!(danmu.sender.avatar, None);
        assert_eq!(danmu.sender.title.as_deref(), Some("title-111-1"));
        assert_eq!(danmu.sender.level.as_ref().map(|l| l.level), Some(21));

        let medal = danmu.sender.medal.expect("medal present");
        assert_eq!(medal.level, 12);
        assert_eq!(medal.anchor_room, Some(5_050));
        assert_eq!(medal.anchor_id, 99);
    }

    #[test]
    fn test_unknown_and_undecoded_commands() {
        assert_eq!(decode_json(json!({"cmd": "TOTALLY_UNKNOWN_CMD"})).unwrap(), None);
        assert_eq!(
            decode_json(json!({"cmd": "COMBO_SEND", "data": {}})).unwrap(),
            None
        );
        assert_eq!(decode_json(json!({"info": []})).unwrap(), None);
        assert_eq!(
            Message::decode(b"not json at all", &JsonConfig::default()).unwrap(),
            None
        );
    }

    #[test]
    fn test_missing_field_degrades() {
        let mut payload = danmu_payload();
        payload["info"][2] = json!([]);
        assert_eq!(decode_json(payload).unwrap(), None);
    }

    #[test]
    fn test_strict_config_rejects_suffix() {
        let bytes = danmu_payload().to_string();
        assert_eq!(
            Message::decode(bytes.as_bytes(), &JsonConfig::strict()).unwrap(),
            None
        );
    }

    fn gift_payload(coin_type: &str) -> serde_json::Value {
        json!({
            "cmd": "SEND_GIFT",
            "data": {
                "tid": "1700000000110200002",
                "uid": 4_242,
                "uname": "viewer",
                "face": "https://i0.hdslb.com/face.jpg",
                "timestamp": 1_700_000_000,
                "num": 5,
                "giftId": 31_036,
                "giftName": "小花花",
                "super_gift_num": 15,
                "price": 100,
                "coin_type": coin_type,
                "is_first": false,
                "medal_info": {
                    "target_id": 0, "medal_level": 0, "medal_name": "",
                    "medal_color": 0, "anchor_roomid": 0
                }
            }
        })
    }

    #[test]
    fn test_send_gift_fields() {
        let Some(Message::SendGift(gift)) = decode_json(gift_payload("Gold")).unwrap() else {
            panic!("expected gift");
        };
        assert_eq!(gift.id, 1_700_000_000_110_200_002);
        assert_eq!(gift.sender.avatar.as_deref(), Some("https://i0.hdslb.com/face.jpg"));
        assert_eq!(gift.sender.medal, None);
        assert_eq!(gift.sender.title, None);
        assert_eq!(gift.quantity, 5);
        assert_eq!(gift.total, 15);
        assert_eq!(gift.gift_name, "小花花");
        assert_eq!(gift.coin_type, CoinType::Gold);
        assert!(!gift.first);
        assert_eq!(gift.timestamp.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_send_gift_bad_coin_type_is_invalid() {
        let err = decode_json(gift_payload("bronze")).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::InvalidValue { kind: "coin type", .. }
        ));
    }

    #[test]
    fn test_super_chat_fields() {
        let payload = json!({
            "cmd": "SUPER_CHAT_MESSAGE",
            "data": {
                "id": 8_123_456,
                "uid": 4_242,
                "message": "加油",
                "message_font_color": "#A3F6FF",
                "price": 30,
                "start_time": 1_700_000_000,
                "end_time": 1_700_000_060,
                "background_color": "#EDF5FF",
                "background_bottom_color": "#2A60B2",
                "background_color_start": "#3171D2",
                "background_color_end": "#4EA4F2",
                "background_image": "https://i0.hdslb.com/bg.png",
                "background_price_color": "#7497CD",
                "user_info": {
                    "uname": "viewer",
                    "face": "https://i0.hdslb.com/face.jpg",
                    "user_level": 12,
                    "level_color": "#61c05a",
                    "title": "0"
                },
                "medal_info": {
                    "target_id": 99,
                    "medal_level": 12,
                    "medal_name": "欧皇",
                    "medal_color": "#5d7b9e",
                    "anchor_roomid": 5_050,
                    "anchor_uname": "某主播",
                    "guard_level": 0,
                    "is_lighted": 1
                }
            }
        });
        let Some(Message::SuperChat(sc)) = decode_json(payload).unwrap() else {
            panic!("expected super chat");
        };
        assert_eq!(sc.id, 8_123_456);
        assert_eq!(sc.color, Color::from_rgb(0xA3F6FF));
        assert_eq!(sc.price, 30);
        assert_eq!((sc.end_time - sc.start_time).num_seconds(), 60);
        assert_eq!(sc.background.price_color.to_string(), "#7497cd");
        assert_eq!(sc.background.image, "https://i0.hdslb.com/bg.png");
        assert_eq!(sc.sender.level.as_ref().map(|l| l.level), Some(12));
        assert_eq!(sc.sender.title, None);
        assert_eq!(sc.sender.medal.as_ref().map(|m| m.anchor_id), Some(99));
        assert!(sc.sender.avatar.is_some());
    }

    #[test]
    fn test_guard_buy_out_of_range_tier() {
        let payload = |level: u8| {
            json!({
                "cmd": "GUARD_BUY",
                "data": {
                    "uid": 1, "username": "captain", "guard_level": level, "num": 1,
                    "price": 198_000, "gift_id": 10_003, "gift_name": "舰长",
                    "start_time": 1_700_000_000, "end_time": 1_700_000_000
                }
            })
        };
        let Some(Message::GuardBuy(buy)) = decode_json(payload(3)).unwrap() else {
            panic!("expected guard buy");
        };
        assert_eq!(buy.guard_type, GuardType::Captain);
        assert_eq!(buy.sender.name, "captain");

        assert!(matches!(
            decode_json(payload(4)),
            Err(ProtocolError::InvalidValue { kind: "guard type", .. })
        ));
    }

    #[test]
    fn test_interact_word_and_room_events() {
        let interact = json!({
            "cmd": "INTERACT_WORD",
            "data": {
                "uid": 7, "uname": "newcomer", "msg_type": 2, "timestamp": 1_700_000_000,
                "fans_medal": {"target_id": 0, "medal_level": 0, "medal_name": "", "medal_color": 0}
            }
        });
        let Some(Message::InteractWord(word)) = decode_json(interact).unwrap() else {
            panic!("expected interact word");
        };
        assert_eq!(word.kind, InteractKind::Follow);
        assert_eq!(word.sender.medal, None);

        assert_eq!(
            decode_json(json!({"cmd": "LIVE", "roomid": "5050"})).unwrap(),
            Some(Message::Live(Live { room_id: 5_050 }))
        );
        assert_eq!(
            decode_json(json!({"cmd": "ONLINE_RANK_COUNT", "data": {"count": 1_234}})).unwrap(),
            Some(Message::OnlineRankCount(OnlineRankCount { count: 1_234 }))
        );
        assert_eq!(
            decode_json(json!({"cmd": "SUPER_CHAT_MESSAGE_DELETE", "data": {"ids": [1, 2]}}))
                .unwrap(),
            Some(Message::SuperChatDelete(SuperChatDelete { ids: vec![1, 2] }))
        );
    }

    #[test]
    fn test_message_serializes_with_type_tag() {
        let message = Message::RoomStats(RoomStats {
            room_id: 5_050,
            followers: 10,
            fans_club: 2,
        });
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["type"], "room_stats");
        assert_eq!(value["followers"], 10);
        assert_eq!(message.command(), Command::RoomRealTimeMessageUpdate);
        assert!(message.sender().is_none());
    }
}

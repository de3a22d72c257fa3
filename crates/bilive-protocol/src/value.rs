//! Entities shared across event payloads: colors, timestamps, users,
//! fan medals and user levels.
//!
//! `User`, `Medal` and `UserLevel` travel in two encodings depending on
//! which event carries them: a compact positional array (inside
//! `DANMU_MSG`) or a keyed object (inside gift and super-chat events).
//! Each decoder dispatches on the runtime shape and both paths produce the
//! same value.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::json::{FieldError, Node, Shape};

/// A point in time, always UTC.
pub type Timestamp = DateTime<Utc>;

pub(crate) fn timestamp_secs(node: &Node<'_>) -> Result<Timestamp, FieldError> {
    DateTime::from_timestamp(node.i64()?, 0).ok_or_else(|| node.mismatch("a unix timestamp"))
}

pub(crate) fn timestamp_millis(node: &Node<'_>) -> Result<Timestamp, FieldError> {
    DateTime::from_timestamp_millis(node.i64()?)
        .ok_or_else(|| node.mismatch("a unix timestamp in milliseconds"))
}

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// A 24-bit RGB color.
///
/// Arrives either as a packed integer (`16777215`) or a hex string
/// (`"#FFFFFF"`); renders as lower-case `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::from_rgb(0xFF_FF_FF);

    /// Unpacks `0xRRGGBB`. Bits above 24 are ignored.
    pub const fn from_rgb(packed: u32) -> Self {
        Self {
            r: (packed >> 16) as u8,
            g: (packed >> 8) as u8,
            b: packed as u8,
        }
    }

    pub const fn to_rgb(self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Parses `#RRGGBB` or `RRGGBB`, any case.
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::from_rgb)
    }

    pub(crate) fn decode(node: &Node<'_>) -> Result<Self, FieldError> {
        if let Ok(s) = node.str() {
            if let Some(color) = Self::from_hex(s) {
                return Ok(color);
            }
            if !node.config().coerce_strings {
                return Err(node.mismatch("a color"));
            }
        }
        let packed = node.i64().map_err(|_| node.mismatch("a color"))?;
        Ok(Self::from_rgb((packed & 0xFF_FF_FF) as u32))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// GuardType
// ---------------------------------------------------------------------------

/// Paid membership tier of a viewer in a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardType {
    None,
    /// 总督, tier 1.
    Governor,
    /// 提督, tier 2.
    Admiral,
    /// 舰长, tier 3.
    Captain,
}

impl GuardType {
    pub fn from_level(level: i64) -> Option<Self> {
        match level {
            0 => Some(Self::None),
            1 => Some(Self::Governor),
            2 => Some(Self::Admiral),
            3 => Some(Self::Captain),
            _ => None,
        }
    }

    pub fn level(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Governor => 1,
            Self::Admiral => 2,
            Self::Captain => 3,
        }
    }

    pub(crate) fn decode(node: &Node<'_>) -> Result<Self, FieldError> {
        let level = node.i64()?;
        Self::from_level(level).ok_or_else(|| FieldError::out_of_range("guard type", level))
    }
}

// ---------------------------------------------------------------------------
// UserLevel
// ---------------------------------------------------------------------------

/// A viewer's user level ("UL") badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserLevel {
    pub level: u32,
    pub color: Color,
    /// Ranking text such as `">50000"`. Only the array form carries it.
    pub rank: Option<String>,
}

impl UserLevel {
    pub(crate) fn decode(node: &Node<'_>) -> Result<Self, FieldError> {
        match node.shape()? {
            // [level, _, color, rank, ...]
            Shape::Array(array) => Ok(Self {
                level: array.at(0)?.u32()?,
                color: Color::decode(&array.at(2)?)?,
                rank: array.at(3).ok().and_then(|n| n.string().ok()),
            }),
            Shape::Object(object) => Ok(Self {
                level: object.get("user_level")?.u32()?,
                color: Color::decode(&object.get("level_color")?)?,
                rank: object.opt("rank").and_then(|n| n.string().ok()),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Medal
// ---------------------------------------------------------------------------

/// A fan medal: a per-streamer badge a viewer wears.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Medal {
    pub level: u32,
    pub name: String,
    pub color: Color,
    pub border_color: Color,
    pub start_color: Color,
    pub end_color: Color,
    pub guard_type: GuardType,
    /// Whether the medal is lit (the wearer interacted recently).
    pub lighted: bool,
    /// User id of the streamer the medal belongs to.
    pub anchor_id: u64,
    /// Room of that streamer; `None` when the server sends room `0`.
    pub anchor_room: Option<u64>,
    pub anchor_name: Option<String>,
}

impl Medal {
    /// Decodes either encoding. An empty array or object, or an object
    /// whose `target_id` is `0`, means "no medal".
    pub(crate) fn decode(node: &Node<'_>) -> Result<Option<Self>, FieldError> {
        if node.is_empty() {
            return Ok(None);
        }
        match node.shape()? {
            Shape::Array(array) => Self::from_array(&array).map(Some),
            Shape::Object(object) => {
                if object.opt("target_id").map(|n| n.u64()).transpose()? == Some(0) {
                    return Ok(None);
                }
                Self::from_object(&object).map(Some)
            }
        }
    }

    /// `[level, name, anchorName, anchorRoom, color, _, _, border, start,
    /// end, guard, lighted, anchorId]`. The trailing elements are absent in
    /// older payloads.
    fn from_array(array: &Node<'_>) -> Result<Self, FieldError> {
        let color = Color::decode(&array.at(4)?)?;
        let anchor_room = array.at(3)?.u64()?;
        let (anchor_room, anchor_name) = anchor(anchor_room, array.at(2)?.string()?);
        Ok(Self {
            level: array.at(0)?.u32()?,
            name: array.at(1)?.string()?,
            color,
            border_color: optional_color(array.at(7).ok(), color)?,
            start_color: optional_color(array.at(8).ok(), color)?,
            end_color: optional_color(array.at(9).ok(), color)?,
            guard_type: array
                .at(10)
                .ok()
                .map(|n| GuardType::decode(&n))
                .transpose()?
                .unwrap_or(GuardType::None),
            lighted: array.at(11).ok().map(|n| n.bool()).transpose()?.unwrap_or(true),
            anchor_id: array.at(12).ok().map(|n| n.u64()).transpose()?.unwrap_or(0),
            anchor_room,
            anchor_name,
        })
    }

    fn from_object(object: &Node<'_>) -> Result<Self, FieldError> {
        let color = Color::decode(&object.get("medal_color")?)?;
        let anchor_room = object
            .opt("anchor_roomid")
            .map(|n| n.u64())
            .transpose()?
            .unwrap_or(0);
        let anchor_name = object
            .opt("anchor_uname")
            .and_then(|n| n.string().ok())
            .unwrap_or_default();
        let (anchor_room, anchor_name) = anchor(anchor_room, anchor_name);
        Ok(Self {
            level: object.get("medal_level")?.u32()?,
            name: object.get("medal_name")?.string()?,
            color,
            border_color: optional_color(object.opt("medal_color_border"), color)?,
            start_color: optional_color(object.opt("medal_color_start"), color)?,
            end_color: optional_color(object.opt("medal_color_end"), color)?,
            guard_type: object
                .opt("guard_level")
                .map(|n| GuardType::decode(&n))
                .transpose()?
                .unwrap_or(GuardType::None),
            lighted: object
                .opt("is_lighted")
                .map(|n| n.bool())
                .transpose()?
                .unwrap_or(true),
            anchor_id: object.opt("target_id").map(|n| n.u64()).transpose()?.unwrap_or(0),
            anchor_room,
            anchor_name,
        })
    }
}

/// Room `0` means the server did not say; drop the name with it.
fn anchor(room: u64, name: String) -> (Option<u64>, Option<String>) {
    if room == 0 {
        (None, None)
    } else {
        (Some(room), Some(name).filter(|n| !n.is_empty()))
    }
}

fn optional_color(node: Option<Node<'_>>, fallback: Color) -> Result<Color, FieldError> {
    node.map(|n| Color::decode(&n)).transpose().map(|c| c.unwrap_or(fallback))
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// The viewer behind an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    /// Avatar URL, when the event includes one.
    pub avatar: Option<String>,
    pub level: Option<UserLevel>,
    /// Title badge id, e.g. `"title-111-1"`.
    pub title: Option<String>,
    pub medal: Option<Medal>,
}

impl User {
    pub(crate) fn new(id: u64, name: String) -> Self {
        Self {
            id,
            name,
            avatar: None,
            level: None,
            title: None,
            medal: None,
        }
    }
}

/// A title badge: `["title-111-1", "title-111-1"]`, a bare string, or
/// `""`/`"0"`/absent for none.
pub(crate) fn title(node: Option<Node<'_>>) -> Option<String> {
    let node = node?;
    let title = match node.str() {
        Ok(s) => s.to_owned(),
        Err(_) => node.at(0).ok()?.string().ok()?,
    };
    Some(title).filter(|t| !t.is_empty() && t != "0")
}

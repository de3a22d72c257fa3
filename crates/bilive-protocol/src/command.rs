//! The `cmd` discriminant of server-pushed events.

use std::fmt;

use crate::JsonConfig;

macro_rules! commands {
    ($($(#[$doc:meta])* $variant:ident => $name:literal,)+) => {
        /// Every event name the live service is known to push.
        ///
        /// Only some have a typed decoder (see
        /// [`Message`](crate::Message)); the rest are recognised but
        /// still delivered as [`Body::Unknown`](crate::Body::Unknown).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Command {
            $($(#[$doc])* $variant,)+
        }

        impl Command {
            pub const ALL: &'static [Command] = &[$(Command::$variant,)+];

            /// The wire name, e.g. `"DANMU_MSG"`.
            pub fn name(self) -> &'static str {
                match self {
                    $(Command::$variant => $name,)+
                }
            }
        }
    };
}

commands! {
    /// Chat message (弹幕).
    DanmuMsg => "DANMU_MSG",
    /// Gift (礼物).
    SendGift => "SEND_GIFT",
    /// Guard membership purchase (上舰).
    GuardBuy => "GUARD_BUY",
    /// Paid pinned message (醒目留言).
    SuperChatMessage => "SUPER_CHAT_MESSAGE",
    SuperChatMessageDelete => "SUPER_CHAT_MESSAGE_DELETE",
    /// Enter / follow / share notifications.
    InteractWord => "INTERACT_WORD",
    RoomBanner => "ROOM_BANNER",
    RoomRealTimeMessageUpdate => "ROOM_REAL_TIME_MESSAGE_UPDATE",
    NoticeMsg => "NOTICE_MSG",
    ComboSend => "COMBO_SEND",
    ComboEnd => "COMBO_END",
    EntryEffect => "ENTRY_EFFECT",
    WelcomeGuard => "WELCOME_GUARD",
    Welcome => "WELCOME",
    RoomRank => "ROOM_RANK",
    ActivityBannerUpdateV2 => "ACTIVITY_BANNER_UPDATE_V2",
    Panel => "PANEL",
    SuperChatMessageJpn => "SUPER_CHAT_MESSAGE_JPN",
    UserToastMsg => "USER_TOAST_MSG",
    RoomBlockMsg => "ROOM_BLOCK_MSG",
    /// Stream went live.
    Live => "LIVE",
    /// Stream ended.
    Preparing => "PREPARING",
    RoomAdminEntrance => "ROOM_ADMIN_ENTRANCE",
    RoomAdmins => "ROOM_ADMINS",
    RoomChange => "ROOM_CHANGE",
    StopLiveRoomList => "STOP_LIVE_ROOM_LIST",
    WidgetBanner => "WIDGET_BANNER",
    LiveInteractiveGame => "LIVE_INTERACTIVE_GAME",
    OnlineRankV2 => "ONLINE_RANK_V2",
    OnlineRankCount => "ONLINE_RANK_COUNT",
    HotRankChanged => "HOT_RANK_CHANGED",
}

impl Command {
    /// Resolves a raw `cmd` string under `config`'s matching rules.
    pub fn parse(cmd: &str, config: &JsonConfig) -> Option<Self> {
        let name = config.command_name(cmd);
        Self::ALL.iter().copied().find(|c| {
            if config.ignore_cmd_case {
                c.name().eq_ignore_ascii_case(name)
            } else {
                c.name() == name
            }
        })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

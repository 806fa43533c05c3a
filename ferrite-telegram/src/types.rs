//! Serde types for the Telegram wire format.
//!
//! Only the fields the bot reads are deserialized; everything else is
//! ignored, and optional payloads are `Option` or `#[serde(default)]`.

use serde::{Deserialize, Serialize};

/// Generic API response envelope.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub description: Option<String>,
    pub error_code: Option<i64>,
    pub result: Option<T>,
}

/// One update from `getUpdates`.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
    #[serde(default)]
    pub entities: Vec<MessageEntity>,
    pub reply_to_message: Option<Box<Message>>,
    pub forward_from: Option<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ChatKind,
    pub title: Option<String>,
    // private chats carry the peer's profile fields instead of a title
    pub first_name: Option<String>,
    pub username: Option<String>,
    // only present on full `getChat` payloads
    pub permissions: Option<ChatPermissions>,
}

impl Chat {
    /// Group and supergroup chats are the only ones with member moderation.
    pub fn is_group_like(&self) -> bool {
        matches!(self.kind, ChatKind::Group | ChatKind::Supergroup)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

/// A span of special meaning inside a message's text.
///
/// Offsets and lengths count UTF-16 code units, as the platform sends them.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageEntity {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub offset: i64,
    pub length: i64,
    pub user: Option<User>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    BotCommand,
    Mention,
    TextMention,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMemberStatus {
    Creator,
    Administrator,
    Member,
    Restricted,
    Left,
    Kicked,
}

/// A user's membership record in a chat.
///
/// Admin-rights flags arrive inline on the membership object, so they are
/// flattened into a [`ChatPrivileges`]; for non-admin statuses every flag
/// simply reads false.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMember {
    pub status: ChatMemberStatus,
    pub user: User,
    #[serde(flatten)]
    pub privileges: ChatPrivileges,
}

impl ChatMember {
    pub fn is_admin(&self) -> bool {
        matches!(self.status, ChatMemberStatus::Creator | ChatMemberStatus::Administrator)
    }

    /// Whether this member can exercise the given capability. The chat
    /// owner does not carry explicit flags and implicitly has them all.
    pub fn has_privilege(&self, privilege: Privilege) -> bool {
        match self.status {
            ChatMemberStatus::Creator => true,
            ChatMemberStatus::Administrator => self.privileges.has(privilege),
            _ => false,
        }
    }
}

/// What non-admin members of a chat are allowed to do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPermissions {
    #[serde(default)]
    pub can_send_messages: bool,
    #[serde(default)]
    pub can_send_media_messages: bool,
    #[serde(default)]
    pub can_send_polls: bool,
    #[serde(default)]
    pub can_send_other_messages: bool,
    #[serde(default)]
    pub can_add_web_page_previews: bool,
    #[serde(default)]
    pub can_change_info: bool,
    #[serde(default)]
    pub can_invite_users: bool,
    #[serde(default)]
    pub can_pin_messages: bool,
}

impl ChatPermissions {
    /// The restriction set applied to muted members: everything off except
    /// inviting others.
    pub fn muted() -> Self {
        ChatPermissions {
            can_invite_users: true,
            ..Default::default()
        }
    }
}

/// Admin capability flags, as granted to a promoted member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPrivileges {
    #[serde(default)]
    pub can_manage_chat: bool,
    #[serde(default)]
    pub can_delete_messages: bool,
    #[serde(default)]
    pub can_manage_video_chats: bool,
    #[serde(default)]
    pub can_restrict_members: bool,
    #[serde(default)]
    pub can_promote_members: bool,
    #[serde(default)]
    pub can_change_info: bool,
    #[serde(default)]
    pub can_invite_users: bool,
    #[serde(default)]
    pub can_pin_messages: bool,
}

impl ChatPrivileges {
    /// The bundle handed to newly promoted admins: everything except the
    /// ability to promote further admins.
    pub fn standard_admin() -> Self {
        ChatPrivileges {
            can_manage_chat: true,
            can_delete_messages: true,
            can_manage_video_chats: true,
            can_restrict_members: true,
            can_promote_members: false,
            can_change_info: true,
            can_invite_users: true,
            can_pin_messages: true,
        }
    }

    /// No capabilities at all; promoting with this demotes.
    pub fn none() -> Self {
        ChatPrivileges::default()
    }

    pub fn has(&self, privilege: Privilege) -> bool {
        match privilege {
            Privilege::ManageChat => self.can_manage_chat,
            Privilege::DeleteMessages => self.can_delete_messages,
            Privilege::ManageVideoChats => self.can_manage_video_chats,
            Privilege::RestrictMembers => self.can_restrict_members,
            Privilege::PromoteMembers => self.can_promote_members,
            Privilege::ChangeInfo => self.can_change_info,
            Privilege::InviteUsers => self.can_invite_users,
            Privilege::PinMessages => self.can_pin_messages,
        }
    }
}

/// One admin capability flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    ManageChat,
    DeleteMessages,
    ManageVideoChats,
    RestrictMembers,
    PromoteMembers,
    ChangeInfo,
    InviteUsers,
    PinMessages,
}

impl Privilege {
    pub fn api_name(self) -> &'static str {
        match self {
            Privilege::ManageChat => "can_manage_chat",
            Privilege::DeleteMessages => "can_delete_messages",
            Privilege::ManageVideoChats => "can_manage_video_chats",
            Privilege::RestrictMembers => "can_restrict_members",
            Privilege::PromoteMembers => "can_promote_members",
            Privilege::ChangeInfo => "can_change_info",
            Privilege::InviteUsers => "can_invite_users",
            Privilege::PinMessages => "can_pin_messages",
        }
    }

    /// Human form of the flag name: "can_restrict_members" becomes
    /// "Can Restrict Members".
    pub fn title(self) -> String {
        self.api_name()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for Privilege {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Sent message result; only the id matters to callers.
#[derive(Debug, Clone, Deserialize)]
pub struct SentMessage {
    pub message_id: i64,
}

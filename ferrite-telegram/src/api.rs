use async_trait::async_trait;

use crate::error::TelegramError;
use crate::types::{Chat, ChatMember, ChatPermissions, ChatPrivileges, SentMessage, Update, User};

/// Every call the bot issues against the platform.
///
/// Used as a trait object throughout, so AFIT is out and `#[async_trait]`
/// keeps it object safe. Text-bearing methods expect HTML-formatted text.
#[async_trait]
pub trait TelegramApi: Send + Sync {
    async fn get_me(&self) -> Result<User, TelegramError>;

    async fn get_updates(&self, offset: Option<i64>, timeout: u64) -> Result<Vec<Update>, TelegramError>;

    /// Fetch a user's profile by numeric id.
    async fn get_user(&self, user_id: i64) -> Result<User, TelegramError>;

    /// Resolve a username (without the leading `@`) to a profile.
    async fn get_user_by_username(&self, username: &str) -> Result<User, TelegramError>;

    /// Full chat payload, including its ambient default permissions.
    async fn get_chat(&self, chat_id: i64) -> Result<Chat, TelegramError>;

    async fn get_chat_member(&self, chat_id: i64, user_id: i64) -> Result<ChatMember, TelegramError>;

    /// `until_date` is an absolute unix timestamp; `None` bans forever.
    async fn ban_chat_member(&self, chat_id: i64, user_id: i64, until_date: Option<i64>)
    -> Result<(), TelegramError>;

    async fn unban_chat_member(&self, chat_id: i64, user_id: i64) -> Result<(), TelegramError>;

    async fn restrict_chat_member(
        &self,
        chat_id: i64,
        user_id: i64,
        permissions: &ChatPermissions,
        until_date: Option<i64>,
    ) -> Result<(), TelegramError>;

    /// Promoting with all-false privileges demotes.
    async fn promote_chat_member(
        &self,
        chat_id: i64,
        user_id: i64,
        privileges: &ChatPrivileges,
    ) -> Result<(), TelegramError>;

    async fn set_administrator_title(&self, chat_id: i64, user_id: i64, title: &str) -> Result<(), TelegramError>;

    async fn pin_chat_message(
        &self,
        chat_id: i64,
        message_id: i64,
        disable_notification: bool,
    ) -> Result<(), TelegramError>;

    /// `None` unpins the most recent pin.
    async fn unpin_chat_message(&self, chat_id: i64, message_id: Option<i64>) -> Result<(), TelegramError>;

    async fn unpin_all_chat_messages(&self, chat_id: i64) -> Result<(), TelegramError>;

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to_message_id: Option<i64>,
    ) -> Result<SentMessage, TelegramError>;

    async fn edit_message_text(&self, chat_id: i64, message_id: i64, text: &str) -> Result<(), TelegramError>;

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), TelegramError>;
}

//! Bot API client over reqwest.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::api::TelegramApi;
use crate::error::TelegramError;
use crate::types::{ApiResponse, Chat, ChatMember, ChatPermissions, ChatPrivileges, SentMessage, Update, User};

pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(token: &str) -> Self {
        Self::with_api_url(token, "https://api.telegram.org")
    }

    /// Point at a different API server, e.g. a self-hosted instance.
    pub fn with_api_url(token: &str, api_url: &str) -> Self {
        HttpApi {
            client: Client::new(),
            base_url: format!("{}/bot{token}", api_url.trim_end_matches('/')),
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, body: Value) -> Result<T, TelegramError> {
        debug!("POST {method}");

        let response = self
            .client
            .post(format!("{}/{method}", self.base_url))
            .json(&body)
            .send()
            .await?;

        let envelope: ApiResponse<T> = response.json().await?;
        if !envelope.ok {
            let description = envelope.description.unwrap_or_default();
            warn!("{method} failed: {description}");
            return Err(TelegramError::Api {
                code: envelope.error_code.unwrap_or(0),
                description,
            });
        }

        envelope
            .result
            .ok_or_else(|| TelegramError::api(0, format!("{method}: empty result payload")))
    }

    /// Mutation endpoints answer with a bare `true`; discard it.
    async fn call_unit(&self, method: &str, body: Value) -> Result<(), TelegramError> {
        self.call::<bool>(method, body).await.map(|_| ())
    }

    // getChat doubles as the profile lookup: private chats carry the
    // peer's profile fields where groups carry a title.
    fn user_from_chat(chat: Chat) -> User {
        User {
            id: chat.id,
            first_name: chat.first_name.or(chat.title).unwrap_or_default(),
            username: chat.username,
        }
    }
}

#[async_trait]
impl TelegramApi for HttpApi {
    async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", json!({})).await
    }

    async fn get_updates(&self, offset: Option<i64>, timeout: u64) -> Result<Vec<Update>, TelegramError> {
        let mut body = json!({
            "timeout": timeout,
            "allowed_updates": ["message"],
        });
        if let Some(offset) = offset {
            body["offset"] = json!(offset);
        }

        self.call("getUpdates", body).await
    }

    async fn get_user(&self, user_id: i64) -> Result<User, TelegramError> {
        let chat: Chat = self.call("getChat", json!({ "chat_id": user_id })).await?;
        Ok(Self::user_from_chat(chat))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<User, TelegramError> {
        let handle = format!("@{}", username.trim_start_matches('@'));
        let chat: Chat = self.call("getChat", json!({ "chat_id": handle })).await?;
        Ok(Self::user_from_chat(chat))
    }

    async fn get_chat(&self, chat_id: i64) -> Result<Chat, TelegramError> {
        self.call("getChat", json!({ "chat_id": chat_id })).await
    }

    async fn get_chat_member(&self, chat_id: i64, user_id: i64) -> Result<ChatMember, TelegramError> {
        self.call("getChatMember", json!({ "chat_id": chat_id, "user_id": user_id }))
            .await
    }

    async fn ban_chat_member(
        &self,
        chat_id: i64,
        user_id: i64,
        until_date: Option<i64>,
    ) -> Result<(), TelegramError> {
        let mut body = json!({ "chat_id": chat_id, "user_id": user_id });
        if let Some(until_date) = until_date {
            body["until_date"] = json!(until_date);
        }

        self.call_unit("banChatMember", body).await
    }

    async fn unban_chat_member(&self, chat_id: i64, user_id: i64) -> Result<(), TelegramError> {
        // without only_if_banned, unbanning a present member kicks them
        self.call_unit(
            "unbanChatMember",
            json!({ "chat_id": chat_id, "user_id": user_id, "only_if_banned": true }),
        )
        .await
    }

    async fn restrict_chat_member(
        &self,
        chat_id: i64,
        user_id: i64,
        permissions: &ChatPermissions,
        until_date: Option<i64>,
    ) -> Result<(), TelegramError> {
        let mut body = json!({
            "chat_id": chat_id,
            "user_id": user_id,
            "permissions": permissions,
        });
        if let Some(until_date) = until_date {
            body["until_date"] = json!(until_date);
        }

        self.call_unit("restrictChatMember", body).await
    }

    async fn promote_chat_member(
        &self,
        chat_id: i64,
        user_id: i64,
        privileges: &ChatPrivileges,
    ) -> Result<(), TelegramError> {
        let mut body = json!({ "chat_id": chat_id, "user_id": user_id });
        // the endpoint takes the flags as individual fields
        if let Value::Object(flags) = json!(privileges)
            && let Value::Object(target) = &mut body
        {
            target.extend(flags);
        }

        self.call_unit("promoteChatMember", body).await
    }

    async fn set_administrator_title(&self, chat_id: i64, user_id: i64, title: &str) -> Result<(), TelegramError> {
        self.call_unit(
            "setChatAdministratorCustomTitle",
            json!({ "chat_id": chat_id, "user_id": user_id, "custom_title": title }),
        )
        .await
    }

    async fn pin_chat_message(
        &self,
        chat_id: i64,
        message_id: i64,
        disable_notification: bool,
    ) -> Result<(), TelegramError> {
        self.call_unit(
            "pinChatMessage",
            json!({
                "chat_id": chat_id,
                "message_id": message_id,
                "disable_notification": disable_notification,
            }),
        )
        .await
    }

    async fn unpin_chat_message(&self, chat_id: i64, message_id: Option<i64>) -> Result<(), TelegramError> {
        let mut body = json!({ "chat_id": chat_id });
        if let Some(message_id) = message_id {
            body["message_id"] = json!(message_id);
        }

        self.call_unit("unpinChatMessage", body).await
    }

    async fn unpin_all_chat_messages(&self, chat_id: i64) -> Result<(), TelegramError> {
        self.call_unit("unpinAllChatMessages", json!({ "chat_id": chat_id })).await
    }

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to_message_id: Option<i64>,
    ) -> Result<SentMessage, TelegramError> {
        let mut body = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
        });
        if let Some(reply_to) = reply_to_message_id {
            body["reply_to_message_id"] = json!(reply_to);
        }

        self.call("sendMessage", body).await
    }

    async fn edit_message_text(&self, chat_id: i64, message_id: i64, text: &str) -> Result<(), TelegramError> {
        // the result here is the edited message object, not `true`
        let _: Value = self
            .call(
                "editMessageText",
                json!({
                    "chat_id": chat_id,
                    "message_id": message_id,
                    "text": text,
                    "parse_mode": "HTML",
                }),
            )
            .await?;

        Ok(())
    }

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), TelegramError> {
        self.call_unit("deleteMessage", json!({ "chat_id": chat_id, "message_id": message_id }))
            .await
    }
}

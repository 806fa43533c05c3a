//! Shared fixtures: a canned session user, message builders, and a
//! recording in-memory platform client for exercising commands end to end.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;
use ferrite_database::DatabaseHandler;
use ferrite_telegram::TelegramApi;
use ferrite_telegram::error::TelegramError;
use ferrite_telegram::types::{
    Chat, ChatKind, ChatMember, ChatMemberStatus, ChatPermissions, ChatPrivileges, Message, SentMessage, Update, User,
};

use crate::command::registry::CommandRegistry;
use crate::ferrite::{Ferrite, ThreadSafeFerrite};
use crate::replies::Replies;

pub const SESSION_ID: i64 = 111;
pub const CHAT_ID: i64 = -1_001_000;
pub const INVOKING_MESSAGE_ID: i64 = 500;

pub fn session_user() -> User {
    User {
        id: SESSION_ID,
        first_name: "Ferrite".to_owned(),
        username: Some("ferrite".to_owned()),
    }
}

/// A supergroup message authored by the session user, the shape every
/// command invocation arrives in.
pub fn group_message(text: &str) -> Message {
    Message {
        message_id: INVOKING_MESSAGE_ID,
        from: Some(session_user()),
        chat: Chat {
            id: CHAT_ID,
            kind: ChatKind::Supergroup,
            title: Some("Test Group".to_owned()),
            first_name: None,
            username: None,
            permissions: None,
        },
        text: Some(text.to_owned()),
        entities: Vec::new(),
        reply_to_message: None,
        forward_from: None,
    }
}

/// A [`Ferrite`] wired to the given recording client and a fresh in-memory
/// database. The registry starts empty; tests register what they need.
pub async fn test_ferrite(api: Arc<RecordingApi>) -> ThreadSafeFerrite {
    let telegram: Arc<dyn TelegramApi> = api;
    // sqlx guards the sqlite worker-thread handshake with a tokio timeout,
    // and a `start_paused` test clock auto-advances past that deadline while
    // the runtime waits on the thread. Connecting on a scratch runtime keeps
    // the handshake on a real clock either way.
    let database_handler = std::thread::spawn(|| {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("scratch runtime for database setup")
            .block_on(DatabaseHandler::new_in_memory())
    })
    .join()
    .expect("database setup thread panicked")
    .unwrap();

    Arc::new(Ferrite {
        telegram,
        database_handler,
        registry: CommandRegistry::new(),
        replies: Replies::new(),
        me: session_user(),
        started_at: Instant::now(),
    })
}

/// One platform call as observed by [`RecordingApi`], with the arguments
/// that matter to assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetUser {
        user_id: i64,
    },
    GetUserByUsername {
        username: String,
    },
    GetChat {
        chat_id: i64,
    },
    GetChatMember {
        chat_id: i64,
        user_id: i64,
    },
    Ban {
        chat_id: i64,
        user_id: i64,
        until_date: Option<i64>,
    },
    Unban {
        chat_id: i64,
        user_id: i64,
    },
    Restrict {
        chat_id: i64,
        user_id: i64,
        permissions: ChatPermissions,
        until_date: Option<i64>,
    },
    Promote {
        chat_id: i64,
        user_id: i64,
        privileges: ChatPrivileges,
    },
    SetTitle {
        chat_id: i64,
        user_id: i64,
        title: String,
    },
    Pin {
        chat_id: i64,
        message_id: i64,
        silent: bool,
    },
    Unpin {
        chat_id: i64,
        message_id: Option<i64>,
    },
    UnpinAll {
        chat_id: i64,
    },
    Send {
        chat_id: i64,
        text: String,
        reply_to_message_id: Option<i64>,
    },
    Edit {
        chat_id: i64,
        message_id: i64,
        text: String,
    },
    Delete {
        chat_id: i64,
        message_id: i64,
    },
}

impl Call {
    /// Calls that change chat state, as opposed to lookups and the
    /// session's own status messages.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Call::Ban { .. }
                | Call::Unban { .. }
                | Call::Restrict { .. }
                | Call::Promote { .. }
                | Call::SetTitle { .. }
                | Call::Pin { .. }
                | Call::Unpin { .. }
                | Call::UnpinAll { .. }
        )
    }
}

/// In-memory [`TelegramApi`] that records every call and answers from
/// seeded maps. Unknown users and members come back as the platform's
/// "user not found" refusal; `fail_once` injects one API error for the
/// named wire method, after which the call succeeds again.
#[derive(Default)]
pub struct RecordingApi {
    calls: Mutex<Vec<Call>>,
    users: Mutex<HashMap<i64, User>>,
    members: Mutex<HashMap<i64, ChatMember>>,
    chats: Mutex<HashMap<i64, Chat>>,
    failures: Mutex<HashMap<String, (i64, String)>>,
}

impl RecordingApi {
    /// Message id handed out for every sent message.
    pub const SENT_MESSAGE_ID: i64 = 900;

    pub fn new() -> Self {
        RecordingApi::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// The texts the session rendered, edits and sends alike, in order.
    pub fn renders(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Edit { text, .. } | Call::Send { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn mutation_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|call| call.is_mutation()).collect()
    }

    pub fn add_user(&self, user: User) {
        self.users.lock().unwrap().insert(user.id, user);
    }

    pub fn set_member(&self, user_id: i64, member: ChatMember) {
        self.members.lock().unwrap().insert(user_id, member);
    }

    pub fn set_chat(&self, chat: Chat) {
        self.chats.lock().unwrap().insert(chat.id, chat);
    }

    /// Make the next call to `method` (wire name, e.g. "editMessageText")
    /// fail with the given API error.
    pub fn fail_once(&self, method: &str, code: i64, description: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(method.to_owned(), (code, description.to_owned()));
    }

    /// Seed a full-rights membership for the session user, who is also the
    /// issuer of every self-authored command.
    pub fn grant_standard_admin_pair(&self) {
        self.set_member(SESSION_ID, Self::owner_member(SESSION_ID));
    }

    pub fn member(user_id: i64, status: ChatMemberStatus, privileges: ChatPrivileges) -> ChatMember {
        ChatMember {
            status,
            user: User {
                id: user_id,
                first_name: format!("User {user_id}"),
                username: None,
            },
            privileges,
        }
    }

    pub fn plain_member(user_id: i64) -> ChatMember {
        Self::member(user_id, ChatMemberStatus::Member, ChatPrivileges::none())
    }

    pub fn admin_member(user_id: i64, privileges: ChatPrivileges) -> ChatMember {
        Self::member(user_id, ChatMemberStatus::Administrator, privileges)
    }

    pub fn owner_member(user_id: i64) -> ChatMember {
        Self::member(user_id, ChatMemberStatus::Creator, ChatPrivileges::none())
    }

    pub fn left_member(user_id: i64) -> ChatMember {
        Self::member(user_id, ChatMemberStatus::Left, ChatPrivileges::none())
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn take_failure(&self, method: &str) -> Result<(), TelegramError> {
        match self.failures.lock().unwrap().remove(method) {
            Some((code, description)) => Err(TelegramError::api(code, description)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TelegramApi for RecordingApi {
    async fn get_me(&self) -> Result<User, TelegramError> {
        Ok(session_user())
    }

    async fn get_updates(&self, _offset: Option<i64>, _timeout: u64) -> Result<Vec<Update>, TelegramError> {
        Ok(Vec::new())
    }

    async fn get_user(&self, user_id: i64) -> Result<User, TelegramError> {
        self.record(Call::GetUser { user_id });
        self.take_failure("getChat")?;
        self.users
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .ok_or_else(|| TelegramError::api(400, "Bad Request: chat not found"))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<User, TelegramError> {
        self.record(Call::GetUserByUsername {
            username: username.to_owned(),
        });
        self.take_failure("getChat")?;
        self.users
            .lock()
            .unwrap()
            .values()
            .find(|user| user.username.as_deref() == Some(username))
            .cloned()
            .ok_or_else(|| TelegramError::api(400, "Bad Request: chat not found"))
    }

    async fn get_chat(&self, chat_id: i64) -> Result<Chat, TelegramError> {
        self.record(Call::GetChat { chat_id });
        self.take_failure("getChat")?;
        Ok(self.chats.lock().unwrap().get(&chat_id).cloned().unwrap_or_else(|| Chat {
            id: chat_id,
            kind: ChatKind::Supergroup,
            title: Some("Test Group".to_owned()),
            first_name: None,
            username: None,
            permissions: None,
        }))
    }

    async fn get_chat_member(&self, chat_id: i64, user_id: i64) -> Result<ChatMember, TelegramError> {
        self.record(Call::GetChatMember { chat_id, user_id });
        self.take_failure("getChatMember")?;
        self.members
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .ok_or_else(|| TelegramError::api(400, "Bad Request: user not found"))
    }

    async fn ban_chat_member(
        &self,
        chat_id: i64,
        user_id: i64,
        until_date: Option<i64>,
    ) -> Result<(), TelegramError> {
        self.record(Call::Ban {
            chat_id,
            user_id,
            until_date,
        });
        self.take_failure("banChatMember")
    }

    async fn unban_chat_member(&self, chat_id: i64, user_id: i64) -> Result<(), TelegramError> {
        self.record(Call::Unban { chat_id, user_id });
        self.take_failure("unbanChatMember")
    }

    async fn restrict_chat_member(
        &self,
        chat_id: i64,
        user_id: i64,
        permissions: &ChatPermissions,
        until_date: Option<i64>,
    ) -> Result<(), TelegramError> {
        self.record(Call::Restrict {
            chat_id,
            user_id,
            permissions: permissions.clone(),
            until_date,
        });
        self.take_failure("restrictChatMember")
    }

    async fn promote_chat_member(
        &self,
        chat_id: i64,
        user_id: i64,
        privileges: &ChatPrivileges,
    ) -> Result<(), TelegramError> {
        self.record(Call::Promote {
            chat_id,
            user_id,
            privileges: privileges.clone(),
        });
        self.take_failure("promoteChatMember")
    }

    async fn set_administrator_title(&self, chat_id: i64, user_id: i64, title: &str) -> Result<(), TelegramError> {
        self.record(Call::SetTitle {
            chat_id,
            user_id,
            title: title.to_owned(),
        });
        self.take_failure("setChatAdministratorCustomTitle")
    }

    async fn pin_chat_message(
        &self,
        chat_id: i64,
        message_id: i64,
        disable_notification: bool,
    ) -> Result<(), TelegramError> {
        self.record(Call::Pin {
            chat_id,
            message_id,
            silent: disable_notification,
        });
        self.take_failure("pinChatMessage")
    }

    async fn unpin_chat_message(&self, chat_id: i64, message_id: Option<i64>) -> Result<(), TelegramError> {
        self.record(Call::Unpin { chat_id, message_id });
        self.take_failure("unpinChatMessage")
    }

    async fn unpin_all_chat_messages(&self, chat_id: i64) -> Result<(), TelegramError> {
        self.record(Call::UnpinAll { chat_id });
        self.take_failure("unpinAllChatMessages")
    }

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to_message_id: Option<i64>,
    ) -> Result<SentMessage, TelegramError> {
        self.record(Call::Send {
            chat_id,
            text: text.to_owned(),
            reply_to_message_id,
        });
        self.take_failure("sendMessage")?;
        Ok(SentMessage {
            message_id: Self::SENT_MESSAGE_ID,
        })
    }

    async fn edit_message_text(&self, chat_id: i64, message_id: i64, text: &str) -> Result<(), TelegramError> {
        self.record(Call::Edit {
            chat_id,
            message_id,
            text: text.to_owned(),
        });
        self.take_failure("editMessageText")
    }

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), TelegramError> {
        self.record(Call::Delete { chat_id, message_id });
        self.take_failure("deleteMessage")
    }
}

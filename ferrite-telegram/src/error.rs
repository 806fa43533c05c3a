use std::fmt::{self, Display};

/// Failure of a platform call.
///
/// The API reports refusals as free-text descriptions, so the classifier
/// methods below match on the known phrasings (Bot API wording and the
/// upstream RPC error codes some servers pass through verbatim).
#[derive(Debug)]
pub enum TelegramError {
    /// Transport or decode failure.
    Http(reqwest::Error),
    /// The platform answered `ok: false`.
    Api { code: i64, description: String },
}

impl TelegramError {
    pub fn api(code: i64, description: impl Into<String>) -> Self {
        TelegramError::Api {
            code,
            description: description.into(),
        }
    }

    fn matches_any(&self, needles: &[&str]) -> bool {
        let TelegramError::Api { description, .. } = self else {
            return false;
        };
        let lowered = description.to_lowercase();
        needles.iter().any(|needle| lowered.contains(needle))
    }

    /// The session lacks the admin rights the call needs.
    pub fn is_admin_refusal(&self) -> bool {
        self.matches_any(&["not enough rights", "need administrator rights", "chat_admin_required"])
    }

    /// The target of a moderation call is itself an administrator.
    pub fn is_target_admin(&self) -> bool {
        self.matches_any(&["user is an administrator", "user_admin_invalid"])
    }

    /// The queried user is not a member of the chat.
    pub fn is_not_participant(&self) -> bool {
        self.matches_any(&["user not found", "user_not_participant", "participant_id_invalid"])
    }

    /// The looked-up username does not exist or is malformed.
    pub fn is_unknown_username(&self) -> bool {
        self.matches_any(&["chat not found", "username_not_occupied", "username_invalid"])
    }

    /// The message to edit or delete no longer exists.
    pub fn is_message_missing(&self) -> bool {
        self.matches_any(&[
            "message to edit not found",
            "message to delete not found",
            "message_id_invalid",
        ])
    }

    /// Editing a message to its current content; harmless.
    pub fn is_not_modified(&self) -> bool {
        self.matches_any(&["message is not modified"])
    }
}

impl Display for TelegramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelegramError::Http(e) => write!(f, "http error: {e}"),
            TelegramError::Api { code, description } => write!(f, "api error {code}: {description}"),
        }
    }
}

impl std::error::Error for TelegramError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelegramError::Http(e) => Some(e),
            TelegramError::Api { .. } => None,
        }
    }
}

impl From<reqwest::Error> for TelegramError {
    fn from(value: reqwest::Error) -> Self {
        TelegramError::Http(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_bot_api_phrasings() {
        let err = TelegramError::api(400, "Bad Request: not enough rights to restrict/unrestrict chat member");
        assert!(err.is_admin_refusal());

        let err = TelegramError::api(400, "Bad Request: user is an administrator of the chat");
        assert!(err.is_target_admin());

        let err = TelegramError::api(400, "Bad Request: chat not found");
        assert!(err.is_unknown_username());

        let err = TelegramError::api(400, "Bad Request: message to edit not found");
        assert!(err.is_message_missing());
    }

    #[test]
    fn classifies_rpc_style_codes() {
        assert!(TelegramError::api(400, "CHAT_ADMIN_REQUIRED").is_admin_refusal());
        assert!(TelegramError::api(400, "USER_ADMIN_INVALID").is_target_admin());
        assert!(TelegramError::api(400, "USER_NOT_PARTICIPANT").is_not_participant());
        assert!(TelegramError::api(400, "USERNAME_NOT_OCCUPIED").is_unknown_username());
    }

    #[test]
    fn unrelated_errors_classify_as_nothing() {
        let err = TelegramError::api(429, "Too Many Requests: retry after 5");
        assert!(!err.is_admin_refusal());
        assert!(!err.is_target_admin());
        assert!(!err.is_unknown_username());
        assert!(!err.is_not_modified());
    }
}

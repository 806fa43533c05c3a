use ferrite_common::util::parse_duration_seconds;

use super::CommandCtxt;
use super::errors::{ArgError, CommandError};
use crate::update_handler::message_parser::error::{ErrorSeverity, GetErrorSeverity};

pub const USER_NOT_FOUND: &str = "❌ <b>User not found!</b>";

/// A type that can parse itself off a context's argument cursor.
pub trait ParseArgument: Sized {
    async fn parse(ctxt: &mut CommandCtxt<'_>) -> Result<Self, ArgError>;
}

impl<T: ParseArgument> ParseArgument for Option<T> {
    async fn parse(ctxt: &mut CommandCtxt<'_>) -> Result<Self, ArgError> {
        match T::parse(ctxt).await {
            Ok(v) => Ok(Some(v)),
            Err(err) if err.get_severity() == ErrorSeverity::High => Err(err),
            _ => Ok(None),
        }
    }
}

/// A single word argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word(pub String);

impl ParseArgument for Word {
    async fn parse(ctxt: &mut CommandCtxt<'_>) -> Result<Self, ArgError> {
        Ok(Self(ctxt.next_word()?.to_owned()))
    }
}

/// The rest of the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rest(pub String);

impl ParseArgument for Rest {
    async fn parse(ctxt: &mut CommandCtxt<'_>) -> Result<Self, ArgError> {
        Ok(Self(ctxt.rest()?.to_owned()))
    }
}

/// The rest of the message, falling back to the replied-to message's text
/// when no words remain. Arguments take precedence over the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestOrReply(pub String);

impl ParseArgument for RestOrReply {
    async fn parse(ctxt: &mut CommandCtxt<'_>) -> Result<Self, ArgError> {
        match ctxt.rest() {
            Ok(rest) => Ok(Self(rest.to_owned())),
            Err(exhausted) => {
                let replied_text = ctxt
                    .data
                    .message
                    .reply_to_message
                    .as_ref()
                    .and_then(|reply| reply.text.as_deref())
                    .filter(|text| !text.is_empty());
                match replied_text {
                    Some(text) => Ok(Self(text.to_owned())),
                    None => Err(exhausted.into()),
                }
            },
        }
    }
}

/// A duration argument such as `10m`, `2h`, `3d` or a bare second count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpan(pub i64);

impl ParseArgument for TimeSpan {
    async fn parse(ctxt: &mut CommandCtxt<'_>) -> Result<Self, ArgError> {
        let mut fork = ctxt.fork();
        let word = fork.next_word()?;

        // only digit-leading words are durations at all; anything else is
        // left for the next parser (usually a free-text reason)
        if !word.as_bytes().first().is_some_and(u8::is_ascii_digit) {
            return Err(ArgError::NotADuration);
        }

        let seconds = parse_duration_seconds(word)?;
        *ctxt = fork;
        Ok(Self(seconds))
    }
}

/// A resolved target user: the id to act on plus the name to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUser {
    pub id: i64,
    pub first_name: String,
}

/// How an invocation designated its target user, before any lookup.
///
/// Parsing is pure classification and issues no platform calls, so
/// handlers can run the privilege checks first and only then
/// [`resolve`](Target::resolve) the designation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A structured mention entity carrying the profile inline.
    Mention(ResolvedUser),
    /// An all-digits word, taken as a user id.
    Id(i64),
    /// Any other word, with a leading `@` stripped.
    Username(String),
    /// No argument; the replied-to message's sender.
    Reply(ResolvedUser),
    /// Nothing designates a target.
    None,
}

impl ParseArgument for Target {
    async fn parse(ctxt: &mut CommandCtxt<'_>) -> Result<Self, ArgError> {
        let mut fork = ctxt.fork();
        if let Ok(word) = fork.next_word() {
            let target = if let Some(user) = ctxt.text_mention_at(word) {
                Target::Mention(ResolvedUser {
                    id: user.id,
                    first_name: user.first_name.clone(),
                })
            } else if word.bytes().all(|b| b.is_ascii_digit()) {
                match word.parse::<i64>() {
                    Ok(id) => Target::Id(id),
                    // out of range for an id; let the username lookup reject it
                    Err(_) => Target::Username(word.to_owned()),
                }
            } else {
                Target::Username(word.trim_start_matches('@').to_owned())
            };
            *ctxt = fork;
            return Ok(target);
        }

        if let Some(reply) = &ctxt.data.message.reply_to_message
            && let Some(from) = &reply.from
        {
            return Ok(Target::Reply(ResolvedUser {
                id: from.id,
                first_name: from.first_name.clone(),
            }));
        }

        Ok(Target::None)
    }
}

impl Target {
    /// Runs whatever lookup the designation needs.
    ///
    /// An unknown or malformed username is the user-facing "not found"
    /// outcome; numeric id lookups propagate their failures as-is.
    pub async fn resolve(&self, ctxt: &CommandCtxt<'_>) -> Result<ResolvedUser, CommandError> {
        match self {
            Target::Mention(user) | Target::Reply(user) => Ok(user.clone()),
            Target::Id(id) => {
                let user = ctxt.telegram().get_user(*id).await?;
                Ok(ResolvedUser {
                    id: user.id,
                    first_name: user.first_name,
                })
            },
            Target::Username(name) => match ctxt.telegram().get_user_by_username(name).await {
                Ok(user) => Ok(ResolvedUser {
                    id: user.id,
                    first_name: user.first_name,
                }),
                Err(err) if err.is_unknown_username() => Err(CommandError::user(USER_NOT_FOUND)),
                Err(err) => Err(err.into()),
            },
            Target::None => Err(CommandError::user(USER_NOT_FOUND)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ferrite_telegram::types::{EntityKind, MessageEntity, User};

    use super::*;
    use crate::command::CommandData;
    use crate::testutil::{RecordingApi, group_message, test_ferrite};

    #[tokio::test]
    async fn target_mention_entity_carries_profile() {
        let ferrite = test_ferrite(Arc::new(RecordingApi::new())).await;
        let mut message = group_message(".ban Ada some reason");
        message.entities = vec![MessageEntity {
            kind: EntityKind::TextMention,
            offset: 5,
            length: 3,
            user: Some(User {
                id: 777,
                first_name: "Ada".to_owned(),
                username: None,
            }),
        }];
        let data = CommandData {
            ferrite: &ferrite,
            message: &message,
            calling_prefix: ".",
        };
        // slice the args out of the message text itself so entity offsets line up
        let text = data.message.text.as_deref().unwrap();
        let mut ctxt = CommandCtxt::new(&data, &text[4..]);

        let target = Target::parse(&mut ctxt).await.unwrap();
        assert_eq!(
            target,
            Target::Mention(ResolvedUser {
                id: 777,
                first_name: "Ada".to_owned()
            })
        );
        assert_eq!(ctxt.rest().unwrap(), "some reason");
    }

    #[tokio::test]
    async fn target_digits_classify_as_id() {
        let ferrite = test_ferrite(Arc::new(RecordingApi::new())).await;
        let message = group_message(".ban 12345678 spam");
        let data = CommandData {
            ferrite: &ferrite,
            message: &message,
            calling_prefix: ".",
        };
        let mut ctxt = CommandCtxt::new(&data, "12345678 spam");

        assert_eq!(Target::parse(&mut ctxt).await.unwrap(), Target::Id(12345678));
        assert_eq!(ctxt.rest().unwrap(), "spam");
    }

    #[tokio::test]
    async fn target_word_classifies_as_username() {
        let ferrite = test_ferrite(Arc::new(RecordingApi::new())).await;
        let message = group_message(".ban @somebody");
        let data = CommandData {
            ferrite: &ferrite,
            message: &message,
            calling_prefix: ".",
        };
        let mut ctxt = CommandCtxt::new(&data, "@somebody");

        assert_eq!(
            Target::parse(&mut ctxt).await.unwrap(),
            Target::Username("somebody".to_owned())
        );
    }

    #[tokio::test]
    async fn target_falls_back_to_reply_sender() {
        let ferrite = test_ferrite(Arc::new(RecordingApi::new())).await;
        let mut message = group_message(".ban");
        let mut replied = group_message("hello");
        replied.from = Some(User {
            id: 404,
            first_name: "Replied".to_owned(),
            username: None,
        });
        message.reply_to_message = Some(Box::new(replied));
        let data = CommandData {
            ferrite: &ferrite,
            message: &message,
            calling_prefix: ".",
        };
        let mut ctxt = CommandCtxt::new(&data, "");

        assert_eq!(
            Target::parse(&mut ctxt).await.unwrap(),
            Target::Reply(ResolvedUser {
                id: 404,
                first_name: "Replied".to_owned()
            })
        );
    }

    #[tokio::test]
    async fn target_argument_takes_precedence_over_reply() {
        let ferrite = test_ferrite(Arc::new(RecordingApi::new())).await;
        let mut message = group_message(".ban 555");
        let mut replied = group_message("hello");
        replied.from = Some(User {
            id: 404,
            first_name: "Replied".to_owned(),
            username: None,
        });
        message.reply_to_message = Some(Box::new(replied));
        let data = CommandData {
            ferrite: &ferrite,
            message: &message,
            calling_prefix: ".",
        };
        let mut ctxt = CommandCtxt::new(&data, "555");

        assert_eq!(Target::parse(&mut ctxt).await.unwrap(), Target::Id(555));
    }

    #[tokio::test]
    async fn target_nothing_resolves_not_found() {
        let ferrite = test_ferrite(Arc::new(RecordingApi::new())).await;
        let message = group_message(".ban");
        let data = CommandData {
            ferrite: &ferrite,
            message: &message,
            calling_prefix: ".",
        };
        let mut ctxt = CommandCtxt::new(&data, "");

        let target = Target::parse(&mut ctxt).await.unwrap();
        assert_eq!(target, Target::None);

        let err = target.resolve(&ctxt).await.unwrap_err();
        assert!(matches!(err, CommandError::User(message) if message == USER_NOT_FOUND));
    }

    #[tokio::test]
    async fn target_id_resolves_through_lookup() {
        let api = Arc::new(RecordingApi::new());
        api.add_user(User {
            id: 42,
            first_name: "Forty Two".to_owned(),
            username: None,
        });
        let ferrite = test_ferrite(api).await;
        let message = group_message(".ban 42");
        let data = CommandData {
            ferrite: &ferrite,
            message: &message,
            calling_prefix: ".",
        };
        let mut ctxt = CommandCtxt::new(&data, "42");

        let target = Target::parse(&mut ctxt).await.unwrap();
        let resolved = target.resolve(&ctxt).await.unwrap();
        assert_eq!(
            resolved,
            ResolvedUser {
                id: 42,
                first_name: "Forty Two".to_owned()
            }
        );
    }

    #[tokio::test]
    async fn timespan_leaves_non_durations_unconsumed() {
        let ferrite = test_ferrite(Arc::new(RecordingApi::new())).await;
        let message = group_message(".ban");
        let data = CommandData {
            ferrite: &ferrite,
            message: &message,
            calling_prefix: ".",
        };
        let mut ctxt = CommandCtxt::new(&data, "spam and eggs");

        let parsed = <Option<TimeSpan>>::parse(&mut ctxt).await.unwrap();
        assert_eq!(parsed, None);
        assert_eq!(ctxt.rest().unwrap(), "spam and eggs");
    }

    #[tokio::test]
    async fn timespan_consumes_durations() {
        let ferrite = test_ferrite(Arc::new(RecordingApi::new())).await;
        let message = group_message(".ban");
        let data = CommandData {
            ferrite: &ferrite,
            message: &message,
            calling_prefix: ".",
        };
        let mut ctxt = CommandCtxt::new(&data, "2h flooding");

        let parsed = <Option<TimeSpan>>::parse(&mut ctxt).await.unwrap();
        assert_eq!(parsed, Some(TimeSpan(7200)));
        assert_eq!(ctxt.rest().unwrap(), "flooding");
    }

    #[tokio::test]
    async fn timespan_bad_suffix_is_fatal_even_when_optional() {
        let ferrite = test_ferrite(Arc::new(RecordingApi::new())).await;
        let message = group_message(".ban");
        let data = CommandData {
            ferrite: &ferrite,
            message: &message,
            calling_prefix: ".",
        };
        let mut ctxt = CommandCtxt::new(&data, "10x spam");

        let err = <Option<TimeSpan>>::parse(&mut ctxt).await.unwrap_err();
        assert!(matches!(err, ArgError::InvalidDuration(_)));
    }

    #[tokio::test]
    async fn timespan_overflowing_token_is_fatal() {
        let ferrite = test_ferrite(Arc::new(RecordingApi::new())).await;
        let message = group_message(".ban");
        let data = CommandData {
            ferrite: &ferrite,
            message: &message,
            calling_prefix: ".",
        };
        let mut ctxt = CommandCtxt::new(&data, "999999999999999999d");

        let err = <Option<TimeSpan>>::parse(&mut ctxt).await.unwrap_err();
        assert!(matches!(err, ArgError::InvalidDuration(_)));
    }

    #[tokio::test]
    async fn rest_or_reply_prefers_arguments() {
        let ferrite = test_ferrite(Arc::new(RecordingApi::new())).await;
        let mut message = group_message(".mock from args");
        message.reply_to_message = Some(Box::new(group_message("from reply")));
        let data = CommandData {
            ferrite: &ferrite,
            message: &message,
            calling_prefix: ".",
        };
        let mut ctxt = CommandCtxt::new(&data, "from args");

        let parsed = RestOrReply::parse(&mut ctxt).await.unwrap();
        assert_eq!(parsed.0, "from args");
    }

    #[tokio::test]
    async fn rest_or_reply_falls_back_to_replied_text() {
        let ferrite = test_ferrite(Arc::new(RecordingApi::new())).await;
        let mut message = group_message(".mock");
        message.reply_to_message = Some(Box::new(group_message("from reply")));
        let data = CommandData {
            ferrite: &ferrite,
            message: &message,
            calling_prefix: ".",
        };
        let mut ctxt = CommandCtxt::new(&data, "");

        let parsed = RestOrReply::parse(&mut ctxt).await.unwrap();
        assert_eq!(parsed.0, "from reply");
    }

    #[tokio::test]
    async fn plain_rest_ignores_reply() {
        let ferrite = test_ferrite(Arc::new(RecordingApi::new())).await;
        let mut message = group_message(".ban");
        message.reply_to_message = Some(Box::new(group_message("not a reason")));
        let data = CommandData {
            ferrite: &ferrite,
            message: &message,
            calling_prefix: ".",
        };
        let mut ctxt = CommandCtxt::new(&data, "");

        let parsed = <Option<Rest>>::parse(&mut ctxt).await.unwrap();
        assert_eq!(parsed, None);
    }
}

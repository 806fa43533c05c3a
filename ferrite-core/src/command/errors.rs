use std::fmt::Display;

use ferrite_common::util::ParseDurationError;
use ferrite_telegram::TelegramError;

use crate::update_handler::message_parser::error::{ErrorSeverity, GetErrorSeverity};

/// No arguments left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgsExhausted;

/// An error produced while parsing a single argument off the cursor.
#[derive(Debug)]
pub enum ArgError {
    ArgsExhausted(ArgsExhausted),
    /// The next word is not shaped like a duration. The cursor is left
    /// untouched so another parser can claim the word.
    NotADuration,
    InvalidDuration(ParseDurationError),
}

impl GetErrorSeverity for ArgError {
    fn get_severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidDuration(..) => ErrorSeverity::High,
            _ => ErrorSeverity::Low,
        }
    }
}

impl Display for ArgError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgError::ArgsExhausted(_) => f.write_str("an argument is required but none were found"),
            ArgError::NotADuration => f.write_str("a duration argument was expected"),
            ArgError::InvalidDuration(err) => write!(f, "{err}"),
        }
    }
}
impl std::error::Error for ArgError {}

impl From<ArgsExhausted> for ArgError {
    fn from(value: ArgsExhausted) -> Self {
        Self::ArgsExhausted(value)
    }
}

impl From<ParseDurationError> for ArgError {
    fn from(value: ParseDurationError) -> Self {
        Self::InvalidDuration(value)
    }
}

/// The uniform outcome of command handler logic. Every handler returns
/// this; the message-create handler owns all rendering of it.
#[derive(Debug)]
pub enum CommandError {
    /// The invocation itself was wrong: bad input, unknown target, a
    /// reply was required. Rendered verbatim (the raising site formats).
    User(String),
    /// A privilege or permission refusal, either from the pre-flight
    /// checks or from the platform. Rendered verbatim.
    Auth(String),
    /// A platform call failed in a way the handler did not specially map.
    Platform(TelegramError),
    /// Anything else: database, formatting, ...
    Internal(anyhow::Error),
}

impl CommandError {
    pub fn user(message: impl Into<String>) -> Self {
        Self::User(message.into())
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }
}

impl Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::User(message) | CommandError::Auth(message) => f.write_str(message),
            CommandError::Platform(err) => write!(f, "platform call failed: {err}"),
            CommandError::Internal(err) => write!(f, "{err:#}"),
        }
    }
}
impl std::error::Error for CommandError {}

impl From<TelegramError> for CommandError {
    fn from(value: TelegramError) -> Self {
        Self::Platform(value)
    }
}

impl From<anyhow::Error> for CommandError {
    fn from(value: anyhow::Error) -> Self {
        Self::Internal(value)
    }
}

/// Error of a full command execution: either argument parsing failed, or
/// the handler itself did.
#[derive(Debug)]
pub enum ExecutionError {
    Parse(ArgError),
    Command(CommandError),
}

impl GetErrorSeverity for ExecutionError {
    fn get_severity(&self) -> ErrorSeverity {
        match self {
            Self::Parse(err) => err.get_severity(),
            Self::Command(_) => ErrorSeverity::High,
        }
    }
}

impl Display for ExecutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionError::Parse(err) => write!(f, "failed to parse arguments: {err}"),
            ExecutionError::Command(err) => write!(f, "command failed: {err}"),
        }
    }
}
impl std::error::Error for ExecutionError {}

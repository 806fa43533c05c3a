use std::fmt::Display;

pub trait GetErrorSeverity {
    fn get_severity(&self) -> ErrorSeverity;
}

/// An error when pre-processing the message.
///
/// A self-bot sees every message in every chat it is in, so almost all of
/// these describe ordinary traffic rather than anything wrong; they exist
/// to be logged at debug and dropped.
#[derive(Debug, PartialEq, Eq)]
pub enum PreParseError {
    /// Message carries no text at all.
    NoTextContent,
    /// Message was authored by someone other than the session user.
    NotAuthoredBySession,
    /// Message does not start with the configured prefix.
    MessageNotPrefixed(String),
    /// The prefix is there but no command name follows it.
    NoCommandName,
}

impl Display for PreParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoTextContent => f.write_str("Message has no text content"),
            Self::NotAuthoredBySession => f.write_str("Message was not authored by the session user"),
            Self::MessageNotPrefixed(prefix) => {
                write!(f, "Message does not start with correct prefix ({prefix})")
            },
            Self::NoCommandName => f.write_str("No command name follows the prefix"),
        }
    }
}

impl GetErrorSeverity for PreParseError {
    fn get_severity(&self) -> ErrorSeverity {
        ErrorSeverity::Low
    }
}

impl std::error::Error for PreParseError {}

#[derive(PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    High,
}

use ferrite_telegram::types::Message;

use crate::update_handler::message_parser::error::PreParseError;

/// Initial message processing.
/// Checks the validity of the message before performing any kind of parsing.
///
/// This includes:
/// - Checking that the message has text at all,
/// - Checking that the session user authored it (nobody else's messages
///   ever trigger commands),
/// - Checking that the text starts with the configured prefix.
///
/// Returns the text with the prefix stripped off.
pub fn preprocess<'a>(me_id: i64, prefix: &str, message: &'a Message) -> Result<&'a str, PreParseError> {
    let text = message
        .text
        .as_deref()
        .filter(|text| !text.is_empty())
        .ok_or(PreParseError::NoTextContent)?;

    if message.from.as_ref().map(|from| from.id) != Some(me_id) {
        return Err(PreParseError::NotAuthoredBySession);
    }

    text.strip_prefix(prefix)
        .ok_or_else(|| PreParseError::MessageNotPrefixed(prefix.to_owned()))
}

use crate::command::TCommand;
use crate::ferrite::Ferrite;
use crate::update_handler::message_parser::error::PreParseError;

/// Splits prefix-stripped text into the command name and the argument
/// window, and looks the name up in the registry.
///
/// Returns `Ok(None)` for names nobody registered: ordinary chat can look
/// like a command, so unknown names stay silent.
pub fn find_command<'a>(ferrite: &Ferrite, stripped: &'a str) -> Result<Option<(TCommand, &'a str)>, PreParseError> {
    if stripped.is_empty() || stripped.starts_with(char::is_whitespace) {
        return Err(PreParseError::NoCommandName);
    }

    let end = stripped.find(char::is_whitespace).unwrap_or(stripped.len());
    let (name, args) = stripped.split_at(end);

    Ok(ferrite.registry.find_command(name).map(|command| (command, args)))
}

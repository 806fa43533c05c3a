use ferrite_common::config::CONFIG;
use ferrite_common::html::Html;
use ferrite_telegram::types::Message;
use tracing::{debug, error, info};

use crate::command::errors::{ArgError, CommandError};
use crate::command::{CommandCtxt, CommandData, CommandMetadata, ExecutionError};
use crate::ferrite::ThreadSafeFerrite;
use crate::update_handler::message_parser::error::{ErrorSeverity, GetErrorSeverity};
use crate::update_handler::message_parser::parser::find_command;
use crate::update_handler::message_parser::preprocess::preprocess;

/// Handles a new message: passes it through the parser and, when it turns
/// out to be a command, executes it and renders whatever failure comes
/// back. Never fails itself; render failures end up in the log so a bad
/// command can not take the update loop with it.
pub async fn handle(ferrite: ThreadSafeFerrite, message: Message) {
    handle_message(&ferrite, &message, &CONFIG.prefix.default).await;
}

pub async fn handle_message(ferrite: &ThreadSafeFerrite, message: &Message, prefix: &str) {
    let stripped = match preprocess(ferrite.me.id, prefix, message) {
        Ok(stripped) => stripped,
        Err(err) => {
            debug!("ignoring message {}: {err}", message.message_id);
            return;
        },
    };

    let (command, args) = match find_command(ferrite, stripped) {
        Ok(Some(found)) => found,
        Ok(None) => return, /* not a registered command */
        Err(err) => {
            debug!("ignoring message {}: {err}", message.message_id);
            return;
        },
    };

    info!("executing command {} in chat {}", command.metadata().name, message.chat.id);

    let data = CommandData {
        ferrite,
        message,
        calling_prefix: prefix,
    };
    let ctxt = CommandCtxt::new(&data, args);

    if let Err(err) = command.execute(ctxt).await {
        let Some(rendered) = render_execution_error(&err, prefix, command.metadata()) else {
            debug!("{err}");
            return;
        };
        let ctxt = CommandCtxt::new(&data, args);
        if let Err(render_err) = ctxt.reply(&rendered).await {
            error!("failed to render error for {}: {render_err}", command.metadata().name);
        }
    }
}

/// Maps an execution failure to its rendered HTML form. `None` drops the
/// failure silently.
fn render_execution_error(err: &ExecutionError, prefix: &str, meta: &CommandMetadata) -> Option<String> {
    match err {
        // a required argument was missing: report the command's usage
        ExecutionError::Parse(ArgError::ArgsExhausted(_)) => Some(format!(
            "❌ <b>Not enough arguments!</b>\nUsage: <code>{prefix}{}</code>",
            meta.signature().escaped(),
        )),
        err if err.get_severity() == ErrorSeverity::Low => None,
        ExecutionError::Parse(parse_err) => Some(format!("❌ <b>{}</b>", parse_err.escaped())),
        ExecutionError::Command(CommandError::User(text) | CommandError::Auth(text)) => Some(text.clone()),
        ExecutionError::Command(CommandError::Platform(platform_err)) => {
            Some(format!("❌ <b>Error:</b> {}", platform_err.escaped()))
        },
        ExecutionError::Command(CommandError::Internal(internal_err)) => {
            Some(format!("❌ <b>Error:</b> {}", internal_err.escaped()))
        },
    }
}

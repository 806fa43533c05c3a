//! Saved text snippets, persisted across restarts.

use std::fmt::Write;
use std::time::Duration;

use ferrite_common::html::Html;
use ferrite_common::util::unix_timestamp;
use ferrite_database::model::note::Note;
use ferrite_proc_macro::command;
use tracing::debug;

use super::arguments::{RestOrReply, Word};
use super::errors::CommandError;
use super::{Category, CommandCtxt};
use crate::update_handler::reply::rendered_message_id;

/// How long the inline usage notice stays up before it is removed.
const USAGE_DISPLAY_TIME: Duration = Duration::from_secs(3);

#[command(
    description = "save a note, from arguments or the replied-to message",
    usage = "[name] [content or reply]",
    examples = ["wifi the password is hunter2", "rules"]
)]
pub async fn save(
    ctxt: CommandCtxt<'_>,
    name: Option<Word>,
    content: Option<RestOrReply>,
) -> Result<(), CommandError> {
    let (Some(Word(name)), Some(RestOrReply(content))) = (name, content) else {
        ctxt.reply(format!(
            "<b>Not enough arguments!</b>\nUsage: {}save [name] [content or reply]",
            ctxt.data.calling_prefix
        ))
        .await?;
        tokio::time::sleep(USAGE_DISPLAY_TIME).await;
        let target = rendered_message_id(&ctxt);
        if let Err(err) = ctxt.telegram().delete_message(ctxt.chat_id(), target).await {
            debug!("failed to remove the usage notice: {err}");
        }
        return Ok(());
    };

    let note = Note {
        name,
        content,
        created_at: unix_timestamp(),
    };
    note.set(&ctxt.ferrite().database_handler).await.map_err(anyhow::Error::from)?;

    ctxt.reply(format!("<b>✅ Note {} saved!</b>", note.name.escaped())).await?;
    Ok(())
}

#[command(description = "retrieve a saved note", usage = "[name]", examples = ["wifi"])]
pub async fn get(ctxt: CommandCtxt<'_>, name: Word) -> Result<(), CommandError> {
    let Word(name) = name;

    match Note::get(&ctxt.ferrite().database_handler, &name).await? {
        Some(note) => ctxt.reply(note.content.escaped()).await?,
        None => return Err(CommandError::user(format!("❌ <b>Note {} not found!</b>", name.escaped()))),
    }
    Ok(())
}

#[command(description = "list the names of every saved note", usage = "", examples = [""])]
pub async fn notes(ctxt: CommandCtxt<'_>) -> Result<(), CommandError> {
    let names = Note::list_names(&ctxt.ferrite().database_handler)
        .await
        .map_err(anyhow::Error::from)?;

    if names.is_empty() {
        ctxt.reply("<b>📒 No saved notes!</b>").await?;
        return Ok(());
    }

    let mut text = String::from("<b>📒 Saved notes:</b>\n\n");
    for name in &names {
        let _ = writeln!(text, "  • <code>{}</code>", name.escaped());
    }
    let _ = write!(
        text,
        "\nUse <code>{}get [name]</code> to retrieve a note.",
        ctxt.data.calling_prefix
    );
    ctxt.reply(text).await?;
    Ok(())
}

#[command(description = "delete a saved note", usage = "[name]", examples = ["wifi"])]
pub async fn clear(ctxt: CommandCtxt<'_>, name: Word) -> Result<(), CommandError> {
    let Word(name) = name;

    let removed = Note::delete(&ctxt.ferrite().database_handler, &name)
        .await
        .map_err(anyhow::Error::from)?;
    if !removed {
        return Err(CommandError::user(format!("❌ <b>Note {} not found!</b>", name.escaped())));
    }

    ctxt.reply(format!("<b>✅ Note {} deleted!</b>", name.escaped())).await?;
    Ok(())
}

crate::declare_module!(
    name: "notes",
    category: Category::Utils,
    commands: [save_command, get_command, notes_command, clear_command]
);

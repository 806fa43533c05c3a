//! Session and environment introspection commands.

use std::env::consts::{ARCH, OS};
use std::fmt::Write;

use ferrite_common::config::CONFIG;
use ferrite_common::html::Html;
use ferrite_common::util::get_memory_usage;
use ferrite_proc_macro::command;
use time::OffsetDateTime;
use time::macros::format_description;

use super::errors::CommandError;
use super::{Category, CommandCtxt};

fn about_text(repository: &str) -> Result<String, time::error::Format> {
    let now = OffsetDateTime::now_utc().format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ))?;

    Ok(format!(
        "<b>🔥 Ferrite-UserBot</b>\n\n\
         <b>Version:</b> <code>{}</code>\n\
         <b>Platform:</b> <code>{OS}/{ARCH}</code>\n\
         <b>Source:</b> {}\n\
         <b>Date:</b> <code>{now} UTC</code>",
        env!("CARGO_PKG_VERSION"),
        "GitHub".url(repository),
    ))
}

fn botinfo_text(session_id: i64, uptime_seconds: u64, database_path: &str) -> String {
    let memory = match get_memory_usage() {
        Some(bytes) => format!("{} MiB", bytes / 1024 / 1024),
        None => "unknown".to_owned(),
    };
    let hours = uptime_seconds / 3600;
    let minutes = (uptime_seconds % 3600) / 60;
    let seconds = uptime_seconds % 60;

    format!(
        "<b>🔧 Ferrite-UserBot Technical Info</b>\n\n\
         <b>PID:</b> <code>{}</code>\n\
         <b>Memory:</b> <code>{memory}</code>\n\
         <b>Uptime:</b> <code>{hours}h {minutes}m {seconds}s</code>\n\
         <b>Session ID:</b> <code>{session_id}</code>\n\
         <b>Database:</b> <code>{}</code>",
        std::process::id(),
        database_path.escaped(),
    )
}

#[command(
    description = "show what this bot is and where it comes from",
    aliases = ["info"],
    usage = "",
    examples = [""]
)]
pub async fn about(ctxt: CommandCtxt<'_>) -> Result<(), CommandError> {
    let text = about_text(&CONFIG.urls.repository).map_err(|err| CommandError::Internal(err.into()))?;
    ctxt.reply(text).await?;
    Ok(())
}

#[command(description = "show technical details of the running session", usage = "", examples = [""])]
pub async fn botinfo(ctxt: CommandCtxt<'_>) -> Result<(), CommandError> {
    let uptime = ctxt.ferrite().started_at.elapsed().as_secs();
    let text = botinfo_text(ctxt.ferrite().me.id, uptime, &CONFIG.database.path);
    ctxt.reply(text).await?;
    Ok(())
}

#[command(
    description = "show the ids of the chat, the replied-to user, and yourself",
    usage = "",
    examples = [""]
)]
pub async fn id(ctxt: CommandCtxt<'_>) -> Result<(), CommandError> {
    let message = ctxt.data.message;

    let mut text = format!("<b>💬 Chat ID:</b> <code>{}</code>\n", message.chat.id);
    if let Some(reply) = message.reply_to_message.as_deref() {
        if let Some(from) = &reply.from {
            let _ = writeln!(text, "<b>🙋‍♂️ Replied User ID:</b> <code>{}</code>", from.id);
        }
        if let Some(origin) = &reply.forward_from {
            let _ = writeln!(text, "<b>↩️ Forwarded From:</b> <code>{}</code>", origin.id);
        }
    }
    let _ = write!(text, "<b>👤 Your ID:</b> <code>{}</code>", ctxt.ferrite().me.id);

    ctxt.reply(text).await?;
    Ok(())
}

crate::declare_module!(
    name: "info",
    category: Category::Utils,
    commands: [about_command, botinfo_command, id_command]
);

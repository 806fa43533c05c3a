//! Chat moderation: bans, mutes, pins, and admin promotion.
//!
//! Every handler runs [`privileges::check_privileges`] before resolving its
//! target or touching the chat, so a failed check produces no platform
//! mutations at all. Confirmations are edited over the invoking message in
//! two steps, a progress line and then the final summary.

use std::fmt::Write;

use ferrite_common::html::Html;
use ferrite_common::util::{format_duration, unix_timestamp};
use ferrite_proc_macro::command;
use ferrite_telegram::error::TelegramError;
use ferrite_telegram::types::{Chat, ChatPermissions, ChatPrivileges, Privilege};

use self::privileges::check_privileges;
use super::arguments::{Rest, Target, TimeSpan, Word};
use super::errors::CommandError;
use super::{Category, CommandCtxt};
use crate::command::arguments::ResolvedUser;

pub mod privileges;

/// Maps the two refusals the platform reports mid-mutation onto auth
/// errors with the handler's own wording; anything else passes through.
fn guard(result: Result<(), TelegramError>, no_rights: &str, target_admin: Option<&str>) -> Result<(), CommandError> {
    match result {
        Ok(()) => Ok(()),
        Err(err) if err.is_admin_refusal() => Err(CommandError::auth(no_rights)),
        Err(err) => match target_admin {
            Some(text) if err.is_target_admin() => Err(CommandError::auth(text)),
            _ => Err(err.into()),
        },
    }
}

fn moderation_summary(headline: &str, chat: &Chat, user: &ResolvedUser, extra: Option<(&str, &str)>) -> String {
    let chat_name = chat.title.as_deref().unwrap_or("this chat");
    let mut text = format!(
        "{headline}\n\n<b>Chat:</b> {}\n<b>User:</b> {}\n<b>ID:</b> <code>{}</code>",
        chat_name.escaped(),
        user.first_name.escaped(),
        user.id
    );
    if let Some((label, value)) = extra {
        let _ = write!(text, "\n<b>{label}:</b> {}", value.escaped());
    }
    text
}

/// `None` when the span is absent or zero, which both mean "forever".
/// An expiry past the end of the i64 range saturates instead of wrapping.
fn until_from(length: Option<TimeSpan>) -> Option<i64> {
    length.and_then(|TimeSpan(seconds)| (seconds > 0).then(|| unix_timestamp().saturating_add(seconds)))
}

#[command(
    description = "ban a user from the chat",
    usage = "[user] [duration] [reason]",
    examples = ["@spammer 2h flooding", "12345"]
)]
pub async fn ban(
    ctxt: CommandCtxt<'_>,
    target: Target,
    length: Option<TimeSpan>,
    reason: Option<Rest>,
) -> Result<(), CommandError> {
    check_privileges(&ctxt, &[Privilege::RestrictMembers]).await?;
    ctxt.reply("<b>🔨 Banning user...</b>").await?;
    let user = target.resolve(&ctxt).await?;

    guard(
        ctxt.telegram().ban_chat_member(ctxt.chat_id(), user.id, until_from(length)).await,
        "❌ <b>I don't have permission to ban users!</b>",
        Some("❌ <b>I can't ban an admin!</b>"),
    )?;

    let headline = match length {
        Some(TimeSpan(seconds)) if seconds > 0 => {
            format!("<b>🔨 User banned for {}!</b>", format_duration(seconds))
        },
        _ => "<b>🔨 User banned permanently!</b>".to_owned(),
    };
    let extra = reason.as_ref().map(|Rest(text)| ("Reason", text.as_str()));
    ctxt.reply(moderation_summary(&headline, &ctxt.data.message.chat, &user, extra))
        .await?;
    Ok(())
}

#[command(description = "lift a user's ban", usage = "[user]", examples = ["@spammer", "12345"])]
pub async fn unban(ctxt: CommandCtxt<'_>, target: Target) -> Result<(), CommandError> {
    check_privileges(&ctxt, &[Privilege::RestrictMembers]).await?;
    ctxt.reply("<b>✅ Unbanning user...</b>").await?;
    let user = target.resolve(&ctxt).await?;

    guard(
        ctxt.telegram().unban_chat_member(ctxt.chat_id(), user.id).await,
        "❌ <b>I don't have permission to unban users!</b>",
        None,
    )?;

    ctxt.reply(moderation_summary(
        "<b>✅ User unbanned!</b>",
        &ctxt.data.message.chat,
        &user,
        None,
    ))
    .await?;
    Ok(())
}

#[command(
    description = "remove a user from the chat without banning them",
    usage = "[user] [reason]",
    examples = ["@lurker", "12345 cleanup"]
)]
pub async fn kick(ctxt: CommandCtxt<'_>, target: Target, reason: Option<Rest>) -> Result<(), CommandError> {
    check_privileges(&ctxt, &[Privilege::RestrictMembers]).await?;
    ctxt.reply("<b>👢 Kicking user...</b>").await?;
    let user = target.resolve(&ctxt).await?;

    // a ban immediately followed by an unban removes without blacklisting
    guard(
        ctxt.telegram().ban_chat_member(ctxt.chat_id(), user.id, None).await,
        "❌ <b>I don't have permission to kick users!</b>",
        Some("❌ <b>I can't kick an admin!</b>"),
    )?;
    guard(
        ctxt.telegram().unban_chat_member(ctxt.chat_id(), user.id).await,
        "❌ <b>I don't have permission to kick users!</b>",
        None,
    )?;

    let extra = reason.as_ref().map(|Rest(text)| ("Reason", text.as_str()));
    ctxt.reply(moderation_summary(
        "<b>👢 User kicked!</b>",
        &ctxt.data.message.chat,
        &user,
        extra,
    ))
    .await?;
    Ok(())
}

#[command(
    description = "stop a user from sending messages",
    usage = "[user] [duration] [reason]",
    examples = ["@spammer 10m", "12345 flooding"]
)]
pub async fn mute(
    ctxt: CommandCtxt<'_>,
    target: Target,
    length: Option<TimeSpan>,
    reason: Option<Rest>,
) -> Result<(), CommandError> {
    check_privileges(&ctxt, &[Privilege::RestrictMembers]).await?;
    ctxt.reply("<b>🔇 Muting user...</b>").await?;
    let user = target.resolve(&ctxt).await?;

    guard(
        ctxt.telegram()
            .restrict_chat_member(ctxt.chat_id(), user.id, &ChatPermissions::muted(), until_from(length))
            .await,
        "❌ <b>I don't have permission to mute users!</b>",
        Some("❌ <b>I can't mute an admin!</b>"),
    )?;

    let headline = match length {
        Some(TimeSpan(seconds)) if seconds > 0 => {
            format!("<b>🔇 User muted for {}!</b>", format_duration(seconds))
        },
        _ => "<b>🔇 User muted permanently!</b>".to_owned(),
    };
    let extra = reason.as_ref().map(|Rest(text)| ("Reason", text.as_str()));
    ctxt.reply(moderation_summary(&headline, &ctxt.data.message.chat, &user, extra))
        .await?;
    Ok(())
}

#[command(description = "lift a user's mute", usage = "[user]", examples = ["@spammer", "12345"])]
pub async fn unmute(ctxt: CommandCtxt<'_>, target: Target) -> Result<(), CommandError> {
    check_privileges(&ctxt, &[Privilege::RestrictMembers]).await?;
    ctxt.reply("<b>🔊 Unmuting user...</b>").await?;
    let user = target.resolve(&ctxt).await?;

    // restore whatever ordinary members of this chat are allowed to do
    let chat = ctxt.telegram().get_chat(ctxt.chat_id()).await?;
    let permissions = chat.permissions.unwrap_or_default();
    guard(
        ctxt.telegram()
            .restrict_chat_member(ctxt.chat_id(), user.id, &permissions, None)
            .await,
        "❌ <b>I don't have permission to unmute users!</b>",
        None,
    )?;

    ctxt.reply(moderation_summary(
        "<b>🔊 User unmuted!</b>",
        &ctxt.data.message.chat,
        &user,
        None,
    ))
    .await?;
    Ok(())
}

#[command(
    description = "pin the replied-to message",
    usage = "[silent]",
    examples = ["", "silent"]
)]
pub async fn pin(ctxt: CommandCtxt<'_>, mode: Option<Word>) -> Result<(), CommandError> {
    check_privileges(&ctxt, &[Privilege::PinMessages]).await?;

    let Some(reply_message) = ctxt.data.message.reply_to_message.as_deref() else {
        return Err(CommandError::user("❌ <b>Reply to a message to pin it!</b>"));
    };
    let silent = mode
        .as_ref()
        .is_some_and(|Word(word)| matches!(word.to_lowercase().as_str(), "silent" | "quiet" | "s" | "q"));

    ctxt.reply("<b>📌 Pinning message...</b>").await?;
    guard(
        ctxt.telegram()
            .pin_chat_message(ctxt.chat_id(), reply_message.message_id, silent)
            .await,
        "❌ <b>I don't have permission to pin messages!</b>",
        None,
    )?;

    ctxt.reply("<b>📌 Message pinned successfully!</b>").await?;
    Ok(())
}

#[command(
    description = "unpin the replied-to message, the latest pin, or everything",
    usage = "[all]",
    examples = ["", "all"]
)]
pub async fn unpin(ctxt: CommandCtxt<'_>, mode: Option<Word>) -> Result<(), CommandError> {
    check_privileges(&ctxt, &[Privilege::PinMessages]).await?;

    if mode.as_ref().is_some_and(|Word(word)| word.eq_ignore_ascii_case("all")) {
        ctxt.reply("<b>📌 Unpinning all messages...</b>").await?;
        guard(
            ctxt.telegram().unpin_all_chat_messages(ctxt.chat_id()).await,
            "❌ <b>I don't have permission to unpin messages!</b>",
            None,
        )?;
        ctxt.reply("<b>📌 All messages unpinned!</b>").await?;
        return Ok(());
    }

    // without a reply the platform unpins the most recent pin
    let message_id = ctxt.data.message.reply_to_message.as_deref().map(|message| message.message_id);
    ctxt.reply("<b>📌 Unpinning message...</b>").await?;
    guard(
        ctxt.telegram().unpin_chat_message(ctxt.chat_id(), message_id).await,
        "❌ <b>I don't have permission to unpin messages!</b>",
        None,
    )?;
    ctxt.reply("<b>📌 Message unpinned successfully!</b>").await?;
    Ok(())
}

#[command(
    description = "promote a user to admin, optionally with a custom title",
    usage = "[user] [title]",
    examples = ["@helper", "12345 Chief Janitor"]
)]
pub async fn promote(ctxt: CommandCtxt<'_>, target: Target, title: Option<Rest>) -> Result<(), CommandError> {
    check_privileges(&ctxt, &[Privilege::PromoteMembers]).await?;
    ctxt.reply("<b>⬆️ Promoting user...</b>").await?;
    let user = target.resolve(&ctxt).await?;

    guard(
        ctxt.telegram()
            .promote_chat_member(ctxt.chat_id(), user.id, &ChatPrivileges::standard_admin())
            .await,
        "❌ <b>I don't have permission to promote users!</b>",
        Some("❌ <b>Cannot promote an admin!</b>"),
    )?;
    if let Some(Rest(text)) = &title {
        guard(
            ctxt.telegram().set_administrator_title(ctxt.chat_id(), user.id, text).await,
            "❌ <b>I don't have permission to promote users!</b>",
            Some("❌ <b>Cannot promote an admin!</b>"),
        )?;
    }

    let extra = title.as_ref().map(|Rest(text)| ("Title", text.as_str()));
    ctxt.reply(moderation_summary(
        "<b>⬆️ User promoted to admin!</b>",
        &ctxt.data.message.chat,
        &user,
        extra,
    ))
    .await?;
    Ok(())
}

#[command(description = "strip a user's admin rights", usage = "[user]", examples = ["@helper", "12345"])]
pub async fn demote(ctxt: CommandCtxt<'_>, target: Target) -> Result<(), CommandError> {
    check_privileges(&ctxt, &[Privilege::PromoteMembers]).await?;
    ctxt.reply("<b>⬇️ Demoting user...</b>").await?;
    let user = target.resolve(&ctxt).await?;

    // promoting with every flag off is how the platform demotes
    guard(
        ctxt.telegram()
            .promote_chat_member(ctxt.chat_id(), user.id, &ChatPrivileges::none())
            .await,
        "❌ <b>I don't have permission to demote users!</b>",
        Some("❌ <b>Cannot demote this user!</b>"),
    )?;

    ctxt.reply(moderation_summary(
        "<b>⬇️ User demoted!</b>",
        &ctxt.data.message.chat,
        &user,
        None,
    ))
    .await?;
    Ok(())
}

crate::declare_module!(
    name: "admin",
    category: Category::Admin,
    commands: [
        ban_command,
        unban_command,
        kick_command,
        mute_command,
        unmute_command,
        pin_command,
        unpin_command,
        promote_command,
        demote_command,
    ]
);

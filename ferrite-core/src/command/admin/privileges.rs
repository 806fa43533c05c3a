use ferrite_telegram::types::{ChatMemberStatus, Privilege};

use crate::command::CommandCtxt;
use crate::command::errors::CommandError;

pub const NOT_A_GROUP: &str = "❌ <b>This command can only be used in groups!</b>";
pub const SESSION_NOT_ADMIN: &str = "❌ <b>I'm not an admin in this chat!</b>";
pub const ISSUER_NOT_IN_CHAT: &str = "❌ <b>You're not even in this chat!</b>";
pub const ISSUER_NOT_ADMIN: &str = "❌ <b>You must be an admin to use this command!</b>";

/// Pre-flight checks every moderation command runs before touching its
/// target: group chat, session adminship, the required capability flags,
/// and the issuer's own membership and adminship. Checks run in that
/// order and the first failure wins; a failure means the handler must not
/// resolve a target or call any mutation.
pub async fn check_privileges(ctxt: &CommandCtxt<'_>, required: &[Privilege]) -> Result<(), CommandError> {
    let message = ctxt.data.message;
    let chat = &message.chat;

    if !chat.is_group_like() {
        return Err(CommandError::auth(NOT_A_GROUP));
    }

    let session_member = match ctxt.telegram().get_chat_member(chat.id, ctxt.ferrite().me.id).await {
        Ok(member) => member,
        // the membership query itself needs admin rights in some chats
        Err(err) if err.is_admin_refusal() => return Err(CommandError::auth(SESSION_NOT_ADMIN)),
        Err(err) => return Err(err.into()),
    };
    if !session_member.is_admin() {
        return Err(CommandError::auth(SESSION_NOT_ADMIN));
    }

    let missing: Vec<Privilege> = required
        .iter()
        .copied()
        .filter(|&privilege| !session_member.has_privilege(privilege))
        .collect();
    if !missing.is_empty() {
        let names = missing.iter().map(|privilege| privilege.title()).collect::<Vec<_>>().join(", ");
        return Err(CommandError::auth(format!(
            "❌ <b>I don't have the required privileges:</b> {names}"
        )));
    }

    let issuer_id = message.from.as_ref().map(|from| from.id).unwrap_or(ctxt.ferrite().me.id);
    let issuer = match ctxt.telegram().get_chat_member(chat.id, issuer_id).await {
        Ok(member) => member,
        Err(err) if err.is_not_participant() => return Err(CommandError::auth(ISSUER_NOT_IN_CHAT)),
        Err(err) => return Err(err.into()),
    };
    if matches!(issuer.status, ChatMemberStatus::Left | ChatMemberStatus::Kicked) {
        return Err(CommandError::auth(ISSUER_NOT_IN_CHAT));
    }
    if !issuer.is_admin() {
        return Err(CommandError::auth(ISSUER_NOT_ADMIN));
    }

    Ok(())
}

use ferrite_telegram::TelegramError;

use crate::command::CommandCtxt;

/// The id of the message currently carrying this invocation's rendered
/// output: the triggering message itself, unless an earlier render had to
/// fall back to a fresh message.
pub fn rendered_message_id(ctxt: &CommandCtxt<'_>) -> i64 {
    let invoking_id = ctxt.data.message.message_id;
    ctxt.ferrite().replies.get(invoking_id).unwrap_or(invoking_id)
}

/// Renders command output by editing the carrying message in place.
///
/// The platform refuses edits of deleted or long-gone messages; those
/// fall back to sending a fresh message, remembered per invocation so
/// later renders edit the fallback. A "message is not modified" refusal
/// means the text is already shown, which counts as success.
pub async fn respond(ctxt: &CommandCtxt<'_>, text: &str) -> Result<(), TelegramError> {
    let message = ctxt.data.message;
    let chat_id = message.chat.id;
    let target_id = rendered_message_id(ctxt);

    match ctxt.telegram().edit_message_text(chat_id, target_id, text).await {
        Ok(()) => Ok(()),
        Err(err) if err.is_not_modified() => Ok(()),
        Err(err) if err.is_message_missing() => {
            let reply_to = message.reply_to_message.as_ref().map(|reply| reply.message_id);
            let sent = ctxt.telegram().send_message(chat_id, text, reply_to).await?;
            ctxt.ferrite().replies.insert(message.message_id, sent.message_id);
            Ok(())
        },
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::command::CommandData;
    use crate::testutil::{Call, RecordingApi, group_message, test_ferrite};

    #[tokio::test]
    async fn respond_edits_the_invoking_message() {
        let api = Arc::new(RecordingApi::new());
        let ferrite = test_ferrite(api.clone()).await;
        let message = group_message(".ping");
        let data = CommandData {
            ferrite: &ferrite,
            message: &message,
            calling_prefix: ".",
        };
        let ctxt = CommandCtxt::new(&data, "");

        respond(&ctxt, "pong").await.unwrap();

        assert_eq!(api.renders(), vec!["pong".to_owned()]);
        assert!(matches!(
            api.calls()[0],
            Call::Edit { message_id, .. } if message_id == message.message_id
        ));
    }

    #[tokio::test]
    async fn respond_falls_back_to_send_when_message_is_gone() {
        let api = Arc::new(RecordingApi::new());
        api.fail_once("editMessageText", 400, "Bad Request: message to edit not found");
        let ferrite = test_ferrite(api.clone()).await;
        let message = group_message(".ping");
        let data = CommandData {
            ferrite: &ferrite,
            message: &message,
            calling_prefix: ".",
        };
        let ctxt = CommandCtxt::new(&data, "");

        respond(&ctxt, "pong").await.unwrap();
        // the fallback was recorded, so the next render edits it
        respond(&ctxt, "pong again").await.unwrap();

        let calls = api.calls();
        assert!(matches!(calls[0], Call::Edit { .. }));
        assert!(matches!(calls[1], Call::Send { .. }));
        assert!(matches!(
            calls[2],
            Call::Edit { message_id, .. } if message_id == RecordingApi::SENT_MESSAGE_ID
        ));
    }

    #[tokio::test]
    async fn respond_treats_not_modified_as_success() {
        let api = Arc::new(RecordingApi::new());
        api.fail_once("editMessageText", 400, "Bad Request: message is not modified");
        let ferrite = test_ferrite(api.clone()).await;
        let message = group_message(".ping");
        let data = CommandData {
            ferrite: &ferrite,
            message: &message,
            calling_prefix: ".",
        };
        let ctxt = CommandCtxt::new(&data, "");

        respond(&ctxt, "pong").await.unwrap();
        assert_eq!(api.calls().len(), 1);
    }
}

use ferrite_telegram::types::Update;

use crate::ferrite::ThreadSafeFerrite;

pub mod event_handlers;
pub mod message_parser;
pub mod reply;

/// Routes one polled update to the appropriate event handler.
pub async fn handle_update(ferrite: ThreadSafeFerrite, update: Update) {
    if let Some(message) = update.message {
        event_handlers::message_create::handle(ferrite, message).await;
    }
}

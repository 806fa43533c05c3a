use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::api::TelegramApi;
use crate::types::Update;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Long-polling update source.
///
/// Tracks the acknowledgement offset across calls and retries failures
/// with capped exponential backoff, so the caller's loop never has to
/// handle a polling error.
pub struct UpdatePoller {
    api: Arc<dyn TelegramApi>,
    offset: Option<i64>,
    timeout: u64,
}

impl UpdatePoller {
    pub fn new(api: Arc<dyn TelegramApi>, timeout: u64) -> Self {
        UpdatePoller {
            api,
            offset: None,
            timeout,
        }
    }

    /// Next batch of updates; possibly empty when the poll times out idle.
    pub async fn next_batch(&mut self) -> Vec<Update> {
        let mut backoff = INITIAL_BACKOFF;

        loop {
            match self.api.get_updates(self.offset, self.timeout).await {
                Ok(updates) => {
                    if let Some(last) = updates.last() {
                        self.offset = Some(last.update_id + 1);
                    }
                    return updates;
                },
                Err(e) => {
                    warn!("getUpdates failed: {e}, retrying in {backoff:?}");
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                },
            }
        }
    }
}
